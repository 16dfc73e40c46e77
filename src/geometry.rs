use serde_derive::Serialize;

/// Closest hit of a ray against a mesh, in the space the ray was expressed in
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Intersection {
	/// Distance along the ray direction
	pub distance: f32,
	/// Index of the triangle in the index buffer, i.e. `indices[3 * triangle..][..3]`
	pub triangle: usize,
	/// Barycentric coordinates of the hit, weights of the 2nd and 3rd vertices
	pub uv: (f32, f32),
}
