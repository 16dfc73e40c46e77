use crate::math::*;

/// Smallest accepted cosine between the ray and the triangle's plane.
///
/// The determinant is compared against this times the triangle's doubled area, so the
/// test doesn't depend on the triangle's size. Zero-area triangles always fail it.
pub const DET_EPSILON: f32 = 1e-8;

/// Möller–Trumbore ray/triangle test.
///
/// Returns the distance along the ray and the barycentric coordinates `(u, v)` of the hit,
/// or `None` when the segment `[0, ray.length]` does not cross the triangle.
/// Points on an edge or a vertex count as hits. Every check accepts rather than rejects,
/// so NaN anywhere in the computation is a miss.
pub fn intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, (f32, f32))> {
	let edge1 = v1 - v0;
	let edge2 = v2 - v0;

	let p = Vec3::cross(ray.direction, edge2);
	let det = Vec3::dot(edge1, p);
	let area = Vec3::cross(edge1, edge2).length();
	if !(det.abs() > DET_EPSILON * area) {
		return None;
	}
	let idet = 1.0 / det;

	let t = ray.origin - v0;
	let u = Vec3::dot(t, p) * idet;
	if !(0.0..=1.0).contains(&u) {
		return None;
	}

	let q = Vec3::cross(t, edge1);
	let v = Vec3::dot(ray.direction, q) * idet;
	if !(0.0..=1.0).contains(&v) || u + v > 1.0 {
		return None;
	}

	let dist = Vec3::dot(edge2, q) * idet;
	if !(0.0..=ray.length).contains(&dist) {
		return None;
	}

	Some((dist, (u, v)))
}
