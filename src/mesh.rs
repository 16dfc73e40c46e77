use serde_derive::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::Intersection;
use crate::math::*;
use crate::triangle::intersect_triangle;

/// Represent vertex indices in triangles; 2^32 vertices should be enough
pub type Index = u32;

/// Read-only view of a triangle mesh in its local space.
///
/// `positions` holds `x, y, z` triples and every triple of `indices` is one triangle.
/// Construction checks that all indices are in range and all positions are finite, so
/// scanning never reads out of bounds nor reports a NaN distance.
#[derive(Copy, Clone, Debug)]
pub struct MeshGeometry<'a> {
	positions: &'a [f32],
	indices: &'a [Index],
}

impl<'a> MeshGeometry<'a> {
	pub fn new(positions: &'a [f32], indices: &'a [Index]) -> Result<MeshGeometry<'a>, GeometryError> {
		if positions.len() % 3 != 0 {
			return Err(GeometryError::PositionCount(positions.len()));
		}
		if indices.len() % 3 != 0 {
			return Err(GeometryError::IndexCount(indices.len()));
		}

		let vertex_count = positions.len() / 3;
		if let Some(i) = indices.iter().position(|&idx| idx as usize >= vertex_count) {
			return Err(GeometryError::IndexOutOfRange {
				triangle: i / 3,
				index: indices[i],
				vertex_count,
			});
		}

		let geometry = MeshGeometry { positions, indices };
		if let Some(vertex) = (0..vertex_count).find(|&i| !geometry.vertex(i).all_finite()) {
			return Err(GeometryError::NonFinitePosition { vertex });
		}

		Ok(geometry)
	}

	pub fn vertex_count(&self) -> usize {
		self.positions.len() / 3
	}

	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}

	pub fn vertex(&self, i: usize) -> Vec3 {
		let p = &self.positions[3 * i..3 * i + 3];
		Vec3::new(p[0], p[1], p[2])
	}

	pub fn triangle(&self, i: usize) -> [Vec3; 3] {
		let idxs = &self.indices[3 * i..3 * i + 3];
		[
			self.vertex(idxs[0] as usize),
			self.vertex(idxs[1] as usize),
			self.vertex(idxs[2] as usize),
		]
	}

	/// Closest hit among all triangles, scanned in index order.
	///
	/// A later triangle only replaces the current best if it is strictly closer,
	/// so equidistant hits resolve to the lowest triangle index.
	pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
		let mut closest: Option<Intersection> = None;

		for i in 0..self.triangle_count() {
			let [v0, v1, v2] = self.triangle(i);
			if let Some((t, uv)) = intersect_triangle(ray, v0, v1, v2) {
				match closest {
					Some(Intersection { distance: t_min, .. }) if t >= t_min => {}
					_ => closest = Some(Intersection { distance: t, triangle: i, uv }),
				}
			}
		}

		closest
	}
}

/// Owned mesh buffers, as loaded from a file or a description
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
	positions: Vec<f32>,
	indices: Vec<Index>,
}

impl Mesh {
	pub fn new(positions: Vec<f32>, indices: Vec<Index>) -> Result<Mesh, GeometryError> {
		MeshGeometry::new(&positions, &indices)?;
		Ok(Mesh { positions, indices })
	}

	/// Recheck the buffers, e.g. after deserialization
	pub fn validate(&self) -> Result<(), GeometryError> {
		MeshGeometry::new(&self.positions, &self.indices).map(|_| ())
	}

	pub fn geometry(&self) -> MeshGeometry<'_> {
		MeshGeometry {
			positions: &self.positions,
			indices: &self.indices,
		}
	}

	pub fn positions(&self) -> &[f32] {
		&self.positions
	}

	pub fn indices(&self) -> &[Index] {
		&self.indices
	}
}
