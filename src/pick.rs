//! World-space picking against a single transformed mesh.
//!
//! The ray is taken into the mesh's local space with the inverse world transform,
//! scanned against every triangle there, and the closest hit is mapped back into
//! world space. Nothing is cached between calls.

use serde_derive::Serialize;
use tracing::trace;

use crate::error::{PickError, Result};
use crate::math::*;
use crate::mesh::{Index, MeshGeometry};
use crate::targets::PICK;

/// Closest hit of a world-space ray against a transformed mesh
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Pick {
	/// World-space distance from the ray origin to `point`
	pub distance: f64,
	/// World-space hit point
	pub point: Vec3,
	/// Index of the triangle that was hit
	pub triangle: usize,
	/// Barycentric coordinates of the hit inside the triangle
	pub uv: (f32, f32),
}

/// Distance from the origin of `ray` to its closest hit on the mesh, or `None` if it misses.
///
/// `positions` and `indices` are the mesh's flat local-space buffers and `world` maps
/// local space to world space.
///
/// # Errors
/// - [`PickError::MalformedGeometry`] if the buffers are not whole triples or an index is out of range
/// - [`PickError::SingularTransform`] if `world` has no inverse
/// - [`PickError::InvalidRay`] if the ray is not finite or has a negative length
pub fn intersect_ray_with_mesh(ray: &Ray, positions: &[f32], indices: &[Index], world: &Mat4) -> Result<Option<f64>> {
	let geometry = MeshGeometry::new(positions, indices)?;
	Ok(pick(ray, geometry, world)?.map(|p| p.distance))
}

/// Same as [`intersect_ray_with_mesh`] for an already validated mesh, returning the full hit
pub fn pick(ray: &Ray, geometry: MeshGeometry<'_>, world: &Mat4) -> Result<Option<Pick>> {
	if !ray.is_valid() {
		return Err(PickError::InvalidRay(*ray));
	}

	let to_local = world.inverse().ok_or(PickError::SingularTransform)?;
	let local_ray = ray.transform(&to_local);

	trace!(
		target: PICK,
		origin = ?local_ray.origin,
		direction = ?local_ray.direction,
		length = local_ray.length,
		"ray in local space"
	);

	let its = match geometry.intersect(&local_ray) {
		Some(its) => its,
		None => return Ok(None),
	};

	let world_origin = world.transform_point(local_ray.origin);
	let point = world.transform_point(local_ray.point_at(its.distance));

	Ok(Some(Pick {
		distance: f64::from(Vec3::distance(world_origin, point)),
		point,
		triangle: its.triangle,
		uv: its.uv,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	const TRIANGLE: [f32; 9] = [
		0.0, 0.0, 0.0,
		1.0, 0.0, 0.0,
		0.0, 1.0, 0.0,
	];
	const INDICES: [Index; 3] = [0, 1, 2];

	fn down(origin: Vec3, length: f32) -> Ray {
		Ray::new(origin, Vec3::new(0.0, 0.0, -1.0), length)
	}

	#[test]
	fn identity_transform() {
		let ray = down(Vec3::new(0.25, 0.25, 5.0), 10.0);
		let d = intersect_ray_with_mesh(&ray, &TRIANGLE, &INDICES, &Mat4::identity()).unwrap();
		assert_eq!(d, Some(5.0));
	}

	#[test]
	fn full_pick() {
		let ray = down(Vec3::new(1.0, 1.0, 4.0), 10.0);
		let world = Mat4::translate(Vec3::new(0.5, 0.5, 1.0));
		let geometry = MeshGeometry::new(&TRIANGLE, &INDICES).unwrap();
		let p = pick(&ray, geometry, &world).unwrap().unwrap();

		assert_relative_eq!(p.distance, 3.0, epsilon = 1e-6);
		assert_relative_eq!(p.point.x, 1.0, epsilon = 1e-6);
		assert_relative_eq!(p.point.y, 1.0, epsilon = 1e-6);
		assert_relative_eq!(p.point.z, 1.0, epsilon = 1e-6);
		assert_eq!(p.triangle, 0);
	}

	#[test]
	fn length_is_checked_in_world_units() {
		// local hit at 5 is 10 world units away
		let world = Mat4::scale(Vec3::thrice(2.0));
		let short = down(Vec3::new(0.5, 0.5, 10.0), 9.5);
		let long = down(Vec3::new(0.5, 0.5, 10.0), 10.5);

		assert_eq!(intersect_ray_with_mesh(&short, &TRIANGLE, &INDICES, &world).unwrap(), None);
		let d = intersect_ray_with_mesh(&long, &TRIANGLE, &INDICES, &world).unwrap().unwrap();
		assert_relative_eq!(d, 10.0, epsilon = 1e-5);
	}

	#[test]
	fn singular_transform() {
		let ray = down(Vec3::new(0.25, 0.25, 5.0), 10.0);
		let flat = Mat4::scale(Vec3::new(1.0, 1.0, 0.0));
		assert_eq!(
			intersect_ray_with_mesh(&ray, &TRIANGLE, &INDICES, &flat),
			Err(PickError::SingularTransform),
		);
	}

	#[test]
	fn geometry_is_checked_before_transform() {
		let ray = down(Vec3::new(0.25, 0.25, 5.0), 10.0);
		let flat = Mat4::scale(Vec3::new(1.0, 1.0, 0.0));
		let err = intersect_ray_with_mesh(&ray, &TRIANGLE, &[0, 1], &flat).unwrap_err();
		assert!(matches!(err, PickError::MalformedGeometry(_)));
	}

	#[test]
	fn invalid_ray() {
		let ray = down(Vec3::new(0.25, 0.25, 5.0), -1.0);
		let err = intersect_ray_with_mesh(&ray, &TRIANGLE, &INDICES, &Mat4::identity()).unwrap_err();
		assert_eq!(err, PickError::InvalidRay(ray));
	}
}
