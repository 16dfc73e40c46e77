use super::{Mat4, Vec3};

/// Half-line `origin + direction * t` for `t` in `0..=length`.
///
/// `length` is expressed in units of `direction`; it may be infinite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Vec3,
	pub length: f32,
}

impl Ray {
	pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Ray {
		Ray { origin, direction, length }
	}

	/// Ray with no upper bound on its length
	pub fn unbounded(origin: Vec3, direction: Vec3) -> Ray {
		Ray { origin, direction, length: f32::INFINITY }
	}

	pub fn point_at(&self, t: f32) -> Vec3 {
		self.origin + self.direction * t
	}

	/// Express the ray in the space `m` maps to.
	///
	/// The direction is re-normalised and the length rescaled by the same factor,
	/// so `t` values on the result are distances in the new space and the segment
	/// end point maps onto the transformed end point.
	pub fn transform(&self, m: &Mat4) -> Ray {
		let origin = m.transform_point(self.origin);
		let direction = m.transform_vector(self.direction);
		let len = direction.length();

		if len == 0.0 || len == 1.0 {
			return Ray { origin, direction, length: self.length };
		}

		Ray {
			origin,
			direction: direction / len,
			length: self.length * len,
		}
	}

	/// Checks `length >= 0` and that origin/direction are finite, with a non-zero direction
	pub fn is_valid(&self) -> bool {
		self.origin.all_finite()
			&& self.direction.all_finite()
			&& self.direction != Vec3::zero()
			&& self.length >= 0.0
	}
}
