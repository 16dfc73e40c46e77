use crate::math::*;

/// Pinhole camera turning pixel coordinates into picking rays.
///
/// In camera space the camera looks down `+z` with `+y` up; `transform` maps camera
/// space to world space (see [`Mat4::look_at`]).
#[derive(Clone, Debug)]
pub struct Camera {
	transform: Mat4,

	resolution: (usize, usize),
	ratio: f32,
	pixel_size: f32,

	plane_dist: f32,
	far: f32,
}

impl Camera {
	/// `fov` is the horizontal field of view in degrees. Rays are bounded by `far`, if given.
	pub fn new(transform: &Mat4, resolution: (usize, usize), fov: f32, far: Option<f32>) -> Camera {
		let fov_rad = fov * PI / 180.0;
		let plane_dist = 1.0 / (fov_rad * 0.5).tan();

		Camera {
			transform: *transform,
			resolution,
			ratio: resolution.1 as f32 / resolution.0 as f32,
			pixel_size: 1.0 / resolution.0 as f32,
			plane_dist,
			far: far.unwrap_or(f32::INFINITY),
		}
	}

	/// World-space ray through the centre of `pixel`, `(0, 0)` being the top left corner
	pub fn make_ray(&self, pixel: (usize, usize)) -> Ray {
		let img_plane_pos = Vec3 {
			x: -1.0       + (pixel.0 as f32 + 0.5) * 2.0 * self.pixel_size,
			y: self.ratio - (pixel.1 as f32 + 0.5) * 2.0 * self.pixel_size,
			z: self.plane_dist,
		};
		let local_dir = img_plane_pos.normalized();

		Ray {
			origin: self.transform.transform_point(Vec3::zero()),
			direction: self.transform.transform_vector(local_dir).normalized(),
			length: self.far,
		}
	}

	pub fn resolution(&self) -> (usize, usize) {
		self.resolution
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn centre_pixel_looks_forward() {
		let camera = Camera::new(&Mat4::identity(), (1, 1), 90.0, Some(50.0));
		let ray = camera.make_ray((0, 0));

		assert_eq!(ray.origin, Vec3::zero());
		assert_relative_eq!(ray.direction.x, 0.0);
		assert_relative_eq!(ray.direction.y, 0.0);
		assert_relative_eq!(ray.direction.z, 1.0);
		assert_eq!(ray.length, 50.0);
	}

	#[test]
	fn corners_spread_with_fov() {
		// 90 degrees: the image plane spans x in [-1, 1] at distance 1
		let camera = Camera::new(&Mat4::identity(), (2, 2), 90.0, None);
		let top_left = camera.make_ray((0, 0)).direction;
		let bottom_right = camera.make_ray((1, 1)).direction;

		assert!(top_left.x < 0.0 && top_left.y > 0.0);
		assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
		assert_relative_eq!(top_left.x / top_left.z, -0.5, epsilon = 1e-6);
		assert!(camera.make_ray((0, 0)).length.is_infinite());
	}

	#[test]
	fn square_pixels_on_wide_image() {
		let camera = Camera::new(&Mat4::identity(), (4, 2), 90.0, None);
		let plane = |p| {
			let d = camera.make_ray(p).direction;
			(d.x / d.z, d.y / d.z)
		};

		let (x0, y0) = plane((0, 0));
		let (x1, _) = plane((1, 0));
		let (_, y1) = plane((0, 1));
		assert_relative_eq!(x0, -0.75, epsilon = 1e-6);
		assert_relative_eq!(y0, 0.25, epsilon = 1e-6);
		assert_relative_eq!(x1 - x0, y0 - y1, epsilon = 1e-6);
	}

	#[test]
	fn look_at_transform() {
		let eye = Vec3::new(0.0, 0.0, 10.0);
		let camera = Camera::new(&Mat4::look_at(eye, Vec3::zero(), Vec3::new(0.0, 1.0, 0.0)), (1, 1), 45.0, None);
		let ray = camera.make_ray((0, 0));

		assert_eq!(ray.origin, eye);
		assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-6);
	}
}
