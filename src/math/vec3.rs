use std::ops::{Add, Sub, Mul, Div};

use serde_derive::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec3 {
	pub x: f32,
	pub y: f32,
	pub z: f32,
}

impl Vec3 {
	#[inline(always)]
	pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
		Vec3 { x, y, z }
	}

	#[inline(always)]
	pub fn zero() -> Vec3 {
		Vec3 { x: 0.0, y: 0.0, z: 0.0 }
	}

	#[inline(always)]
	pub fn thrice(v: f32) -> Vec3 {
		Vec3 { x: v, y: v, z: v }
	}

	#[inline(always)]
	pub fn dot(lhs: Vec3, rhs: Vec3) -> f32 {
		lhs.x * rhs.x + lhs.y * rhs.y + lhs.z * rhs.z
	}

	#[inline(always)]
	pub fn cross(lhs: Vec3, rhs: Vec3) -> Vec3 {
		Vec3 {
			x: lhs.y * rhs.z - lhs.z * rhs.y,
			y: lhs.z * rhs.x - lhs.x * rhs.z,
			z: lhs.x * rhs.y - lhs.y * rhs.x
		}
	}

	#[inline(always)]
	pub fn length(self) -> f32 {
		Vec3::dot(self, self).sqrt()
	}

	#[inline(always)]
	pub fn normalized(self) -> Vec3 {
		self / self.length()
	}

	/// Euclidean distance between two points
	#[inline(always)]
	pub fn distance(p1: Vec3, p2: Vec3) -> f32 {
		(p2 - p1).length()
	}

	#[inline(always)]
	pub fn all_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
	}
}

impl Add for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn add(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
	}
}

impl Sub for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn sub(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
	}
}

impl Mul<f32> for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn mul(self, rhs: f32) -> Vec3 {
		Vec3 { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
	}
}

impl Div<f32> for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn div(self, rhs: f32) -> Vec3 {
		let s = 1.0 / rhs;
		self * s
	}
}
