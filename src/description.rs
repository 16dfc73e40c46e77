//! JSON description of a picking job: objects placed in the world, and the rays to fire
//! at them, either explicit or through camera pixels.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde_derive::Deserialize;
use thiserror::Error;

use crate::camera;
use crate::error::{GeometryError, PickError};
use crate::math;
use crate::mesh::{Index, Mesh};
use crate::obj::{self, ObjError};
use crate::scene;

#[derive(Error, Debug)]
pub enum DescriptionError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("failed to load {file}: {source}")]
	Obj { file: String, source: ObjError },

	#[error("object {name:?}: {source}")]
	Geometry { name: String, source: GeometryError },

	#[error(transparent)]
	Pick(#[from] PickError),

	#[error("pixels are given but there is no camera")]
	MissingCamera,

	#[error("pixel ({0}, {1}) is outside the camera resolution")]
	PixelOutOfRange(usize, usize),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Vec3 {
	Thrice(f32),
	Explicit(f32, f32, f32),
}

#[derive(Deserialize, Debug)]
pub struct Description {
	pub objects: Vec<Object>,
	pub camera: Option<Camera>,
	#[serde(default)]
	pub pixels: Vec<(usize, usize)>,
	#[serde(default)]
	pub rays: Vec<Ray>,
}

#[derive(Deserialize, Debug)]
pub struct Object {
	pub name: Option<String>,
	pub mesh: MeshSource,
	pub transform: Option<Transform>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum MeshSource {
	File { file: String },
	Inline { positions: Vec<f32>, indices: Vec<Index> },
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Transform {
	LookAt { position: Vec3, look_at: Vec3, up: Vec3 },
	/// 16 row-major values
	Matrix { matrix: [f32; 16] },
	Normal(Placement),
}

/// Translation, rotation (degrees, YXZ) and scale, applied as `T * R * S`
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Placement {
	pub position: Option<Vec3>,
	pub scale: Option<Vec3>,
	pub rotation: Option<Vec3>,
}

#[derive(Deserialize, Debug)]
pub struct Camera {
	pub resolution: Resolution,
	pub transform: Transform,
	pub fov: f32,
	pub far: Option<f32>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Resolution {
	Rect(usize, usize),
	Square(usize),
}

#[derive(Deserialize, Debug)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Vec3,
	pub length: Option<f32>,
}

/// A converted description, ready to pick
pub struct Picking {
	pub scene: scene::Scene,
	pub camera: Option<camera::Camera>,
	/// Explicit rays first, then one ray per pixel
	pub rays: Vec<math::Ray>,
}

impl Description {
	pub fn from_reader<R: Read>(reader: R) -> Result<Description, DescriptionError> {
		Ok(serde_json::from_reader(reader)?)
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Description, DescriptionError> {
		Description::from_reader(BufReader::new(File::open(path)?))
	}

	/// Build the scene and rays. Mesh files are looked up relative to `dir`.
	pub fn convert(self, dir: &Path) -> Result<Picking, DescriptionError> {
		let mut objects = Vec::new();
		for (i, o) in self.objects.into_iter().enumerate() {
			o.convert(i, dir, &mut objects)?;
		}
		let scene = scene::Scene::new(objects)?;

		let camera = self.camera.map(Camera::convert);
		let mut rays: Vec<math::Ray> = self.rays.into_iter().map(Ray::convert).collect();

		if !self.pixels.is_empty() {
			let camera = camera.as_ref().ok_or(DescriptionError::MissingCamera)?;
			let (width, height) = camera.resolution();
			for (x, y) in self.pixels {
				if x >= width || y >= height {
					return Err(DescriptionError::PixelOutOfRange(x, y));
				}
				rays.push(camera.make_ray((x, y)));
			}
		}

		Ok(Picking { scene, camera, rays })
	}
}

impl Vec3 {
	fn convert(self) -> math::Vec3 {
		match self {
			Vec3::Thrice(v) => math::Vec3::thrice(v),
			Vec3::Explicit(x, y, z) => math::Vec3 { x, y, z },
		}
	}
}

impl Object {
	fn convert(self, i: usize, dir: &Path, objects: &mut Vec<scene::Object>) -> Result<(), DescriptionError> {
		let transform = self.transform.map_or_else(math::Mat4::identity, Transform::convert);

		match self.mesh {
			MeshSource::Inline { positions, indices } => {
				let name = self.name.unwrap_or_else(|| format!("object{}", i));
				let mesh = Mesh::new(positions, indices)
					.map_err(|source| DescriptionError::Geometry { name: name.clone(), source })?;
				objects.push(scene::Object { name, mesh, transform });
			}
			MeshSource::File { file } => {
				let meshes = obj::load(dir.join(&file))
					.map_err(|source| DescriptionError::Obj { file: file.clone(), source })?;
				let base = self.name.unwrap_or(file);
				for (obj_name, mesh) in meshes {
					let name = if obj_name.is_empty() { base.clone() } else { format!("{}/{}", base, obj_name) };
					objects.push(scene::Object { name, mesh, transform });
				}
			}
		}
		Ok(())
	}
}

impl Transform {
	fn convert(self) -> math::Mat4 {
		match self {
			Transform::LookAt { position, look_at, up } => {
				math::Mat4::look_at(position.convert(), look_at.convert(), up.convert())
			}
			Transform::Matrix { matrix } => math::Mat4::from_rows(matrix),
			Transform::Normal(Placement { position, scale, rotation }) => {
				let mut transform = math::Mat4::identity();
				if let Some(v) = position {
					transform = transform * math::Mat4::translate(v.convert())
				}
				if let Some(v) = rotation {
					transform = transform * math::Mat4::rot_yxz(v.convert())
				}
				if let Some(v) = scale {
					transform = transform * math::Mat4::scale(v.convert())
				}
				transform
			}
		}
	}
}

impl Camera {
	fn convert(self) -> camera::Camera {
		camera::Camera::new(
			&self.transform.convert(),
			self.resolution.convert(),
			self.fov,
			self.far,
		)
	}
}

impl Resolution {
	fn convert(self) -> (usize, usize) {
		match self {
			Resolution::Rect(w, h) => (w, h),
			Resolution::Square(w) => (w, w),
		}
	}
}

impl Ray {
	fn convert(self) -> math::Ray {
		math::Ray::new(
			self.origin.convert(),
			self.direction.convert(),
			self.length.unwrap_or(f32::INFINITY),
		)
	}
}
