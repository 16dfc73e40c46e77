#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde_derive::Serialize;
use tracing::{debug, trace};

use crate::error::{PickError, Result};
use crate::math::*;
use crate::mesh::Mesh;
use crate::pick::{pick, Pick};
use crate::targets::SCENE;

/// A mesh placed in the world
pub struct Object {
	pub name: String,
	pub mesh: Mesh,
	/// Local to world transform
	pub transform: Mat4,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenePick {
	/// Index of the object in the scene
	pub object: usize,
	pub name: String,
	pub pick: Pick,
}

pub struct Scene {
	objects: Vec<Object>,
}

impl Scene {
	/// Fails with [`PickError::SingularTransform`] if any object's transform can't be inverted,
	/// or [`PickError::MalformedGeometry`] if a mesh doesn't pass [`Mesh::validate`]
	pub fn new(objects: Vec<Object>) -> Result<Scene> {
		for o in &objects {
			o.mesh.validate()?;
		}
		if let Some(o) = objects.iter().find(|o| o.transform.inverse().is_none()) {
			debug!(target: SCENE, name = %o.name, "object has a singular transform");
			return Err(PickError::SingularTransform);
		}

		debug!(target: SCENE, "scene with {} objects", objects.len());
		Ok(Scene { objects })
	}

	pub fn objects(&self) -> &[Object] {
		&self.objects
	}

	/// Closest hit over all objects; equidistant hits resolve to the first object
	pub fn pick(&self, ray: &Ray) -> Result<Option<ScenePick>> {
		let mut closest: Option<(usize, Pick)> = None;

		for (i, o) in self.objects.iter().enumerate() {
			if let Some(p) = pick(ray, o.mesh.geometry(), &o.transform)? {
				trace!(target: SCENE, name = %o.name, distance = p.distance, "object hit");
				match closest {
					Some((_, best)) if p.distance >= best.distance => {}
					_ => closest = Some((i, p)),
				}
			}
		}

		Ok(closest.map(|(i, pick)| ScenePick {
			object: i,
			name: self.objects[i].name.clone(),
			pick,
		}))
	}

	/// Pick every ray independently. Results are in the same order as `rays`.
	pub fn pick_many(&self, rays: &[Ray]) -> Result<Vec<Option<ScenePick>>> {
		#[cfg(feature = "parallel")]
		let picks = rays.par_iter().map(|ray| self.pick(ray)).collect();
		#[cfg(not(feature = "parallel"))]
		let picks = rays.iter().map(|ray| self.pick(ray)).collect();
		picks
	}
}
