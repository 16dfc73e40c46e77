//! Ray picking against triangle meshes.
//!
//! The entry point is [`intersect_ray_with_mesh`]: a world-space [`Ray`](math::Ray) is fired at
//! a mesh given by flat position/index buffers and a local-to-world transform, and the
//! world-space distance to the closest hit comes back, if any.
//!
//! [`scene::Scene`] picks over several placed meshes, and [`description`] loads whole
//! picking jobs from JSON.

pub mod camera;
pub mod description;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod pick;
pub mod scene;
pub mod targets;
pub mod triangle;

pub use error::{GeometryError, PickError, Result};
pub use mesh::{Index, Mesh, MeshGeometry};
pub use pick::{intersect_ray_with_mesh, pick, Pick};
