pub mod vec3;
pub mod mat4;
pub mod ray;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use ray::Ray;
pub use std::f32::consts::PI;
