//! Error types for picking.

use thiserror::Error;

use crate::mesh::Index;

/// Ways a geometry snapshot can be malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
	#[error("position buffer length {0} is not a multiple of 3")]
	PositionCount(usize),

	#[error("index buffer length {0} is not a multiple of 3")]
	IndexCount(usize),

	#[error("triangle {triangle} refers to vertex {index}, but there are only {vertex_count} vertices")]
	IndexOutOfRange {
		triangle: usize,
		index: Index,
		vertex_count: usize,
	},

	#[error("vertex {vertex} has a non-finite position")]
	NonFinitePosition { vertex: usize },
}

/// Errors that can occur while picking.
///
/// A ray that hits nothing is not an error, see [`crate::pick`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PickError {
	/// The world transform has no inverse (e.g. a zero scale on one axis)
	#[error("world transform is not invertible")]
	SingularTransform,

	#[error("malformed geometry: {0}")]
	MalformedGeometry(#[from] GeometryError),

	/// Non-finite origin or direction, zero direction, or a negative length
	#[error("invalid ray: {0:?}")]
	InvalidRay(crate::math::Ray),
}

/// Result type for picking operations.
pub type Result<T> = std::result::Result<T, PickError>;
