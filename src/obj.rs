//! Wavefront OBJ loading.
//!
//! Only vertex positions and faces are read; texture coordinates and normals in face
//! groups are accepted and ignored. Each `o` record starts a new mesh.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::env::temp_dir;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::GeometryError;
use crate::mesh::*;
use crate::targets::OBJ;

#[derive(Error, Debug)]
pub enum ObjError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error("line {line}: {message}")]
	Parse { line: usize, message: String },

	#[error("invalid mesh: {0}")]
	Geometry(#[from] GeometryError),
}

/// Load every object of an OBJ file, going through an on-disk cache keyed on the file's
/// path, size and modification time.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Mesh)>, ObjError> {
	let path = path.as_ref();
	let obj_cache = cache_path(path)?;

	// load from cache if possible
	if let Ok(r) = File::open(&obj_cache) {
		debug!(target: OBJ, "mesh {} found in cache", path.display());
		let mut br = BufReader::new(r);
		let cached: bincode::Result<Vec<(String, Mesh)>> = bincode::deserialize_from(&mut br);
		match cached {
			Ok(meshes) if meshes.iter().all(|(_, m)| m.validate().is_ok()) => return Ok(meshes),
			Ok(_) => warn!(target: OBJ, "cached OBJ mesh is malformed"),
			Err(err) => warn!(target: OBJ, %err, "failed to load OBJ mesh from cache"),
		}
	}

	info!(target: OBJ, "loading mesh {}", path.display());
	let meshes = parse(BufReader::new(File::open(path)?))?;
	info!(target: OBJ, "loaded {} meshes from {}", meshes.len(), path.display());

	// a failed cache write only costs a reparse next time
	let written = obj_cache.parent()
		.map_or(Ok(()), fs::create_dir_all)
		.and_then(|_| File::create(&obj_cache))
		.map_err(bincode::Error::from)
		.and_then(|f| bincode::serialize_into(BufWriter::new(f), &meshes));
	if let Err(err) = written {
		warn!(target: OBJ, %err, "failed to cache OBJ mesh");
	}

	Ok(meshes)
}

fn cache_path(path: &Path) -> io::Result<PathBuf> {
	let meta = fs::metadata(path)?;
	let modified = meta.modified()
		.ok()
		.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
		.map(|d| d.as_nanos())
		.unwrap_or(0);

	let mut hasher = DefaultHasher::new();
	path.hash(&mut hasher);
	meta.len().hash(&mut hasher);
	modified.hash(&mut hasher);

	Ok(temp_dir().join("obj_cache").join(hasher.finish().to_string()))
}

/// Parse OBJ text into named meshes, each with its own compact vertex buffer
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<(String, Mesh)>, ObjError> {
	let mut vertices: Vec<[f32; 3]> = Vec::new();
	let mut triangles: Vec<[Index; 3]> = Vec::new();
	let mut meshes = Vec::new();
	let mut curr_name = String::new();

	for (i, line) in reader.lines().enumerate() {
		let line_no = i + 1;
		let s = line?;
		let mut iter = s.split_whitespace();
		match iter.next() {
			Some("v") => {
				let vs = iter.take(3)
					.map(|s| s.parse::<f32>())
					.collect::<Result<Vec<f32>, _>>()
					.map_err(|e| parse_error(line_no, e))?;
				if vs.len() < 3 {
					return Err(parse_error(line_no, "vertex needs 3 coordinates"));
				}
				vertices.push([vs[0], vs[1], vs[2]]);
			},
			Some("f") => {
				let g = iter
					.map(|group| face_vertex(group, vertices.len()).map_err(|e| parse_error(line_no, e)))
					.collect::<Result<Vec<Index>, _>>()?;
				if g.len() < 3 {
					return Err(parse_error(line_no, "face needs at least 3 vertices"));
				}
				for k in 2..g.len() {
					triangles.push([g[0], g[k-1], g[k]]);
				}
			},
			Some("o") => {
				if !triangles.is_empty() {
					meshes.push((curr_name.clone(), create_mesh(&vertices, &triangles)?));
					triangles.clear();
				}
				curr_name = iter.next().unwrap_or_default().to_owned();
			},
			_ => {},
		}
	}

	if !triangles.is_empty() {
		meshes.push((curr_name, create_mesh(&vertices, &triangles)?));
	}

	Ok(meshes)
}

fn parse_error(line: usize, message: impl ToString) -> ObjError {
	ObjError::Parse { line, message: message.to_string() }
}

/// Resolve the position index of a face group (`v`, `v/t`, `v//n` or `v/t/n`).
///
/// OBJ indices start at 1, negative ones are relative to the last vertex read so far.
fn face_vertex(group: &str, nb_vertices: usize) -> Result<Index, String> {
	let v = group.split('/').next().unwrap_or_default();
	let idx = v.parse::<i64>().map_err(|e| format!("bad face index {:?}: {}", v, e))?;
	let resolved = if idx < 0 { nb_vertices as i64 + idx } else { idx - 1 };

	if resolved < 0 || resolved >= nb_vertices as i64 {
		return Err(format!("face index {} out of range ({} vertices)", idx, nb_vertices));
	}
	Ok(resolved as Index)
}

/// Create a mesh that stores only the vertices its triangles refer to
fn create_mesh(vertices: &[[f32; 3]], triangles: &[[Index; 3]]) -> Result<Mesh, GeometryError> {
	let mut positions = Vec::new();
	let mut indices = Vec::with_capacity(3 * triangles.len());
	let mut vertex_map = HashMap::new();

	for tri in triangles {
		for &vidx in tri {
			let idx = *vertex_map.entry(vidx).or_insert_with(|| {
				positions.extend_from_slice(&vertices[vidx as usize]);
				(positions.len() / 3 - 1) as Index
			});
			indices.push(idx);
		}
	}

	debug!(target: OBJ, "mesh with {} vertices and {} triangles", positions.len() / 3, triangles.len());
	Mesh::new(positions, indices)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const QUAD: &str = "
# a unit quad split in two objects
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
o first
f 1//1 2//1 3//1
o second
f -4/1/1 -2/1/1 -1/1/1
";

	#[test]
	fn parse_objects() {
		let meshes = parse(QUAD.as_bytes()).unwrap();
		assert_eq!(meshes.len(), 2);

		let (name, mesh) = &meshes[0];
		assert_eq!(name, "first");
		assert_eq!(mesh.positions(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
		assert_eq!(mesh.indices(), &[0, 1, 2]);

		// only the referenced vertices are kept
		let (name, mesh) = &meshes[1];
		assert_eq!(name, "second");
		assert_eq!(mesh.positions(), &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
		assert_eq!(mesh.indices(), &[0, 1, 2]);
	}

	#[test]
	fn polygons_are_fanned() {
		let meshes = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n".as_bytes()).unwrap();
		assert_eq!(meshes.len(), 1);
		assert_eq!(meshes[0].0, "");
		assert_eq!(meshes[0].1.indices(), &[0, 1, 2, 0, 2, 3]);
	}

	#[test]
	fn errors_carry_line_numbers() {
		match parse("v 0 0 0\nv 1 0\n".as_bytes()) {
			Err(ObjError::Parse { line, .. }) => assert_eq!(line, 2),
			other => panic!("unexpected {:?}", other),
		}
		match parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n".as_bytes()) {
			Err(ObjError::Parse { line, .. }) => assert_eq!(line, 4),
			other => panic!("unexpected {:?}", other),
		}
		assert!(matches!(parse("v 0 x 0\n".as_bytes()), Err(ObjError::Parse { line: 1, .. })));
	}

	#[test]
	fn load_uses_cache() {
		let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
		file.write_all(QUAD.as_bytes()).unwrap();
		file.flush().unwrap();

		let first = load(file.path()).unwrap();
		let second = load(file.path()).unwrap();
		assert_eq!(first, second);
		assert_eq!(first.len(), 2);
	}

	#[test]
	fn load_missing_file() {
		assert!(matches!(load("/nonexistent/model.obj"), Err(ObjError::Io(_))));
	}
}
