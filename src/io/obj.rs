//! Wavefront OBJ format support.
//!
//! Faces are kept as polygons. Vertex normals are read when every face
//! corner references one, and recomputed otherwise.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{LaceError, Result};
use crate::mesh::{build_from_polygons, to_face_lists, HalfEdgeMesh};

/// Load a mesh from an OBJ file. All objects in the file are merged.
///
/// # Example
///
/// ```no_run
/// use lacework::io::obj;
///
/// let mesh = obj::load("eyelets.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| LaceError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut normals: Vec<Option<Vector3<f64>>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len();

        for p in mesh.positions.chunks_exact(3) {
            vertices.push(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
        }
        normals.resize(vertices.len(), None);

        let has_normals = !mesh.normal_indices.is_empty() && mesh.normal_indices.len() == mesh.indices.len();

        // Empty arities means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&n| n as usize).collect()
        };

        let mut start = 0;
        for arity in arities {
            let end = start + arity;
            let corners = mesh.indices.get(start..end).ok_or_else(|| LaceError::LoadError {
                path: path.to_path_buf(),
                message: format!("face arity {} overruns index list in '{}'", arity, model.name),
            })?;
            faces.push(corners.iter().map(|&i| base + i as usize).collect());

            if has_normals {
                for (&vi, &ni) in corners.iter().zip(&mesh.normal_indices[start..end]) {
                    let slot = &mut normals[base + vi as usize];
                    if slot.is_none() {
                        let n = &mesh.normals[3 * ni as usize..3 * ni as usize + 3];
                        *slot = Some(Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64));
                    }
                }
            }
            start = end;
        }
    }

    if faces.is_empty() {
        return Err(LaceError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    let normals: Option<Vec<Vector3<f64>>> = normals.into_iter().collect();
    build_from_polygons(&vertices, normals.as_deref(), &faces)
}

/// Save a mesh to an OBJ file, with one normal per vertex.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let (positions, normals, faces) = to_face_lists(mesh);

    writeln!(writer, "# Generated by lacework")?;
    for p in &positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &normals {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for face in &faces {
        write!(writer, "f")?;
        for &i in face {
            write!(writer, " {}//{}", i + 1, i + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
