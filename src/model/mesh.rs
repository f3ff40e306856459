//! Renderable mesh records

use super::core::{Address, Face, IndexSpace, Triangle, Uv, Vector3, Vertex};

/// A triangle mesh with parallel per-vertex attribute buffers
///
/// `vertices`, `normals`, `uvs` and `tangents` always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshRecord {
    /// Building identifier, or the combined-batch name
    pub name: String,
    /// Address of the building (per-building records only)
    pub address: Option<Address>,
    /// Vertex positions
    pub vertices: Vec<Vertex>,
    /// Triangles indexing into `vertices`
    pub triangles: Vec<Triangle>,
    /// Per-vertex normals
    pub normals: Vec<Vector3>,
    /// Per-vertex texture coordinates
    pub uvs: Vec<Uv>,
    /// Per-vertex tangents
    pub tangents: Vec<Vector3>,
}

impl MeshRecord {
    /// Create a new empty record
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a face's buffers
    ///
    /// Locally indexed faces are rebased onto the record's current vertex
    /// count. Globally indexed faces are copied unchanged when their offset
    /// matches the current vertex count, which holds for faces built in order
    /// by one import session. An out-of-step global face is rebased instead,
    /// and one whose triangles reach below its own offset is dropped.
    /// Placeholder faces are ignored.
    pub fn append_face(&mut self, face: &Face) {
        if face.is_degenerate() {
            return;
        }

        let base = self.vertices.len();
        match face.index_space {
            IndexSpace::Local => {
                self.triangles
                    .extend(face.triangles.iter().map(|t| t.offset(base)));
            }
            IndexSpace::Global { offset } if offset == base => {
                self.triangles.extend_from_slice(&face.triangles);
            }
            IndexSpace::Global { offset } => {
                tracing::warn!(
                    offset,
                    expected = base,
                    "global face offset out of step with combined buffer, rebasing"
                );
                let Some(local) = to_local(&face.triangles, offset) else {
                    tracing::warn!(offset, "global face indexes below its offset, dropped");
                    return;
                };
                self.triangles
                    .extend(local.iter().map(|t| t.offset(base)));
            }
        }

        self.vertices.extend_from_slice(&face.vertices);
        self.normals.extend_from_slice(&face.normals);
        self.uvs.extend_from_slice(&face.uvs);
        self.tangents.extend_from_slice(&face.tangents);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the record has any triangles
    pub fn has_triangles(&self) -> bool {
        !self.triangles.is_empty()
    }

    /// Check if the record is completely empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Flattened `[x, y, z, ...]` positions as `f32`, for GPU upload
    pub fn positions_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Flattened triangle indices as `u32`, for GPU upload
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|t| [t.v1 as u32, t.v2 as u32, t.v3 as u32])
            .collect()
    }
}

fn to_local(triangles: &[Triangle], offset: usize) -> Option<Vec<Triangle>> {
    triangles
        .iter()
        .map(|t| {
            Some(Triangle::new(
                t.v1.checked_sub(offset)?,
                t.v2.checked_sub(offset)?,
                t.v3.checked_sub(offset)?,
            ))
        })
        .collect()
}
