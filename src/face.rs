//! Face triangulation and shading attributes
//!
//! Turns a ring of render-space vertices into a flat-shaded face:
//! - fan triangulation anchored at vertex 0
//! - one normal from the first fan triangle, replicated per vertex
//! - planar-projected texture coordinates
//! - a UV-gradient tangent
//!
//! Rings are assumed simple, planar and convex. Concave rings still produce
//! index-valid triangles, they just cover the wrong area.

use crate::config::{ImportConfig, OutputMode, TangentMode, UvProjection};
use crate::model::{Face, IndexSpace, SurfaceKind, Triangle, Uv, Vector3, Vertex};

/// Cross products shorter than this mark the first fan triangle as degenerate
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// UV determinants smaller than this yield a zero tangent
const UV_EPSILON: f64 = 1e-12;

/// Running vertex position of the combined output buffer
///
/// In per-building mode every face is locally indexed and the cursor never
/// moves. In combined mode each emitted face claims the next block of
/// positions, so indices are final when the face is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCursor {
    mode: OutputMode,
    next: usize,
}

impl IndexCursor {
    /// Create a cursor positioned at the start of the buffer
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, next: 0 }
    }

    /// Reserve space for `vertex_count` vertices and report the face's index space
    fn claim(&mut self, vertex_count: usize) -> IndexSpace {
        match self.mode {
            OutputMode::PerBuilding => IndexSpace::Local,
            OutputMode::Combined => {
                let offset = self.next;
                self.next += vertex_count;
                IndexSpace::Global { offset }
            }
        }
    }

    /// Number of vertices claimed so far
    pub fn position(&self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Builds faces from vertex rings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBuilder {
    scale: f64,
    uv_projection: UvProjection,
    tangent_mode: TangentMode,
}

impl FaceBuilder {
    /// Create a builder
    ///
    /// `scale` is the render-space scale factor; UVs are divided by it so
    /// texture density stays at one repeat per survey unit.
    pub fn new(scale: f64, uv_projection: UvProjection, tangent_mode: TangentMode) -> Self {
        Self {
            scale,
            uv_projection,
            tangent_mode,
        }
    }

    /// Create a builder from the import configuration
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(
            config.scale(),
            config.uv_projection(),
            config.tangent_mode(),
        )
    }

    /// Build a face from a ring
    ///
    /// Rings with fewer than three vertices, or whose first fan triangle has
    /// no area, become placeholder faces and do not advance `cursor`.
    pub fn build(&self, kind: SurfaceKind, ring: Vec<Vertex>, cursor: &mut IndexCursor) -> Face {
        if ring.len() < 3 {
            tracing::trace!(vertices = ring.len(), "ring too short to triangulate");
            return Face::placeholder(kind, ring);
        }

        let Some(normal) = calculate_face_normal(&ring[0], &ring[1], &ring[2]) else {
            tracing::trace!(vertices = ring.len(), "first fan triangle has no area");
            return Face::placeholder(kind, ring);
        };

        let local = fan_triangulate(ring.len(), 0);
        let uvs = match self.uv_projection {
            UvProjection::PerVertex => ring
                .iter()
                .map(|v| project_uv(v, dominant_axis(&v.to_vector()), self.scale))
                .collect::<Vec<_>>(),
            UvProjection::PerFace => {
                let axis = dominant_axis(&normal);
                ring.iter()
                    .map(|v| project_uv(v, axis, self.scale))
                    .collect()
            }
        };
        let tangent = self.face_tangent(&ring, &uvs, &local);

        let index_space = cursor.claim(ring.len());
        let triangles = match index_space {
            IndexSpace::Local => local,
            IndexSpace::Global { offset } => local.iter().map(|t| t.offset(offset)).collect(),
        };

        let n = ring.len();
        tracing::trace!(vertices = n, triangles = triangles.len(), "built face");
        Face {
            kind,
            vertices: ring,
            triangles,
            normals: vec![normal; n],
            uvs,
            tangents: vec![tangent; n],
            index_space,
        }
    }

    fn face_tangent(&self, ring: &[Vertex], uvs: &[Uv], triangles: &[Triangle]) -> Vector3 {
        let tangent_of = |t: &Triangle| {
            triangle_tangent(
                [&ring[t.v1], &ring[t.v2], &ring[t.v3]],
                [uvs[t.v1], uvs[t.v2], uvs[t.v3]],
            )
        };

        match self.tangent_mode {
            TangentMode::LastTriangle => triangles
                .last()
                .map(tangent_of)
                .unwrap_or_else(Vector3::zeros),
            TangentMode::Averaged => {
                let sum = triangles
                    .iter()
                    .map(tangent_of)
                    .fold(Vector3::zeros(), |acc, t| acc + t);
                sum.try_normalize(UV_EPSILON)
                    .unwrap_or_else(Vector3::zeros)
            }
        }
    }
}

/// Fan-triangulate an `n`-vertex ring from vertex 0
///
/// Produces `n - 2` triangles `(0, k, k + 1)`, each index shifted by `offset`.
/// Rings with fewer than three vertices produce no triangles.
pub fn fan_triangulate(n: usize, offset: usize) -> Vec<Triangle> {
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .map(|k| Triangle::new(offset, offset + k, offset + k + 1))
        .collect()
}

/// Unit normal of the triangle `(v0, v1, v2)`
///
/// Returns `None` when the triangle is degenerate (collinear or coincident
/// points), so callers must pick a fallback.
pub fn calculate_face_normal(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> Option<Vector3> {
    let edge1 = v1.to_vector() - v0.to_vector();
    let edge2 = v2.to_vector() - v0.to_vector();
    edge1.cross(&edge2).try_normalize(DEGENERATE_EPSILON)
}

fn dominant_axis(v: &Vector3) -> Axis {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    if az >= ax && az >= ay {
        Axis::Z
    } else if ax >= ay {
        Axis::X
    } else {
        Axis::Y
    }
}

fn project_uv(v: &Vertex, axis: Axis, scale: f64) -> Uv {
    match axis {
        Axis::Z => Uv::new(v.x / scale, v.y / scale),
        Axis::X => Uv::new(v.y / scale, v.z / scale),
        Axis::Y => Uv::new(v.x / scale, v.z / scale),
    }
}

fn triangle_tangent(p: [&Vertex; 3], uv: [Uv; 3]) -> Vector3 {
    let edge1 = p[1].to_vector() - p[0].to_vector();
    let edge2 = p[2].to_vector() - p[0].to_vector();
    let (du1, dv1) = (uv[1].u - uv[0].u, uv[1].v - uv[0].v);
    let (du2, dv2) = (uv[2].u - uv[0].u, uv[2].v - uv[0].v);

    let det = du1 * dv2 - du2 * dv1;
    if det.abs() < UV_EPSILON {
        return Vector3::zeros();
    }

    let tangent = (edge1 * dv2 - edge2 * dv1) / det;
    tangent.try_normalize(UV_EPSILON).unwrap_or_else(Vector3::zeros)
}
