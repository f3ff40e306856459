//! Triangle mesh operations using parry3d
//!
//! This module provides geometric measurements on assembled mesh records:
//! - Volume computation
//! - Bounding box calculation
//! - Scene-wide bounds over many records
//!
//! Building shells from CityGML are usually closed and outward-wound, so the
//! signed volume also reveals inverted surfaces.

use crate::model::MeshRecord;
use parry3d::na::Point3;
use parry3d::shape::{Shape, TriMesh as ParryTriMesh};

/// A 3D point represented as (x, y, z)
pub type Point3d = (f64, f64, f64);

/// An axis-aligned bounding box represented as (min_point, max_point)
pub type BoundingBox = (Point3d, Point3d);

/// Compute the signed volume of a mesh using the divergence theorem
///
/// Returns the signed volume in cubic render units. For a closed shell with
/// outward winding the volume is positive; negative volume indicates inverted
/// triangles. Triangles referencing missing vertices are skipped.
pub fn compute_mesh_signed_volume(mesh: &MeshRecord) -> f64 {
    let n = mesh.vertices.len();
    let mut volume = 0.0_f64;
    for triangle in &mesh.triangles {
        if triangle.max_index() >= n {
            continue;
        }

        let v1 = &mesh.vertices[triangle.v1];
        let v2 = &mesh.vertices[triangle.v2];
        let v3 = &mesh.vertices[triangle.v3];

        volume += v1.x * (v2.y * v3.z - v2.z * v3.y)
            + v2.x * (v3.y * v1.z - v3.z * v1.y)
            + v3.x * (v1.y * v2.z - v1.z * v2.y);
    }
    volume / 6.0
}

/// Compute the unsigned volume of a mesh using parry3d mass properties
///
/// Returns `0.0` for records without triangles.
pub fn compute_mesh_volume(mesh: &MeshRecord) -> f64 {
    match to_trimesh(mesh) {
        // Volume is the mass when density is 1.0
        Some(trimesh) => trimesh.mass_properties(1.0).mass() as f64,
        None => 0.0,
    }
}

/// Compute the axis-aligned bounding box (AABB) of a mesh
///
/// Returns `None` for records without triangles.
pub fn compute_mesh_aabb(mesh: &MeshRecord) -> Option<BoundingBox> {
    let trimesh = to_trimesh(mesh)?;
    let aabb = trimesh.local_aabb();

    Some((
        (aabb.mins.x as f64, aabb.mins.y as f64, aabb.mins.z as f64),
        (aabb.maxs.x as f64, aabb.maxs.y as f64, aabb.maxs.z as f64),
    ))
}

/// Compute a bounding box enclosing every record that has triangles
///
/// Returns `None` if no record has triangles.
pub fn compute_scene_bounds(meshes: &[MeshRecord]) -> Option<BoundingBox> {
    meshes
        .iter()
        .filter_map(compute_mesh_aabb)
        .reduce(|(min_a, max_a), (min_b, max_b)| {
            (
                (min_a.0.min(min_b.0), min_a.1.min(min_b.1), min_a.2.min(min_b.2)),
                (max_a.0.max(max_b.0), max_a.1.max(max_b.1), max_a.2.max(max_b.2)),
            )
        })
}

fn to_trimesh(mesh: &MeshRecord) -> Option<ParryTriMesh> {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return None;
    }
    let n = mesh.vertices.len();

    let vertices: Vec<Point3<f32>> = mesh
        .vertices
        .iter()
        .map(|v| Point3::new(v.x as f32, v.y as f32, v.z as f32))
        .collect();

    let indices: Vec<[u32; 3]> = mesh
        .triangles
        .iter()
        .filter(|t| t.max_index() < n)
        .map(|t| [t.v1 as u32, t.v2 as u32, t.v3 as u32])
        .collect();
    if indices.is_empty() {
        return None;
    }

    Some(ParryTriMesh::new(vertices, indices))
}
