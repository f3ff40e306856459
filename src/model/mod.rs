//! Data structures representing imported CityGML buildings and meshes

mod core;
mod mesh;

pub use core::{
    Address, Building, Face, IndexSpace, LevelOfDetail, Origin, SurfaceKind, Triangle, Uv,
    Vector3, Vertex,
};
pub use mesh::MeshRecord;
