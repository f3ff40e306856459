//! # citygml-mesh
//!
//! A pure Rust importer that turns CityGML building models into renderable
//! triangle meshes.
//!
//! CityGML documents describe buildings as deeply nested XML at one of
//! several Levels of Detail. This library locates the geometry of every
//! building, moves projected survey coordinates into a local render space,
//! triangulates the planar surface polygons and derives per-vertex normals,
//! texture coordinates and tangents.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - LoD1 solids, LoD2 boundary surfaces and LoD3 multi-surfaces
//! - Postal addresses from xAL address blocks
//! - One mesh per building, or one combined mesh per import
//! - Fault isolation per file: a broken document never aborts the batch
//! - ZIP bundles of tiles, Wavefront OBJ output, XML building manifests
//! - Mesh volume and bounds via `parry3d` (feature `mesh-ops`)
//!
//! ## Example
//!
//! ```no_run
//! use citygml_mesh::{ImportConfig, ImportSession, OutputMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ImportConfig::new().with_output_mode(OutputMode::Combined);
//! let mut session = ImportSession::new(config)?;
//! session.import_file("LoD2_354_5667_1_NW.gml")?;
//! session.import_file("LoD2_354_5668_1_NW.gml")?;
//!
//! let outcome = session.finish();
//! println!("{}", outcome.summary);
//! for mesh in &outcome.meshes {
//!     println!("{}: {} triangles", mesh.name, mesh.triangle_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The library reports progress through `tracing`. It never installs a
//! subscriber; applications choose their own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod face;
#[cfg(feature = "mesh-ops")]
pub mod mesh_ops;
pub mod model;
pub mod parser;
pub mod session;
pub mod transform;
pub mod writer;

pub use config::{ImportConfig, OriginSource, OutputMode, TangentMode, UvProjection};
pub use error::{Error, Result};
pub use model::{
    Address, Building, Face, IndexSpace, LevelOfDetail, MeshRecord, Origin, SurfaceKind,
    Triangle, Uv, Vector3, Vertex,
};
pub use session::{FileFailure, ImportOutcome, ImportSession, ImportSummary, import_files};
pub use transform::CoordinateTransform;
pub use writer::{MeshSink, ObjWriter};
