//! Output sinks for assembled meshes
//!
//! A [`MeshSink`] is whatever turns mesh records into drawable entities:
//! a renderer, a scene graph, or a file. This module provides two sinks,
//! collecting into a `Vec` and writing Wavefront OBJ, plus an XML manifest
//! of building metadata.

mod manifest;
mod obj;

pub use manifest::write_building_manifest;
pub use obj::ObjWriter;

use crate::error::Result;
use crate::model::MeshRecord;

/// Receives assembled mesh records
pub trait MeshSink {
    /// Accept one mesh record
    fn accept(&mut self, record: &MeshRecord) -> Result<()>;
}

impl MeshSink for Vec<MeshRecord> {
    fn accept(&mut self, record: &MeshRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<MeshRecord> = Vec::new();
        sink.accept(&MeshRecord::new("a")).unwrap();
        sink.accept(&MeshRecord::new("b")).unwrap();
        let names: Vec<_> = sink.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
