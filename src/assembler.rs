//! Mesh assembly
//!
//! Concatenates building faces into mesh records. Combined-mode faces
//! already carry global indices, so assembly never re-offsets them.

use crate::config::OutputMode;
use crate::model::{Building, MeshRecord};

/// Name of the single record emitted in combined mode
pub const COMBINED_MESH_NAME: &str = "citygml_combined";

/// Assemble buildings into mesh records
///
/// Per-building mode yields one record per building, in order, even when the
/// building has no emitted faces; the record still carries its name and
/// address. Combined mode yields one record for everything, or nothing when
/// no face was emitted.
pub fn assemble(buildings: &[Building], mode: OutputMode) -> Vec<MeshRecord> {
    match mode {
        OutputMode::PerBuilding => buildings.iter().map(building_record).collect(),
        OutputMode::Combined => {
            let mut record = MeshRecord::new(COMBINED_MESH_NAME);
            for face in buildings.iter().flat_map(|b| &b.faces) {
                record.append_face(face);
            }
            if record.has_triangles() {
                vec![record]
            } else {
                Vec::new()
            }
        }
    }
}

fn building_record(building: &Building) -> MeshRecord {
    let mut record = MeshRecord::new(building.id.clone());
    if !building.address.is_empty() {
        record.address = Some(building.address.clone());
    }
    for face in &building.faces {
        record.append_face(face);
    }
    record
}
