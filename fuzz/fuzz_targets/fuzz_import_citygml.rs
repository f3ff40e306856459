#![no_main]

use citygml_mesh::{ImportConfig, ImportSession, OutputMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Document parsing -> LoD dispatch -> face building -> assembly
    let xml = String::from_utf8_lossy(data);

    for mode in [OutputMode::PerBuilding, OutputMode::Combined] {
        let Ok(mut session) = ImportSession::new(ImportConfig::new().with_output_mode(mode)) else {
            return;
        };
        let _ = session.import_str("fuzz.gml", &xml);
        let outcome = session.finish();

        for mesh in &outcome.meshes {
            assert!(mesh.triangles.iter().all(|t| t.max_index() < mesh.vertex_count()));
        }
    }
});
