#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // ZIP extraction -> per-document import, failures recorded not raised
    let Ok(mut session) = citygml_mesh::ImportSession::new(Default::default()) else {
        return;
    };
    let _ = session.import_archive(Cursor::new(data));
    let _ = session.finish();
});
