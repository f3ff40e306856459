//! Example: Converting CityGML to OBJ format
//!
//! This example demonstrates how to:
//! 1. Import one or more CityGML files (or ZIP bundles of them) in one session
//! 2. Assemble one mesh per building, or one combined mesh
//! 3. Export the meshes to Wavefront OBJ
//!
//! Files that fail to import are reported at the end; they never stop the
//! conversion of the others.

use citygml_mesh::{ImportConfig, ImportSession, ObjWriter, OutputMode};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().collect();
    let combined = match args.iter().position(|a| a == "--combined") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };

    if args.len() < 3 {
        eprintln!("Usage: {} [--combined] <output.obj> <input.gml|input.zip>...", args[0]);
        eprintln!();
        eprintln!("Converts CityGML LoD1-LoD3 buildings to OBJ format");
        eprintln!("  --combined   write one mesh for all buildings instead of one per building");
        process::exit(1);
    }

    let output_file = &args[1];
    let output_mode = if combined {
        OutputMode::Combined
    } else {
        OutputMode::PerBuilding
    };

    let mut session = ImportSession::new(ImportConfig::new().with_output_mode(output_mode))?;
    for input in &args[2..] {
        let is_zip = Path::new(input)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        let result = if is_zip {
            File::open(input)
                .map_err(Into::into)
                .and_then(|file| session.import_archive(file))
        } else {
            session.import_file(input)
        };
        match result {
            Ok(count) => println!("{}: {} buildings", input, count),
            Err(e) => println!("{}: skipped ({})", input, e),
        }
    }

    let outcome = session.finish();
    println!();
    println!("{}", outcome.summary);

    let mut writer = ObjWriter::new(BufWriter::new(File::create(output_file)?));
    outcome.deliver(&mut writer)?;
    let vertices = writer.vertices_written();
    writer.into_inner()?;

    println!(
        "Wrote {} meshes ({} vertices) to {}",
        outcome.meshes.len(),
        vertices,
        output_file
    );

    if !outcome.summary.is_clean() {
        println!();
        println!("Failed files:");
        for failure in &outcome.summary.failures {
            println!("  {}: {}", failure.source, failure.error);
        }
    }

    Ok(())
}
