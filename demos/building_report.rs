//! Example: Building report
//!
//! Imports CityGML files and prints, per building, its Level of Detail,
//! face counts and address, then writes an XML manifest of all buildings.
//! With the `mesh-ops` feature the report also lists mesh volumes and the
//! scene bounds.

use citygml_mesh::writer::write_building_manifest;
use citygml_mesh::{ImportConfig, OriginSource, Origin, import_files};
use std::env;
use std::fs::File;
use std::process;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.gml>... [--manifest out.xml] [--origin E,N]", args[0]);
        process::exit(1);
    }

    let mut inputs = Vec::new();
    let mut manifest_path = None;
    let mut config = ImportConfig::new().with_scale(1.0);
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--manifest" => manifest_path = rest.next().cloned(),
            "--origin" => {
                let Some(origin) = rest.next().and_then(|v| parse_origin(v)) else {
                    eprintln!("--origin expects EASTING,NORTHING");
                    process::exit(1);
                };
                config = config.with_origin(OriginSource::Fixed(origin));
            }
            _ => inputs.push(arg.clone()),
        }
    }

    let outcome = import_files(&inputs, config)?;

    println!("=== Buildings ===");
    for building in &outcome.buildings {
        println!(
            "{} [{}] faces: {} (degenerate: {}), vertices: {}",
            building.id,
            building.lod,
            building.faces.len(),
            building.degenerate_face_count(),
            building.emitted_vertex_count()
        );
        if !building.address.is_empty() {
            println!("  Address: {}", building.address);
        }
    }

    #[cfg(feature = "mesh-ops")]
    {
        use citygml_mesh::mesh_ops::{compute_mesh_signed_volume, compute_scene_bounds};

        println!();
        println!("=== Mesh analysis ===");
        for mesh in &outcome.meshes {
            println!(
                "{}: {} triangles, signed volume {:.2} m3",
                mesh.name,
                mesh.triangle_count(),
                compute_mesh_signed_volume(mesh)
            );
        }
        if let Some((min, max)) = compute_scene_bounds(&outcome.meshes) {
            println!("Scene bounds: {:?} - {:?}", min, max);
        }
    }

    println!();
    println!("{}", outcome.summary);
    for failure in &outcome.summary.failures {
        println!("  failed: {}: {}", failure.source, failure.error);
    }

    if let Some(path) = manifest_path {
        write_building_manifest(&outcome.buildings, File::create(&path)?)?;
        println!("Manifest written to {}", path);
    }

    Ok(())
}

fn parse_origin(value: &str) -> Option<Origin> {
    let (easting, northing) = value.split_once(',')?;
    Some(Origin::new(
        easting.trim().parse().ok()?,
        northing.trim().parse().ok()?,
    ))
}
