//! Property-based tests for citygml-mesh
//!
//! These tests use proptest to generate coordinates, rings and documents and
//! verify the importer's invariants hold across a wide range of inputs.

mod common;

use citygml_mesh::document::Document;
use citygml_mesh::face::{FaceBuilder, IndexCursor, fan_triangulate};
use citygml_mesh::parser::{extract_address, parse_polygon};
use citygml_mesh::{
    CoordinateTransform, ImportConfig, ImportSession, IndexSpace, Origin, OutputMode,
    SurfaceKind, TangentMode, UvProjection, Vertex,
};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Survey coordinates in a realistic projected range
fn survey_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (
        300_000.0..700_000.0f64,
        5_000_000.0..6_000_000.0f64,
        -50.0..500.0f64,
    )
}

/// A convex planar ring of `n` points on a circle at `height`
fn regular_ring(n: usize, radius: f64, height: f64) -> Vec<Vertex> {
    (0..n)
        .map(|k| {
            let angle = std::f64::consts::TAU * k as f64 / n as f64;
            Vertex::new(radius * angle.cos(), radius * angle.sin(), height)
        })
        .collect()
}

fn pos_list_of(points: &[(f64, f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y, z)| format!("{} {} {}", x, y, z))
        .collect::<Vec<_>>()
        .join(" ")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_transform_linear_in_scale(
        (e, n, z) in survey_strategy(),
        (oe, on, _) in survey_strategy(),
        scale in 0.001..1000.0f64,
    ) {
        let origin = Origin::new(oe, on);
        let single = CoordinateTransform::new(origin, scale, 0.0).unwrap().apply(e, n, z);
        let double = CoordinateTransform::new(origin, scale * 2.0, 0.0).unwrap().apply(e, n, z);

        prop_assert!(close(double.x, 2.0 * single.x));
        prop_assert!(close(double.y, 2.0 * single.y));
        prop_assert!(close(double.z, 2.0 * single.z));
    }

    #[test]
    fn prop_ring_drops_closing_point(
        points in prop::collection::vec(survey_strategy(), 1..40),
    ) {
        let doc = Document::parse(&format!(
            "<gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>{}</gml:posList>\
             </gml:LinearRing></gml:exterior></gml:Polygon>",
            pos_list_of(&points)
        )).unwrap();
        let transform = CoordinateTransform::new(Origin::default(), 100.0, 0.0).unwrap();
        prop_assert_eq!(parse_polygon(doc.root(), &transform).len(), points.len() - 1);
    }

    #[test]
    fn prop_fan_triangle_count_and_range(n in 3usize..200, offset in 0usize..10_000) {
        let triangles = fan_triangulate(n, offset);
        prop_assert_eq!(triangles.len(), n - 2);
        for t in &triangles {
            prop_assert!(t.min_index() >= offset);
            prop_assert!(t.max_index() < offset + n);
            prop_assert_eq!(t.v1, offset);
        }
    }

    #[test]
    fn prop_combined_offsets_follow_accumulation(
        sizes in prop::collection::vec(3usize..12, 1..30),
        uv in prop_oneof![Just(UvProjection::PerVertex), Just(UvProjection::PerFace)],
        tangent in prop_oneof![Just(TangentMode::LastTriangle), Just(TangentMode::Averaged)],
    ) {
        let builder = FaceBuilder::new(100.0, uv, tangent);
        let mut cursor = IndexCursor::new(OutputMode::Combined);
        let mut expected = 0;

        for (i, n) in sizes.iter().copied().enumerate() {
            let face = builder.build(SurfaceKind::Roof, regular_ring(n, 500.0, i as f64), &mut cursor);
            prop_assert_eq!(face.index_space, IndexSpace::Global { offset: expected });
            prop_assert_eq!(face.triangles.len(), n - 2);
            prop_assert_eq!(face.triangles.iter().map(|t| t.min_index()).min(), Some(expected));
            prop_assert!(face.triangles.iter().all(|t| t.max_index() < expected + n));
            prop_assert_eq!(face.normals.len(), n);
            prop_assert_eq!(face.uvs.len(), n);
            prop_assert_eq!(face.tangents.len(), n);
            expected += n;
        }
        prop_assert_eq!(cursor.position(), expected);
    }

    #[test]
    fn prop_face_normals_are_unit_or_absent(
        points in prop::collection::vec((-1e4..1e4f64, -1e4..1e4f64, -1e4..1e4f64), 0..12),
    ) {
        let ring: Vec<Vertex> = points.iter().map(|&(x, y, z)| Vertex::new(x, y, z)).collect();
        let builder = FaceBuilder::new(1.0, UvProjection::PerVertex, TangentMode::LastTriangle);
        let mut cursor = IndexCursor::new(OutputMode::PerBuilding);
        let face = builder.build(SurfaceKind::Wall, ring.clone(), &mut cursor);

        prop_assert_eq!(&face.vertices, &ring);
        match face.normal() {
            Some(normal) => {
                prop_assert!((normal.norm() - 1.0).abs() < 1e-9);
                prop_assert!(face.normals.iter().all(|n| *n == normal));
            }
            None => {
                prop_assert!(face.triangles.is_empty());
                prop_assert!(face.uvs.is_empty());
                prop_assert!(face.tangents.is_empty());
            }
        }
    }

    #[test]
    fn prop_address_fields_match_present_nodes(
        street in prop::option::of("[A-Za-z]{1,16}"),
        number in prop::option::of("[0-9]{1,3}[a-z]?"),
        postal in prop::option::of("[0-9]{5}"),
    ) {
        let xml = common::address(street.as_deref(), number.as_deref(), postal.as_deref());
        let doc = Document::parse(&xml).unwrap();
        let address = extract_address(doc.root());

        let expected: Vec<&str> = [&street, &number, &postal]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();
        prop_assert_eq!(address.fields(), expected);
    }

    #[test]
    fn prop_combined_import_indices_stay_in_range(
        walls_per_file in prop::collection::vec(1usize..6, 1..5),
    ) {
        let mut session = ImportSession::new(
            ImportConfig::new().with_output_mode(OutputMode::Combined),
        ).unwrap();

        for (file, count) in walls_per_file.iter().enumerate() {
            let members: Vec<String> = (0..*count)
                .map(|k| common::member(&common::wall(k as f64 * 3.0, file as f64 * 5.0, 2.0, 4.0)))
                .collect();
            let doc = common::namespaced_document(
                "LoD1_prop",
                &[common::lod1_building(None, &members, None)],
            );
            session.import_str(&format!("file{}.gml", file), &doc).unwrap();
        }
        let outcome = session.finish();

        let total: usize = walls_per_file.iter().sum::<usize>() * 4;
        prop_assert_eq!(outcome.meshes.len(), 1);
        let mesh = &outcome.meshes[0];
        prop_assert_eq!(mesh.vertex_count(), total);
        prop_assert!(mesh.triangles.iter().all(|t| t.max_index() < total));
    }
}
