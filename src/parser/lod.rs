//! Level-of-Detail specific face extraction
//!
//! Each CityGML LoD encodes building geometry in its own subtree layout.
//! One [`LodHandler`] implementation exists per layout; [`handler_for`]
//! picks the one matching the level resolved for a file.

use super::polygon::parse_polygon;
use super::tags;
use crate::document::TreeNode;
use crate::face::{FaceBuilder, IndexCursor};
use crate::model::{Face, LevelOfDetail, SurfaceKind};
use crate::transform::CoordinateTransform;

/// Path from `bldg:Building` to the LoD1 composite surface
const LOD1_SURFACE_PATH: [&str; 4] = [
    tags::LOD1_SOLID,
    tags::SOLID,
    tags::EXTERIOR,
    tags::COMPOSITE_SURFACE,
];

/// Path from a LoD2 surface wrapper to its single surface member
const LOD2_MEMBER_PATH: [&str; 3] = [
    tags::LOD2_MULTI_SURFACE,
    tags::MULTI_SURFACE,
    tags::SURFACE_MEMBER,
];

/// Path from a LoD3 surface wrapper to its multi-surface
const LOD3_MULTI_SURFACE_PATH: [&str; 2] = [tags::LOD3_MULTI_SURFACE, tags::MULTI_SURFACE];

/// Shared state for turning surface members into faces
pub struct FaceContext<'a> {
    /// Survey-to-render transform for the current file
    pub transform: &'a CoordinateTransform,
    /// Face builder for the current import
    pub builder: &'a FaceBuilder,
    /// Running vertex position of the combined buffer
    pub cursor: &'a mut IndexCursor,
}

impl FaceContext<'_> {
    /// Build a face from a `gml:surfaceMember`
    ///
    /// A member without a polygon yields a placeholder face.
    pub fn face_from_member<N: TreeNode>(&mut self, member: &N, kind: SurfaceKind) -> Face {
        let ring = match member.child(tags::POLYGON) {
            Some(polygon) => parse_polygon(polygon, self.transform),
            None => {
                tracing::debug!("surface member has no gml:Polygon");
                Vec::new()
            }
        };
        self.builder.build(kind, ring, self.cursor)
    }
}

/// Extracts the faces of one building for a specific LoD encoding
pub trait LodHandler<N: TreeNode> {
    /// Level handled
    fn lod(&self) -> LevelOfDetail;

    /// Whether buildings in this encoding carry a `bldg:address`
    fn reads_address(&self) -> bool {
        true
    }

    /// Extract the building's faces in document order
    fn extract_faces(&self, building: &N, ctx: &mut FaceContext<'_>) -> Vec<Face>;
}

/// Pick the handler for a resolved level
pub fn handler_for<N: TreeNode>(lod: LevelOfDetail) -> Box<dyn LodHandler<N>> {
    match lod {
        LevelOfDetail::Lod1 => Box::new(Lod1Handler),
        LevelOfDetail::Lod2 => Box::new(Lod2Handler),
        LevelOfDetail::Lod3 => Box::new(Lod3Handler),
    }
}

/// LoD1: one solid whose composite surface lists every polygon
#[derive(Debug, Clone, Copy, Default)]
pub struct Lod1Handler;

impl<N: TreeNode> LodHandler<N> for Lod1Handler {
    fn lod(&self) -> LevelOfDetail {
        LevelOfDetail::Lod1
    }

    fn extract_faces(&self, building: &N, ctx: &mut FaceContext<'_>) -> Vec<Face> {
        let surface = match building.find_path(&LOD1_SURFACE_PATH) {
            Ok(surface) => surface,
            Err(missing) => {
                tracing::debug!(%missing, "building has no LoD1 composite surface");
                return Vec::new();
            }
        };

        surface
            .children_named(tags::SURFACE_MEMBER)
            .map(|member| ctx.face_from_member(member, SurfaceKind::Unclassified))
            .collect()
    }
}

/// LoD2: one polygon per `bldg:boundedBy` entry
///
/// Every boundary yields exactly one face, a placeholder when its geometry
/// cannot be reached, so face counts match boundary counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lod2Handler;

impl<N: TreeNode> LodHandler<N> for Lod2Handler {
    fn lod(&self) -> LevelOfDetail {
        LevelOfDetail::Lod2
    }

    fn extract_faces(&self, building: &N, ctx: &mut FaceContext<'_>) -> Vec<Face> {
        building
            .children_named(tags::BOUNDED_BY)
            .map(|boundary| {
                let Some(wrapper) = boundary.first_element() else {
                    tracing::debug!("boundedBy entry has no surface wrapper");
                    return Face::placeholder(SurfaceKind::Unclassified, Vec::new());
                };
                let kind = SurfaceKind::from_tag(wrapper.tag());
                match wrapper.find_path(&LOD2_MEMBER_PATH) {
                    Ok(member) => ctx.face_from_member(member, kind),
                    Err(missing) => {
                        tracing::debug!(%missing, "boundary surface skipped");
                        Face::placeholder(kind, Vec::new())
                    }
                }
            })
            .collect()
    }
}

/// LoD3: each `bldg:boundedBy` entry may hold several polygons
///
/// Boundaries whose multi-surface cannot be reached are omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lod3Handler;

impl<N: TreeNode> LodHandler<N> for Lod3Handler {
    fn lod(&self) -> LevelOfDetail {
        LevelOfDetail::Lod3
    }

    fn reads_address(&self) -> bool {
        false
    }

    fn extract_faces(&self, building: &N, ctx: &mut FaceContext<'_>) -> Vec<Face> {
        let mut faces = Vec::new();

        for boundary in building.children_named(tags::BOUNDED_BY) {
            let Some(wrapper) = boundary.first_element() else {
                tracing::debug!("boundedBy entry has no surface wrapper");
                continue;
            };
            let multi_surface = match wrapper.find_path(&LOD3_MULTI_SURFACE_PATH) {
                Ok(multi_surface) => multi_surface,
                Err(missing) => {
                    tracing::debug!(%missing, "boundary omitted");
                    continue;
                }
            };

            let kind = SurfaceKind::from_tag(wrapper.tag());
            for member in multi_surface.children_named(tags::SURFACE_MEMBER) {
                faces.push(ctx.face_from_member(member, kind.clone()));
            }
        }

        faces
    }
}
