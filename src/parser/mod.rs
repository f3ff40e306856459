//! CityGML document interpretation
//!
//! Turns a parsed document tree into [`Building`]s: detects the model
//! variant, resolves the declared Level of Detail and the offset origin once
//! per file, then dispatches every `bldg:Building` to the matching
//! [`LodHandler`].

mod address;
mod lod;
mod polygon;

pub use address::extract_address;
pub use lod::{FaceContext, Lod1Handler, Lod2Handler, Lod3Handler, LodHandler, handler_for};
pub use polygon::{parse_polygon, parse_pos_list};

use crate::config::{ImportConfig, OriginSource};
use crate::document::TreeNode;
use crate::error::{Error, Result};
use crate::face::{FaceBuilder, IndexCursor};
use crate::model::{Building, LevelOfDetail, Origin};
use crate::transform::CoordinateTransform;

/// Qualified tag and attribute names recognized by the importer
pub mod tags {
    /// Root of LoD1/LoD2 documents
    pub const CITY_MODEL_NS: &str = "core:CityModel";
    /// Root of LoD3 documents
    pub const CITY_MODEL_PLAIN: &str = "CityModel";

    /// Bounding box wrapper directly under the root
    pub const BOUNDED_BY_GML: &str = "gml:boundedBy";
    /// Bounding box
    pub const ENVELOPE: &str = "gml:Envelope";
    /// Minimum corner of the bounding box
    pub const LOWER_CORNER: &str = "gml:lowerCorner";

    /// Building element
    pub const BUILDING: &str = "bldg:Building";
    /// Identifier attribute
    pub const GML_ID: &str = "gml:id";
    /// Building address wrapper
    pub const BUILDING_ADDRESS: &str = "bldg:address";
    /// Building boundary surface entry
    pub const BOUNDED_BY: &str = "bldg:boundedBy";

    /// LoD1 solid wrapper
    pub const LOD1_SOLID: &str = "bldg:lod1Solid";
    /// Solid geometry
    pub const SOLID: &str = "gml:Solid";
    /// Exterior shell or ring
    pub const EXTERIOR: &str = "gml:exterior";
    /// Composite surface of an LoD1 shell
    pub const COMPOSITE_SURFACE: &str = "gml:CompositeSurface";
    /// Surface member holding one polygon
    pub const SURFACE_MEMBER: &str = "gml:surfaceMember";

    /// LoD2 multi-surface wrapper
    pub const LOD2_MULTI_SURFACE: &str = "bldg:lod2MultiSurface";
    /// LoD3 multi-surface wrapper
    pub const LOD3_MULTI_SURFACE: &str = "bldg:lod3MultiSurface";
    /// Multi-surface geometry
    pub const MULTI_SURFACE: &str = "gml:MultiSurface";

    /// Polygon geometry
    pub const POLYGON: &str = "gml:Polygon";
    /// Closed ring of positions
    pub const LINEAR_RING: &str = "gml:LinearRing";
    /// Whitespace-separated coordinate list
    pub const POS_LIST: &str = "gml:posList";
    /// Single coordinate triple
    pub const POS: &str = "gml:pos";
    /// Coordinate dimension attribute of `gml:posList`
    pub const SRS_DIMENSION: &str = "srsDimension";

    /// CityGML core address
    pub const CORE_ADDRESS: &str = "core:Address";
    /// xAL address block
    pub const XAL_ADDRESS: &str = "core:xalAddress";
    /// xAL address details
    pub const ADDRESS_DETAILS: &str = "xAL:AddressDetails";
    /// xAL country
    pub const COUNTRY: &str = "xAL:Country";
    /// xAL locality
    pub const LOCALITY: &str = "xAL:Locality";
    /// xAL street
    pub const THOROUGHFARE: &str = "xAL:Thoroughfare";
    /// xAL street name
    pub const THOROUGHFARE_NAME: &str = "xAL:ThoroughfareName";
    /// xAL house number
    pub const THOROUGHFARE_NUMBER: &str = "xAL:ThoroughfareNumber";
    /// xAL postal code wrapper
    pub const POSTAL_CODE: &str = "xAL:PostalCode";
    /// xAL postal code value
    pub const POSTAL_CODE_NUMBER: &str = "xAL:PostalCodeNumber";
}

/// Path from the root to the envelope's lower corner
const LOWER_CORNER_PATH: [&str; 3] = [tags::BOUNDED_BY_GML, tags::ENVELOPE, tags::LOWER_CORNER];

/// Root element flavour of a CityGML document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    /// `core:CityModel` root, LoD declared by a marker element
    Namespaced,
    /// `CityModel` root, always LoD3
    Plain,
}

impl ModelVariant {
    /// Detect the variant from the document root
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedRoot`] for any other root tag.
    pub fn detect<N: TreeNode>(root: &N) -> Result<Self> {
        match root.tag() {
            tags::CITY_MODEL_NS => Ok(ModelVariant::Namespaced),
            tags::CITY_MODEL_PLAIN => Ok(ModelVariant::Plain),
            other => Err(Error::UnrecognizedRoot(other.to_string())),
        }
    }
}

/// Resolve the declared Level of Detail of a document
///
/// Namespaced documents declare it in the first four characters of the root's
/// first child element text (`LoD2_354_5667_1_NW` is LoD2). Plain documents
/// are LoD3.
///
/// # Errors
///
/// Returns [`Error::UnsupportedLod`] when the marker is missing or names a
/// level other than LoD1 or LoD2.
pub fn resolve_lod<N: TreeNode>(root: &N, variant: ModelVariant) -> Result<LevelOfDetail> {
    match variant {
        ModelVariant::Plain => Ok(LevelOfDetail::Lod3),
        ModelVariant::Namespaced => {
            let marker = root.first_element().map(|n| n.text()).unwrap_or_default();
            match LevelOfDetail::from_marker(marker) {
                Some(lod @ (LevelOfDetail::Lod1 | LevelOfDetail::Lod2)) => Ok(lod),
                _ => Err(Error::UnsupportedLod(marker.chars().take(4).collect())),
            }
        }
    }
}

/// Resolve the offset origin for one document
///
/// With [`OriginSource::Envelope`] the first two numbers of the envelope's
/// lower corner are used. A missing or malformed envelope falls back to a
/// zero origin so the file still imports.
pub fn resolve_origin<N: TreeNode>(root: &N, source: OriginSource) -> Origin {
    match source {
        OriginSource::Fixed(origin) => origin,
        OriginSource::Envelope => match read_lower_corner(root) {
            Ok(origin) => origin,
            Err(error) => {
                tracing::warn!(%error, "no usable envelope lower corner, using zero origin");
                Origin::default()
            }
        },
    }
}

fn read_lower_corner<N: TreeNode>(root: &N) -> Result<Origin> {
    let corner = root
        .find_path(&LOWER_CORNER_PATH)
        .map_err(|missing| Error::InvalidXml(missing.to_string()))?;

    let mut values = corner.text().split_whitespace().map(|token| {
        token
            .parse::<f64>()
            .map_err(|_| Error::parse_error_with_context("lowerCorner", token, "number"))
    });
    match (values.next(), values.next()) {
        (Some(easting), Some(northing)) => Ok(Origin::new(easting?, northing?)),
        _ => Err(Error::ParseError(format!(
            "lowerCorner '{}' holds fewer than two values",
            corner.text()
        ))),
    }
}

/// Buildings read from a single document
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Declared Level of Detail
    pub lod: LevelOfDetail,
    /// Origin subtracted from every coordinate of the file
    pub origin: Origin,
    /// Buildings in document order
    pub buildings: Vec<Building>,
}

/// Interpret a CityGML document tree
///
/// `source_name` is the file stem used for generated building identifiers.
/// In combined mode `cursor` is advanced for every emitted face; callers that
/// need all-or-nothing semantics per file pass a copy and commit it on
/// success.
///
/// # Errors
///
/// Fails for an unrecognized root, an unsupported LoD, or an invalid
/// scale in `config`. Missing substructures inside buildings never fail.
pub fn parse_city_model<N: TreeNode>(
    root: &N,
    source_name: &str,
    config: &ImportConfig,
    builder: &FaceBuilder,
    cursor: &mut IndexCursor,
) -> Result<ParsedFile> {
    let variant = ModelVariant::detect(root)?;
    let lod = resolve_lod(root, variant)?;
    let origin = resolve_origin(root, config.origin());
    let transform = CoordinateTransform::from_config(config, origin)?;
    let handler = handler_for::<N>(lod);

    tracing::debug!(
        source = source_name,
        ?variant,
        %lod,
        easting = origin.easting,
        northing = origin.northing,
        "resolved document"
    );

    let mut ctx = FaceContext {
        transform: &transform,
        builder,
        cursor,
    };

    let buildings = root
        .descendants_named(tags::BUILDING)
        .into_iter()
        .enumerate()
        .map(|(index, node)| {
            let id = node
                .attribute(tags::GML_ID)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}_building_{}", source_name, index));

            let mut building = Building::new(id, lod);
            building.faces = handler.extract_faces(node, &mut ctx);
            if handler.reads_address() {
                if let Some(address) = node.child(tags::BUILDING_ADDRESS) {
                    building.address = extract_address(address);
                }
            }

            tracing::trace!(
                building = %building.id,
                faces = building.faces.len(),
                degenerate = building.degenerate_face_count(),
                "building parsed"
            );
            building
        })
        .collect();

    Ok(ParsedFile {
        lod,
        origin,
        buildings,
    })
}
