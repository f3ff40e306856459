//! Core CityGML building types

use std::fmt;

/// A 3D vector in render space (normals, tangents)
pub type Vector3 = nalgebra::Vector3<f64>;

/// Level of Detail declared by a CityGML document
///
/// Resolved once per file; every building in the file inherits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelOfDetail {
    /// Extruded block solids (`bldg:lod1Solid`)
    Lod1,
    /// Distinct roof, wall and ground surfaces, one polygon per boundary
    Lod2,
    /// Architectural detail, possibly several polygons per boundary
    Lod3,
}

impl LevelOfDetail {
    /// Resolve a marker such as `"LoD2_354_5667_1_NW"` by its first four characters
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.get(..4)? {
            "LoD1" => Some(LevelOfDetail::Lod1),
            "LoD2" => Some(LevelOfDetail::Lod2),
            "LoD3" => Some(LevelOfDetail::Lod3),
            _ => None,
        }
    }

    /// Get a human-readable name for this level
    pub fn name(&self) -> &'static str {
        match self {
            LevelOfDetail::Lod1 => "LoD1",
            LevelOfDetail::Lod2 => "LoD2",
            LevelOfDetail::Lod3 => "LoD3",
        }
    }
}

impl fmt::Display for LevelOfDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Projected (easting, northing) anchor subtracted from every survey coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Origin {
    /// Easting of the anchor
    pub easting: f64,
    /// Northing of the anchor
    pub northing: f64,
}

impl Origin {
    /// Create a new origin
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }
}

/// A 3D point in local render space
///
/// Only produced by [`crate::CoordinateTransform::apply`] when importing; the
/// public constructor exists for tests and hand-built meshes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position as a vector
    pub fn to_vector(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// A texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uv {
    /// Horizontal texture coordinate
    pub u: f64,
    /// Vertical texture coordinate
    pub v: f64,
}

impl Uv {
    /// Create a new texture coordinate
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }

    /// The same triangle with every index shifted by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self {
            v1: self.v1 + offset,
            v2: self.v2 + offset,
            v3: self.v3 + offset,
        }
    }

    /// Largest index referenced by this triangle
    pub fn max_index(&self) -> usize {
        self.v1.max(self.v2).max(self.v3)
    }

    /// Smallest index referenced by this triangle
    pub fn min_index(&self) -> usize {
        self.v1.min(self.v2).min(self.v3)
    }
}

/// Which index space a face's triangles are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexSpace {
    /// Indices address the face's own vertex list
    #[default]
    Local,
    /// Indices address the combined batch buffer; the face's first vertex sits at `offset`
    Global {
        /// Position of the face's first vertex in the combined buffer
        offset: usize,
    },
}

/// Semantic type of a building boundary surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SurfaceKind {
    /// `bldg:RoofSurface`
    Roof,
    /// `bldg:WallSurface`
    Wall,
    /// `bldg:GroundSurface`
    Ground,
    /// `bldg:ClosureSurface`
    Closure,
    /// Any other surface wrapper, by tag
    Other(String),
    /// No surface wrapper (LoD1 solid members, unreadable boundaries)
    #[default]
    Unclassified,
}

impl SurfaceKind {
    /// Classify a surface wrapper tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bldg:RoofSurface" => SurfaceKind::Roof,
            "bldg:WallSurface" => SurfaceKind::Wall,
            "bldg:GroundSurface" => SurfaceKind::Ground,
            "bldg:ClosureSurface" => SurfaceKind::Closure,
            other => SurfaceKind::Other(other.to_string()),
        }
    }
}

/// A triangulated, flat-shaded building surface polygon
///
/// `normals`, `uvs` and `tangents` are either empty or hold exactly one entry
/// per vertex. A face without triangles is a placeholder: it keeps whatever
/// ring was read so per-boundary bookkeeping stays aligned with the source
/// document, but it contributes nothing to mesh buffers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    /// Semantic surface type
    pub kind: SurfaceKind,
    /// Ring vertices, closing duplicate removed
    pub vertices: Vec<Vertex>,
    /// Fan triangulation of the ring
    pub triangles: Vec<Triangle>,
    /// Per-vertex normals (all equal)
    pub normals: Vec<Vector3>,
    /// Per-vertex texture coordinates
    pub uvs: Vec<Uv>,
    /// Per-vertex tangents
    pub tangents: Vec<Vector3>,
    /// Index space of `triangles`
    pub index_space: IndexSpace,
}

impl Face {
    /// Create a placeholder face that carries no shading data
    pub fn placeholder(kind: SurfaceKind, vertices: Vec<Vertex>) -> Self {
        Self {
            kind,
            vertices,
            ..Default::default()
        }
    }

    /// True when the face has no triangulation
    pub fn is_degenerate(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The flat face normal, if the face was triangulated
    pub fn normal(&self) -> Option<Vector3> {
        self.normals.first().copied()
    }

    /// Number of ring vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Postal address of a building
///
/// Absent fields stay `None`; no placeholder text is ever substituted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// Thoroughfare name
    pub street: Option<String>,
    /// Thoroughfare number
    pub house_number: Option<String>,
    /// Postal code number
    pub postal_code: Option<String>,
}

impl Address {
    /// The present fields in street, number, postal code order
    pub fn fields(&self) -> Vec<&str> {
        [&self.street, &self.house_number, &self.postal_code]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect()
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.house_number.is_none() && self.postal_code.is_none()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields().join(" "))
    }
}

/// A building read from a CityGML document
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// `gml:id` of the building, or a generated identifier
    pub id: String,
    /// Level of Detail of the file the building was read from
    pub lod: LevelOfDetail,
    /// Boundary surfaces in document order
    pub faces: Vec<Face>,
    /// Postal address (empty for LoD3 and for buildings without one)
    pub address: Address,
}

impl Building {
    /// Create a building with no faces and an empty address
    pub fn new(id: impl Into<String>, lod: LevelOfDetail) -> Self {
        Self {
            id: id.into(),
            lod,
            faces: Vec::new(),
            address: Address::default(),
        }
    }

    /// Number of vertices this building contributes to mesh buffers
    pub fn emitted_vertex_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|face| !face.is_degenerate())
            .map(Face::vertex_count)
            .sum()
    }

    /// Number of placeholder faces
    pub fn degenerate_face_count(&self) -> usize {
        self.faces.iter().filter(|face| face.is_degenerate()).count()
    }
}
