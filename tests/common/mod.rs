//! Shared fixture builders for integration tests
//!
//! CityGML documents are assembled from small string fragments so each test
//! states only the structure it cares about.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Survey anchor used by most fixtures (a UTM zone 32 tile corner)
pub const EASTING: f64 = 390_000.0;
pub const NORTHING: f64 = 5_705_000.0;

const NAMESPACES: &str = r#"xmlns:core="http://www.opengis.net/citygml/1.0" xmlns:bldg="http://www.opengis.net/citygml/building/1.0" xmlns:gml="http://www.opengis.net/gml" xmlns:xAL="urn:oasis:names:tc:ciq:xsdschema:xAL:2.0""#;

/// A `gml:posList` ring: the given points followed by the closing duplicate
pub fn pos_list(points: &[(f64, f64, f64)]) -> String {
    points
        .iter()
        .chain(points.first())
        .map(|(x, y, z)| format!("{} {} {}", x, y, z))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A `gml:surfaceMember` holding one polygon with the given ring
pub fn member(points: &[(f64, f64, f64)]) -> String {
    format!(
        "<gml:surfaceMember><gml:Polygon><gml:exterior><gml:LinearRing>\
         <gml:posList srsDimension=\"3\">{}</gml:posList>\
         </gml:LinearRing></gml:exterior></gml:Polygon></gml:surfaceMember>",
        pos_list(points)
    )
}

/// A vertical 4-point wall along the easting axis, relative to the fixture anchor
pub fn wall(offset_e: f64, offset_n: f64, width: f64, height: f64) -> Vec<(f64, f64, f64)> {
    let (e, n) = (EASTING + offset_e, NORTHING + offset_n);
    vec![
        (e, n, 0.0),
        (e + width, n, 0.0),
        (e + width, n, height),
        (e, n, height),
    ]
}

/// A horizontal 4-point rectangle at `height`, relative to the fixture anchor
pub fn slab(offset_e: f64, offset_n: f64, size: f64, height: f64) -> Vec<(f64, f64, f64)> {
    let (e, n) = (EASTING + offset_e, NORTHING + offset_n);
    vec![
        (e, n, height),
        (e + size, n, height),
        (e + size, n + size, height),
        (e, n + size, height),
    ]
}

/// A `bldg:address` subtree; `None` fields are left out of the document
pub fn address(street: Option<&str>, number: Option<&str>, postal_code: Option<&str>) -> String {
    let thoroughfare = if street.is_some() || number.is_some() {
        format!(
            "<xAL:Thoroughfare Type=\"Street\">{}{}</xAL:Thoroughfare>",
            number
                .map(|n| format!("<xAL:ThoroughfareNumber>{}</xAL:ThoroughfareNumber>", n))
                .unwrap_or_default(),
            street
                .map(|s| format!("<xAL:ThoroughfareName>{}</xAL:ThoroughfareName>", s))
                .unwrap_or_default(),
        )
    } else {
        String::new()
    };
    let postal = postal_code
        .map(|p| {
            format!(
                "<xAL:PostalCode><xAL:PostalCodeNumber>{}</xAL:PostalCodeNumber></xAL:PostalCode>",
                p
            )
        })
        .unwrap_or_default();

    format!(
        "<bldg:address><core:Address><core:xalAddress><xAL:AddressDetails><xAL:Country>\
         <xAL:CountryName>Deutschland</xAL:CountryName>\
         <xAL:Locality Type=\"Town\"><xAL:LocalityName>Dortmund</xAL:LocalityName>{}{}</xAL:Locality>\
         </xAL:Country></xAL:AddressDetails></core:xalAddress></core:Address></bldg:address>",
        thoroughfare, postal
    )
}

fn id_attribute(id: Option<&str>) -> String {
    id.map(|id| format!(" gml:id=\"{}\"", id)).unwrap_or_default()
}

fn envelope(easting: f64, northing: f64) -> String {
    format!(
        "<gml:boundedBy><gml:Envelope srsName=\"EPSG:25832\" srsDimension=\"3\">\
         <gml:lowerCorner>{} {} 0</gml:lowerCorner>\
         <gml:upperCorner>{} {} 100</gml:upperCorner>\
         </gml:Envelope></gml:boundedBy>",
        easting,
        northing,
        easting + 1000.0,
        northing + 1000.0
    )
}

/// An LoD1 building whose solid lists the given surface members
pub fn lod1_building(id: Option<&str>, members: &[String], address: Option<&str>) -> String {
    format!(
        "<core:cityObjectMember><bldg:Building{}>\
         <bldg:measuredHeight uom=\"urn:adv:uom:m\">10.0</bldg:measuredHeight>\
         <bldg:lod1Solid><gml:Solid><gml:exterior><gml:CompositeSurface>{}\
         </gml:CompositeSurface></gml:exterior></gml:Solid></bldg:lod1Solid>{}\
         </bldg:Building></core:cityObjectMember>",
        id_attribute(id),
        members.concat(),
        address.unwrap_or_default()
    )
}

/// An LoD2 `bldg:boundedBy` entry with the given wrapper and single member
pub fn lod2_boundary(wrapper: &str, member: &str) -> String {
    format!(
        "<bldg:boundedBy><bldg:{w}><bldg:lod2MultiSurface><gml:MultiSurface>{m}\
         </gml:MultiSurface></bldg:lod2MultiSurface></bldg:{w}></bldg:boundedBy>",
        w = wrapper,
        m = member
    )
}

/// An LoD2 building
pub fn lod2_building(id: Option<&str>, boundaries: &[String], address: Option<&str>) -> String {
    format!(
        "<core:cityObjectMember><bldg:Building{}>\
         <bldg:function>31001_1000</bldg:function>{}{}\
         </bldg:Building></core:cityObjectMember>",
        id_attribute(id),
        address.unwrap_or_default(),
        boundaries.concat()
    )
}

/// An LoD3 `bldg:boundedBy` entry holding several members
pub fn lod3_boundary(wrapper: &str, members: &[String]) -> String {
    format!(
        "<bldg:boundedBy><bldg:{w}><bldg:lod3MultiSurface><gml:MultiSurface>{m}\
         </gml:MultiSurface></bldg:lod3MultiSurface></bldg:{w}></bldg:boundedBy>",
        w = wrapper,
        m = members.concat()
    )
}

/// An LoD3 building
pub fn lod3_building(id: Option<&str>, boundaries: &[String], address: Option<&str>) -> String {
    format!(
        "<cityObjectMember><bldg:Building{}>{}{}</bldg:Building></cityObjectMember>",
        id_attribute(id),
        address.unwrap_or_default(),
        boundaries.concat()
    )
}

/// A namespaced (LoD1/LoD2) document with the given level marker
pub fn namespaced_document(marker: &str, buildings: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <core:CityModel {}>\
         <gml:name>{}</gml:name>{}{}\
         </core:CityModel>",
        NAMESPACES,
        marker,
        envelope(EASTING, NORTHING),
        buildings.concat()
    )
}

/// A plain-root (LoD3) document
pub fn plain_document(buildings: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <CityModel {}>{}{}</CityModel>",
        NAMESPACES,
        envelope(EASTING, NORTHING),
        buildings.concat()
    )
}

/// An in-memory ZIP bundle
pub fn bundle(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    let mut cursor = zip.finish().unwrap();
    cursor.set_position(0);
    cursor
}
