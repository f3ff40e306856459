//! Building metadata manifest

use crate::error::{Error, Result};
use crate::model::{Address, Building};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write as IoWrite;

/// Write building metadata as XML
///
/// ```xml
/// <buildings count="1">
///   <building id="BLDG_1" lod="LoD2" faces="3" degenerate="0">
///     <address>
///       <street>Friedensplatz</street>
///       <number>1</number>
///       <postalCode>44135</postalCode>
///     </address>
///   </building>
/// </buildings>
/// ```
///
/// Buildings without an address are written as empty elements.
pub fn write_building_manifest<W: IoWrite>(buildings: &[Building], writer: W) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

    xml_writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::xml_write(format!("Failed to write XML declaration: {}", e)))?;

    let count = buildings.len().to_string();
    let mut root = BytesStart::new("buildings");
    root.push_attribute(("count", count.as_str()));
    xml_writer
        .write_event(Event::Start(root))
        .map_err(|e| Error::xml_write(format!("Failed to write buildings element: {}", e)))?;

    for building in buildings {
        write_building(&mut xml_writer, building)?;
    }

    xml_writer
        .write_event(Event::End(BytesEnd::new("buildings")))
        .map_err(|e| Error::xml_write(format!("Failed to close buildings element: {}", e)))?;

    Ok(())
}

fn write_building<W: IoWrite>(writer: &mut Writer<W>, building: &Building) -> Result<()> {
    let faces = building.faces.len().to_string();
    let degenerate = building.degenerate_face_count().to_string();

    let mut elem = BytesStart::new("building");
    elem.push_attribute(("id", building.id.as_str()));
    elem.push_attribute(("lod", building.lod.name()));
    elem.push_attribute(("faces", faces.as_str()));
    elem.push_attribute(("degenerate", degenerate.as_str()));

    if building.address.is_empty() {
        writer
            .write_event(Event::Empty(elem))
            .map_err(|e| Error::xml_write(format!("Failed to write building element: {}", e)))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write building element: {}", e)))?;
    write_address(writer, &building.address)?;
    writer
        .write_event(Event::End(BytesEnd::new("building")))
        .map_err(|e| Error::xml_write(format!("Failed to close building element: {}", e)))?;

    Ok(())
}

fn write_address<W: IoWrite>(writer: &mut Writer<W>, address: &Address) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("address")))
        .map_err(|e| Error::xml_write(format!("Failed to write address element: {}", e)))?;

    let fields = [
        ("street", &address.street),
        ("number", &address.house_number),
        ("postalCode", &address.postal_code),
    ];
    for (tag, value) in fields {
        let Some(value) = value else {
            continue;
        };
        writer
            .write_event(Event::Start(BytesStart::new(tag)))
            .map_err(|e| Error::xml_write(format!("Failed to write {} element: {}", tag, e)))?;
        writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(|e| Error::xml_write(format!("Failed to write {} value: {}", tag, e)))?;
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(|e| Error::xml_write(format!("Failed to close {} element: {}", tag, e)))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("address")))
        .map_err(|e| Error::xml_write(format!("Failed to close address element: {}", e)))?;

    Ok(())
}
