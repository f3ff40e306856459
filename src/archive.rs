//! ZIP bundles of CityGML tiles
//!
//! City data portals commonly ship a district as one ZIP holding many tile
//! documents. Only entries with a `.gml` or `.xml` extension are treated as
//! documents; directories and sidecar files are ignored.

use crate::error::Result;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// File extensions recognized as CityGML documents (compared case-insensitively)
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["gml", "xml"];

/// An opened ZIP bundle
pub struct Archive<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Archive<R> {
    /// Open a ZIP bundle from a reader
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Get the number of entries in the bundle
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Get a list of all entry names in archive order
    ///
    /// Names come from the central directory, so every entry is listed even
    /// when its local header is damaged; that surfaces in [`Archive::get_file`].
    pub fn file_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .map(str::to_string)
            .collect()
    }

    /// Names of the entries that look like CityGML documents, in archive order
    pub fn document_names(&self) -> Vec<String> {
        self.file_names()
            .into_iter()
            .filter(|name| is_document_name(name))
            .collect()
    }

    /// Get an entry's content as text
    pub fn get_file(&mut self, name: &str) -> Result<String> {
        let mut file = self.archive.by_name(name)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }
}

/// Check whether an entry name carries a document extension
pub fn is_document_name(name: &str) -> bool {
    if name.ends_with('/') {
        return false;
    }
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn bundle(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn stored_bundle(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    /// Overwrite the signature of the `n`-th local file header
    fn corrupt_local_header(bytes: &mut [u8], n: usize) {
        let start = bytes
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == b"PK\x03\x04")
            .map(|(i, _)| i)
            .nth(n)
            .unwrap();
        bytes[start..start + 4].copy_from_slice(b"XXXX");
    }

    #[test]
    fn test_is_document_name() {
        assert!(is_document_name("tiles/LoD2_354_5667.gml"));
        assert!(is_document_name("TILE.GML"));
        assert!(is_document_name("model.Xml"));
        assert!(!is_document_name("readme.txt"));
        assert!(!is_document_name("gml"));
        assert!(!is_document_name("tiles.gml/"));
    }

    #[test]
    fn test_document_names_in_archive_order() {
        let mut archive = Archive::open(bundle(&[
            ("b.gml", "<CityModel/>"),
            ("docs/", ""),
            ("notes.txt", "hello"),
            ("a.XML", "<CityModel/>"),
        ]))
        .unwrap();
        assert_eq!(archive.len(), 4);
        assert_eq!(archive.document_names(), vec!["b.gml", "a.XML"]);
        assert_eq!(archive.get_file("notes.txt").unwrap(), "hello");
    }

    #[test]
    fn test_missing_entry_is_error() {
        let mut archive = Archive::open(bundle(&[("a.gml", "")])).unwrap();
        assert!(archive.get_file("b.gml").is_err());
    }

    #[test]
    fn test_damaged_entry_is_listed_and_fails_on_read() {
        let mut bytes = stored_bundle(&[("a.gml", "<CityModel/>"), ("b.gml", "<CityModel/>")]);
        corrupt_local_header(&mut bytes, 1);

        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.document_names(), vec!["a.gml", "b.gml"]);
        assert_eq!(archive.get_file("a.gml").unwrap(), "<CityModel/>");
        assert!(archive.get_file("b.gml").is_err());
    }

    #[test]
    fn test_not_a_zip() {
        assert!(Archive::open(Cursor::new(b"not a zip".to_vec())).is_err());
    }
}
