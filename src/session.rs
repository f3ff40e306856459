//! Import sessions
//!
//! An [`ImportSession`] holds everything one import action accumulates:
//! the buildings read so far, the running vertex position of the combined
//! buffer, and the end-of-batch summary. It is created empty, fed one
//! document at a time, and consumed by [`ImportSession::finish`].
//!
//! Every document is imported all-or-nothing: it is parsed against a copy of
//! the running vertex position, and the copy and the document's buildings
//! are committed together only when the whole document succeeds. A failing
//! document is recorded in the summary and leaves the session unchanged.

use crate::archive::Archive;
use crate::assembler::assemble;
use crate::config::ImportConfig;
use crate::document::Document;
use crate::error::Result;
use crate::face::{FaceBuilder, IndexCursor};
use crate::model::{Building, MeshRecord};
use crate::parser::{ParsedFile, parse_city_model};
use crate::writer::MeshSink;
use std::fmt;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

/// A document that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Path or archive entry name of the document
    pub source: String,
    /// Rendered error, including its error code
    pub error: String,
}

/// End-of-batch statistics
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Documents the session tried to import
    pub files_attempted: usize,
    /// Documents imported successfully
    pub files_imported: usize,
    /// Buildings read from imported documents
    pub buildings: usize,
    /// Faces read from imported documents, placeholders included
    pub faces: usize,
    /// Placeholder faces without triangulation
    pub degenerate_faces: usize,
    /// Documents that failed, in import order
    pub failures: Vec<FileFailure>,
}

impl ImportSummary {
    /// Number of documents that failed
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted document was imported
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "imported {}/{} files: {} buildings, {} faces ({} degenerate)",
            self.files_imported, self.files_attempted, self.buildings, self.faces,
            self.degenerate_faces
        )?;
        if !self.failures.is_empty() {
            write!(f, ", {} failed", self.failures.len())?;
        }
        Ok(())
    }
}

/// Result of a finished import session
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Assembled mesh records
    pub meshes: Vec<MeshRecord>,
    /// Every imported building in encounter order
    pub buildings: Vec<Building>,
    /// End-of-batch statistics
    pub summary: ImportSummary,
}

impl ImportOutcome {
    /// Hand every mesh record to `sink`, in order
    pub fn deliver<S: MeshSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for mesh in &self.meshes {
            sink.accept(mesh)?;
        }
        Ok(())
    }
}

/// State of one import action
///
/// # Example
///
/// ```
/// use citygml_mesh::{ImportConfig, ImportSession};
///
/// let mut session = ImportSession::new(ImportConfig::default())?;
/// let result = session.import_str("broken", "<not-citygml/>");
/// assert!(result.is_err());
///
/// let outcome = session.finish();
/// assert_eq!(outcome.summary.files_failed(), 1);
/// assert!(outcome.meshes.is_empty());
/// # Ok::<(), citygml_mesh::Error>(())
/// ```
#[derive(Debug)]
pub struct ImportSession {
    config: ImportConfig,
    builder: FaceBuilder,
    cursor: IndexCursor,
    buildings: Vec<Building>,
    summary: ImportSummary,
}

impl ImportSession {
    /// Start an empty session
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) when the
    /// configuration would collapse or corrupt geometry.
    pub fn new(config: ImportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: FaceBuilder::from_config(&config),
            cursor: IndexCursor::new(config.output_mode()),
            config,
            buildings: Vec::new(),
            summary: ImportSummary::default(),
        })
    }

    /// Configuration of this session
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Buildings imported so far
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Statistics so far
    pub fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    /// Import a CityGML document from disk
    ///
    /// Returns the number of buildings read. On failure the error is also
    /// recorded in the summary and the session is left unchanged.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let content = fs::read_to_string(path);
        self.import_document(&source, content.map_err(Into::into))
    }

    /// Import a CityGML document held in memory
    ///
    /// `source_name` identifies the document in logs and failures; its file
    /// stem prefixes generated building identifiers.
    pub fn import_str(&mut self, source_name: &str, xml: &str) -> Result<usize> {
        self.import_document(source_name, Ok(xml.to_string()))
    }

    /// Import a CityGML document from a reader
    pub fn import_reader<R: Read>(&mut self, source_name: &str, mut reader: R) -> Result<usize> {
        let mut content = String::new();
        let read = reader
            .read_to_string(&mut content)
            .map(|_| content)
            .map_err(Into::into);
        self.import_document(source_name, read)
    }

    /// Import every `.gml` and `.xml` entry of a ZIP bundle, in archive order
    ///
    /// Each entry is its own document: one failing entry does not affect the
    /// others. Returns the number of buildings read across all entries.
    ///
    /// # Errors
    ///
    /// Fails only when the bundle itself cannot be opened.
    pub fn import_archive<R: Read + Seek>(&mut self, reader: R) -> Result<usize> {
        let mut archive = Archive::open(reader)?;
        let names = archive.document_names();
        tracing::debug!(entries = archive.len(), documents = names.len(), "opened archive");

        let mut imported = 0;
        for name in names {
            let content = archive.get_file(&name);
            if let Ok(count) = self.import_document(&name, content) {
                imported += count;
            }
        }
        Ok(imported)
    }

    /// Assemble the accumulated buildings and close the session
    pub fn finish(self) -> ImportOutcome {
        let meshes = assemble(&self.buildings, self.config.output_mode());
        tracing::info!(
            files = self.summary.files_attempted,
            failed = self.summary.files_failed(),
            buildings = self.summary.buildings,
            meshes = meshes.len(),
            "{}",
            self.summary
        );
        ImportOutcome {
            meshes,
            buildings: self.buildings,
            summary: self.summary,
        }
    }

    fn import_document(&mut self, source: &str, content: Result<String>) -> Result<usize> {
        self.summary.files_attempted += 1;

        let mut cursor = self.cursor;
        let parsed = content.and_then(|xml| {
            let document = Document::parse(&xml)?;
            parse_city_model(
                document.root(),
                source_stem(source),
                &self.config,
                &self.builder,
                &mut cursor,
            )
        });

        match parsed {
            Ok(parsed) => Ok(self.commit(source, parsed, cursor)),
            Err(error) => {
                tracing::warn!(source, %error, "file skipped");
                self.summary.failures.push(FileFailure {
                    source: source.to_string(),
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    fn commit(&mut self, source: &str, parsed: ParsedFile, cursor: IndexCursor) -> usize {
        let ParsedFile { lod, buildings, .. } = parsed;
        let faces: usize = buildings.iter().map(|b| b.faces.len()).sum();
        let degenerate: usize = buildings.iter().map(Building::degenerate_face_count).sum();
        let count = buildings.len();

        tracing::info!(source, %lod, buildings = count, faces, degenerate, "imported file");

        self.cursor = cursor;
        self.summary.files_imported += 1;
        self.summary.buildings += count;
        self.summary.faces += faces;
        self.summary.degenerate_faces += degenerate;
        self.buildings.extend(buildings);
        count
    }
}

/// Import several files in order and assemble the result
///
/// Individual file failures are recorded in the outcome's summary.
///
/// # Errors
///
/// Fails only for an invalid configuration.
pub fn import_files<I, P>(paths: I, config: ImportConfig) -> Result<ImportOutcome>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut session = ImportSession::new(config)?;
    for path in paths {
        // Failures are kept in the summary
        let _ = session.import_file(path);
    }
    Ok(session.finish())
}

fn source_stem(source: &str) -> &str {
    Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    const LOD1: &str = r#"<core:CityModel>
        <gml:name>LoD1_tile</gml:name>
        <gml:boundedBy><gml:Envelope><gml:lowerCorner>100 200 0</gml:lowerCorner></gml:Envelope></gml:boundedBy>
        <core:cityObjectMember>
          <bldg:Building>
            <bldg:lod1Solid><gml:Solid><gml:exterior><gml:CompositeSurface>
              <gml:surfaceMember><gml:Polygon><gml:exterior><gml:LinearRing>
                <gml:posList>100 200 0 101 200 0 101 201 0 100 201 0 100 200 0</gml:posList>
              </gml:LinearRing></gml:exterior></gml:Polygon></gml:surfaceMember>
            </gml:CompositeSurface></gml:exterior></gml:Solid></bldg:lod1Solid>
          </bldg:Building>
        </core:cityObjectMember>
      </core:CityModel>"#;

    #[test]
    fn test_source_stem() {
        assert_eq!(source_stem("data/LoD2_354_5667.gml"), "LoD2_354_5667");
        assert_eq!(source_stem("tile"), "tile");
    }

    #[test]
    fn test_generated_ids_use_stem() {
        let mut session = ImportSession::new(ImportConfig::default()).unwrap();
        assert_eq!(session.import_str("dir/north.gml", LOD1).unwrap(), 1);
        assert_eq!(session.buildings()[0].id, "north_building_0");
    }

    #[test]
    fn test_failed_document_leaves_session_unchanged() {
        let config = ImportConfig::new().with_output_mode(OutputMode::Combined);
        let mut session = ImportSession::new(config).unwrap();
        session.import_str("a", LOD1).unwrap();
        let position = session.cursor.position();

        assert!(session.import_str("b", "<core:CityModel><gml:name>LoD9</gml:name></core:CityModel>").is_err());
        assert!(session.import_str("c", "<core:CityModel>").is_err());

        assert_eq!(session.cursor.position(), position);
        assert_eq!(session.buildings().len(), 1);
        let summary = session.summary();
        assert_eq!(summary.files_attempted, 3);
        assert_eq!(summary.files_imported, 1);
        assert_eq!(summary.failures[0].source, "b");
        assert!(summary.failures[0].error.contains("E4001"));
    }

    #[test]
    fn test_import_reader() {
        let mut session = ImportSession::new(ImportConfig::default()).unwrap();
        assert_eq!(session.import_reader("r", LOD1.as_bytes()).unwrap(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ImportSession::new(ImportConfig::new().with_scale(-1.0)).is_err());
    }

    #[test]
    fn test_summary_display() {
        let summary = ImportSummary {
            files_attempted: 3,
            files_imported: 2,
            buildings: 5,
            faces: 20,
            degenerate_faces: 1,
            failures: vec![FileFailure {
                source: "x".into(),
                error: "boom".into(),
            }],
        };
        assert_eq!(
            summary.to_string(),
            "imported 2/3 files: 5 buildings, 20 faces (1 degenerate), 1 failed"
        );
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_deliver_to_vec() {
        let mut session = ImportSession::new(ImportConfig::default()).unwrap();
        session.import_str("t", LOD1).unwrap();
        let outcome = session.finish();
        let mut sink: Vec<MeshRecord> = Vec::new();
        outcome.deliver(&mut sink).unwrap();
        assert_eq!(sink, outcome.meshes);
    }
}
