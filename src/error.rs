//! Error types for CityGML import
//!
//! All errors include error codes for categorization and detailed context to
//! help with debugging.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: XML parsing and document structure errors
//! - **E3xxx**: Configuration and numeric errors
//! - **E4xxx**: Unsupported content
//!
//! Only file-level failures are represented here. A missing polygon, boundary
//! or address node never becomes an `Error`; the importer skips that
//! substructure and continues with its siblings.

use std::io;
use thiserror::Error;

/// Result type for CityGML import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when importing CityGML documents
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted or truncated ZIP bundle
    /// - Unsupported compression method
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Malformed XML syntax
    /// - Invalid character encoding
    /// - Unclosed tags
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Mismatched or unbalanced end tags
    /// - Empty document
    /// - DTD declarations (rejected for security reasons)
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// The document root is not a recognized CityModel element
    ///
    /// **Error Code**: E2004
    ///
    /// **Suggestions**:
    /// - Verify the file is a CityGML document with a `core:CityModel`
    ///   or `CityModel` root
    #[error("[E2004] Unrecognized root element '{0}', expected core:CityModel or CityModel")]
    UnrecognizedRoot(String),

    /// XML writing error
    ///
    /// **Error Code**: E2005
    #[error("[E2005] XML writing error: {0}")]
    XmlWrite(String),

    /// Invalid import configuration
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Zero or negative render-space scale (collapses all geometry)
    /// - Non-finite scale, bias, or fixed origin
    #[error("[E3001] Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parse error for numeric values
    ///
    /// **Error Code**: E3002
    #[error("[E3002] Parse error: {0}")]
    ParseError(String),

    /// The declared Level of Detail is not one this importer handles
    ///
    /// **Error Code**: E4001
    ///
    /// **Suggestions**:
    /// - Only LoD1, LoD2 (namespaced CityModel) and LoD3 (plain CityModel)
    ///   encodings are supported
    #[error("[E4001] Unsupported Level of Detail marker '{0}'")]
    UnsupportedLod(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::ParseError(format!("Failed to parse floating-point number: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create an InvalidXml error with element context
    ///
    /// # Example
    /// ```ignore
    /// Error::invalid_xml_element("gml:posList", "Unexpected end tag")
    /// ```
    pub fn invalid_xml_element(element: &str, message: &str) -> Self {
        Error::InvalidXml(format!("Element '<{}>': {}", element, message))
    }

    /// Create an InvalidConfig error naming the offending setting
    pub fn invalid_config(setting: &str, value: f64, reason: &str) -> Self {
        Error::InvalidConfig(format!("{} = {} {}", setting, value, reason))
    }

    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The name of the field being parsed (e.g., "posList value")
    /// * `value` - The value that failed to parse
    /// * `expected_type` - The expected type (e.g., "floating-point number")
    pub fn parse_error_with_context(field_name: &str, value: &str, expected_type: &str) -> Self {
        Error::ParseError(format!(
            "Failed to parse '{}': expected {}, got '{}'. \
             Verify the value is properly formatted.",
            field_name, expected_type, value
        ))
    }

    /// Create an XmlWrite error
    pub fn xml_write(message: String) -> Self {
        Error::XmlWrite(message)
    }
}
