//! Read-only XML document tree
//!
//! CityGML geometry is reached by walking fixed tag-name paths through a
//! deeply nested document, and almost every step along those paths is
//! optional in real-world data. The importer therefore works against the
//! [`TreeNode`] trait, whose lookups return an explicit "not found" value
//! ([`Option`] or [`MissingNode`]) that each call site branches on.
//!
//! [`Document::parse`] builds the concrete [`Element`] tree from XML text
//! using `quick-xml` events. Tag names are kept as written, including their
//! namespace prefix (`gml:posList`), because the CityGML encodings are
//! recognized by their prefixed names.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Default buffer capacity for XML parsing (4KB)
const XML_BUFFER_CAPACITY: usize = 4096;

/// Deepest element nesting accepted by [`Document::parse`]
///
/// CityGML building geometry sits roughly a dozen levels below the root.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// A tag that was expected along a lookup path but is absent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("<{missing}> not found under <{parent}>")]
pub struct MissingNode {
    /// Tag of the node the lookup was performed on
    pub parent: String,
    /// First tag along the path that could not be found
    pub missing: String,
}

/// Navigation capabilities of a document node
///
/// Lookups are by exact tag name and return the first match in document
/// order. Nodes are never mutated through this interface.
pub trait TreeNode: Sized {
    /// Qualified tag name, e.g. `bldg:Building`
    fn tag(&self) -> &str;

    /// Trimmed text content directly inside this node
    fn text(&self) -> &str;

    /// Value of an attribute by qualified name, e.g. `gml:id`
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order
    fn children(&self) -> &[Self];

    /// First child element with the given tag
    fn child(&self, tag: &str) -> Option<&Self> {
        self.children().iter().find(|c| c.tag() == tag)
    }

    /// All child elements with the given tag, in document order
    fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children().iter().filter(move |c| c.tag() == tag)
    }

    /// First child element regardless of tag
    fn first_element(&self) -> Option<&Self> {
        self.children().first()
    }

    /// Follow a path of tags, taking the first match at every step
    ///
    /// An empty path resolves to `self`.
    fn find_path(&self, path: &[&str]) -> std::result::Result<&Self, MissingNode> {
        let mut node = self;
        for tag in path {
            node = node.child(tag).ok_or_else(|| MissingNode {
                parent: node.tag().to_string(),
                missing: (*tag).to_string(),
            })?;
        }
        Ok(node)
    }

    /// All descendants with the given tag, depth-first in document order
    ///
    /// The search does not descend into a matching node, so nested
    /// occurrences of the same tag (e.g. building parts) are not reported
    /// separately from their ancestor.
    fn descendants_named<'a>(&'a self, tag: &str) -> Vec<&'a Self> {
        let mut found = Vec::new();
        collect_descendants(self, tag, &mut found);
        found
    }
}

fn collect_descendants<'a, N: TreeNode>(node: &'a N, tag: &str, found: &mut Vec<&'a N>) {
    let mut pending: Vec<&'a N> = node.children().iter().rev().collect();
    while let Some(next) = pending.pop() {
        if next.tag() == tag {
            found.push(next);
        } else {
            pending.extend(next.children().iter().rev());
        }
    }
}

/// An owned XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes, text or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style: set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn from_start(e: &BytesStart, decoder: Decoder) -> Result<Self> {
        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref())
            .map_err(|e| Error::InvalidXml(e.to_string()))?
            .to_string();

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::InvalidXml(e.to_string()))?;
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|e| Error::InvalidXml(e.to_string()))?;
            attributes.push((key.to_string(), value.into_owned()));
        }

        Ok(Self {
            tag,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Trim the text collected between the start and end tag
    fn close(mut self) -> Self {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
        self
    }
}

impl TreeNode for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse XML text into an element tree
    ///
    /// Documents containing a DTD are rejected: DTD declarations can lead to
    /// XML External Entity attacks and CityGML never needs them.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let decoder = reader.decoder();

        let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = Element::from_start(e, decoder)?;
                    check_depth(&stack, &element)?;
                    stack.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Element::from_start(e, decoder)?;
                    check_depth(&stack, &element)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(ref e)) => {
                    let element = stack.pop().ok_or_else(|| {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        Error::invalid_xml_element(&name, "end tag without matching start tag")
                    })?;
                    attach(&mut stack, &mut root, element.close())?;
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = t.decode().map_err(|e| Error::InvalidXml(e.to_string()))?;
                        current.push_text(&text);
                    }
                }
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        push_reference(current, r)?;
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(current) = stack.last_mut() {
                        let bytes = c.into_inner();
                        let text = std::str::from_utf8(&bytes)
                            .map_err(|e| Error::InvalidXml(e.to_string()))?;
                        current.push_text(text);
                    }
                }
                Ok(Event::DocType(_)) => {
                    return Err(Error::InvalidXml(
                        "DTD declarations are not allowed in CityGML documents for security reasons"
                            .to_string(),
                    ));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::invalid_xml_element(
                &open.tag,
                "element is not closed before end of document",
            ));
        }

        let root =
            root.ok_or_else(|| Error::InvalidXml("Document has no root element".to_string()))?;
        Ok(Self { root })
    }

    /// Wrap an already built element tree
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// The document's root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn check_depth(stack: &[Element], element: &Element) -> Result<()> {
    if stack.len() >= MAX_ELEMENT_DEPTH {
        return Err(Error::invalid_xml_element(
            &element.tag,
            &format!("nesting exceeds {} levels", MAX_ELEMENT_DEPTH),
        ));
    }
    Ok(())
}

/// Resolve a character or predefined entity reference into the element text
fn push_reference(element: &mut Element, reference: &BytesRef) -> Result<()> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| Error::InvalidXml(e.to_string()))?
    {
        element.text.push(ch);
        return Ok(());
    }

    let name = reference
        .decode()
        .map_err(|e| Error::InvalidXml(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(value) => {
            element.text.push_str(value);
            Ok(())
        }
        None => Err(Error::invalid_xml_element(
            &element.tag,
            &format!("undefined entity reference '&{};'", name),
        )),
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::invalid_xml_element(
            &element.tag,
            "second top-level element; a document has exactly one root",
        ));
    }
    *root = Some(element);
    Ok(())
}
