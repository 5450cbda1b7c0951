//! A minimal XML element tree for skin files.
//!
//! Unlike a general-purpose document model, attributes keep document order and
//! may repeat: a style that sets the same attribute twice writes it twice, and
//! reading it back keeps both entries so replay order survives a round trip.
//! Text content, comments and processing instructions are not part of the skin
//! format and are skipped when reading.
//!
//! # Example
//!
//! ```
//! use plume_style::xml::{parse_xml, XmlElement};
//!
//! let mut skin = XmlElement::new("Skin");
//! skin.add_attribute("name", "default");
//! skin.add_child(XmlElement::new("Button"));
//!
//! let text = skin.to_string_pretty();
//! assert_eq!(parse_xml(&text).unwrap(), skin);
//! ```

use std::fmt;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::{Error, Result};

// ============================================================================
// XmlElement
// ============================================================================

/// An XML element with ordered attributes and child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates a new element with the specified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// The first value for an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append an attribute, keeping any earlier one with the same name.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Replace the first attribute with this name, or append it.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // ========================================================================
    // Children
    // ========================================================================

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Converts the element to an XML string (compact format).
    pub fn to_string_compact(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap_or_default()
    }

    /// Converts the element to an XML string, two-space indented.
    pub fn to_string_pretty(&self) -> String {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap_or_default()
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            let _ = writer.write_event(Event::Empty(start));
        } else {
            let _ = writer.write_event(Event::Start(start));
            for child in &self.children {
                child.write_to(writer);
            }
            let _ = writer.write_event(Event::End(BytesEnd::new(self.name.as_str())));
        }
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_pretty())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a document and return its root element.
pub fn parse_xml(s: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(s);
    reader.config_mut().trim_text(true);

    let mut root: Option<XmlElement> = None;
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                stack.push(element_from(&start, position)?);
            }
            Ok(Event::Empty(empty)) => {
                let element = element_from(&empty, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element, position)?;
                }
            }
            Ok(_) => {}
            Err(e) => return Err(Error::xml(e.to_string(), position)),
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(format!("unclosed element <{}>", open.name), reader.buffer_position() as u64));
    }
    root.ok_or(Error::MissingRoot)
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    let mut attributes = start.attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = attr.map_err(|e| Error::xml(e.to_string(), position))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::xml(e.to_string(), position))?
            .into_owned();
        element.add_attribute(key, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.add_child(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::xml("more than one root element", position)),
    }
    Ok(())
}
