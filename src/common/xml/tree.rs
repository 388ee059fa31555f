//! A small owned XML element tree.
//!
//! Parts are parsed into [`XmlElement`] with quick-xml and mapped onto the
//! document model from there. Anything the model does not understand stays an
//! `XmlElement` and is written back as-is. Comments and processing
//! instructions inside a part are not kept.

use super::escape::{escape_text, escape_xml, resolve_entity, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// The declaration written at the top of every generated part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A node inside an element: a child element or character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its qualified name, attributes in document order and
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `w:pPr`.
    pub name: String,
    /// Attributes as `(qualified name, unescaped value)`.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Name without its namespace prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place so the original
    /// attribute order survives.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Child elements, skipping character data.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Depth-first search over this element and its descendants.
    pub fn any(&self, pred: &mut impl FnMut(&XmlElement) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        self.elements().any(|e| e.any(pred))
    }

    /// Parse a complete XML document and return its root element.
    ///
    /// Whitespace is kept verbatim. Entity references are resolved.
    pub fn parse(xml: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(start_element(&reader, e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let element = start_element(&reader, e)?;
                    attach(&mut stack, &mut root, element)?;
                },
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| OoxmlError::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t)
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        push_text(current, &unescape_xml(raw));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t)
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        push_text(current, raw);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(r)
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        let ch = resolve_entity(name).ok_or_else(|| {
                            OoxmlError::Xml(format!("unknown entity reference &{name};"))
                        })?;
                        push_text(current, ch.encode_utf8(&mut [0u8; 4]));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OoxmlError::Xml(format!(
                        "XML parsing error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                },
                _ => {},
            }
        }

        if !stack.is_empty() {
            return Err(OoxmlError::Xml("unexpected end of document".to_string()));
        }
        root.ok_or_else(|| OoxmlError::Xml("document has no root element".to_string()))
    }

    /// Serialize this element (without declaration) onto `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        write_attributes(out, &self.attributes);
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                XmlNode::Element(e) => e.write_to(out),
                XmlNode::Text(t) => out.push_str(&escape_text(t)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Serialize as a standalone part, declaration included.
    pub fn to_document(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str("\r\n");
        self.write_to(&mut out);
        out
    }
}

/// Strip the namespace prefix from a qualified name.
#[inline]
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

/// Write ` k="v"` pairs with escaped values.
pub fn write_attributes(out: &mut String, attributes: &[(String, String)]) {
    for (k, v) in attributes {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        out.push_str(&escape_xml(v));
        out.push('"');
    }
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<XmlElement> {
    let name = String::from_utf8(e.name().as_ref().to_vec())
        .map_err(|err| OoxmlError::Xml(err.to_string()))?;
    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OoxmlError::Xml(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| OoxmlError::Xml(err.to_string()))?
            .to_string();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| OoxmlError::Xml(err.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(OoxmlError::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

// Adjacent text, entity and CDATA events coalesce into one text node.
fn push_text(current: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(last)) = current.children.last_mut() {
        last.push_str(text);
    } else {
        current.children.push(XmlNode::Text(text.to_string()));
    }
}
