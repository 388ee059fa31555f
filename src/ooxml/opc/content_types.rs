//! The `[Content_Types].xml` item.
//!
//! Maps partnames to content types through per-extension `Default` entries
//! and per-part `Override` entries. Entries keep their original order so an
//! untouched package writes back the same item.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// `(extension, content type)`
    defaults: Vec<(String, String)>,
    /// `(partname, content type)`
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if matches!(e.local_name().as_ref(), b"Default" | b"Override") =>
                {
                    let is_default = e.local_name().as_ref() == b"Default";
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr
                            .decode_and_unescape_value(reader.decoder())
                            .map_err(|e| OpcError::XmlError(e.to_string()))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {},
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        if is_default {
                            map.add_default(key, ct);
                        } else {
                            map.set_override(key, ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    pub fn add_default(&mut self, ext: impl Into<String>, content_type: impl Into<String>) {
        let ext = ext.into();
        let content_type = content_type.into();
        match self
            .defaults
            .iter_mut()
            .find(|(e, _)| e.eq_ignore_ascii_case(&ext))
        {
            Some(slot) => slot.1 = content_type,
            None => self.defaults.push((ext, content_type)),
        }
    }

    pub fn set_override(&mut self, partname: impl Into<String>, content_type: impl Into<String>) {
        let partname = partname.into();
        let content_type = content_type.into();
        match self
            .overrides
            .iter_mut()
            .find(|(p, _)| p.eq_ignore_ascii_case(&partname))
        {
            Some(slot) => slot.1 = content_type,
            None => self.overrides.push((partname, content_type)),
        }
    }

    pub fn remove_override(&mut self, partname: &PackURI) -> Option<String> {
        let pos = self
            .overrides
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(partname.as_str()))?;
        Some(self.overrides.remove(pos).1)
    }

    /// Content type of a part: its override, else the default for its
    /// extension. Comparison is ASCII case-insensitive.
    pub fn get(&self, partname: &PackURI) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(partname.as_str()))
            .or_else(|| {
                self.defaults
                    .iter()
                    .find(|(e, _)| e.eq_ignore_ascii_case(partname.ext()))
            })
            .map(|(_, ct)| ct.as_str())
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(
            256 + (self.defaults.len() + self.overrides.len()) * 128,
        );
        xml.push_str(XML_DECLARATION);
        xml.push_str("\r\n<Types xmlns=\"");
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str("\">");

        for (ext, ct) in &self.defaults {
            xml.push_str("<Default Extension=\"");
            xml.push_str(&escape_xml(ext));
            xml.push_str("\" ContentType=\"");
            xml.push_str(&escape_xml(ct));
            xml.push_str("\"/>");
        }
        for (partname, ct) in &self.overrides {
            xml.push_str("<Override PartName=\"");
            xml.push_str(&escape_xml(partname));
            xml.push_str("\" ContentType=\"");
            xml.push_str(&escape_xml(ct));
            xml.push_str("\"/>");
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_lookup() {
        let types = ContentTypes::from_xml(TYPES.as_bytes()).unwrap();
        let doc = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(types.get(&doc), Some(ct::WML_DOCUMENT_MAIN));
        let upper = PackURI::new("/WORD/Document.xml").unwrap();
        assert_eq!(types.get(&upper), Some(ct::WML_DOCUMENT_MAIN));
        let other = PackURI::new("/customXml/item1.XML").unwrap();
        assert_eq!(types.get(&other), Some(ct::XML));
        let png = PackURI::new("/word/media/image1.png").unwrap();
        assert_eq!(types.get(&png), None);
    }

    #[test]
    fn test_override_replaces_in_place() {
        let mut types = ContentTypes::from_xml(TYPES.as_bytes()).unwrap();
        types.set_override("/word/styles.xml", ct::WML_STYLES);
        types.set_override("/word/document.xml", ct::XML);
        let xml = types.to_xml();
        let doc_pos = xml.find("/word/document.xml").unwrap();
        let styles_pos = xml.find("/word/styles.xml").unwrap();
        assert!(doc_pos < styles_pos);
        let again = ContentTypes::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(again, types);
    }
}
