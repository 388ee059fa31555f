use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::{namespace, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
/// Relationships between parts of an OPC package.
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Relative part reference or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute partname of the target. Fails for external relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets an external resource",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// The relationships of one source part, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationships {
    base_uri: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: Vec::new(),
        }
    }

    /// Parse the content of a `.rels` part.
    ///
    /// Entries missing `Id`, `Type` or `Target` are skipped.
    pub fn from_xml(xml: &[u8], base_uri: &str) -> Result<Self> {
        let mut rels = Self::new(base_uri);
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr
                            .decode_and_unescape_value(reader.decoder())
                            .map_err(|e| OpcError::XmlError(e.to_string()))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value),
                            b"Type" => reltype = Some(value),
                            b"Target" => target_ref = Some(value),
                            b"TargetMode" => is_external = value == target_mode::EXTERNAL,
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                        rels.rels.push(Relationship::new(
                            id,
                            rt,
                            tr,
                            base_uri.to_string(),
                            is_external,
                        ));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(rels)
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// First relationship of the given type.
    pub fn by_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.reltype == reltype)
    }

    /// Return the rId of an internal relationship to `target_ref`, adding
    /// one with the next free rId if none exists.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self
            .rels
            .iter()
            .find(|rel| rel.reltype == reltype && rel.target_ref == target_ref && !rel.is_external)
        {
            return rel.r_id.clone();
        }

        let r_id = self.next_r_id();
        self.rels.push(Relationship::new(
            r_id.clone(),
            reltype.to_string(),
            target_ref.to_string(),
            self.base_uri.clone(),
            false,
        ));
        r_id
    }

    /// Lowest `rIdN` not yet in use.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| {
                rel.r_id
                    .strip_prefix("rId")
                    .and_then(|n| atoi_simd::parse::<u32, false, false>(n.as_bytes()).ok())
            })
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for n in used {
            match n.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }
        format!("rId{}", next)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        let pos = self.rels.iter().position(|rel| rel.r_id == r_id)?;
        Some(self.rels.remove(pos))
    }

    /// Serialize as the content of a `.rels` part, entries in insertion order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str("\r\n<Relationships xmlns=\"");
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str("\">");

        for rel in &self.rels {
            xml.push_str("<Relationship Id=\"");
            xml.push_str(&escape_xml(&rel.r_id));
            xml.push_str("\" Type=\"");
            xml.push_str(&escape_xml(&rel.reltype));
            xml.push_str("\" Target=\"");
            xml.push_str(&escape_xml(&rel.target_ref));
            xml.push('"');
            if rel.is_external {
                xml.push_str(" TargetMode=\"External\"");
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://x/styles" Target="styles.xml"/>
  <Relationship Id="rId1" Type="http://x/link" Target="http://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse() {
        let rels = Relationships::from_xml(RELS.as_bytes(), "/word").unwrap();
        assert_eq!(rels.len(), 2);
        let styles = rels.by_type("http://x/styles").unwrap();
        assert_eq!(styles.r_id(), "rId3");
        assert_eq!(styles.target_partname().unwrap().as_str(), "/word/styles.xml");
        let link = rels.get("rId1").unwrap();
        assert!(link.is_external());
        assert_eq!(link.target_ref(), "http://example.com/?a=1&b=2");
        assert!(link.target_partname().is_err());
    }

    #[test]
    fn test_get_or_add_fills_gaps() {
        let mut rels = Relationships::from_xml(RELS.as_bytes(), "/word").unwrap();
        assert_eq!(rels.get_or_add("http://x/styles", "styles.xml"), "rId3");
        assert_eq!(rels.get_or_add("http://x/theme", "theme/theme1.xml"), "rId2");
        assert_eq!(rels.get_or_add("http://x/settings", "settings.xml"), "rId4");
    }

    #[test]
    fn test_to_xml_round_trip() {
        let rels = Relationships::from_xml(RELS.as_bytes(), "/word").unwrap();
        let xml = rels.to_xml();
        assert!(xml.contains(r#"TargetMode="External""#));
        assert!(xml.contains("a=1&amp;b=2"));
        let again = Relationships::from_xml(xml.as_bytes(), "/word").unwrap();
        assert_eq!(again, rels);
    }
}
