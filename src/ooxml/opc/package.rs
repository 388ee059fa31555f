/// The in-memory OPC package.
///
/// A package is an ordered list of named parts plus the content types item.
/// Parts are kept as raw bytes; nothing is reparsed unless asked for, so a
/// part nobody touches is written back exactly as it was read.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::content_types::ContentTypes;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::phys_pkg::{Compression, PhysPkgReader, PhysPkgWriter};
use crate::ooxml::opc::rel::Relationships;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Every part except the content types item, in archive order.
    parts: Vec<(PackURI, Vec<u8>)>,
    content_types: ContentTypes,
}

impl Package {
    /// Create an empty package with no parts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let members = PhysPkgReader::read_members(reader)?;
        let mut content_types = None;
        let mut parts = Vec::with_capacity(members.len());

        for (name, data) in members {
            let uri = PackURI::from_membername(&name);
            if uri.as_str() == CONTENT_TYPES_URI {
                content_types = Some(ContentTypes::from_xml(&data)?);
            } else {
                parts.push((uri, data));
            }
        }

        let content_types = content_types.ok_or_else(|| {
            OpcError::PackageCorrupt("missing [Content_Types].xml".to_string())
        })?;
        log::debug!("read package with {} parts", parts.len());

        Ok(Self {
            parts,
            content_types,
        })
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, compression: Compression) -> Result<()> {
        let bytes = self.to_bytes(compression)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut writer: W, compression: Compression) -> Result<()> {
        let bytes = self.to_bytes(compression)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize to zip bytes: the content types item first, then every
    /// part in order.
    pub fn to_bytes(&self, compression: Compression) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new(compression);
        writer.write(
            &PackURI::new(CONTENT_TYPES_URI)?,
            self.content_types.to_xml().as_bytes(),
        )?;
        for (uri, blob) in &self.parts {
            writer.write(uri, blob)?;
        }
        writer.finish()
    }

    pub fn part(&self, uri: &PackURI) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(u, _)| u == uri)
            .map(|(_, blob)| blob.as_slice())
    }

    /// Part content, failing with `PartNotFound` when absent.
    pub fn require_part(&self, uri: &PackURI) -> Result<&[u8]> {
        self.part(uri)
            .ok_or_else(|| OpcError::PartNotFound(uri.to_string()))
    }

    /// Replace a part's content in place, or append a new part.
    pub fn set_part(&mut self, uri: PackURI, blob: Vec<u8>) {
        match self.parts.iter_mut().find(|(u, _)| *u == uri) {
            Some(slot) => slot.1 = blob,
            None => self.parts.push((uri, blob)),
        }
    }

    pub fn remove_part(&mut self, uri: &PackURI) -> Option<Vec<u8>> {
        let pos = self.parts.iter().position(|(u, _)| u == uri)?;
        self.content_types.remove_override(uri);
        Some(self.parts.remove(pos).1)
    }

    #[inline]
    pub fn contains(&self, uri: &PackURI) -> bool {
        self.part(uri).is_some()
    }

    pub fn part_names(&self) -> impl Iterator<Item = &PackURI> {
        self.parts.iter().map(|(u, _)| u)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn content_type(&self, uri: &PackURI) -> Option<&str> {
        self.content_types.get(uri)
    }

    #[inline]
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    #[inline]
    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    /// Relationships whose source is `source` (the package itself for `/`).
    /// Empty when the source has no `.rels` part.
    pub fn relationships(&self, source: &PackURI) -> Result<Relationships> {
        match self.part(&source.rels_uri()) {
            Some(xml) => Relationships::from_xml(xml, source.base_uri()),
            None => Ok(Relationships::new(source.base_uri())),
        }
    }

    /// Store `rels` as the `.rels` part of `source`.
    pub fn set_relationships(&mut self, source: &PackURI, rels: &Relationships) {
        self.set_part(source.rels_uri(), rels.to_xml().into_bytes());
    }

    /// Partname of the first internal target of `reltype` from `source`.
    pub fn related_part(&self, source: &PackURI, reltype: &str) -> Result<Option<PackURI>> {
        match self.relationships(source)?.by_type(reltype) {
            Some(rel) if !rel.is_external() => rel.target_partname().map(Some),
            _ => Ok(None),
        }
    }

    /// The main document part, located through the package-level
    /// `officeDocument` relationship.
    pub fn main_document_part(&self) -> Result<PackURI> {
        self.related_part(&PackURI::package(), relationship_type::OFFICE_DOCUMENT)?
            .ok_or_else(|| {
                OpcError::RelationshipNotFound("package has no officeDocument relationship".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;

    fn sample() -> Package {
        let mut pkg = Package::new();
        pkg.content_types_mut()
            .add_default("rels", ct::OPC_RELATIONSHIPS);
        pkg.content_types_mut().add_default("xml", ct::XML);
        pkg.content_types_mut()
            .set_override("/word/document.xml", ct::WML_DOCUMENT_MAIN);

        let mut rels = Relationships::new("/");
        rels.get_or_add(relationship_type::OFFICE_DOCUMENT, "word/document.xml");
        pkg.set_relationships(&PackURI::package(), &rels);
        pkg.set_part(
            PackURI::new("/word/document.xml").unwrap(),
            b"<w:document/>".to_vec(),
        );
        pkg.set_part(
            PackURI::new("/customXml/item1.xml").unwrap(),
            b"<x>\r\n  keep me </x>".to_vec(),
        );
        pkg
    }

    #[test]
    fn test_main_document_part() {
        let pkg = sample();
        assert_eq!(
            pkg.main_document_part().unwrap().as_str(),
            "/word/document.xml"
        );
        assert_eq!(
            pkg.content_type(&pkg.main_document_part().unwrap()),
            Some(ct::WML_DOCUMENT_MAIN)
        );
    }

    #[test]
    fn test_round_trip_keeps_bytes_and_order() {
        let pkg = sample();
        let bytes = pkg.to_bytes(Compression::Deflated).unwrap();
        let back = Package::from_bytes(&bytes).unwrap();
        assert_eq!(back, pkg);
        let names: Vec<&str> = back.part_names().map(|u| u.as_str()).collect();
        assert_eq!(
            names,
            vec!["/_rels/.rels", "/word/document.xml", "/customXml/item1.xml"]
        );
        assert_eq!(back.to_bytes(Compression::Deflated).unwrap(), bytes);
    }

    #[test]
    fn test_missing_content_types_is_corrupt() {
        let mut writer = PhysPkgWriter::new(Compression::Stored);
        writer
            .write(&PackURI::new("/word/document.xml").unwrap(), b"<a/>")
            .unwrap();
        let bytes = writer.finish().unwrap();
        assert!(matches!(
            Package::from_bytes(&bytes),
            Err(OpcError::PackageCorrupt(_))
        ));
    }

    #[test]
    fn test_missing_relationship() {
        let pkg = Package::new();
        assert!(matches!(
            pkg.main_document_part(),
            Err(OpcError::RelationshipNotFound(_))
        ));
        let doc = PackURI::new("/word/document.xml").unwrap();
        assert!(pkg.relationships(&doc).unwrap().is_empty());
        assert!(matches!(
            pkg.require_part(&doc),
            Err(OpcError::PartNotFound(_))
        ));
    }
}
