//! Zip I/O underneath an OPC package.
//!
//! Reading decompresses every member up front and keeps archive order.
//! Writing produces a fresh archive with a fixed timestamp, so the same
//! members in the same order always give the same bytes.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Read, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// How members are stored in the written archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Upper bound on the buffer preallocated from a member's declared size.
/// Larger members still load; `read_to_end` grows the buffer as it goes.
pub(crate) const MAX_PART_HINT: usize = 16 * 1024 * 1024;

/// Reads all file members of a zip archive.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Return `(member name, content)` for every file member, in archive
    /// order. Directory entries are skipped.
    pub fn read_members<R: Read + Seek>(reader: R) -> Result<Vec<(String, Vec<u8>)>> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut members = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            if name.is_empty() {
                return Err(OpcError::PackageCorrupt(format!(
                    "member {} has an empty name",
                    i
                )));
            }
            let hint = usize::try_from(file.size()).unwrap_or(usize::MAX);
            let mut data = Vec::with_capacity(hint.min(MAX_PART_HINT));
            file.read_to_end(&mut data)?;
            members.push((name, data));
        }

        Ok(members)
    }
}

/// Writes members into an in-memory zip archive.
pub struct PhysPkgWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    pub fn new(compression: Compression) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(compression.method())
            .last_modified_time(zip::DateTime::default());
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
        }
    }

    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.zip.start_file(pack_uri.membername(), self.options)?;
        self.zip.write_all(blob)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut writer = PhysPkgWriter::new(Compression::Deflated);
        writer
            .write(&PackURI::new("/a.xml").unwrap(), b"<a/>")
            .unwrap();
        writer
            .write(&PackURI::new("/dir/b.bin").unwrap(), &[0u8, 1, 2])
            .unwrap();
        let bytes = writer.finish().unwrap();

        let members = PhysPkgReader::read_members(Cursor::new(bytes)).unwrap();
        assert_eq!(
            members,
            vec![
                ("a.xml".to_string(), b"<a/>".to_vec()),
                ("dir/b.bin".to_string(), vec![0u8, 1, 2]),
            ]
        );
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = |c| {
            let mut writer = PhysPkgWriter::new(c);
            writer
                .write(&PackURI::new("/a.xml").unwrap(), b"<a/>")
                .unwrap();
            writer.finish().unwrap()
        };
        assert_eq!(build(Compression::Stored), build(Compression::Stored));
        assert_eq!(build(Compression::Deflated), build(Compression::Deflated));
    }

    #[test]
    fn test_member_larger_than_size_hint() {
        let blob = vec![b'x'; MAX_PART_HINT + 3];
        let mut writer = PhysPkgWriter::new(Compression::Deflated);
        writer
            .write(&PackURI::new("/big.bin").unwrap(), &blob)
            .unwrap();
        let members = PhysPkgReader::read_members(Cursor::new(writer.finish().unwrap())).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].1.len(), MAX_PART_HINT + 3);
        assert!(members[0].1.iter().all(|b| *b == b'x'));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let result = PhysPkgReader::read_members(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(OpcError::PackageCorrupt(_))));
    }
}
