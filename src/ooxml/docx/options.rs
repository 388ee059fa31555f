/// Options controlling how documents are loaded and saved.
pub use crate::ooxml::opc::Compression;

/// Options for reading a document.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::LoadOptions;
///
/// let options = LoadOptions::new().with_lenient_values(true);
/// assert!(options.lenient_values);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep recognized elements whose values fall outside the modeled
    /// domain as foreign content instead of failing with
    /// `SerializationMapping`.
    pub lenient_values: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lenient_values(mut self, lenient: bool) -> Self {
        self.lenient_values = lenient;
        self
    }
}

/// Options for writing a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Compression used for every zip member.
    pub compression: Compression,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(!LoadOptions::default().lenient_values);
        assert_eq!(SaveOptions::default().compression, Compression::Deflated);
        assert_eq!(
            SaveOptions::new().with_compression(Compression::Stored).compression,
            Compression::Stored
        );
    }
}
