/// Error types for document operations.
use crate::ooxml::docx::enums::StyleType;
use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for document operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error (corrupt container, missing part or relationship)
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// A length was negative, non-finite or out of range
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// A style with the same name and type already exists
    #[error("Duplicate style name: {name} ({style_type})")]
    DuplicateStyleName { name: String, style_type: StyleType },

    /// A style cannot be removed while something references it
    #[error("Style in use: {name} ({style_type}) is referenced by {referenced_by}")]
    StyleInUse {
        name: String,
        style_type: StyleType,
        referenced_by: String,
    },

    /// A paragraph or run names a style that is not in the catalog
    #[error("Unknown style reference: {name} ({style_type})")]
    UnknownStyleReference { name: String, style_type: StyleType },

    /// A recognized element or attribute holds a value outside the modeled domain
    #[error("Cannot map <{element} {attribute}=\"{value}\">")]
    SerializationMapping {
        element: String,
        attribute: String,
        value: String,
    },

    /// Index outside the bounds of a paragraph or run list
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// `save()` on a document that is not bound to a path
    #[error("Document has no target path; use save_as")]
    NoTargetPath,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for OoxmlError {
    fn from(err: std::fmt::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl OoxmlError {
    /// Shorthand for [`OoxmlError::SerializationMapping`].
    pub fn mapping(element: &str, attribute: &str, value: &str) -> Self {
        OoxmlError::SerializationMapping {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    /// True when the error comes from a broken container rather than from
    /// the document content.
    pub fn is_package_corrupt(&self) -> bool {
        matches!(
            self,
            OoxmlError::Opc(crate::ooxml::opc::error::OpcError::PackageCorrupt(_))
        )
    }
}
