/// Open Packaging Conventions (OPC) support.
///
/// Just enough of the packaging layer to load and save WordprocessingML
/// documents:
///
/// - Package structure (ordered parts kept as raw bytes)
/// - Content type management
/// - Relationship parsing and generation
/// - ZIP-based physical packaging through the `zip` crate
pub mod constants;
pub mod content_types;
pub mod error;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

pub use content_types::ContentTypes;
pub use package::Package;
pub use packuri::PackURI;
pub use phys_pkg::Compression;
pub use rel::{Relationship, Relationships};
