//! Office Open XML (OOXML) format implementation.
//!
//! This module covers WordprocessingML documents (.docx) on top of the Open
//! Packaging Conventions.
//!
//! # Architecture
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP members, content types,
//!    relationships). Parts are kept as bytes, so anything not modeled above
//!    this layer is written back unchanged.
//! 2. **Word Layer** (`docx`): the document model, style catalog, cascade
//!    and the XML mapping for `document.xml` and `styles.xml`.
//!
//! # Example: Working with Word Documents
//!
//! ```rust,no_run
//! use longan::ooxml::docx::Document;
//!
//! let mut doc = Document::open("document.docx")?;
//! println!("Document contains {} paragraphs", doc.paragraph_count());
//! println!("{}", doc.text());
//!
//! doc.add_paragraph("Reviewed.");
//! doc.save_as("document-reviewed.docx")?;
//! # Ok::<(), longan::ooxml::error::OoxmlError>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

// Re-export commonly used types from OPC layer
pub use opc::{Package, PackURI};

pub use error::{OoxmlError, Result};
