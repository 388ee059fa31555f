//! Longan - a Rust library for reading, editing and writing Word documents
//!
//! This library models WordprocessingML (.docx) files: paragraphs and runs,
//! sparse formatting, a style catalog with a formatting cascade, and the OPC
//! package around them. Content it does not model is preserved on save.
//!
//! # Features
//!
//! - **Value types**: lengths in their native units (twips, half-points,
//!   eighth-points) with checked conversion from points, inches and cm
//! - **Formatting sets**: every property is either set or inherited
//! - **Style catalog**: paragraph, character, table and numbering styles with
//!   `basedOn` inheritance and document defaults
//! - **Cascade**: effective formatting of any paragraph or run, with
//!   diagnostics for dangling references and `basedOn` cycles
//! - **Lossless round trips**: unknown elements, attributes and parts survive
//!
//! # Example - Creating a DOCX file
//!
//! ```no_run
//! use longan::common::Color;
//! use longan::ooxml::docx::{Document, ShadePattern, StyleType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::create("notes.docx");
//!
//! let quote = doc.styles_mut().add_style("Quote", StyleType::Paragraph)?;
//! quote.set_based_on(Some("Normal"));
//! quote.run_formatting_mut().set_italic(Some(true));
//!
//! doc.add_paragraph("Plain text.");
//! doc.add_paragraph("Quoted text.").set_style(Some("Quote"));
//! doc.add_paragraph("Shaded: ")
//!     .append("important")
//!     .properties_mut()
//!     .set_shade_pattern(Some(ShadePattern::Pct20));
//! if let Some(run) = doc.paragraph_mut(2).and_then(|p| p.run_mut(1)) {
//!     run.properties_mut().set_shade_color(Some(Color::BLACK));
//! }
//!
//! doc.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading a DOCX file
//!
//! ```no_run
//! use longan::ooxml::docx::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::open("document.docx")?;
//! println!("Document text: {}", doc.text());
//!
//! for para in doc.paragraphs() {
//!     let resolved = doc.resolve_paragraph(para);
//!     if !resolved.is_clean() {
//!         println!("diagnostics: {:?}", resolved.diagnostics);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Shared value types (colors, lengths) and a small XML tree
pub mod common;

/// OOXML (Office Open XML) packaging and the Word document model
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{Color, HalfPoints, SignedTwips, Twips, Uom};
pub use ooxml::docx::{Document, Paragraph, Run, Style, StyleType, Styles};
pub use ooxml::error::{OoxmlError, Result};
