/// Word (.docx) document support.
///
/// An in-memory model of a WordprocessingML document that can be created,
/// edited and written back out without losing the parts of the file it does
/// not model.
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Document`: the ownership root (body, style catalog and package)
/// - `Paragraph`: an ordered list of runs with paragraph formatting
/// - `Run`: text with run formatting
/// - `Styles`: the style catalog and document defaults
/// - `ParagraphFormatting` / `RunFormatting`: sparse formatting sets where
///   every property is either set or inherited
///
/// Effective formatting is computed on demand with
/// [`Document::resolve_paragraph`] and [`Document::resolve_run`], walking
/// direct formatting, then styles and their `basedOn` chains, then document
/// defaults.
///
/// Elements and attributes the model does not understand are kept next to
/// the value they belong to and written back in schema order.
///
/// # Example
///
/// ```rust,no_run
/// use longan::ooxml::docx::{Document, LoadOptions};
///
/// let doc = Document::open_with("report.docx", &LoadOptions::new().with_lenient_values(true))?;
///
/// for para in doc.paragraphs() {
///     let fmt = doc.resolve_paragraph(para).value;
///     println!("{:?}: {}", fmt.alignment, para.text());
///     for run in para.runs() {
///         let eff = doc.resolve_run(para, run).value;
///         println!("  {} ({} {})", run.text(), eff.font.family, eff.font.size);
///     }
/// }
/// # Ok::<(), longan::ooxml::error::OoxmlError>(())
/// ```
pub mod cascade;
pub mod document;
pub mod enums;
pub mod format;
pub mod formatting;
pub mod options;
pub mod paragraph;
pub mod run;
pub mod styles;
pub(crate) mod template;
pub(crate) mod xml;

#[cfg(test)]
mod tests;

pub use cascade::{
    Diagnostic, EffectiveFont, EffectiveParagraphFormatting, EffectiveRunFormatting, Resolution,
};
pub use document::{Block, Document, DocumentState};
pub use enums::{
    Alignment, BorderSide, BorderStyle, ShadePattern, StyleType, UnderlineStyle, VerticalAlign,
};
pub use format::{Border, FirstLineIndent, Font, LineSpacing};
pub use formatting::{Foreign, ParagraphFormatting, RunFormatting};
pub use options::{Compression, LoadOptions, SaveOptions};
pub use paragraph::{Paragraph, ParagraphChild, RunMut};
pub use run::{Run, RunContent};
pub use styles::{DocDefaults, Style, Styles};
