/// Document - the ownership root of a Word document.
use crate::common::xml::XmlElement;
use crate::ooxml::docx::cascade::{EffectiveParagraphFormatting, EffectiveRunFormatting, Resolution};
use crate::ooxml::docx::enums::StyleType;
use crate::ooxml::docx::options::{LoadOptions, SaveOptions};
use crate::ooxml::docx::paragraph::{Paragraph, ParagraphChild};
use crate::ooxml::docx::run::{Run, RunContent};
use crate::ooxml::docx::styles::{Style, Styles};
use crate::ooxml::docx::template;
use crate::ooxml::docx::xml::{ReadContext, parse_wml};
use crate::ooxml::docx::xml::document_part::{DocumentPart, read_document, write_document};
use crate::ooxml::docx::xml::styles_part::{read_styles, write_styles};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{Package, PackURI};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

/// A block-level child of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    /// Tables, content controls and other body content, kept as-is
    Opaque(XmlElement),
}

/// Where a document is in its edit/save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    /// Made by `new` or `create` and never saved
    Created,
    /// Read from a package and not changed since
    Loaded,
    /// Changed since it was created, loaded or last saved
    Modified,
    /// Written and not changed since
    Saved,
}

/// A Word document.
///
/// Owns the body (paragraphs and preserved blocks), the style catalog and
/// the package every other part lives in. Parts the document does not
/// model are written back exactly as they were read.
///
/// # Examples
///
/// ```rust
/// use longan::common::Color;
/// use longan::ooxml::docx::enums::{BorderStyle, ShadePattern};
/// use longan::ooxml::docx::{Document, StyleType};
///
/// let mut doc = Document::new();
/// let style = doc.styles_mut().add_style("Boxed", StyleType::Paragraph)?;
/// style
///     .paragraph_formatting_mut()
///     .set_borders(BorderStyle::Single, Some(Color::BLACK), 0.5)?;
///
/// let p = doc.add_paragraph("First ");
/// p.set_style(Some("Boxed"));
/// p.append("second")
///     .properties_mut()
///     .set_shade_pattern(Some(ShadePattern::Pct10));
///
/// let bytes = doc.to_bytes()?;
/// let reloaded = Document::from_bytes(&bytes)?;
/// assert_eq!(reloaded.paragraph(0).unwrap().text(), "First second");
/// # Ok::<(), longan::ooxml::error::OoxmlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    part: DocumentPart,
    styles: Styles,
    package: Package,
    main_part: PackURI,
    path: Option<PathBuf>,
    state: DocumentState,
    save_options: SaveOptions,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A new empty document that is not bound to a path.
    pub fn new() -> Self {
        let part = DocumentPart {
            root_attributes: template::document_namespaces(),
            section: Some(template::default_section()),
            ..Default::default()
        };
        Self {
            part,
            styles: template::default_styles(),
            package: template::default_package(),
            main_part: PackURI::from_membername(template::DOCUMENT_PART),
            path: None,
            state: DocumentState::Created,
            save_options: SaveOptions::default(),
        }
    }

    /// A new empty document bound to `path`. Nothing is written until
    /// [`save`](Self::save).
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        let mut doc = Self::new();
        doc.path = Some(path.as_ref().to_path_buf());
        doc
    }

    /// Open a `.docx` file and bind the document to its path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use longan::ooxml::docx::Document;
    ///
    /// let mut doc = Document::open("report.docx")?;
    /// doc.add_paragraph("Appendix");
    /// doc.save()?;
    /// # Ok::<(), longan::ooxml::error::OoxmlError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let package = Package::open(path)?;
        let mut doc = Self::from_package(package, options)?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(bytes)?, &LoadOptions::default())
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?, &LoadOptions::default())
    }

    /// Build the model from an already opened package.
    ///
    /// The main part is found through the package's `officeDocument`
    /// relationship and the styles part through the main part's
    /// relationships. A package without a styles part loads with an empty
    /// catalog.
    pub fn from_package(package: Package, options: &LoadOptions) -> Result<Self> {
        let ctx = ReadContext {
            lenient: options.lenient_values,
        };
        let main_part = package.main_document_part()?;

        let styles = match package.related_part(&main_part, rt::STYLES)? {
            Some(uri) => read_styles(part_text(&package, &uri)?, &ctx)?,
            None => {
                log::debug!("{} has no styles part", main_part);
                Styles::new()
            },
        };
        let part = read_document(part_text(&package, &main_part)?, &styles, &ctx)?;

        log::debug!(
            "loaded {}: {} blocks, {} styles, {} package parts",
            main_part,
            part.blocks.len(),
            styles.len(),
            package.len()
        );

        Ok(Self {
            part,
            styles,
            package,
            main_part,
            path: None,
            state: DocumentState::Loaded,
            save_options: SaveOptions::default(),
        })
    }

    /// The package with the document and styles parts regenerated from the
    /// model. Every other part is carried over unchanged. A styles part,
    /// with its relationship and content type, is added when the package
    /// has none.
    pub fn to_package(&self) -> Result<Package> {
        let mut package = self.package.clone();

        let styles_uri = match package.related_part(&self.main_part, rt::STYLES)? {
            Some(uri) => uri,
            None => {
                let uri = unused_partname(&package, "/word/styles", ".xml")?;
                let mut rels = package.relationships(&self.main_part)?;
                rels.get_or_add(rt::STYLES, &uri.relative_ref(self.main_part.base_uri()));
                package.set_relationships(&self.main_part, &rels);
                package
                    .content_types_mut()
                    .set_override(uri.as_str(), ct::WML_STYLES);
                log::debug!("adding styles part {}", uri);
                uri
            },
        };

        package.set_part(
            self.main_part.clone(),
            write_document(&self.part, &self.styles).into_bytes(),
        );
        package.set_part(styles_uri, write_styles(&self.styles).into_bytes());
        Ok(package)
    }

    /// Write to the bound path.
    ///
    /// Fails with `NoTargetPath` when the document was not created, opened
    /// or saved with a path.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(OoxmlError::NoTargetPath)?;
        self.write_file(&path)
    }

    /// Write to `path` and bind the document to it.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.write_file(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_file(&mut self, path: &Path) -> Result<()> {
        let package = self.to_package()?;
        package.write(path, self.save_options.compression)?;
        log::debug!("saved {}", path.display());
        self.package = package;
        self.state = DocumentState::Saved;
        Ok(())
    }

    /// Serialize to bytes. The document stays bound and its state does not
    /// change.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_package()?.to_bytes(self.save_options.compression)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        Ok(self
            .to_package()?
            .write_to(writer, self.save_options.compression)?)
    }

    #[inline]
    pub fn state(&self) -> DocumentState {
        self.state
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn save_options(&self) -> SaveOptions {
        self.save_options
    }

    pub fn set_save_options(&mut self, options: SaveOptions) {
        self.save_options = options;
    }

    /// The underlying package as of the last load or save.
    #[inline]
    pub fn package(&self) -> &Package {
        &self.package
    }

    fn touch(&mut self) {
        self.state = DocumentState::Modified;
    }

    // ---- body ----

    /// Append a paragraph holding one run with `text`.
    pub fn add_paragraph(&mut self, text: &str) -> &mut Paragraph {
        self.touch();
        self.part.blocks.push(Block::Paragraph(Paragraph::with_text(text)));
        match self.part.blocks.last_mut() {
            Some(Block::Paragraph(p)) => p,
            _ => unreachable!(),
        }
    }

    /// Insert a paragraph before the `index`th paragraph. `index` equal to
    /// the paragraph count appends.
    pub fn insert_paragraph(&mut self, index: usize, text: &str) -> Result<&mut Paragraph> {
        let len = self.paragraph_count();
        if index > len {
            return Err(OoxmlError::IndexOutOfRange { index, len });
        }
        self.touch();
        let pos = self
            .block_index_of_paragraph(index)
            .unwrap_or(self.part.blocks.len());
        self.part
            .blocks
            .insert(pos, Block::Paragraph(Paragraph::with_text(text)));
        match &mut self.part.blocks[pos] {
            Block::Paragraph(p) => Ok(p),
            Block::Opaque(_) => unreachable!(),
        }
    }

    /// Detach the `index`th paragraph.
    pub fn remove_paragraph(&mut self, index: usize) -> Option<Paragraph> {
        let pos = self.block_index_of_paragraph(index)?;
        self.touch();
        match self.part.blocks.remove(pos) {
            Block::Paragraph(p) => Some(p),
            Block::Opaque(_) => unreachable!(),
        }
    }

    fn block_index_of_paragraph(&self, index: usize) -> Option<usize> {
        self.part
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(index)
            .map(|(i, _)| i)
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().nth(index)
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        let pos = self.block_index_of_paragraph(index)?;
        self.touch();
        match &mut self.part.blocks[pos] {
            Block::Paragraph(p) => Some(p),
            Block::Opaque(_) => unreachable!(),
        }
    }

    /// Body paragraphs in document order. Paragraphs nested inside
    /// preserved blocks such as tables are not included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.part.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Opaque(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.touch();
        self.part.blocks.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Opaque(_) => None,
        })
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Every body block, paragraphs and preserved content alike.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.part.blocks
    }

    /// The final section properties (`w:sectPr`), kept as-is.
    #[inline]
    pub fn section(&self) -> Option<&XmlElement> {
        self.part.section.as_ref()
    }

    /// Text of the body paragraphs, one line per paragraph.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ---- styles ----

    #[inline]
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        self.touch();
        &mut self.styles
    }

    /// Remove a style from the catalog.
    ///
    /// Refuses with `StyleInUse` while a paragraph, run, other style,
    /// preserved fragment or related part (header, footer, notes, comments,
    /// numbering) still refers to it.
    pub fn remove_style(&mut self, name: &str, style_type: StyleType) -> Result<Style> {
        let Some(style) = self.styles.get(name, style_type) else {
            return Err(OoxmlError::UnknownStyleReference {
                name: name.to_string(),
                style_type,
            });
        };
        if let Some(referenced_by) = self.find_reference(style)? {
            return Err(OoxmlError::StyleInUse {
                name: name.to_string(),
                style_type,
                referenced_by,
            });
        }

        self.touch();
        log::debug!("removing {} style {:?}", style_type, name);
        self.styles
            .take(name, style_type)
            .ok_or_else(|| OoxmlError::UnknownStyleReference {
                name: name.to_string(),
                style_type,
            })
    }

    /// Describe the first thing that refers to `style`, if anything does.
    ///
    /// Besides the body and the catalog this reads every header, footer,
    /// notes, comments and numbering part related to the main part.
    fn find_reference(&self, style: &Style) -> Result<Option<String>> {
        let name = style.name();
        let style_type = style.style_type();

        if let Some(other) = self.styles.referrer_of(name, style_type) {
            return Ok(Some(format!("style {other:?}")));
        }

        for (i, paragraph) in self.paragraphs().enumerate() {
            if style_type == StyleType::Paragraph && paragraph.style() == Some(name) {
                return Ok(Some(format!("paragraph {i}")));
            }
            if style_type == StyleType::Character {
                if let Some(j) = paragraph.runs().position(|r| r.style() == Some(name)) {
                    return Ok(Some(format!("run {j} of paragraph {i}")));
                }
            }
        }

        let tags: &[&str] = match style_type {
            StyleType::Paragraph => &["w:pStyle"],
            StyleType::Character => &["w:rStyle"],
            StyleType::Table => &["w:tblStyle"],
            StyleType::Numbering => &["w:numStyleLink", "w:styleLink"],
        };
        let id = style.id();
        let mut refers = |e: &XmlElement| {
            tags.contains(&e.name.as_str()) && e.attr("w:val") == Some(id)
        };
        if let Some(fragment) = self
            .fragments(style)
            .into_iter()
            .find(|fragment| fragment.any(&mut refers))
        {
            return Ok(Some(format!("preserved <{}>", fragment.name)));
        }

        for uri in self.styled_parts()? {
            let root = parse_wml(part_text(&self.package, &uri)?)?;
            if root.any(&mut refers) {
                return Ok(Some(format!("part {uri}")));
            }
        }
        Ok(None)
    }

    /// Internal targets of the main part's relationships that carry
    /// WordprocessingML content of their own and exist in the package.
    fn styled_parts(&self) -> Result<Vec<PackURI>> {
        let mut out = Vec::new();
        for rel in self.package.relationships(&self.main_part)?.iter() {
            if rel.is_external() || !STYLED_PARTS.contains(&rel.reltype()) {
                continue;
            }
            let uri = rel.target_partname()?;
            if self.package.contains(&uri) && !out.contains(&uri) {
                out.push(uri);
            }
        }
        Ok(out)
    }

    /// Every preserved XML fragment in the body and the catalog, except
    /// those owned by `skip`.
    fn fragments<'a>(&'a self, skip: &Style) -> Vec<&'a XmlElement> {
        let mut out: Vec<&XmlElement> = Vec::new();
        out.extend(&self.part.before_body);
        out.extend(&self.part.after_body);
        out.extend(self.part.section.as_ref());

        for block in &self.part.blocks {
            match block {
                Block::Opaque(e) => out.push(e),
                Block::Paragraph(p) => {
                    out.extend(p.formatting().foreign().all_elements());
                    for child in p.children() {
                        match child {
                            ParagraphChild::Opaque(e) => out.push(e),
                            ParagraphChild::Run(run) => run_fragments(run, &mut out),
                        }
                    }
                },
            }
        }

        let defaults = self.styles.defaults();
        out.extend(defaults.foreign());
        out.extend(defaults.run_wrapper());
        out.extend(defaults.paragraph_wrapper());
        out.extend(defaults.paragraph_formatting().foreign().all_elements());
        out.extend(defaults.run_formatting().foreign().all_elements());
        out.extend(self.styles.extras());
        for style in self.styles.iter() {
            if style.name() == skip.name() && style.style_type() == skip.style_type() {
                continue;
            }
            out.extend(style.foreign_elements());
            out.extend(style.paragraph_formatting().foreign().all_elements());
            out.extend(style.run_formatting().foreign().all_elements());
        }
        out
    }

    /// Effective formatting of a paragraph of this document.
    pub fn resolve_paragraph(&self, paragraph: &Paragraph) -> Resolution<EffectiveParagraphFormatting> {
        self.styles.resolve_paragraph(paragraph)
    }

    /// Effective formatting of a run inside `paragraph`.
    pub fn resolve_run(&self, paragraph: &Paragraph, run: &Run) -> Resolution<EffectiveRunFormatting> {
        self.styles.resolve_run(paragraph, run)
    }
}

/// Relationship types from the main part whose targets can name styles.
const STYLED_PARTS: &[&str] = &[
    rt::HEADER,
    rt::FOOTER,
    rt::FOOTNOTES,
    rt::ENDNOTES,
    rt::COMMENTS,
    rt::NUMBERING,
];

fn run_fragments<'a>(run: &'a Run, out: &mut Vec<&'a XmlElement>) {
    out.extend(run.properties().foreign().all_elements());
    for item in run.content() {
        if let RunContent::Opaque(e) = item {
            out.push(e);
        }
    }
}

fn part_text<'a>(package: &'a Package, uri: &PackURI) -> Result<&'a str> {
    let bytes = package.require_part(uri)?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|e| OoxmlError::Xml(format!("{uri}: {e}")))
}

/// First of `stem.ext`, `stem1.ext`, `stem2.ext`, ... not in the package.
fn unused_partname(package: &Package, stem: &str, ext: &str) -> Result<PackURI> {
    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            format!("{stem}{ext}")
        } else {
            format!("{stem}{n}{ext}")
        };
        let uri = PackURI::new(name)?;
        if !package.contains(&uri) {
            return Ok(uri);
        }
        n += 1;
    }
}
