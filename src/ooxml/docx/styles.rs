/// Styles - the style catalog and document defaults.
use crate::common::xml::XmlElement;
use crate::ooxml::docx::enums::StyleType;
use crate::ooxml::docx::formatting::{ParagraphFormatting, RunFormatting};
use crate::ooxml::error::{OoxmlError, Result};

/// A named formatting template.
///
/// Styles are owned by [`Styles`]. Paragraphs, runs and other styles refer to
/// them by name, never by pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// `w:styleId`, unique across the catalog
    id: String,
    /// UI-visible name, unique within its type
    name: String,
    style_type: StyleType,
    is_default: bool,
    is_custom: bool,
    /// Name of the parent style
    based_on: Option<String>,
    /// Name of the style for the following paragraph
    next: Option<String>,
    /// `w:uiPriority`
    priority: Option<u32>,
    quick_format: bool,
    semi_hidden: bool,
    paragraph: ParagraphFormatting,
    run: RunFormatting,
    /// Unknown attributes on `w:style`
    foreign_attributes: Vec<(String, String)>,
    /// Unknown children of `w:style`
    foreign_elements: Vec<XmlElement>,
}

impl Style {
    pub(crate) fn new(id: String, name: String, style_type: StyleType) -> Self {
        Self {
            id,
            name,
            style_type,
            is_default: false,
            is_custom: false,
            based_on: None,
            next: None,
            priority: None,
            quick_format: false,
            semi_hidden: false,
            paragraph: ParagraphFormatting::default(),
            run: RunFormatting::default(),
            foreign_attributes: Vec::new(),
            foreign_elements: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn style_type(&self) -> StyleType {
        self.style_type
    }

    /// Whether this is the default style for its type.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub(crate) fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    pub fn set_custom(&mut self, value: bool) {
        self.is_custom = value;
    }

    /// Name of the style this one inherits from.
    #[inline]
    pub fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }

    /// Set the parent style by name. The name is not checked here; a
    /// dangling parent shows up as a diagnostic during resolution.
    pub fn set_based_on(&mut self, name: Option<&str>) -> &mut Self {
        self.based_on = name.map(str::to_string);
        self
    }

    #[inline]
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn set_next(&mut self, name: Option<&str>) -> &mut Self {
        self.next = name.map(str::to_string);
        self
    }

    #[inline]
    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Option<u32>) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Shown in the quick style gallery (`w:qFormat`).
    #[inline]
    pub fn quick_format(&self) -> bool {
        self.quick_format
    }

    pub fn set_quick_format(&mut self, value: bool) -> &mut Self {
        self.quick_format = value;
        self
    }

    #[inline]
    pub fn semi_hidden(&self) -> bool {
        self.semi_hidden
    }

    pub fn set_semi_hidden(&mut self, value: bool) -> &mut Self {
        self.semi_hidden = value;
        self
    }

    #[inline]
    pub fn paragraph_formatting(&self) -> &ParagraphFormatting {
        &self.paragraph
    }

    #[inline]
    pub fn paragraph_formatting_mut(&mut self) -> &mut ParagraphFormatting {
        &mut self.paragraph
    }

    #[inline]
    pub fn run_formatting(&self) -> &RunFormatting {
        &self.run
    }

    #[inline]
    pub fn run_formatting_mut(&mut self) -> &mut RunFormatting {
        &mut self.run
    }

    #[inline]
    pub fn foreign_attributes(&self) -> &[(String, String)] {
        &self.foreign_attributes
    }

    #[inline]
    pub fn foreign_elements(&self) -> &[XmlElement] {
        &self.foreign_elements
    }

    pub(crate) fn foreign_attributes_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.foreign_attributes
    }

    pub(crate) fn foreign_elements_mut(&mut self) -> &mut Vec<XmlElement> {
        &mut self.foreign_elements
    }
}

/// Document-wide default formatting (`w:docDefaults`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocDefaults {
    paragraph: ParagraphFormatting,
    run: RunFormatting,
    /// Unknown children of `w:docDefaults`
    foreign: Vec<XmlElement>,
    /// `w:rPrDefault` and `w:pPrDefault` as read, minus the modeled
    /// `w:rPr`/`w:pPr`: their attributes and unknown children
    run_wrapper: Option<XmlElement>,
    paragraph_wrapper: Option<XmlElement>,
}

impl DocDefaults {
    #[inline]
    pub fn paragraph_formatting(&self) -> &ParagraphFormatting {
        &self.paragraph
    }

    #[inline]
    pub fn paragraph_formatting_mut(&mut self) -> &mut ParagraphFormatting {
        &mut self.paragraph
    }

    #[inline]
    pub fn run_formatting(&self) -> &RunFormatting {
        &self.run
    }

    #[inline]
    pub fn run_formatting_mut(&mut self) -> &mut RunFormatting {
        &mut self.run
    }

    #[inline]
    pub fn foreign(&self) -> &[XmlElement] {
        &self.foreign
    }

    pub(crate) fn foreign_mut(&mut self) -> &mut Vec<XmlElement> {
        &mut self.foreign
    }

    #[inline]
    pub(crate) fn run_wrapper(&self) -> Option<&XmlElement> {
        self.run_wrapper.as_ref()
    }

    #[inline]
    pub(crate) fn paragraph_wrapper(&self) -> Option<&XmlElement> {
        self.paragraph_wrapper.as_ref()
    }

    pub(crate) fn set_run_wrapper(&mut self, wrapper: Option<XmlElement>) {
        self.run_wrapper = wrapper;
    }

    pub(crate) fn set_paragraph_wrapper(&mut self, wrapper: Option<XmlElement>) {
        self.paragraph_wrapper = wrapper;
    }

    pub fn is_empty(&self) -> bool {
        self.paragraph.is_empty()
            && self.run.is_empty()
            && self.foreign.is_empty()
            && self.run_wrapper.is_none()
            && self.paragraph_wrapper.is_none()
    }
}

/// The style catalog of a document (`word/styles.xml`).
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::{StyleType, Styles};
///
/// let mut styles = Styles::new();
/// styles.add_style("Code", StyleType::Paragraph).unwrap();
/// assert!(styles.add_style("Code", StyleType::Paragraph).is_err());
/// styles.add_style("Code", StyleType::Character).unwrap();
/// assert_eq!(styles.len(), 2);
/// assert_eq!(styles.get("Code", StyleType::Character).unwrap().id(), "CodeChar");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Styles {
    defaults: DocDefaults,
    styles: Vec<Style>,
    /// `w:latentStyles`, kept as-is
    latent: Option<XmlElement>,
    /// Attributes of the `w:styles` root (namespace declarations included)
    root_attributes: Vec<(String, String)>,
    /// Other unknown children of `w:styles`
    extras: Vec<XmlElement>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a style with empty formatting.
    ///
    /// Fails with `DuplicateStyleName` when a style with the same name and
    /// type already exists. Names only need to be unique per type.
    pub fn add_style(&mut self, name: &str, style_type: StyleType) -> Result<&mut Style> {
        if self.contains(name, style_type) {
            return Err(OoxmlError::DuplicateStyleName {
                name: name.to_string(),
                style_type,
            });
        }

        let id = self.unique_id(name, style_type);
        let mut style = Style::new(id, name.to_string(), style_type);
        style.set_custom(true);
        log::debug!("added {} style {:?} as {}", style_type, name, style.id());
        self.styles.push(style);
        match self.styles.last_mut() {
            Some(style) => Ok(style),
            None => unreachable!(),
        }
    }

    /// Derive a `w:styleId` from a name: alphanumerics only, a type suffix,
    /// then a counter if the id is taken.
    fn unique_id(&self, name: &str, style_type: StyleType) -> String {
        let mut base: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
        if base.is_empty() {
            base.push_str("Style");
        }
        base.push_str(style_type.id_suffix());

        if self.get_by_id(&base).is_none() {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}{n}");
            if self.get_by_id(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Add a style read from a part. Its id and name are taken as given.
    pub(crate) fn push_loaded(&mut self, style: Style) {
        self.styles.push(style);
    }

    pub fn get(&self, name: &str, style_type: StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.style_type == style_type && s.name == name)
    }

    pub fn get_mut(&mut self, name: &str, style_type: StyleType) -> Option<&mut Style> {
        self.styles
            .iter_mut()
            .find(|s| s.style_type == style_type && s.name == name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    #[inline]
    pub fn contains(&self, name: &str, style_type: StyleType) -> bool {
        self.get(name, style_type).is_some()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.styles.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Style> {
        self.styles.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The default style of a type, used when a paragraph or run names none.
    pub fn default_style(&self, style_type: StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.is_default && s.style_type == style_type)
    }

    /// Make `name` the default style of its type.
    pub fn set_default_style(&mut self, name: &str, style_type: StyleType) -> Result<()> {
        if !self.contains(name, style_type) {
            return Err(OoxmlError::UnknownStyleReference {
                name: name.to_string(),
                style_type,
            });
        }
        for style in self.styles.iter_mut().filter(|s| s.style_type == style_type) {
            style.set_default(style.name == name);
        }
        Ok(())
    }

    #[inline]
    pub fn defaults(&self) -> &DocDefaults {
        &self.defaults
    }

    #[inline]
    pub fn defaults_mut(&mut self) -> &mut DocDefaults {
        &mut self.defaults
    }

    /// Detach a style without reference checks. `Document::remove_style`
    /// performs those checks first.
    pub(crate) fn take(&mut self, name: &str, style_type: StyleType) -> Option<Style> {
        let pos = self
            .styles
            .iter()
            .position(|s| s.style_type == style_type && s.name == name)?;
        Some(self.styles.remove(pos))
    }

    /// Name of another style whose `basedOn` or `next` points at `name`.
    pub(crate) fn referrer_of(&self, name: &str, style_type: StyleType) -> Option<&str> {
        self.styles
            .iter()
            .filter(|s| !(s.name == name && s.style_type == style_type))
            .find(|s| {
                (s.style_type == style_type && s.based_on() == Some(name))
                    || (style_type == StyleType::Paragraph
                        && s.style_type == StyleType::Paragraph
                        && s.next() == Some(name))
            })
            .map(|s| s.name())
    }

    #[inline]
    pub fn latent_styles(&self) -> Option<&XmlElement> {
        self.latent.as_ref()
    }

    pub(crate) fn set_latent_styles(&mut self, latent: Option<XmlElement>) {
        self.latent = latent;
    }

    #[inline]
    pub fn root_attributes(&self) -> &[(String, String)] {
        &self.root_attributes
    }

    pub(crate) fn set_root_attributes(&mut self, attributes: Vec<(String, String)>) {
        self.root_attributes = attributes;
    }

    #[inline]
    pub fn extras(&self) -> &[XmlElement] {
        &self.extras
    }

    pub(crate) fn extras_mut(&mut self) -> &mut Vec<XmlElement> {
        &mut self.extras
    }
}
