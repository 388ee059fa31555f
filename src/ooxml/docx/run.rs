/// Run types for DOCX documents.
use crate::common::xml::XmlElement;
use crate::ooxml::docx::formatting::RunFormatting;
use smallvec::SmallVec;

/// One item of run content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// `w:t`
    Text(String),
    /// `w:tab`
    Tab,
    /// `w:br` without a break type: a line break
    Break,
    /// Anything else (fields, drawings, typed breaks, ...), kept as-is
    Opaque(XmlElement),
}

/// A run: a span of content that shares one formatting context.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::Run;
///
/// let mut run = Run::new("Name:\tValue");
/// assert_eq!(run.content().len(), 3);
/// run.properties_mut().set_bold(Some(true));
/// assert_eq!(run.text(), "Name:\tValue");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    content: SmallVec<[RunContent; 2]>,
    /// Character style name
    style: Option<String>,
    properties: RunFormatting,
    /// Attributes of `w:r` (revision ids and the like)
    attributes: Vec<(String, String)>,
}

impl Run {
    pub fn new(text: &str) -> Self {
        let mut run = Self::default();
        run.set_text(text);
        run
    }

    /// Text of the run. Tabs read as `\t` and line breaks as `\n`; opaque
    /// content contributes nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(t) => out.push_str(t),
                RunContent::Tab => out.push('\t'),
                RunContent::Break => out.push('\n'),
                RunContent::Opaque(_) => {},
            }
        }
        out
    }

    /// Replace all content with `text`. `\t` becomes a tab and `\n` a line
    /// break; a `\r` directly before `\n` is dropped.
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        let mut buf = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\t' | '\n' => {
                    if !buf.is_empty() {
                        self.content.push(RunContent::Text(std::mem::take(&mut buf)));
                    }
                    self.content.push(if c == '\t' {
                        RunContent::Tab
                    } else {
                        RunContent::Break
                    });
                },
                '\r' if chars.peek() == Some(&'\n') => {},
                _ => buf.push(c),
            }
        }
        if !buf.is_empty() {
            self.content.push(RunContent::Text(buf));
        }
    }

    #[inline]
    pub fn content(&self) -> &[RunContent] {
        &self.content
    }

    pub fn push_content(&mut self, item: RunContent) {
        self.content.push(item);
    }

    /// Name of the character style applied to this run.
    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn set_style(&mut self, name: Option<&str>) -> &mut Self {
        self.style = name.map(str::to_string);
        self
    }

    /// Direct formatting of this run.
    #[inline]
    pub fn properties(&self) -> &RunFormatting {
        &self.properties
    }

    #[inline]
    pub fn properties_mut(&mut self) -> &mut RunFormatting {
        &mut self.properties
    }

    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.attributes
    }
}
