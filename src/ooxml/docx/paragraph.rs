/// Paragraphs and the runs inside them.
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::formatting::ParagraphFormatting;
use crate::ooxml::docx::run::Run;
use std::ops::{Deref, DerefMut};

/// A direct child of `w:p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphChild {
    Run(Run),
    /// Hyperlinks, bookmarks, fields, tracked changes, ... kept as-is
    Opaque(XmlElement),
}

/// A paragraph: an ordered list of runs plus paragraph formatting.
///
/// Order is insertion order and is the order written to XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    children: Vec<ParagraphChild>,
    /// Paragraph style name
    style: Option<String>,
    formatting: ParagraphFormatting,
    /// Attributes of `w:p` (`w14:paraId`, `w:rsidR`, ...)
    attributes: Vec<(String, String)>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph holding one run with `text`.
    pub fn with_text(text: &str) -> Self {
        let mut paragraph = Self::new();
        paragraph.add_run(Run::new(text));
        paragraph
    }

    /// Append a new run with `text` and return a handle to it.
    ///
    /// Always creates a new run, even when the previous run has the same
    /// formatting, so run boundaries stay where the caller put them.
    ///
    /// ```rust
    /// use longan::ooxml::docx::Paragraph;
    ///
    /// let mut p = Paragraph::with_text("A");
    /// p.append("B").append("C");
    /// let texts: Vec<String> = p.runs().map(|r| r.text()).collect();
    /// assert_eq!(texts, ["A", "B", "C"]);
    /// ```
    pub fn append(&mut self, text: &str) -> RunMut<'_> {
        self.children.push(ParagraphChild::Run(Run::new(text)));
        let index = self.children.len() - 1;
        RunMut {
            paragraph: self,
            index,
        }
    }

    pub fn add_run(&mut self, run: Run) -> &mut Run {
        self.children.push(ParagraphChild::Run(run));
        match self.children.last_mut() {
            Some(ParagraphChild::Run(run)) => run,
            _ => unreachable!(),
        }
    }

    /// Remove the `index`th run. Opaque children are not counted.
    pub fn remove_run(&mut self, index: usize) -> Option<Run> {
        let pos = self.child_index_of_run(index)?;
        match self.children.remove(pos) {
            ParagraphChild::Run(run) => Some(run),
            ParagraphChild::Opaque(_) => unreachable!(),
        }
    }

    fn child_index_of_run(&self, index: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, ParagraphChild::Run(_)))
            .nth(index)
            .map(|(i, _)| i)
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|c| match c {
            ParagraphChild::Run(run) => Some(run),
            ParagraphChild::Opaque(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.children.iter_mut().filter_map(|c| match c {
            ParagraphChild::Run(run) => Some(run),
            ParagraphChild::Opaque(_) => None,
        })
    }

    pub fn run(&self, index: usize) -> Option<&Run> {
        self.runs().nth(index)
    }

    pub fn run_mut(&mut self, index: usize) -> Option<&mut Run> {
        self.runs_mut().nth(index)
    }

    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// Runs and opaque children in document order.
    #[inline]
    pub fn children(&self) -> &[ParagraphChild] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: ParagraphChild) {
        self.children.push(child);
    }

    /// Name of the paragraph style.
    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Apply the paragraph style `name`, or inherit the default paragraph
    /// style with `None`.
    pub fn set_style(&mut self, name: Option<&str>) -> &mut Self {
        self.style = name.map(str::to_string);
        self
    }

    /// Direct paragraph formatting.
    #[inline]
    pub fn formatting(&self) -> &ParagraphFormatting {
        &self.formatting
    }

    #[inline]
    pub fn formatting_mut(&mut self) -> &mut ParagraphFormatting {
        &mut self.formatting
    }

    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.attributes
    }

    /// Paragraph text: run text plus the `w:t` text inside opaque children
    /// such as hyperlinks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                ParagraphChild::Run(run) => out.push_str(&run.text()),
                ParagraphChild::Opaque(el) => collect_run_text(el, &mut out),
            }
        }
        out
    }
}

fn collect_run_text(el: &XmlElement, out: &mut String) {
    match el.name.as_str() {
        "w:t" => {
            for node in &el.children {
                if let XmlNode::Text(t) = node {
                    out.push_str(t);
                }
            }
        },
        "w:tab" => out.push('\t'),
        "w:br" if el.attributes.is_empty() => out.push('\n'),
        // deleted text and field codes are not visible text
        "w:del" | "w:instrText" | "w:delText" => {},
        _ => {
            for child in el.elements() {
                collect_run_text(child, out);
            }
        },
    }
}

/// Handle to a run just appended by [`Paragraph::append`].
///
/// Dereferences to the [`Run`] and allows appending further runs to the same
/// paragraph.
pub struct RunMut<'a> {
    paragraph: &'a mut Paragraph,
    index: usize,
}

impl<'a> RunMut<'a> {
    /// Append another run after this one and return its handle.
    pub fn append(self, text: &str) -> RunMut<'a> {
        let paragraph = self.paragraph;
        paragraph.append(text)
    }

    /// The paragraph the run belongs to.
    pub fn paragraph(self) -> &'a mut Paragraph {
        self.paragraph
    }
}

impl Deref for RunMut<'_> {
    type Target = Run;

    fn deref(&self) -> &Run {
        match &self.paragraph.children[self.index] {
            ParagraphChild::Run(run) => run,
            ParagraphChild::Opaque(_) => unreachable!(),
        }
    }
}

impl DerefMut for RunMut<'_> {
    fn deref_mut(&mut self) -> &mut Run {
        match &mut self.paragraph.children[self.index] {
            ParagraphChild::Run(run) => run,
            ParagraphChild::Opaque(_) => unreachable!(),
        }
    }
}
