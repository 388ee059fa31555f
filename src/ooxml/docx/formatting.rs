//! Paragraph and run formatting property sets.
//!
//! Every field is optional: `None` means "not set here, inherit", which is
//! different from an explicit value equal to the default. Getters hand out
//! copies and setters store their own copy, so one value assigned to
//! several slots never links them.
//!
//! Each set also carries the XML it does not model ([`Foreign`]) so a
//! loaded document keeps it on save.

use crate::common::color::Color;
use crate::common::unit::{HalfPoints, SignedTwips, Twips, Uom};
use crate::common::xml::XmlElement;
use crate::ooxml::docx::enums::{
    Alignment, BorderSide, BorderStyle, ShadePattern, UnderlineStyle, VerticalAlign,
};
use crate::ooxml::docx::format::{Border, FirstLineIndent, Font, LineSpacing};
use crate::ooxml::error::Result;

/// Element names of modeled properties, used to key foreign attributes.
pub(crate) mod el {
    pub const JC: &str = "w:jc";
    pub const KEEP_NEXT: &str = "w:keepNext";
    pub const KEEP_LINES: &str = "w:keepLines";
    pub const PAGE_BREAK_BEFORE: &str = "w:pageBreakBefore";
    pub const SPACING: &str = "w:spacing";
    pub const IND: &str = "w:ind";
    pub const PBDR: &str = "w:pBdr";
    pub const SHD: &str = "w:shd";
    pub const R_FONTS: &str = "w:rFonts";
    pub const SZ: &str = "w:sz";
    pub const B: &str = "w:b";
    pub const I: &str = "w:i";
    pub const STRIKE: &str = "w:strike";
    pub const CAPS: &str = "w:caps";
    pub const SMALL_CAPS: &str = "w:smallCaps";
    pub const U: &str = "w:u";
    pub const COLOR: &str = "w:color";
    pub const VERT_ALIGN: &str = "w:vertAlign";

    /// Key for a border side element inside `w:pBdr`, e.g. `w:pBdr/w:top`.
    pub fn border_side(side: super::BorderSide) -> &'static str {
        match side {
            super::BorderSide::Top => "w:pBdr/w:top",
            super::BorderSide::Left => "w:pBdr/w:left",
            super::BorderSide::Bottom => "w:pBdr/w:bottom",
            super::BorderSide::Right => "w:pBdr/w:right",
        }
    }
}

/// An attribute found on a modeled element that the model has no field for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignAttr {
    /// Key of the owning element, e.g. `w:spacing` or `w:pBdr/w:top`.
    pub element: String,
    pub name: String,
    pub value: String,
}

/// XML carried through a property set without being modeled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Foreign {
    attributes: Vec<ForeignAttr>,
    /// Unknown child elements of the property container, in document order.
    elements: Vec<XmlElement>,
    /// Unknown children of modeled sub-containers, as `(container, element)`.
    nested: Vec<(String, XmlElement)>,
}

impl Foreign {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.elements.is_empty() && self.nested.is_empty()
    }

    /// Unknown attributes of the element keyed `element`.
    pub fn attributes_of<'a>(
        &'a self,
        element: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.element == element)
            .map(|a| (a.name.as_str(), a.value.as_str()))
    }

    pub fn has_attributes(&self, element: &str) -> bool {
        self.attributes.iter().any(|a| a.element == element)
    }

    pub fn push_attribute(
        &mut self,
        element: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes.push(ForeignAttr {
            element: element.into(),
            name: name.into(),
            value: value.into(),
        });
    }

    /// Drop the unknown attributes of one element.
    pub fn clear_attributes(&mut self, element: &str) {
        self.attributes.retain(|a| a.element != element);
    }

    #[inline]
    pub fn elements(&self) -> &[XmlElement] {
        &self.elements
    }

    pub fn push_element(&mut self, element: XmlElement) {
        self.elements.push(element);
    }

    /// Unknown children of the sub-container `container` (e.g. `w:pBdr`).
    pub fn nested_in<'a>(&'a self, container: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.nested
            .iter()
            .filter(move |(c, _)| c == container)
            .map(|(_, e)| e)
    }

    pub fn push_nested(&mut self, container: impl Into<String>, element: XmlElement) {
        self.nested.push((container.into(), element));
    }

    /// Every preserved element, nested ones included.
    pub(crate) fn all_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.elements.iter().chain(self.nested.iter().map(|(_, e)| e))
    }
}

/// Store `value` in `slot`. When the value changes, the foreign attributes
/// of the element that carries it are dropped.
fn assign<T: PartialEq>(slot: &mut Option<T>, value: Option<T>, foreign: &mut Foreign, element: &str) {
    if *slot != value {
        *slot = value;
        foreign.clear_attributes(element);
    }
}

/// Shading (`w:shd`) is three independent fields on one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Shading {
    pub fill: Option<Color>,
    pub pattern: Option<ShadePattern>,
    pub color: Option<Color>,
}

impl Shading {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.pattern.is_none() && self.color.is_none()
    }
}

/// Paragraph-level formatting (`w:pPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphFormatting {
    alignment: Option<Alignment>,
    keep_next: Option<bool>,
    keep_lines: Option<bool>,
    page_break_before: Option<bool>,
    space_before: Option<Twips>,
    space_after: Option<Twips>,
    line_spacing: Option<LineSpacing>,
    indent_left: Option<SignedTwips>,
    indent_right: Option<SignedTwips>,
    first_line: Option<FirstLineIndent>,
    /// Top, left, bottom, right.
    borders: [Option<Border>; 4],
    shading: Shading,
    foreign: Foreign,
}

fn side_index(side: BorderSide) -> usize {
    match side {
        BorderSide::Top => 0,
        BorderSide::Left => 1,
        BorderSide::Bottom => 2,
        BorderSide::Right => 3,
    }
}

impl ParagraphFormatting {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is set and nothing foreign is carried.
    pub fn is_empty(&self) -> bool {
        self.alignment.is_none()
            && self.keep_next.is_none()
            && self.keep_lines.is_none()
            && self.page_break_before.is_none()
            && self.space_before.is_none()
            && self.space_after.is_none()
            && self.line_spacing.is_none()
            && self.indent_left.is_none()
            && self.indent_right.is_none()
            && self.first_line.is_none()
            && self.borders.iter().all(Option::is_none)
            && self.shading.is_empty()
            && self.foreign.is_empty()
    }

    #[inline]
    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn set_alignment(&mut self, value: Option<Alignment>) {
        assign(&mut self.alignment, value, &mut self.foreign, el::JC);
    }

    #[inline]
    pub fn keep_next(&self) -> Option<bool> {
        self.keep_next
    }

    pub fn set_keep_next(&mut self, value: Option<bool>) {
        assign(&mut self.keep_next, value, &mut self.foreign, el::KEEP_NEXT);
    }

    #[inline]
    pub fn keep_lines(&self) -> Option<bool> {
        self.keep_lines
    }

    pub fn set_keep_lines(&mut self, value: Option<bool>) {
        assign(&mut self.keep_lines, value, &mut self.foreign, el::KEEP_LINES);
    }

    #[inline]
    pub fn page_break_before(&self) -> Option<bool> {
        self.page_break_before
    }

    pub fn set_page_break_before(&mut self, value: Option<bool>) {
        assign(
            &mut self.page_break_before,
            value,
            &mut self.foreign,
            el::PAGE_BREAK_BEFORE,
        );
    }

    #[inline]
    pub fn space_before(&self) -> Option<Twips> {
        self.space_before
    }

    pub fn set_space_before(&mut self, value: Option<Twips>) {
        assign(&mut self.space_before, value, &mut self.foreign, el::SPACING);
    }

    #[inline]
    pub fn space_after(&self) -> Option<Twips> {
        self.space_after
    }

    pub fn set_space_after(&mut self, value: Option<Twips>) {
        assign(&mut self.space_after, value, &mut self.foreign, el::SPACING);
    }

    #[inline]
    pub fn line_spacing(&self) -> Option<LineSpacing> {
        self.line_spacing
    }

    pub fn set_line_spacing(&mut self, value: Option<LineSpacing>) {
        assign(&mut self.line_spacing, value, &mut self.foreign, el::SPACING);
    }

    #[inline]
    pub fn indent_left(&self) -> Option<SignedTwips> {
        self.indent_left
    }

    pub fn set_indent_left(&mut self, value: Option<SignedTwips>) {
        assign(&mut self.indent_left, value, &mut self.foreign, el::IND);
    }

    #[inline]
    pub fn indent_right(&self) -> Option<SignedTwips> {
        self.indent_right
    }

    pub fn set_indent_right(&mut self, value: Option<SignedTwips>) {
        assign(&mut self.indent_right, value, &mut self.foreign, el::IND);
    }

    #[inline]
    pub fn first_line(&self) -> Option<FirstLineIndent> {
        self.first_line
    }

    pub fn set_first_line(&mut self, value: Option<FirstLineIndent>) {
        assign(&mut self.first_line, value, &mut self.foreign, el::IND);
    }

    /// A copy of the border on one side.
    #[inline]
    pub fn border(&self, side: BorderSide) -> Option<Border> {
        self.borders[side_index(side)]
    }

    /// Store a copy of `border` on one side. Other sides are untouched.
    pub fn set_border(&mut self, side: BorderSide, border: Option<Border>) {
        assign(
            &mut self.borders[side_index(side)],
            border,
            &mut self.foreign,
            el::border_side(side),
        );
    }

    /// Put the same border on all four sides.
    ///
    /// `width_points` is converted to eighths of a point.
    pub fn set_borders(
        &mut self,
        style: BorderStyle,
        color: Option<Color>,
        width_points: f64,
    ) -> Result<()> {
        let mut border = Border::new(style, Uom::from_points(width_points)?);
        border.set_color(color);
        for side in BorderSide::ALL {
            self.set_border(*side, Some(border));
        }
        Ok(())
    }

    /// Remove all four borders.
    pub fn clear_borders(&mut self) {
        for side in BorderSide::ALL {
            self.set_border(*side, None);
        }
    }

    #[inline]
    pub fn shade_fill(&self) -> Option<Color> {
        self.shading.fill
    }

    pub fn set_shade_fill(&mut self, value: Option<Color>) {
        assign(&mut self.shading.fill, value, &mut self.foreign, el::SHD);
    }

    #[inline]
    pub fn shade_pattern(&self) -> Option<ShadePattern> {
        self.shading.pattern
    }

    pub fn set_shade_pattern(&mut self, value: Option<ShadePattern>) {
        assign(&mut self.shading.pattern, value, &mut self.foreign, el::SHD);
    }

    #[inline]
    pub fn shade_color(&self) -> Option<Color> {
        self.shading.color
    }

    pub fn set_shade_color(&mut self, value: Option<Color>) {
        assign(&mut self.shading.color, value, &mut self.foreign, el::SHD);
    }

    pub(crate) fn shading(&self) -> Shading {
        self.shading
    }

    #[inline]
    pub fn foreign(&self) -> &Foreign {
        &self.foreign
    }

    #[inline]
    pub fn foreign_mut(&mut self) -> &mut Foreign {
        &mut self.foreign
    }
}

/// Which `w:rFonts` attributes carry the modeled family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FontSlots {
    pub ascii: bool,
    pub h_ansi: bool,
}

impl Default for FontSlots {
    fn default() -> Self {
        Self {
            ascii: true,
            h_ansi: true,
        }
    }
}

/// Run-level formatting (`w:rPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormatting {
    font_family: Option<String>,
    font_slots: FontSlots,
    font_size: Option<HalfPoints>,
    bold: Option<bool>,
    italic: Option<bool>,
    strike: Option<bool>,
    caps: Option<bool>,
    small_caps: Option<bool>,
    underline: Option<UnderlineStyle>,
    color: Option<Color>,
    vertical_align: Option<VerticalAlign>,
    shading: Shading,
    foreign: Foreign,
}

impl RunFormatting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.font_size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.strike.is_none()
            && self.caps.is_none()
            && self.small_caps.is_none()
            && self.underline.is_none()
            && self.color.is_none()
            && self.vertical_align.is_none()
            && self.shading.is_empty()
            && self.foreign.is_empty()
    }

    /// Family and size as set on this run or style. Either part may be absent.
    pub fn font(&self) -> Font {
        Font {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }

    /// Set both parts of the font. Passing `Font::default()` clears them.
    pub fn set_font(&mut self, font: Font) {
        self.set_font_family(font.family);
        self.set_font_size(font.size);
    }

    #[inline]
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Set the family. A new family is written to both the `w:ascii` and
    /// `w:hAnsi` slots.
    pub fn set_font_family(&mut self, family: Option<String>) {
        if self.font_family != family {
            self.font_slots = FontSlots::default();
        }
        assign(&mut self.font_family, family, &mut self.foreign, el::R_FONTS);
    }

    #[inline]
    pub(crate) fn font_slots(&self) -> FontSlots {
        self.font_slots
    }

    pub(crate) fn set_font_slots(&mut self, slots: FontSlots) {
        self.font_slots = slots;
    }

    #[inline]
    pub fn font_size(&self) -> Option<HalfPoints> {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: Option<HalfPoints>) {
        assign(&mut self.font_size, size, &mut self.foreign, el::SZ);
    }

    #[inline]
    pub fn bold(&self) -> Option<bool> {
        self.bold
    }

    pub fn set_bold(&mut self, value: Option<bool>) {
        assign(&mut self.bold, value, &mut self.foreign, el::B);
    }

    #[inline]
    pub fn italic(&self) -> Option<bool> {
        self.italic
    }

    pub fn set_italic(&mut self, value: Option<bool>) {
        assign(&mut self.italic, value, &mut self.foreign, el::I);
    }

    #[inline]
    pub fn strike(&self) -> Option<bool> {
        self.strike
    }

    pub fn set_strike(&mut self, value: Option<bool>) {
        assign(&mut self.strike, value, &mut self.foreign, el::STRIKE);
    }

    #[inline]
    pub fn caps(&self) -> Option<bool> {
        self.caps
    }

    pub fn set_caps(&mut self, value: Option<bool>) {
        assign(&mut self.caps, value, &mut self.foreign, el::CAPS);
    }

    #[inline]
    pub fn small_caps(&self) -> Option<bool> {
        self.small_caps
    }

    pub fn set_small_caps(&mut self, value: Option<bool>) {
        assign(&mut self.small_caps, value, &mut self.foreign, el::SMALL_CAPS);
    }

    #[inline]
    pub fn underline(&self) -> Option<UnderlineStyle> {
        self.underline
    }

    pub fn set_underline(&mut self, value: Option<UnderlineStyle>) {
        assign(&mut self.underline, value, &mut self.foreign, el::U);
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, value: Option<Color>) {
        assign(&mut self.color, value, &mut self.foreign, el::COLOR);
    }

    #[inline]
    pub fn vertical_align(&self) -> Option<VerticalAlign> {
        self.vertical_align
    }

    pub fn set_vertical_align(&mut self, value: Option<VerticalAlign>) {
        assign(&mut self.vertical_align, value, &mut self.foreign, el::VERT_ALIGN);
    }

    #[inline]
    pub fn shade_pattern(&self) -> Option<ShadePattern> {
        self.shading.pattern
    }

    pub fn set_shade_pattern(&mut self, value: Option<ShadePattern>) {
        assign(&mut self.shading.pattern, value, &mut self.foreign, el::SHD);
    }

    #[inline]
    pub fn shade_color(&self) -> Option<Color> {
        self.shading.color
    }

    pub fn set_shade_color(&mut self, value: Option<Color>) {
        assign(&mut self.shading.color, value, &mut self.foreign, el::SHD);
    }

    #[inline]
    pub fn shade_fill(&self) -> Option<Color> {
        self.shading.fill
    }

    pub fn set_shade_fill(&mut self, value: Option<Color>) {
        assign(&mut self.shading.fill, value, &mut self.foreign, el::SHD);
    }

    pub(crate) fn shading(&self) -> Shading {
        self.shading
    }

    #[inline]
    pub fn foreign(&self) -> &Foreign {
        &self.foreign
    }

    #[inline]
    pub fn foreign_mut(&mut self) -> &mut Foreign {
        &mut self.foreign
    }
}
