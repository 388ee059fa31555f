//! Value objects stored in formatting property sets.
//!
//! All of them are plain values: cloning gives an independent copy and
//! equality compares content.

use crate::common::color::Color;
use crate::common::unit::{HalfPoints, Twips, Uom};
use crate::ooxml::docx::enums::BorderStyle;
use crate::ooxml::error::{OoxmlError, Result};

/// One edge of a border box (`w:top`, `w:bottom`, ... inside `w:pBdr`).
///
/// # Examples
///
/// ```rust
/// use longan::common::{Color, Uom};
/// use longan::ooxml::docx::enums::BorderStyle;
/// use longan::ooxml::docx::format::Border;
///
/// let border = Border::new(BorderStyle::Single, Uom::from_points(1.5).unwrap())
///     .with_color(Color::rgb(255, 0, 0));
/// assert_eq!(border.size().size(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Border {
    style: BorderStyle,
    size: Uom,
    color: Option<Color>,
    /// Distance from the text in points (`w:space`)
    space: Option<u32>,
    shadow: bool,
}

impl Border {
    pub const fn new(style: BorderStyle, size: Uom) -> Self {
        Self {
            style,
            size,
            color: None,
            space: None,
            shadow: false,
        }
    }

    #[inline]
    pub fn style(&self) -> BorderStyle {
        self.style
    }

    /// Line width in eighths of a point.
    #[inline]
    pub fn size(&self) -> Uom {
        self.size
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn space(&self) -> Option<u32> {
        self.space
    }

    #[inline]
    pub fn shadow(&self) -> bool {
        self.shadow
    }

    pub fn with_style(mut self, style: BorderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, size: Uom) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_space(mut self, points: u32) -> Self {
        self.space = Some(points);
        self
    }

    pub fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn set_style(&mut self, style: BorderStyle) {
        self.style = style;
    }

    pub fn set_size(&mut self, size: Uom) {
        self.size = size;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn set_space(&mut self, points: Option<u32>) {
        self.space = points;
    }

    pub fn set_shadow(&mut self, shadow: bool) {
        self.shadow = shadow;
    }
}

/// Font family and size.
///
/// Both parts are optional so that a style can set only the size and
/// inherit the family (or the reverse). An effective font after cascade
/// resolution always has both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: Option<String>,
    pub size: Option<HalfPoints>,
}

impl Font {
    /// A font with a family and no size.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            size: None,
        }
    }

    /// A font with a family and a size given in points.
    pub fn sized(family: impl Into<String>, points: f64) -> Result<Self> {
        Ok(Self::new(family).with_size(HalfPoints::from_points(points)?))
    }

    pub fn with_size(mut self, size: HalfPoints) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.size.is_none()
    }
}

/// Spacing between lines of a paragraph (`w:spacing/@w:line` + `@w:lineRule`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSpacing {
    /// Proportional spacing in 240ths of a line: 240 is single.
    Auto(u32),
    /// Exactly this height.
    Exact(Twips),
    /// At least this height.
    AtLeast(Twips),
}

impl LineSpacing {
    pub const fn single() -> Self {
        LineSpacing::Auto(240)
    }

    pub const fn one_and_half() -> Self {
        LineSpacing::Auto(360)
    }

    pub const fn double() -> Self {
        LineSpacing::Auto(480)
    }

    /// Proportional spacing, e.g. `multiple(1.15)`.
    pub fn multiple(lines: f64) -> Result<Self> {
        let value = (lines * 240.0).round();
        if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
            return Err(OoxmlError::InvalidMeasurement(format!(
                "{lines} is not a valid line multiple"
            )));
        }
        Ok(LineSpacing::Auto(value as u32))
    }

    /// `(w:line, w:lineRule)` attribute values.
    pub fn to_xml(&self) -> (u32, &'static str) {
        match self {
            LineSpacing::Auto(v) => (*v, "auto"),
            LineSpacing::Exact(t) => (t.size(), "exact"),
            LineSpacing::AtLeast(t) => (t.size(), "atLeast"),
        }
    }

    /// Build from attribute values. An absent rule means `auto`.
    pub fn from_xml(line: u32, rule: Option<&str>) -> Option<Self> {
        match rule.unwrap_or("auto") {
            "auto" => Some(LineSpacing::Auto(line)),
            "exact" => Some(LineSpacing::Exact(Twips::from_subunits(line))),
            "atLeast" => Some(LineSpacing::AtLeast(Twips::from_subunits(line))),
            _ => None,
        }
    }
}

/// First-line indentation of a paragraph: extra indent or a hanging indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirstLineIndent {
    /// `w:ind/@w:firstLine`
    FirstLine(Twips),
    /// `w:ind/@w:hanging`
    Hanging(Twips),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_a_value() {
        let original = Border::new(BorderStyle::Single, Uom::from_subunits(4));
        let mut copy = original;
        copy.set_color(Some(Color::rgb(1, 2, 3)));
        assert_ne!(copy, original);
        assert_eq!(original.color(), None);
        assert_eq!(copy.with_color(Color::rgb(1, 2, 3)), copy);
    }

    #[test]
    fn test_font_constructors() {
        let font = Font::sized("Consolas", 10.5).unwrap();
        assert_eq!(font.family.as_deref(), Some("Consolas"));
        assert_eq!(font.size, Some(HalfPoints::from_subunits(21)));
        assert!(Font::sized("Consolas", -1.0).is_err());
        assert!(Font::default().is_empty());
    }

    #[test]
    fn test_line_spacing_mapping() {
        assert_eq!(LineSpacing::multiple(1.15).unwrap(), LineSpacing::Auto(276));
        assert_eq!(LineSpacing::double().to_xml(), (480, "auto"));
        assert_eq!(
            LineSpacing::from_xml(300, Some("exact")),
            Some(LineSpacing::Exact(Twips::from_subunits(300)))
        );
        assert_eq!(LineSpacing::from_xml(240, None), Some(LineSpacing::single()));
        assert_eq!(LineSpacing::from_xml(240, Some("bogus")), None);
        assert!(LineSpacing::multiple(f64::NAN).is_err());
    }
}
