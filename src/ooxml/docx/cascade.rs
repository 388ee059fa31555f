//! Effective formatting: the cascade from direct formatting through styles
//! to document defaults.
//!
//! Each field is resolved on its own as the first value present in an
//! ordered list of layers:
//!
//! - paragraph: direct, the paragraph style and its `basedOn` ancestors (or
//!   the default paragraph style when none is named), document defaults,
//!   fallback;
//! - run: direct, the character style chain (or the default character
//!   style), the paragraph style chain, document run defaults, fallback.
//!
//! Resolution never fails. A style name that is not in the catalog or a
//! `basedOn` loop is reported as a [`Diagnostic`] and the remaining layers
//! still apply.

use crate::common::color::Color;
use crate::common::unit::{HalfPoints, SignedTwips, Twips};
use crate::ooxml::docx::enums::{
    Alignment, BorderSide, ShadePattern, StyleType, UnderlineStyle, VerticalAlign,
};
use crate::ooxml::docx::format::{Border, FirstLineIndent, LineSpacing};
use crate::ooxml::docx::formatting::{ParagraphFormatting, RunFormatting};
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::run::Run;
use crate::ooxml::docx::styles::{Style, Styles};
use crate::ooxml::error::{OoxmlError, Result};
use smallvec::SmallVec;

/// Font family used when nothing in the cascade names one.
pub const FALLBACK_FONT_FAMILY: &str = "Times New Roman";
/// Font size used when nothing in the cascade sets one: 10pt.
pub const FALLBACK_FONT_SIZE: HalfPoints = HalfPoints::from_subunits(20);

/// A recoverable problem found while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A paragraph, run or `basedOn` names a style that does not exist.
    UnknownStyle { name: String, style_type: StyleType },
    /// Following `basedOn` from `name` leads back to a style already visited.
    BasedOnCycle { name: String, style_type: StyleType },
}

/// A resolved value plus whatever went wrong on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Resolution<T> {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The value, or `UnknownStyleReference` for the first unknown style
    /// reported. Cycles alone do not make this fail.
    pub fn into_result(self) -> Result<T> {
        for diagnostic in self.diagnostics {
            if let Diagnostic::UnknownStyle { name, style_type } = diagnostic {
                return Err(OoxmlError::UnknownStyleReference { name, style_type });
            }
        }
        Ok(self.value)
    }
}

/// Fully resolved paragraph formatting: every field has a value.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveParagraphFormatting {
    pub alignment: Alignment,
    pub keep_next: bool,
    pub keep_lines: bool,
    pub page_break_before: bool,
    pub space_before: Twips,
    pub space_after: Twips,
    pub line_spacing: LineSpacing,
    pub indent_left: SignedTwips,
    pub indent_right: SignedTwips,
    pub first_line: FirstLineIndent,
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
    pub shade_fill: Option<Color>,
    pub shade_pattern: Option<ShadePattern>,
    pub shade_color: Option<Color>,
}

impl EffectiveParagraphFormatting {
    pub fn border(&self, side: BorderSide) -> Option<Border> {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Left => self.left,
            BorderSide::Bottom => self.bottom,
            BorderSide::Right => self.right,
        }
    }
}

/// A font with both parts resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectiveFont {
    pub family: String,
    pub size: HalfPoints,
}

/// Fully resolved run formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRunFormatting {
    pub font: EffectiveFont,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub caps: bool,
    pub small_caps: bool,
    pub underline: UnderlineStyle,
    pub color: Color,
    pub vertical_align: VerticalAlign,
    pub shade_fill: Option<Color>,
    pub shade_pattern: Option<ShadePattern>,
    pub shade_color: Option<Color>,
}

type Chain<'s> = SmallVec<[&'s Style; 4]>;

impl Styles {
    /// The style named `name` followed by its `basedOn` ancestors. With no
    /// name, the chain starts at the default style of the type.
    fn chain(
        &self,
        name: Option<&str>,
        style_type: StyleType,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Chain<'_> {
        let mut chain = Chain::new();
        let mut current = match name {
            Some(name) => self.lookup(name, style_type, diagnostics),
            None => self.default_style(style_type),
        };

        while let Some(style) = current {
            if chain.iter().any(|s: &&Style| std::ptr::eq(*s, style)) {
                report(
                    diagnostics,
                    Diagnostic::BasedOnCycle {
                        name: style.name().to_string(),
                        style_type,
                    },
                );
                break;
            }
            chain.push(style);
            current = style
                .based_on()
                .and_then(|parent| self.lookup(parent, style_type, diagnostics));
        }

        chain
    }

    fn lookup(
        &self,
        name: &str,
        style_type: StyleType,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&Style> {
        let style = self.get(name, style_type);
        if style.is_none() {
            report(
                diagnostics,
                Diagnostic::UnknownStyle {
                    name: name.to_string(),
                    style_type,
                },
            );
        }
        style
    }

    /// Resolve the effective formatting of a paragraph.
    pub fn resolve_paragraph(
        &self,
        paragraph: &Paragraph,
    ) -> Resolution<EffectiveParagraphFormatting> {
        let mut diagnostics = Vec::new();
        let chain = self.chain(paragraph.style(), StyleType::Paragraph, &mut diagnostics);

        let mut layers: SmallVec<[&ParagraphFormatting; 8]> = SmallVec::new();
        layers.push(paragraph.formatting());
        layers.extend(chain.iter().map(|s| s.paragraph_formatting()));
        layers.push(self.defaults().paragraph_formatting());

        macro_rules! first {
            ($getter:ident, $fallback:expr) => {
                layers.iter().find_map(|l| l.$getter()).unwrap_or($fallback)
            };
        }
        let border = |side| layers.iter().find_map(|l| l.border(side));

        let value = EffectiveParagraphFormatting {
            alignment: first!(alignment, Alignment::Left),
            keep_next: first!(keep_next, false),
            keep_lines: first!(keep_lines, false),
            page_break_before: first!(page_break_before, false),
            space_before: first!(space_before, Twips::ZERO),
            space_after: first!(space_after, Twips::ZERO),
            line_spacing: first!(line_spacing, LineSpacing::single()),
            indent_left: first!(indent_left, SignedTwips::ZERO),
            indent_right: first!(indent_right, SignedTwips::ZERO),
            first_line: first!(first_line, FirstLineIndent::FirstLine(Twips::ZERO)),
            top: border(BorderSide::Top),
            left: border(BorderSide::Left),
            bottom: border(BorderSide::Bottom),
            right: border(BorderSide::Right),
            shade_fill: layers.iter().find_map(|l| l.shade_fill()),
            shade_pattern: layers.iter().find_map(|l| l.shade_pattern()),
            shade_color: layers.iter().find_map(|l| l.shade_color()),
        };

        Resolution { value, diagnostics }
    }

    /// Resolve the effective formatting of `run`, which sits in `paragraph`.
    pub fn resolve_run(&self, paragraph: &Paragraph, run: &Run) -> Resolution<EffectiveRunFormatting> {
        let mut diagnostics = Vec::new();
        let char_chain = self.chain(run.style(), StyleType::Character, &mut diagnostics);
        let para_chain = self.chain(paragraph.style(), StyleType::Paragraph, &mut diagnostics);

        let mut layers: SmallVec<[&RunFormatting; 8]> = SmallVec::new();
        layers.push(run.properties());
        layers.extend(char_chain.iter().map(|s| s.run_formatting()));
        layers.extend(para_chain.iter().map(|s| s.run_formatting()));
        layers.push(self.defaults().run_formatting());

        macro_rules! first {
            ($getter:ident, $fallback:expr) => {
                layers.iter().find_map(|l| l.$getter()).unwrap_or($fallback)
            };
        }

        let family = layers
            .iter()
            .find_map(|l| l.font_family())
            .unwrap_or(FALLBACK_FONT_FAMILY)
            .to_string();

        let value = EffectiveRunFormatting {
            font: EffectiveFont {
                family,
                size: first!(font_size, FALLBACK_FONT_SIZE),
            },
            bold: first!(bold, false),
            italic: first!(italic, false),
            strike: first!(strike, false),
            caps: first!(caps, false),
            small_caps: first!(small_caps, false),
            underline: first!(underline, UnderlineStyle::None),
            color: first!(color, Color::Auto),
            vertical_align: first!(vertical_align, VerticalAlign::Baseline),
            shade_fill: layers.iter().find_map(|l| l.shade_fill()),
            shade_pattern: layers.iter().find_map(|l| l.shade_pattern()),
            shade_color: layers.iter().find_map(|l| l.shade_color()),
        };

        Resolution { value, diagnostics }
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if diagnostics.contains(&diagnostic) {
        return;
    }
    match &diagnostic {
        Diagnostic::UnknownStyle { name, style_type } => {
            log::warn!("unknown {} style {:?}; using remaining layers", style_type, name)
        },
        Diagnostic::BasedOnCycle { name, style_type } => {
            log::warn!("basedOn cycle through {} style {:?}", style_type, name)
        },
    }
    diagnostics.push(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::format::Font;

    fn styles_with_defaults() -> Styles {
        let mut styles = Styles::new();
        styles
            .defaults_mut()
            .run_formatting_mut()
            .set_font(Font::sized("Calibri", 11.0).unwrap());
        styles
    }

    #[test]
    fn test_fallbacks_when_nothing_is_set() {
        let styles = Styles::new();
        let p = Paragraph::with_text("x");
        let para = styles.resolve_paragraph(&p);
        assert!(para.is_clean());
        assert_eq!(para.value.alignment, Alignment::Left);
        assert_eq!(para.value.line_spacing, LineSpacing::single());
        assert_eq!(para.value.top, None);

        let run = styles.resolve_run(&p, p.run(0).unwrap()).value;
        assert_eq!(run.font.family, "Times New Roman");
        assert_eq!(run.font.size.to_points(), 10.0);
        assert!(!run.bold);
        assert_eq!(run.color, Color::Auto);
        assert_eq!(run.vertical_align, VerticalAlign::Baseline);
    }

    #[test]
    fn test_font_cascade_order() {
        let mut styles = styles_with_defaults();
        styles
            .add_style("Code", StyleType::Paragraph)
            .unwrap()
            .run_formatting_mut()
            .set_font(Font::sized("Consolas", 9.0).unwrap());

        let mut p = Paragraph::with_text("x");
        p.set_style(Some("Code"));
        let font = |p: &Paragraph| styles.resolve_run(p, p.run(0).unwrap()).value.font;
        assert_eq!(font(&p).family, "Consolas");

        p.run_mut(0)
            .unwrap()
            .properties_mut()
            .set_font(Font::sized("Courier New", 12.0).unwrap());
        assert_eq!(font(&p).family, "Courier New");
        assert_eq!(font(&p).size.size(), 24);

        p.run_mut(0).unwrap().properties_mut().set_font(Font::default());
        p.set_style(None);
        assert_eq!(font(&p).family, "Calibri");
        assert_eq!(font(&p).size.size(), 22);
    }

    #[test]
    fn test_family_and_size_cascade_separately() {
        let mut styles = styles_with_defaults();
        styles
            .add_style("Big", StyleType::Character)
            .unwrap()
            .run_formatting_mut()
            .set_font_size(Some(HalfPoints::from_subunits(48)));
        let mut p = Paragraph::new();
        p.append("x").set_style(Some("Big"));
        let font = styles.resolve_run(&p, p.run(0).unwrap()).value.font;
        assert_eq!(font.family, "Calibri");
        assert_eq!(font.size.size(), 48);
    }

    #[test]
    fn test_character_style_beats_paragraph_style() {
        let mut styles = Styles::new();
        styles
            .add_style("Para", StyleType::Paragraph)
            .unwrap()
            .run_formatting_mut()
            .set_bold(Some(true));
        styles
            .add_style("Plain", StyleType::Character)
            .unwrap()
            .run_formatting_mut()
            .set_bold(Some(false));
        let mut p = Paragraph::new();
        p.set_style(Some("Para"));
        p.append("a");
        p.append("b").set_style(Some("Plain"));
        assert!(styles.resolve_run(&p, p.run(0).unwrap()).value.bold);
        assert!(!styles.resolve_run(&p, p.run(1).unwrap()).value.bold);
    }

    #[test]
    fn test_based_on_chain() {
        let mut styles = Styles::new();
        styles
            .add_style("Base", StyleType::Paragraph)
            .unwrap()
            .paragraph_formatting_mut()
            .set_alignment(Some(Alignment::Center));
        styles
            .add_style("Child", StyleType::Paragraph)
            .unwrap()
            .set_based_on(Some("Base"))
            .paragraph_formatting_mut()
            .set_keep_next(Some(true));
        let mut p = Paragraph::new();
        p.set_style(Some("Child"));
        let eff = styles.resolve_paragraph(&p).value;
        assert_eq!(eff.alignment, Alignment::Center);
        assert!(eff.keep_next);
    }

    #[test]
    fn test_default_paragraph_style_applies_without_reference() {
        let mut styles = Styles::new();
        styles
            .add_style("Normal", StyleType::Paragraph)
            .unwrap()
            .paragraph_formatting_mut()
            .set_space_after(Some(Twips::from_subunits(160)));
        styles.set_default_style("Normal", StyleType::Paragraph).unwrap();
        let p = Paragraph::with_text("x");
        assert_eq!(styles.resolve_paragraph(&p).value.space_after.size(), 160);
    }

    #[test]
    fn test_unknown_style_is_a_diagnostic() {
        let styles = styles_with_defaults();
        let mut p = Paragraph::with_text("x");
        p.set_style(Some("Missing"));
        let res = styles.resolve_run(&p, p.run(0).unwrap());
        assert_eq!(res.value.font.family, "Calibri");
        assert_eq!(
            res.diagnostics,
            vec![Diagnostic::UnknownStyle {
                name: "Missing".into(),
                style_type: StyleType::Paragraph
            }]
        );
        assert!(matches!(
            styles.resolve_paragraph(&p).into_result(),
            Err(OoxmlError::UnknownStyleReference { .. })
        ));
    }

    #[test]
    fn test_based_on_cycle_terminates() {
        let mut styles = Styles::new();
        styles
            .add_style("A", StyleType::Paragraph)
            .unwrap()
            .set_based_on(Some("B"))
            .paragraph_formatting_mut()
            .set_alignment(Some(Alignment::Right));
        styles
            .add_style("B", StyleType::Paragraph)
            .unwrap()
            .set_based_on(Some("A"));
        let mut p = Paragraph::new();
        p.set_style(Some("B"));
        let res = styles.resolve_paragraph(&p);
        assert_eq!(res.value.alignment, Alignment::Right);
        assert!(matches!(res.diagnostics[..], [Diagnostic::BasedOnCycle { .. }]));
        assert!(res.into_result().is_ok());
    }

    #[test]
    fn test_resolution_is_pure() {
        let styles = styles_with_defaults();
        let p = Paragraph::with_text("x");
        let a = styles.resolve_run(&p, p.run(0).unwrap());
        let b = styles.resolve_run(&p, p.run(0).unwrap());
        assert_eq!(a, b);
    }
}
