//! `w:pPr` and `w:rPr` to and from [`ParagraphFormatting`] and
//! [`RunFormatting`].

use super::order::{PARAGRAPH_BORDERS, PARAGRAPH_PROPERTIES, RUN_PROPERTIES, sort_children};
use super::{
    ReadContext, VAL, keep_unknown_attributes, on_off_element, on_off_value, parse_on_off,
    parse_i32, parse_u32, parse_val, restore_attributes,
};
use crate::common::color::Color;
use crate::common::unit::{HalfPoints, SignedTwips, Twips, Uom};
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::enums::{
    Alignment, BorderSide, BorderStyle, ShadePattern, UnderlineStyle, VerticalAlign,
};
use crate::ooxml::docx::format::{Border, FirstLineIndent, LineSpacing};
use crate::ooxml::docx::formatting::{
    FontSlots, Foreign, ParagraphFormatting, RunFormatting, Shading, el,
};
use crate::ooxml::error::{OoxmlError, Result};
use smallvec::SmallVec;

pub(crate) const P_STYLE: &str = "w:pStyle";
pub(crate) const R_STYLE: &str = "w:rStyle";

// Unwrap a mapped value, or keep the element as foreign and move on to the
// next child.
macro_rules! map_or_keep {
    ($ctx:expr, $child:expr, $set:expr, $parsed:expr) => {
        match $ctx.accept($child, $parsed)? {
            Some(value) => value,
            None => {
                $set.foreign_mut().push_element($child.clone());
                continue;
            },
        }
    };
}

fn color_attr(element: &XmlElement, attribute: &str) -> Result<Option<Color>> {
    element
        .attr(attribute)
        .map(|v| Color::from_xml(v).ok_or_else(|| OoxmlError::mapping(&element.name, attribute, v)))
        .transpose()
}

fn parse_shading(element: &XmlElement) -> Result<Shading> {
    let pattern = element
        .attr(VAL)
        .map(|v| ShadePattern::from_xml(v).ok_or_else(|| OoxmlError::mapping(&element.name, VAL, v)))
        .transpose()?;
    Ok(Shading {
        fill: color_attr(element, "w:fill")?,
        pattern,
        color: color_attr(element, "w:color")?,
    })
}

fn write_shading(shading: Shading, foreign: &Foreign) -> Option<XmlElement> {
    if shading.is_empty() && !foreign.has_attributes(el::SHD) {
        return None;
    }
    let mut shd = XmlElement::new(el::SHD);
    if let Some(pattern) = shading.pattern {
        shd.set_attr(VAL, pattern.to_xml());
    }
    if let Some(color) = shading.color {
        shd.set_attr("w:color", color.to_xml());
    }
    if let Some(fill) = shading.fill {
        shd.set_attr("w:fill", fill.to_xml());
    }
    restore_attributes(&mut shd, foreign, el::SHD);
    Some(shd)
}

const SHADING_ATTRIBUTES: &[&str] = &[VAL, "w:color", "w:fill"];

fn parse_border(element: &XmlElement) -> Result<Border> {
    let style = parse_val(element, BorderStyle::from_xml)?;
    let size = parse_u32(element, "w:sz")?.unwrap_or(0);
    let mut border = Border::new(style, Uom::from_subunits(size));
    border.set_color(color_attr(element, "w:color")?);
    border.set_space(parse_u32(element, "w:space")?);
    if let Some(v) = element.attr("w:shadow") {
        let shadow =
            on_off_value(v).ok_or_else(|| OoxmlError::mapping(&element.name, "w:shadow", v))?;
        border.set_shadow(shadow);
    }
    Ok(border)
}

const BORDER_ATTRIBUTES: &[&str] = &[VAL, "w:sz", "w:space", "w:color", "w:shadow"];

fn border_side(name: &str) -> Option<BorderSide> {
    match name {
        "w:top" => Some(BorderSide::Top),
        "w:left" | "w:start" => Some(BorderSide::Left),
        "w:bottom" => Some(BorderSide::Bottom),
        "w:right" | "w:end" => Some(BorderSide::Right),
        _ => None,
    }
}

fn side_element(side: BorderSide) -> &'static str {
    match side {
        BorderSide::Top => "w:top",
        BorderSide::Left => "w:left",
        BorderSide::Bottom => "w:bottom",
        BorderSide::Right => "w:right",
    }
}

fn write_border(side: BorderSide, border: Border, foreign: &Foreign) -> XmlElement {
    let mut e = XmlElement::new(side_element(side)).with_attr(VAL, border.style().to_xml());
    if !border.size().is_zero() {
        e.set_attr("w:sz", border.size().size().to_string());
    }
    if let Some(space) = border.space() {
        e.set_attr("w:space", space.to_string());
    }
    if let Some(color) = border.color() {
        e.set_attr("w:color", color.to_xml());
    }
    if border.shadow() {
        e.set_attr("w:shadow", "1");
    }
    restore_attributes(&mut e, foreign, el::border_side(side));
    e
}

fn read_borders(pbdr: &XmlElement, fmt: &mut ParagraphFormatting, ctx: &ReadContext) -> Result<()> {
    keep_unknown_attributes(pbdr, &[], fmt.foreign_mut(), el::PBDR);
    for child in pbdr.elements() {
        let Some(side) = border_side(&child.name) else {
            fmt.foreign_mut().push_nested(el::PBDR, child.clone());
            continue;
        };
        match ctx.accept(child, parse_border(child))? {
            Some(border) => {
                fmt.set_border(side, Some(border));
                keep_unknown_attributes(
                    child,
                    BORDER_ATTRIBUTES,
                    fmt.foreign_mut(),
                    el::border_side(side),
                );
            },
            None => fmt.foreign_mut().push_nested(el::PBDR, child.clone()),
        }
    }
    Ok(())
}

struct Spacing {
    before: Option<Twips>,
    after: Option<Twips>,
    line: Option<LineSpacing>,
}

fn parse_spacing(element: &XmlElement) -> Result<Spacing> {
    let line = match parse_u32(element, "w:line")? {
        Some(line) => {
            let rule = element.attr("w:lineRule");
            let spacing = LineSpacing::from_xml(line, rule).ok_or_else(|| {
                OoxmlError::mapping(&element.name, "w:lineRule", rule.unwrap_or_default())
            })?;
            Some(spacing)
        },
        None => None,
    };
    Ok(Spacing {
        before: parse_u32(element, "w:before")?.map(Twips::from_subunits),
        after: parse_u32(element, "w:after")?.map(Twips::from_subunits),
        line,
    })
}

struct Indentation {
    left: Option<SignedTwips>,
    right: Option<SignedTwips>,
    first_line: Option<FirstLineIndent>,
    known: SmallVec<[&'static str; 4]>,
}

fn parse_indentation(element: &XmlElement) -> Result<Indentation> {
    let mut known: SmallVec<[&'static str; 4]> = SmallVec::new();
    let mut pick = |a: &'static str, b: &'static str| -> Result<Option<SignedTwips>> {
        for name in [a, b] {
            if let Some(v) = parse_i32(element, name)? {
                known.push(name);
                return Ok(Some(SignedTwips::from_subunits(v)));
            }
        }
        Ok(None)
    };
    let left = pick("w:left", "w:start")?;
    let right = pick("w:right", "w:end")?;

    // hanging wins over firstLine when both are present
    let first_line = match parse_u32(element, "w:hanging")? {
        Some(v) => {
            known.push("w:hanging");
            Some(FirstLineIndent::Hanging(Twips::from_subunits(v)))
        },
        None => match parse_u32(element, "w:firstLine")? {
            Some(v) => {
                known.push("w:firstLine");
                Some(FirstLineIndent::FirstLine(Twips::from_subunits(v)))
            },
            None => None,
        },
    };
    Ok(Indentation {
        left,
        right,
        first_line,
        known,
    })
}

/// Read `w:pPr`. Returns the formatting and the `w:pStyle` id, if any.
pub(crate) fn read_paragraph_properties(
    ppr: &XmlElement,
    ctx: &ReadContext,
) -> Result<(ParagraphFormatting, Option<String>)> {
    let mut fmt = ParagraphFormatting::new();
    let mut style = None;

    for child in ppr.elements() {
        match child.name.as_str() {
            P_STYLE if style.is_none() && child.attr(VAL).is_some() => {
                style = child.attr(VAL).map(str::to_string);
            },
            el::JC => {
                let v = map_or_keep!(ctx, child, fmt, parse_val(child, Alignment::from_xml));
                fmt.set_alignment(Some(v));
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), el::JC);
            },
            name @ (el::KEEP_NEXT | el::KEEP_LINES | el::PAGE_BREAK_BEFORE) => {
                let v = map_or_keep!(ctx, child, fmt, parse_on_off(child));
                match name {
                    el::KEEP_NEXT => fmt.set_keep_next(Some(v)),
                    el::KEEP_LINES => fmt.set_keep_lines(Some(v)),
                    _ => fmt.set_page_break_before(Some(v)),
                }
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), name);
            },
            el::SPACING => {
                let spacing = map_or_keep!(ctx, child, fmt, parse_spacing(child));
                let mut known: SmallVec<[&str; 4]> = SmallVec::new();
                known.extend(["w:before", "w:after", "w:line"]);
                if spacing.line.is_some() {
                    known.push("w:lineRule");
                }
                fmt.set_space_before(spacing.before);
                fmt.set_space_after(spacing.after);
                fmt.set_line_spacing(spacing.line);
                keep_unknown_attributes(child, &known, fmt.foreign_mut(), el::SPACING);
            },
            el::IND => {
                let ind = map_or_keep!(ctx, child, fmt, parse_indentation(child));
                fmt.set_indent_left(ind.left);
                fmt.set_indent_right(ind.right);
                fmt.set_first_line(ind.first_line);
                keep_unknown_attributes(child, &ind.known, fmt.foreign_mut(), el::IND);
            },
            el::PBDR => read_borders(child, &mut fmt, ctx)?,
            el::SHD => {
                let shading = map_or_keep!(ctx, child, fmt, parse_shading(child));
                fmt.set_shade_fill(shading.fill);
                fmt.set_shade_pattern(shading.pattern);
                fmt.set_shade_color(shading.color);
                keep_unknown_attributes(child, SHADING_ATTRIBUTES, fmt.foreign_mut(), el::SHD);
            },
            _ => fmt.foreign_mut().push_element(child.clone()),
        }
    }

    Ok((fmt, style))
}

fn push(parent: &mut XmlElement, child: XmlElement) {
    parent.children.push(XmlNode::Element(child));
}

/// Build `w:pPr`, or `None` when there is nothing to write.
pub(crate) fn write_paragraph_properties(
    fmt: &ParagraphFormatting,
    style_id: Option<&str>,
) -> Option<XmlElement> {
    let foreign = fmt.foreign();
    let mut ppr = XmlElement::new("w:pPr");

    if let Some(id) = style_id {
        push(&mut ppr, XmlElement::new(P_STYLE).with_attr(VAL, id));
    }

    for (name, value) in [
        (el::KEEP_NEXT, fmt.keep_next()),
        (el::KEEP_LINES, fmt.keep_lines()),
        (el::PAGE_BREAK_BEFORE, fmt.page_break_before()),
    ] {
        if let Some(value) = value {
            let mut e = on_off_element(name, value);
            restore_attributes(&mut e, foreign, name);
            push(&mut ppr, e);
        }
    }

    let mut pbdr = XmlElement::new(el::PBDR);
    restore_attributes(&mut pbdr, foreign, el::PBDR);
    for side in BorderSide::ALL {
        if let Some(border) = fmt.border(*side) {
            push(&mut pbdr, write_border(*side, border, foreign));
        }
    }
    for nested in foreign.nested_in(el::PBDR) {
        push(&mut pbdr, nested.clone());
    }
    if !pbdr.children.is_empty() || !pbdr.attributes.is_empty() {
        sort_children(&mut pbdr, &PARAGRAPH_BORDERS);
        push(&mut ppr, pbdr);
    }

    if let Some(shd) = write_shading(fmt.shading(), foreign) {
        push(&mut ppr, shd);
    }

    if fmt.space_before().is_some()
        || fmt.space_after().is_some()
        || fmt.line_spacing().is_some()
        || foreign.has_attributes(el::SPACING)
    {
        let mut spacing = XmlElement::new(el::SPACING);
        if let Some(before) = fmt.space_before() {
            spacing.set_attr("w:before", before.size().to_string());
        }
        if let Some(after) = fmt.space_after() {
            spacing.set_attr("w:after", after.size().to_string());
        }
        if let Some(line) = fmt.line_spacing() {
            let (value, rule) = line.to_xml();
            spacing.set_attr("w:line", value.to_string());
            spacing.set_attr("w:lineRule", rule);
        }
        restore_attributes(&mut spacing, foreign, el::SPACING);
        push(&mut ppr, spacing);
    }

    if fmt.indent_left().is_some()
        || fmt.indent_right().is_some()
        || fmt.first_line().is_some()
        || foreign.has_attributes(el::IND)
    {
        let mut ind = XmlElement::new(el::IND);
        if let Some(left) = fmt.indent_left() {
            ind.set_attr("w:left", left.size().to_string());
        }
        if let Some(right) = fmt.indent_right() {
            ind.set_attr("w:right", right.size().to_string());
        }
        match fmt.first_line() {
            Some(FirstLineIndent::FirstLine(v)) => ind.set_attr("w:firstLine", v.size().to_string()),
            Some(FirstLineIndent::Hanging(v)) => ind.set_attr("w:hanging", v.size().to_string()),
            None => {},
        }
        restore_attributes(&mut ind, foreign, el::IND);
        push(&mut ppr, ind);
    }

    if let Some(alignment) = fmt.alignment() {
        let mut jc = XmlElement::new(el::JC).with_attr(VAL, alignment.to_xml());
        restore_attributes(&mut jc, foreign, el::JC);
        push(&mut ppr, jc);
    }

    for e in foreign.elements() {
        push(&mut ppr, e.clone());
    }

    if ppr.children.is_empty() {
        return None;
    }
    sort_children(&mut ppr, &PARAGRAPH_PROPERTIES);
    Some(ppr)
}

/// Read `w:rPr`. Returns the formatting and the `w:rStyle` id, if any.
pub(crate) fn read_run_properties(
    rpr: &XmlElement,
    ctx: &ReadContext,
) -> Result<(RunFormatting, Option<String>)> {
    let mut fmt = RunFormatting::new();
    let mut style = None;

    for child in rpr.elements() {
        match child.name.as_str() {
            R_STYLE if style.is_none() && child.attr(VAL).is_some() => {
                style = child.attr(VAL).map(str::to_string);
            },
            el::R_FONTS => {
                let ascii = child.attr("w:ascii");
                let h_ansi = child.attr("w:hAnsi");
                let family = ascii.or(h_ansi);
                let mut known: SmallVec<[&str; 2]> = SmallVec::new();
                let mut slots = FontSlots {
                    ascii: false,
                    h_ansi: false,
                };
                if let Some(family) = family {
                    if ascii == Some(family) {
                        slots.ascii = true;
                        known.push("w:ascii");
                    }
                    if h_ansi == Some(family) {
                        slots.h_ansi = true;
                        known.push("w:hAnsi");
                    }
                }
                fmt.set_font_family(family.map(str::to_string));
                if family.is_some() {
                    fmt.set_font_slots(slots);
                }
                keep_unknown_attributes(child, &known, fmt.foreign_mut(), el::R_FONTS);
            },
            el::SZ => {
                let size = map_or_keep!(
                    ctx,
                    child,
                    fmt,
                    parse_u32(child, VAL).and_then(|v| {
                        v.ok_or_else(|| OoxmlError::mapping(el::SZ, VAL, ""))
                    })
                );
                fmt.set_font_size(Some(HalfPoints::from_subunits(size)));
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), el::SZ);
            },
            name @ (el::B | el::I | el::STRIKE | el::CAPS | el::SMALL_CAPS) => {
                let v = map_or_keep!(ctx, child, fmt, parse_on_off(child));
                match name {
                    el::B => fmt.set_bold(Some(v)),
                    el::I => fmt.set_italic(Some(v)),
                    el::STRIKE => fmt.set_strike(Some(v)),
                    el::CAPS => fmt.set_caps(Some(v)),
                    _ => fmt.set_small_caps(Some(v)),
                }
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), name);
            },
            el::U => {
                let underline = match child.attr(VAL) {
                    None => Ok(UnderlineStyle::Single),
                    Some(_) => parse_val(child, UnderlineStyle::from_xml),
                };
                let v = map_or_keep!(ctx, child, fmt, underline);
                fmt.set_underline(Some(v));
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), el::U);
            },
            el::COLOR => {
                let v = map_or_keep!(ctx, child, fmt, parse_val(child, Color::from_xml));
                fmt.set_color(Some(v));
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), el::COLOR);
            },
            el::VERT_ALIGN => {
                let v = map_or_keep!(ctx, child, fmt, parse_val(child, VerticalAlign::from_xml));
                fmt.set_vertical_align(Some(v));
                keep_unknown_attributes(child, &[VAL], fmt.foreign_mut(), el::VERT_ALIGN);
            },
            el::SHD => {
                let shading = map_or_keep!(ctx, child, fmt, parse_shading(child));
                fmt.set_shade_fill(shading.fill);
                fmt.set_shade_pattern(shading.pattern);
                fmt.set_shade_color(shading.color);
                keep_unknown_attributes(child, SHADING_ATTRIBUTES, fmt.foreign_mut(), el::SHD);
            },
            _ => fmt.foreign_mut().push_element(child.clone()),
        }
    }

    Ok((fmt, style))
}

/// Build `w:rPr`, or `None` when there is nothing to write.
pub(crate) fn write_run_properties(fmt: &RunFormatting, style_id: Option<&str>) -> Option<XmlElement> {
    let foreign = fmt.foreign();
    let mut rpr = XmlElement::new("w:rPr");

    if let Some(id) = style_id {
        push(&mut rpr, XmlElement::new(R_STYLE).with_attr(VAL, id));
    }

    if fmt.font_family().is_some() || foreign.has_attributes(el::R_FONTS) {
        let mut fonts = XmlElement::new(el::R_FONTS);
        if let Some(family) = fmt.font_family() {
            let slots = fmt.font_slots();
            if slots.ascii {
                fonts.set_attr("w:ascii", family);
            }
            if slots.h_ansi {
                fonts.set_attr("w:hAnsi", family);
            }
        }
        restore_attributes(&mut fonts, foreign, el::R_FONTS);
        push(&mut rpr, fonts);
    }

    for (name, value) in [
        (el::B, fmt.bold()),
        (el::I, fmt.italic()),
        (el::CAPS, fmt.caps()),
        (el::SMALL_CAPS, fmt.small_caps()),
        (el::STRIKE, fmt.strike()),
    ] {
        if let Some(value) = value {
            let mut e = on_off_element(name, value);
            restore_attributes(&mut e, foreign, name);
            push(&mut rpr, e);
        }
    }

    if let Some(color) = fmt.color() {
        let mut e = XmlElement::new(el::COLOR).with_attr(VAL, color.to_xml());
        restore_attributes(&mut e, foreign, el::COLOR);
        push(&mut rpr, e);
    }

    if let Some(size) = fmt.font_size() {
        let mut e = XmlElement::new(el::SZ).with_attr(VAL, size.size().to_string());
        restore_attributes(&mut e, foreign, el::SZ);
        push(&mut rpr, e);
    }

    if let Some(underline) = fmt.underline() {
        let mut e = XmlElement::new(el::U).with_attr(VAL, underline.to_xml());
        restore_attributes(&mut e, foreign, el::U);
        push(&mut rpr, e);
    }

    if let Some(shd) = write_shading(fmt.shading(), foreign) {
        push(&mut rpr, shd);
    }

    if let Some(align) = fmt.vertical_align() {
        let mut e = XmlElement::new(el::VERT_ALIGN).with_attr(VAL, align.to_xml());
        restore_attributes(&mut e, foreign, el::VERT_ALIGN);
        push(&mut rpr, e);
    }

    for e in foreign.elements() {
        push(&mut rpr, e.clone());
    }

    if rpr.children.is_empty() {
        return None;
    }
    sort_children(&mut rpr, &RUN_PROPERTIES);
    Some(rpr)
}
