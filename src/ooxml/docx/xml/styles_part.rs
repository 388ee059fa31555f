//! The styles part (`word/styles.xml`).

use super::order::{DOC_DEFAULTS, STYLE, sort_children};
use super::props::{
    P_STYLE, R_STYLE, read_paragraph_properties, read_run_properties, write_paragraph_properties,
    write_run_properties,
};
use super::{ReadContext, VAL, parse_on_off, parse_u32, parse_wml};
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::enums::StyleType;
use crate::ooxml::docx::styles::{DocDefaults, Style, Styles};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;

const STYLES: &str = "w:styles";
const DOC_DEFAULTS_EL: &str = "w:docDefaults";
const RPR_DEFAULT: &str = "w:rPrDefault";
const PPR_DEFAULT: &str = "w:pPrDefault";
const LATENT_STYLES: &str = "w:latentStyles";
const STYLE_EL: &str = "w:style";

/// A style as read, before `basedOn`/`next` ids are turned into names.
struct LoadedStyle {
    style: Style,
    based_on: Option<String>,
    next: Option<String>,
}

/// Parse a styles part.
pub(crate) fn read_styles(xml: &str, ctx: &ReadContext) -> Result<Styles> {
    let root = parse_wml(xml)?;
    if root.name != STYLES {
        return Err(OoxmlError::Xml(format!(
            "expected <{STYLES}> root, found <{}>",
            root.name
        )));
    }

    let mut styles = Styles::new();
    styles.set_root_attributes(root.attributes.clone());
    let mut loaded = Vec::new();

    for child in root.elements() {
        match child.name.as_str() {
            DOC_DEFAULTS_EL => read_doc_defaults(child, styles.defaults_mut(), ctx)?,
            LATENT_STYLES => styles.set_latent_styles(Some(child.clone())),
            STYLE_EL => match read_style(child, ctx)? {
                Some(style) => loaded.push(style),
                None => styles.extras_mut().push(child.clone()),
            },
            _ => styles.extras_mut().push(child.clone()),
        }
    }

    // Second pass: references are stored by name.
    let name_of = |id: &str| {
        loaded
            .iter()
            .find(|l| l.style.id() == id)
            .map_or_else(|| id.to_string(), |l| l.style.name().to_string())
    };
    let resolved: Vec<(Option<String>, Option<String>)> = loaded
        .iter()
        .map(|l| (l.based_on.as_deref().map(name_of), l.next.as_deref().map(name_of)))
        .collect();
    for (l, (based_on, next)) in loaded.into_iter().zip(resolved) {
        let mut style = l.style;
        style.set_based_on(based_on.as_deref());
        style.set_next(next.as_deref());
        styles.push_loaded(style);
    }

    log::debug!("read {} styles", styles.len());
    Ok(styles)
}

fn read_doc_defaults(element: &XmlElement, defaults: &mut DocDefaults, ctx: &ReadContext) -> Result<()> {
    for child in element.elements() {
        match child.name.as_str() {
            RPR_DEFAULT => {
                if let Some(rpr) = child.child("w:rPr") {
                    let (mut fmt, style) = read_run_properties(rpr, ctx)?;
                    if let Some(id) = style {
                        fmt.foreign_mut()
                            .push_element(XmlElement::new(R_STYLE).with_attr(VAL, id));
                    }
                    *defaults.run_formatting_mut() = fmt;
                }
                defaults.set_run_wrapper(wrapper_shell(child, "w:rPr"));
            },
            PPR_DEFAULT => {
                if let Some(ppr) = child.child("w:pPr") {
                    let (mut fmt, style) = read_paragraph_properties(ppr, ctx)?;
                    if let Some(id) = style {
                        fmt.foreign_mut()
                            .push_element(XmlElement::new(P_STYLE).with_attr(VAL, id));
                    }
                    *defaults.paragraph_formatting_mut() = fmt;
                }
                defaults.set_paragraph_wrapper(wrapper_shell(child, "w:pPr"));
            },
            _ => defaults.foreign_mut().push(child.clone()),
        }
    }
    Ok(())
}

/// Attributes and unknown children of a defaults wrapper, or `None` when it
/// holds nothing but `modeled`.
fn wrapper_shell(wrapper: &XmlElement, modeled: &str) -> Option<XmlElement> {
    let mut shell = XmlElement::new(wrapper.name.as_str());
    shell.attributes = wrapper.attributes.clone();
    let mut seen = false;
    for child in wrapper.elements() {
        // only the first occurrence is modeled
        if child.name == modeled && !seen {
            seen = true;
            continue;
        }
        push(&mut shell, child.clone());
    }
    (!shell.attributes.is_empty() || !shell.children.is_empty()).then_some(shell)
}

fn parse_style_type(element: &XmlElement) -> Result<StyleType> {
    match element.attr("w:type") {
        None => Ok(StyleType::Paragraph),
        Some(v) => StyleType::from_xml(v).ok_or_else(|| OoxmlError::mapping(STYLE_EL, "w:type", v)),
    }
}

fn flag(element: &XmlElement, attribute: &str) -> Result<bool> {
    match element.attr(attribute) {
        None => Ok(false),
        Some(v) => super::on_off_value(v).ok_or_else(|| OoxmlError::mapping(STYLE_EL, attribute, v)),
    }
}

/// Read one `w:style`. `None` means the element could not be mapped and is
/// kept whole (lenient mode only).
fn read_style(element: &XmlElement, ctx: &ReadContext) -> Result<Option<LoadedStyle>> {
    let header = (|| -> Result<(StyleType, bool, bool)> {
        Ok((
            parse_style_type(element)?,
            flag(element, "w:default")?,
            flag(element, "w:customStyle")?,
        ))
    })();
    let Some((style_type, is_default, is_custom)) = ctx.accept(element, header)? else {
        return Ok(None);
    };

    let id = element.attr("w:styleId").unwrap_or_default().to_string();
    let name = element
        .child("w:name")
        .and_then(|n| n.attr(VAL))
        .unwrap_or(&id)
        .to_string();

    let mut style = Style::new(id, name, style_type);
    style.set_default(is_default);
    style.set_custom(is_custom);
    for (k, v) in &element.attributes {
        if !matches!(
            k.as_str(),
            "w:type" | "w:styleId" | "w:default" | "w:customStyle"
        ) {
            style.foreign_attributes_mut().push((k.clone(), v.clone()));
        }
    }

    let mut based_on = None;
    let mut next = None;
    let mut seen_name = false;

    for child in element.elements() {
        match child.name.as_str() {
            "w:name" if !seen_name && child.attr(VAL).is_some() => seen_name = true,
            "w:basedOn" if child.attr(VAL).is_some() => based_on = child.attr(VAL).map(str::to_string),
            "w:next" if child.attr(VAL).is_some() => next = child.attr(VAL).map(str::to_string),
            "w:uiPriority" => {
                let parsed = parse_u32(child, VAL)
                    .and_then(|v| v.ok_or_else(|| OoxmlError::mapping(&child.name, VAL, "")));
                match ctx.accept(child, parsed)? {
                    Some(priority) => {
                        style.set_priority(Some(priority));
                    },
                    None => style.foreign_elements_mut().push(child.clone()),
                }
            },
            name @ ("w:qFormat" | "w:semiHidden") => match ctx.accept(child, parse_on_off(child))? {
                Some(value) if name == "w:qFormat" => {
                    style.set_quick_format(value);
                },
                Some(value) => {
                    style.set_semi_hidden(value);
                },
                None => style.foreign_elements_mut().push(child.clone()),
            },
            "w:pPr" => {
                let (mut fmt, style_ref) = read_paragraph_properties(child, ctx)?;
                if let Some(id) = style_ref {
                    fmt.foreign_mut()
                        .push_element(XmlElement::new(P_STYLE).with_attr(VAL, id));
                }
                *style.paragraph_formatting_mut() = fmt;
            },
            "w:rPr" => {
                let (mut fmt, style_ref) = read_run_properties(child, ctx)?;
                if let Some(id) = style_ref {
                    fmt.foreign_mut()
                        .push_element(XmlElement::new(R_STYLE).with_attr(VAL, id));
                }
                *style.run_formatting_mut() = fmt;
            },
            _ => style.foreign_elements_mut().push(child.clone()),
        }
    }

    Ok(Some(LoadedStyle {
        style,
        based_on,
        next,
    }))
}

fn push(parent: &mut XmlElement, child: XmlElement) {
    parent.children.push(XmlNode::Element(child));
}

/// The `w:styleId` to write for a reference to `name`. Names that are not in
/// the catalog are written as they are.
pub(crate) fn style_id_for<'a>(styles: &'a Styles, name: &'a str, style_type: StyleType) -> &'a str {
    styles.get(name, style_type).map_or(name, Style::id)
}

fn write_style(styles: &Styles, style: &Style) -> XmlElement {
    let mut e = XmlElement::new(STYLE_EL).with_attr("w:type", style.style_type().to_xml());
    if style.is_default() {
        e.set_attr("w:default", "1");
    }
    if style.is_custom() {
        e.set_attr("w:customStyle", "1");
    }
    e.set_attr("w:styleId", style.id());
    e.attributes.extend(style.foreign_attributes().iter().cloned());

    push(&mut e, XmlElement::new("w:name").with_attr(VAL, style.name()));
    if let Some(parent) = style.based_on() {
        let id = style_id_for(styles, parent, style.style_type());
        push(&mut e, XmlElement::new("w:basedOn").with_attr(VAL, id));
    }
    if let Some(next) = style.next() {
        let id = style_id_for(styles, next, style.style_type());
        push(&mut e, XmlElement::new("w:next").with_attr(VAL, id));
    }
    if let Some(priority) = style.priority() {
        push(
            &mut e,
            XmlElement::new("w:uiPriority").with_attr(VAL, priority.to_string()),
        );
    }
    if style.semi_hidden() {
        push(&mut e, XmlElement::new("w:semiHidden"));
    }
    if style.quick_format() {
        push(&mut e, XmlElement::new("w:qFormat"));
    }
    if let Some(ppr) = write_paragraph_properties(style.paragraph_formatting(), None) {
        push(&mut e, ppr);
    }
    if let Some(rpr) = write_run_properties(style.run_formatting(), None) {
        push(&mut e, rpr);
    }
    for foreign in style.foreign_elements() {
        push(&mut e, foreign.clone());
    }

    sort_children(&mut e, &STYLE);
    e
}

fn write_doc_defaults(defaults: &DocDefaults) -> XmlElement {
    let mut e = XmlElement::new(DOC_DEFAULTS_EL);
    let mut rpr_default = defaults
        .run_wrapper()
        .cloned()
        .unwrap_or_else(|| XmlElement::new(RPR_DEFAULT));
    if let Some(rpr) = write_run_properties(defaults.run_formatting(), None) {
        rpr_default.children.insert(0, XmlNode::Element(rpr));
    }
    let mut ppr_default = defaults
        .paragraph_wrapper()
        .cloned()
        .unwrap_or_else(|| XmlElement::new(PPR_DEFAULT));
    if let Some(ppr) = write_paragraph_properties(defaults.paragraph_formatting(), None) {
        ppr_default.children.insert(0, XmlNode::Element(ppr));
    }
    push(&mut e, rpr_default);
    push(&mut e, ppr_default);
    for foreign in defaults.foreign() {
        push(&mut e, foreign.clone());
    }
    sort_children(&mut e, &DOC_DEFAULTS);
    e
}

/// Serialize the catalog as a complete styles part.
pub(crate) fn write_styles(styles: &Styles) -> String {
    let mut root = XmlElement::new(STYLES);
    root.attributes = styles.root_attributes().to_vec();
    if root.attr("xmlns:w").is_none() {
        root.attributes.insert(0, ("xmlns:w".to_string(), namespace::WML_MAIN.to_string()));
    }

    push(&mut root, write_doc_defaults(styles.defaults()));
    if let Some(latent) = styles.latent_styles() {
        push(&mut root, latent.clone());
    }
    for style in styles.iter() {
        push(&mut root, write_style(styles, style));
    }
    for extra in styles.extras() {
        push(&mut root, extra.clone());
    }
    root.to_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::color::Color;
    use crate::ooxml::docx::enums::Alignment;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml" mc:Ignorable="w14">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:asciiTheme="minorHAnsi"/><w:sz w:val="22"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:latentStyles w:defQFormat="0"><w:lsdException w:name="Normal" w:qFormat="1"/></w:latentStyles>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:link w:val="Heading1Char"/><w:uiPriority w:val="9"/><w:qFormat/><w:rsid w:val="00A1"/><w:pPr><w:keepNext/><w:jc w:val="center"/></w:pPr><w:rPr><w:b/><w:color w:val="2F5496"/></w:rPr></w:style>
  <w:style w:type="character" w:customStyle="1" w:styleId="Heading1Char" w14:x="y"><w:name w:val="Heading 1 Char"/><w:basedOn w:val="DefaultParagraphFont"/></w:style>
</w:styles>"#;

    fn strict() -> ReadContext {
        ReadContext { lenient: false }
    }

    #[test]
    fn test_read_styles() {
        let styles = read_styles(SAMPLE, &strict()).unwrap();
        assert_eq!(styles.len(), 3);
        assert_eq!(styles.root_attributes().len(), 3);
        assert!(styles.latent_styles().is_some());

        let defaults = styles.defaults();
        assert_eq!(defaults.run_formatting().font_size().unwrap().size(), 22);
        assert_eq!(defaults.run_formatting().font_family(), None);
        assert_eq!(
            defaults.paragraph_formatting().space_after().unwrap().size(),
            160
        );

        let normal = styles.default_style(StyleType::Paragraph).unwrap();
        assert_eq!(normal.name(), "Normal");
        assert!(normal.quick_format());

        let heading = styles.get("heading 1", StyleType::Paragraph).unwrap();
        assert_eq!(heading.id(), "Heading1");
        assert_eq!(heading.based_on(), Some("Normal"));
        assert_eq!(heading.next(), Some("Normal"));
        assert_eq!(heading.priority(), Some(9));
        assert_eq!(heading.paragraph_formatting().alignment(), Some(Alignment::Center));
        assert_eq!(heading.run_formatting().bold(), Some(true));
        assert_eq!(heading.run_formatting().color(), Some(Color::rgb(0x2F, 0x54, 0x96)));
        assert_eq!(heading.foreign_elements().len(), 2);

        let link = styles.get("Heading 1 Char", StyleType::Character).unwrap();
        assert!(link.is_custom());
        // dangling ids are kept verbatim
        assert_eq!(link.based_on(), Some("DefaultParagraphFont"));
        assert_eq!(link.foreign_attributes(), &[("w14:x".to_string(), "y".to_string())]);
    }

    #[test]
    fn test_write_then_read_is_stable() {
        let styles = read_styles(SAMPLE, &strict()).unwrap();
        let once = write_styles(&styles);
        let again = read_styles(&once, &strict()).unwrap();
        assert_eq!(again, styles);
        assert_eq!(write_styles(&again), once);
    }

    #[test]
    fn test_defaults_wrappers_keep_unknown_content() {
        let xml = concat!(
            r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w15="urn:w15">"#,
            r#"<w:docDefaults><w:rPrDefault w15:mark="1"><w:rPr><w:sz w:val="22"/></w:rPr><w15:ext/></w:rPrDefault>"#,
            r#"<w:pPrDefault><w15:only/></w:pPrDefault></w:docDefaults></w:styles>"#,
        );
        let styles = read_styles(xml, &strict()).unwrap();
        let defaults = styles.defaults();
        assert_eq!(defaults.run_formatting().font_size().unwrap().size(), 22);
        assert!(!defaults.is_empty());

        let written = write_styles(&styles);
        assert!(written.contains(concat!(
            r#"<w:docDefaults><w:rPrDefault w15:mark="1"><w:rPr><w:sz w:val="22"/></w:rPr><w15:ext/></w:rPrDefault>"#,
            r#"<w:pPrDefault><w15:only/></w:pPrDefault></w:docDefaults>"#,
        )), "{written}");
        assert_eq!(read_styles(&written, &strict()).unwrap(), styles);
    }

    #[test]
    fn test_styles_part_under_another_prefix() {
        let xml = SAMPLE
            .replace("<w:", "<wx:")
            .replace("</w:", "</wx:")
            .replace(" w:", " wx:")
            .replace(r#"xmlns:w=""#, r#"xmlns:wx=""#);
        let styles = read_styles(&xml, &strict()).unwrap();
        assert_eq!(styles, read_styles(SAMPLE, &strict()).unwrap());
        let heading = styles.get("heading 1", StyleType::Paragraph).unwrap();
        assert_eq!(heading.paragraph_formatting().alignment(), Some(Alignment::Center));
        assert!(write_styles(&styles).contains(r#"<w:style w:type="paragraph" w:styleId="Heading1">"#));
    }

    #[test]
    fn test_written_style_uses_ids() {
        let mut styles = Styles::new();
        styles.add_style("My Base", StyleType::Paragraph).unwrap();
        styles
            .add_style("My Child", StyleType::Paragraph)
            .unwrap()
            .set_based_on(Some("My Base"))
            .set_next(Some("My Base"));
        let xml = write_styles(&styles);
        assert!(xml.contains(
            r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="MyChild"><w:name w:val="My Child"/><w:basedOn w:val="MyBase"/><w:next w:val="MyBase"/></w:style>"#
        ));
        let back = read_styles(&xml, &strict()).unwrap();
        assert_eq!(
            back.get("My Child", StyleType::Paragraph).unwrap().based_on(),
            Some("My Base")
        );
    }

    #[test]
    fn test_bad_style_type() {
        let xml = r#"<w:styles xmlns:w="x"><w:style w:type="bogus" w:styleId="A"><w:name w:val="A"/></w:style></w:styles>"#;
        assert!(matches!(
            read_styles(xml, &strict()),
            Err(OoxmlError::SerializationMapping { .. })
        ));
        let styles = read_styles(xml, &ReadContext { lenient: true }).unwrap();
        assert!(styles.is_empty());
        assert_eq!(styles.extras().len(), 1);
        assert!(write_styles(&styles).contains(r#"w:type="bogus""#));
    }
}
