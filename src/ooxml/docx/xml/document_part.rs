//! The main document part (`word/document.xml`).

use super::props::{read_paragraph_properties, read_run_properties, write_paragraph_properties, write_run_properties};
use super::styles_part::style_id_for;
use super::{ReadContext, parse_wml};
use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::document::Block;
use crate::ooxml::docx::enums::StyleType;
use crate::ooxml::docx::paragraph::{Paragraph, ParagraphChild};
use crate::ooxml::docx::run::{Run, RunContent};
use crate::ooxml::docx::styles::Styles;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;

const DOCUMENT: &str = "w:document";
const BODY: &str = "w:body";
const SECT_PR: &str = "w:sectPr";

/// Everything in the main document part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DocumentPart {
    /// Attributes of `w:document`, namespace declarations included
    pub root_attributes: Vec<(String, String)>,
    /// Children of `w:document` before the body (`w:background`)
    pub before_body: Vec<XmlElement>,
    pub body_attributes: Vec<(String, String)>,
    pub blocks: Vec<Block>,
    /// The final `w:sectPr` of the body
    pub section: Option<XmlElement>,
    pub after_body: Vec<XmlElement>,
}

/// The style name for a `w:pStyle`/`w:rStyle` id. Ids missing from the
/// catalog are kept as the name so the reference survives a round trip.
fn style_name(styles: &Styles, id: String, style_type: StyleType) -> String {
    match styles.get_by_id(&id) {
        Some(style) if style.style_type() == style_type => style.name().to_string(),
        _ => id,
    }
}

pub(crate) fn read_document(xml: &str, styles: &Styles, ctx: &ReadContext) -> Result<DocumentPart> {
    let root = parse_wml(xml)?;
    if root.name != DOCUMENT {
        return Err(OoxmlError::Xml(format!(
            "expected <{DOCUMENT}> root, found <{}>",
            root.name
        )));
    }

    let mut part = DocumentPart {
        root_attributes: root.attributes.clone(),
        ..Default::default()
    };
    let mut seen_body = false;

    for child in root.elements() {
        if child.name == BODY && !seen_body {
            seen_body = true;
            part.body_attributes = child.attributes.clone();
            read_body(child, styles, ctx, &mut part)?;
        } else if seen_body {
            part.after_body.push(child.clone());
        } else {
            part.before_body.push(child.clone());
        }
    }

    log::debug!(
        "read document part: {} blocks, {} opaque",
        part.blocks.len(),
        part.blocks.iter().filter(|b| matches!(b, Block::Opaque(_))).count()
    );
    Ok(part)
}

fn read_body(body: &XmlElement, styles: &Styles, ctx: &ReadContext, part: &mut DocumentPart) -> Result<()> {
    let elements: Vec<&XmlElement> = body.elements().collect();
    for (i, child) in elements.iter().enumerate() {
        match child.name.as_str() {
            "w:p" => part
                .blocks
                .push(Block::Paragraph(read_paragraph(child, styles, ctx)?)),
            SECT_PR if i + 1 == elements.len() => part.section = Some((*child).clone()),
            _ => part.blocks.push(Block::Opaque((*child).clone())),
        }
    }
    Ok(())
}

fn read_paragraph(p: &XmlElement, styles: &Styles, ctx: &ReadContext) -> Result<Paragraph> {
    let mut paragraph = Paragraph::new();
    *paragraph.attributes_mut() = p.attributes.clone();
    let mut seen_ppr = false;

    for child in p.elements() {
        match child.name.as_str() {
            "w:pPr" if !seen_ppr => {
                seen_ppr = true;
                let (fmt, style) = read_paragraph_properties(child, ctx)?;
                *paragraph.formatting_mut() = fmt;
                if let Some(id) = style {
                    paragraph.set_style(Some(&style_name(styles, id, StyleType::Paragraph)));
                }
            },
            "w:r" => {
                let run = read_run(child, styles, ctx)?;
                paragraph.push_child(ParagraphChild::Run(run));
            },
            _ => paragraph.push_child(ParagraphChild::Opaque(child.clone())),
        }
    }
    Ok(paragraph)
}

fn read_run(r: &XmlElement, styles: &Styles, ctx: &ReadContext) -> Result<Run> {
    let mut run = Run::default();
    *run.attributes_mut() = r.attributes.clone();
    let mut seen_rpr = false;

    for child in r.elements() {
        let plain = child.attributes.iter().all(|(k, _)| k == "xml:space");
        match child.name.as_str() {
            "w:rPr" if !seen_rpr => {
                seen_rpr = true;
                let (fmt, style) = read_run_properties(child, ctx)?;
                *run.properties_mut() = fmt;
                if let Some(id) = style {
                    let name = style_name(styles, id, StyleType::Character);
                    run.set_style(Some(&name));
                }
            },
            "w:t" if plain && child.elements().next().is_none() => {
                run.push_content(RunContent::Text(child.text()))
            },
            "w:tab" if child.attributes.is_empty() => run.push_content(RunContent::Tab),
            "w:br" if child.attributes.is_empty() => run.push_content(RunContent::Break),
            _ => run.push_content(RunContent::Opaque(child.clone())),
        }
    }
    Ok(run)
}

fn push(parent: &mut XmlElement, child: XmlElement) {
    parent.children.push(XmlNode::Element(child));
}

fn write_run(run: &Run, styles: &Styles) -> XmlElement {
    let mut r = XmlElement::new("w:r");
    r.attributes = run.attributes().to_vec();
    let style_id = run
        .style()
        .map(|name| style_id_for(styles, name, StyleType::Character));
    if let Some(rpr) = write_run_properties(run.properties(), style_id) {
        push(&mut r, rpr);
    }
    for item in run.content() {
        let child = match item {
            RunContent::Text(text) => {
                let mut t = XmlElement::new("w:t");
                if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                    t.set_attr("xml:space", "preserve");
                }
                if !text.is_empty() {
                    t.children.push(XmlNode::Text(text.clone()));
                }
                t
            },
            RunContent::Tab => XmlElement::new("w:tab"),
            RunContent::Break => XmlElement::new("w:br"),
            RunContent::Opaque(e) => e.clone(),
        };
        push(&mut r, child);
    }
    r
}

fn write_paragraph(paragraph: &Paragraph, styles: &Styles) -> XmlElement {
    let mut p = XmlElement::new("w:p");
    p.attributes = paragraph.attributes().to_vec();
    let style_id = paragraph
        .style()
        .map(|name| style_id_for(styles, name, StyleType::Paragraph));
    if let Some(ppr) = write_paragraph_properties(paragraph.formatting(), style_id) {
        push(&mut p, ppr);
    }
    for child in paragraph.children() {
        match child {
            ParagraphChild::Run(run) => push(&mut p, write_run(run, styles)),
            ParagraphChild::Opaque(e) => push(&mut p, e.clone()),
        }
    }
    p
}

/// Serialize the document part.
pub(crate) fn write_document(part: &DocumentPart, styles: &Styles) -> String {
    let mut root = XmlElement::new(DOCUMENT);
    root.attributes = part.root_attributes.clone();
    if root.attr("xmlns:w").is_none() {
        root.attributes.push(("xmlns:w".to_string(), namespace::WML_MAIN.to_string()));
    }
    for e in &part.before_body {
        push(&mut root, e.clone());
    }

    let mut body = XmlElement::new(BODY);
    body.attributes = part.body_attributes.clone();
    for block in &part.blocks {
        match block {
            Block::Paragraph(p) => push(&mut body, write_paragraph(p, styles)),
            Block::Opaque(e) => push(&mut body, e.clone()),
        }
    }
    if let Some(section) = &part.section {
        push(&mut body, section.clone());
    }
    push(&mut root, body);

    for e in &part.after_body {
        push(&mut root, e.clone());
    }
    root.to_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::enums::ShadePattern;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml">
  <w:body>
    <w:p w14:paraId="1A2B3C4D">
      <w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
      <w:r><w:rPr><w:shd w:val="pct25" w:color="FF0000"/></w:rPr><w:t xml:space="preserve">Hello </w:t></w:r>
      <w:bookmarkStart w:id="0" w:name="x"/>
      <w:r><w:t>world</w:t><w:tab/><w:br w:type="page"/><w:br/></w:r>
    </w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>
  </w:body>
</w:document>"#;

    fn styles() -> Styles {
        let mut styles = Styles::new();
        styles.add_style("heading 1", StyleType::Paragraph).unwrap();
        styles
    }

    fn load() -> DocumentPart {
        read_document(SAMPLE, &Styles::new(), &ReadContext::default()).unwrap()
    }

    #[test]
    fn test_read_document() {
        let part = load();
        assert_eq!(part.root_attributes.len(), 2);
        assert_eq!(part.blocks.len(), 2);
        assert!(part.section.is_some());
        let Block::Paragraph(p) = &part.blocks[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(p.attributes(), &[("w14:paraId".to_string(), "1A2B3C4D".to_string())]);
        assert_eq!(p.style(), Some("Heading1"));
        assert_eq!(p.run_count(), 2);
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.text(), "Hello world\t\n");
        let first = p.run(0).unwrap();
        assert_eq!(first.properties().shade_pattern(), Some(ShadePattern::Pct25));
        assert!(matches!(part.blocks[1], Block::Opaque(ref e) if e.name == "w:tbl"));
    }

    #[test]
    fn test_style_ids_map_to_names() {
        let styles = styles();
        let id = styles.get("heading 1", StyleType::Paragraph).unwrap().id().to_string();
        let xml = SAMPLE.replace("Heading1", &id);
        let part = read_document(&xml, &styles, &ReadContext::default()).unwrap();
        let Block::Paragraph(p) = &part.blocks[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(p.style(), Some("heading 1"));

        let written = write_document(&part, &styles);
        assert!(written.contains(&format!(r#"<w:pStyle w:val="{id}"/>"#)));
    }

    #[test]
    fn test_main_namespace_under_another_prefix() {
        let xml = SAMPLE
            .replace("<w:", "<ww:")
            .replace("</w:", "</ww:")
            .replace(" w:", " ww:")
            .replace(r#"xmlns:w=""#, r#"xmlns:ww=""#);
        assert!(!xml.contains("<w:"));
        let part = read_document(&xml, &Styles::new(), &ReadContext::default()).unwrap();
        assert_eq!(part, load());
        let Block::Paragraph(p) = &part.blocks[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(p.style(), Some("Heading1"));
        assert_eq!(p.run_count(), 2);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let part = load();
        let styles = Styles::new();
        let once = write_document(&part, &styles);
        let again = read_document(&once, &styles, &ReadContext::default()).unwrap();
        assert_eq!(again, part);
        assert_eq!(write_document(&again, &styles), once);
        assert!(once.contains(r#"<w:t xml:space="preserve">Hello </w:t>"#));
        assert!(once.contains(r#"<w:br w:type="page"/>"#));
        assert!(once.contains(r#"<w:bookmarkStart w:id="0" w:name="x"/>"#));
    }
}
