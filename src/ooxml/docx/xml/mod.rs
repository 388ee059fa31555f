//! Mapping between WordprocessingML parts and the document model.
//!
//! Parts are parsed into [`XmlElement`] trees first. Readers pick out the
//! elements and attributes the model knows and keep everything else in the
//! owning node's foreign slots. Writers rebuild each container from the
//! model, merge the foreign content back in and sort the children into
//! schema order.

pub(crate) mod document_part;
pub(crate) mod order;
pub(crate) mod props;
pub(crate) mod styles_part;

use crate::common::xml::{XmlElement, XmlNode};
use crate::ooxml::docx::formatting::Foreign;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;

pub(crate) const VAL: &str = "w:val";

/// Parse a WordprocessingML part with its main namespace spelled `w:`.
///
/// Readers match qualified names such as `w:p`. A part that binds the main
/// namespace to another prefix, or makes it the default namespace on the
/// root, has its element and attribute names rewritten to `w:` first.
pub(crate) fn parse_wml(xml: &str) -> Result<XmlElement> {
    let mut root = XmlElement::parse(xml)?;
    canonicalize_prefix(&mut root);
    Ok(root)
}

fn canonicalize_prefix(root: &mut XmlElement) {
    let mut bound: Option<String> = None;
    let mut w_taken = false;
    for (name, value) in &root.attributes {
        let prefix = match name.as_str() {
            "xmlns" => Some(""),
            other => other.strip_prefix("xmlns:"),
        };
        let Some(prefix) = prefix else { continue };
        if value == namespace::WML_MAIN {
            if prefix == "w" {
                return;
            }
            bound.get_or_insert_with(|| prefix.to_string());
        } else if prefix == "w" {
            w_taken = true;
        }
    }
    let Some(from) = bound else { return };
    if w_taken {
        log::warn!("prefix w is bound to another namespace; keeping names as written");
        return;
    }

    let declaration = if from.is_empty() {
        "xmlns".to_string()
    } else {
        format!("xmlns:{from}")
    };
    for (name, _) in root.attributes.iter_mut() {
        if *name == declaration {
            *name = "xmlns:w".to_string();
        }
    }
    log::debug!("reading prefix {from:?} as w");
    rename(root, &from, &declaration);
}

fn rename(element: &mut XmlElement, from: &str, declaration: &str) {
    // a subtree that rebinds the prefix is in another namespace
    if element
        .attr(declaration)
        .is_some_and(|ns| ns != namespace::WML_MAIN)
    {
        return;
    }
    let local = if from.is_empty() {
        (!element.name.contains(':')).then(|| element.name.clone())
    } else {
        element
            .name
            .strip_prefix(from)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(str::to_string)
    };
    if let Some(local) = local {
        element.name = format!("w:{local}");
    }
    // unprefixed attributes are in no namespace, so only a real prefix moves
    if !from.is_empty() {
        for (name, _) in element.attributes.iter_mut() {
            if let Some(local) = name.strip_prefix(from).and_then(|r| r.strip_prefix(':')) {
                *name = format!("w:{local}");
            }
        }
    }
    for child in element.children.iter_mut() {
        if let XmlNode::Element(child) = child {
            rename(child, from, declaration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_off_values() {
        let parse = |xml: &str| parse_on_off(&XmlElement::parse(xml).unwrap());
        assert!(parse("<w:b/>").unwrap());
        assert!(parse(r#"<w:b w:val="on"/>"#).unwrap());
        assert!(!parse(r#"<w:b w:val="false"/>"#).unwrap());
        assert!(!parse(r#"<w:b w:val="0"/>"#).unwrap());
        assert!(matches!(
            parse(r#"<w:b w:val="maybe"/>"#),
            Err(OoxmlError::SerializationMapping { .. })
        ));
    }

    #[test]
    fn test_lenient_accept() {
        let el = XmlElement::new("w:jc").with_attr(VAL, "sideways");
        let err = || Err::<u32, _>(OoxmlError::mapping("w:jc", VAL, "sideways"));
        assert!(ReadContext { lenient: false }.accept(&el, err()).is_err());
        assert_eq!(ReadContext { lenient: true }.accept(&el, err()).unwrap(), None);
        assert_eq!(ReadContext::default().accept(&el, Ok(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_other_prefix_reads_as_w() {
        let root = parse_wml(
            r#"<ww:document xmlns:ww="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:x="urn:x"><ww:body><ww:p><ww:pPr><ww:jc ww:val="center"/></ww:pPr><x:keep x:a="1"/></ww:p></ww:body></ww:document>"#,
        )
        .unwrap();
        assert_eq!(
            root.to_xml(),
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:x="urn:x"><w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr><x:keep x:a="1"/></w:p></w:body></w:document>"#
        );
    }

    #[test]
    fn test_default_namespace_reads_as_w() {
        let root = parse_wml(
            r#"<document xmlns="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:m="urn:m"><body><m:x/></body></document>"#,
        )
        .unwrap();
        assert_eq!(root.name, "w:document");
        assert_eq!(root.attr("xmlns:w"), Some(namespace::WML_MAIN));
        assert_eq!(root.attr("xmlns"), None);
        let body = root.child("w:body").unwrap();
        assert!(body.child("m:x").is_some());
    }

    #[test]
    fn test_w_bound_elsewhere_is_left_alone() {
        let xml = r#"<a:document xmlns:a="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w="urn:other"><w:x/></a:document>"#;
        let root = parse_wml(xml).unwrap();
        assert_eq!(root.name, "a:document");
        assert!(root.child("w:x").is_some());
    }

    #[test]
    fn test_unknown_attributes_round_trip() {
        let el = XmlElement::new("w:spacing")
            .with_attr("w:before", "120")
            .with_attr("w:beforeAutospacing", "1");
        let mut foreign = Foreign::default();
        keep_unknown_attributes(&el, &["w:before"], &mut foreign, "w:spacing");
        let mut out = XmlElement::new("w:spacing").with_attr("w:before", "240");
        restore_attributes(&mut out, &foreign, "w:spacing");
        assert_eq!(
            out.to_xml(),
            r#"<w:spacing w:before="240" w:beforeAutospacing="1"/>"#
        );
    }
}
