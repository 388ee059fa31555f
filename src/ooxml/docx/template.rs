//! Document template module.
//!
//! The starting point of a new document: the package skeleton (content
//! types and relationships), a body holding one letter-size section, and a
//! style catalog with empty document defaults and a `Normal` paragraph
//! style. The document and styles parts themselves are generated from the
//! model on save.

use crate::common::xml::XmlElement;
use crate::ooxml::docx::enums::StyleType;
use crate::ooxml::docx::styles::{Style, Styles};
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::{Package, PackURI, Relationships};

pub(crate) const DOCUMENT_PART: &str = "/word/document.xml";
pub(crate) const STYLES_PART: &str = "/word/styles.xml";

/// Content types and relationships for a document and styles part.
pub(crate) fn default_package() -> Package {
    let mut pkg = Package::new();
    let types = pkg.content_types_mut();
    types.add_default("rels", ct::OPC_RELATIONSHIPS);
    types.add_default("xml", ct::XML);
    types.set_override(DOCUMENT_PART, ct::WML_DOCUMENT_MAIN);
    types.set_override(STYLES_PART, ct::WML_STYLES);

    let mut package_rels = Relationships::new("/");
    package_rels.get_or_add(rt::OFFICE_DOCUMENT, "word/document.xml");
    pkg.set_relationships(&PackURI::package(), &package_rels);

    let document = PackURI::from_membername(DOCUMENT_PART);
    let mut document_rels = Relationships::new(document.base_uri());
    document_rels.get_or_add(rt::STYLES, "styles.xml");
    pkg.set_relationships(&document, &document_rels);
    pkg
}

/// Namespace declarations on `w:document`.
pub(crate) fn document_namespaces() -> Vec<(String, String)> {
    vec![
        ("xmlns:r".to_string(), namespace::OFC_RELATIONSHIPS.to_string()),
        ("xmlns:w".to_string(), namespace::WML_MAIN.to_string()),
    ]
}

/// US Letter with one inch margins.
pub(crate) fn default_section() -> XmlElement {
    XmlElement::new("w:sectPr")
        .with_child(
            XmlElement::new("w:pgSz")
                .with_attr("w:w", "12240")
                .with_attr("w:h", "15840"),
        )
        .with_child(
            XmlElement::new("w:pgMar")
                .with_attr("w:top", "1440")
                .with_attr("w:right", "1440")
                .with_attr("w:bottom", "1440")
                .with_attr("w:left", "1440")
                .with_attr("w:header", "720")
                .with_attr("w:footer", "720")
                .with_attr("w:gutter", "0"),
        )
}

pub(crate) fn default_styles() -> Styles {
    let mut styles = Styles::new();
    styles.set_root_attributes(vec![(
        "xmlns:w".to_string(),
        namespace::WML_MAIN.to_string(),
    )]);
    let mut normal = Style::new("Normal".to_string(), "Normal".to_string(), StyleType::Paragraph);
    normal.set_default(true);
    normal.set_quick_format(true);
    styles.push_loaded(normal);
    styles
}
