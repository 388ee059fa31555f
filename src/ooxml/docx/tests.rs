//! End-to-end tests: build, save, reload and resolve whole documents.

use super::*;
use crate::common::{Color, HalfPoints, SignedTwips, Twips, Uom};
use crate::ooxml::error::OoxmlError;
use crate::ooxml::opc::{Package, PackURI};
use std::fs;
use tempfile::tempdir;

const DOCUMENT_XML: &str = "/word/document.xml";

fn document_xml(doc: &Document) -> String {
    let package = doc.to_package().unwrap();
    let bytes = package
        .part(&PackURI::from_membername(DOCUMENT_XML))
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A package whose document part is `body` wrapped in `w:document`/`w:body`.
fn package_with_body(body: &str) -> Vec<u8> {
    let mut package = Document::new().to_package().unwrap();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" mc:Ignorable="w14"><w:body>{body}</w:body></w:document>"#
    );
    package.set_part(PackURI::from_membername(DOCUMENT_XML), xml.into_bytes());
    package.to_bytes(Compression::Deflated).unwrap()
}

/// Two paragraphs: one styled with two shaded runs, one plain.
fn sample_document() -> Document {
    let mut doc = Document::new();
    let style = doc
        .styles_mut()
        .add_style("Boxed", StyleType::Paragraph)
        .unwrap();
    style.set_based_on(Some("Normal"));
    let fmt = style.paragraph_formatting_mut();
    fmt.set_shade_fill(Some(Color::rgb(0xEE, 0xEE, 0xEE)));
    fmt.set_borders(BorderStyle::Single, Some(Color::BLACK), 0.5)
        .unwrap();

    doc.add_paragraph("Shaded ")
        .set_style(Some("Boxed"))
        .append("twice")
        .properties_mut()
        .set_shade_pattern(Some(ShadePattern::Pct25));
    {
        let first = doc.paragraph_mut(0).unwrap().run_mut(0).unwrap();
        first.properties_mut().set_shade_pattern(Some(ShadePattern::Pct10));
        first
            .properties_mut()
            .set_shade_color(Some(Color::rgb(0xFF, 0, 0)));
    }
    doc.add_paragraph("Plain");
    doc
}

#[test]
fn test_border_size_from_points() {
    let border = Border::new(BorderStyle::Single, Uom::from_points(1.5).unwrap());
    assert_eq!(border.size().size(), 12);
    assert_eq!(border.size().to_points(), 1.5);
    assert!(matches!(
        Uom::from_points(-1.0),
        Err(OoxmlError::InvalidMeasurement(_))
    ));
}

#[test]
fn test_assignment_independence() {
    let mut fmt = ParagraphFormatting::new();
    let mut b = Border::new(BorderStyle::Single, Uom::from_points(1.0).unwrap());
    fmt.set_border(BorderSide::Top, Some(b));
    fmt.set_border(BorderSide::Bottom, Some(b));
    assert_eq!(fmt.border(BorderSide::Top), fmt.border(BorderSide::Bottom));

    // the slots hold copies; changing the source afterwards changes nothing
    b.set_style(BorderStyle::Double);
    assert_eq!(
        fmt.border(BorderSide::Top).unwrap().style(),
        BorderStyle::Single
    );

    let b2 = Border::new(BorderStyle::Dotted, Uom::from_points(2.0).unwrap());
    fmt.set_border(BorderSide::Top, Some(b2));
    assert_eq!(fmt.border(BorderSide::Top), Some(b2));
    assert_eq!(
        fmt.border(BorderSide::Bottom).unwrap().style(),
        BorderStyle::Single
    );
}

#[test]
fn test_reset_is_idempotent() {
    let mut fmt = ParagraphFormatting::new();
    fmt.set_borders(BorderStyle::Thick, Some(Color::rgb(1, 2, 3)), 0.75)
        .unwrap();
    let before = fmt.clone();

    let top = fmt.border(BorderSide::Top);
    fmt.set_border(BorderSide::Top, top);
    fmt.set_border(BorderSide::Top, fmt.border(BorderSide::Top));
    assert_eq!(fmt, before);
    assert_eq!(fmt.border(BorderSide::Top), fmt.border(BorderSide::Top));
}

#[test]
fn test_cascade_resolution_order() {
    let f0 = "Calibri";
    let f1 = "Consolas";
    let f2 = "Georgia";

    let mut doc = Document::new();
    doc.styles_mut()
        .defaults_mut()
        .run_formatting_mut()
        .set_font_family(Some(f0.to_string()));
    doc.styles_mut()
        .add_style("Code", StyleType::Character)
        .unwrap()
        .run_formatting_mut()
        .set_font_family(Some(f1.to_string()));
    doc.add_paragraph("x").run_mut(0).unwrap().set_style(Some("Code"));

    let family = |doc: &Document| {
        let p = doc.paragraph(0).unwrap();
        doc.resolve_run(p, p.run(0).unwrap()).value.font.family
    };
    assert_eq!(family(&doc), f1);

    doc.paragraph_mut(0)
        .unwrap()
        .run_mut(0)
        .unwrap()
        .properties_mut()
        .set_font_family(Some(f2.to_string()));
    assert_eq!(family(&doc), f2);

    {
        let run = doc.paragraph_mut(0).unwrap().run_mut(0).unwrap();
        run.set_style(None);
        run.properties_mut().set_font_family(None);
    }
    assert_eq!(family(&doc), f0);
}

#[test]
fn test_unknown_style_falls_back_with_diagnostic() {
    let mut doc = Document::new();
    doc.styles_mut()
        .defaults_mut()
        .run_formatting_mut()
        .set_font_size(Some(HalfPoints::from_points(11.0).unwrap()));
    doc.add_paragraph("x").set_style(Some("Missing"));

    let p = doc.paragraph(0).unwrap();
    let resolved = doc.resolve_run(p, p.run(0).unwrap());
    assert_eq!(resolved.value.font.size.size(), 22);
    assert_eq!(
        resolved.diagnostics,
        [Diagnostic::UnknownStyle {
            name: "Missing".to_string(),
            style_type: StyleType::Paragraph,
        }]
    );
    assert!(matches!(
        resolved.into_result(),
        Err(OoxmlError::UnknownStyleReference { .. })
    ));
}

#[test]
fn test_duplicate_style_rejection() {
    let mut styles = Styles::new();
    styles.add_style("Code", StyleType::Paragraph).unwrap();
    assert!(matches!(
        styles.add_style("Code", StyleType::Paragraph),
        Err(OoxmlError::DuplicateStyleName { ref name, style_type: StyleType::Paragraph }) if name == "Code"
    ));
    styles.add_style("Code", StyleType::Character).unwrap();
    assert_eq!(styles.len(), 2);

    let paragraph = styles.get("Code", StyleType::Paragraph).unwrap().id();
    let character = styles.get("Code", StyleType::Character).unwrap().id();
    assert_ne!(paragraph, character);
}

#[test]
fn test_run_append_boundary() {
    let mut doc = Document::new();
    doc.add_paragraph("A").append("B").append("C");
    let p = doc.paragraph_mut(0).unwrap();
    let texts: Vec<String> = p.runs().map(Run::text).collect();
    assert_eq!(texts, ["A", "B", "C"]);

    p.run_mut(1).unwrap().properties_mut().set_bold(Some(true));
    assert_eq!(p.run(0).unwrap().properties().bold(), None);
    assert_eq!(p.run(1).unwrap().properties().bold(), Some(true));
    assert_eq!(p.run(2).unwrap().properties().bold(), None);
}

#[test]
fn test_save_load_round_trip() {
    let doc = sample_document();
    let bytes = doc.to_bytes().unwrap();
    let reloaded = Document::from_bytes(&bytes).unwrap();

    assert_eq!(reloaded.paragraph_count(), 2);
    assert_eq!(reloaded.styles(), doc.styles());
    let originals: Vec<&Paragraph> = doc.paragraphs().collect();
    let copies: Vec<&Paragraph> = reloaded.paragraphs().collect();
    assert_eq!(copies, originals);

    let first = reloaded.paragraph(0).unwrap();
    assert_eq!(first.style(), Some("Boxed"));
    assert_eq!(first.run_count(), 2);
    assert_eq!(
        first.run(0).unwrap().properties().shade_pattern(),
        Some(ShadePattern::Pct10)
    );
    assert_eq!(
        first.run(1).unwrap().properties().shade_pattern(),
        Some(ShadePattern::Pct25)
    );
    assert_eq!(reloaded.text(), "Shaded twice\nPlain");

    let eff = reloaded.resolve_paragraph(first).value;
    assert_eq!(eff.shade_fill, Some(Color::rgb(0xEE, 0xEE, 0xEE)));
    assert_eq!(eff.border(BorderSide::Left).unwrap().size().size(), 4);
    let plain = reloaded.resolve_paragraph(reloaded.paragraph(1).unwrap()).value;
    assert_eq!(plain.border(BorderSide::Left), None);
}

#[test]
fn test_absent_fields_are_not_written() {
    let mut doc = Document::new();
    doc.add_paragraph("plain");
    let xml = document_xml(&doc);
    assert!(xml.contains("<w:p><w:r><w:t>plain</w:t></w:r></w:p>"));
    assert!(!xml.contains("w:pPr"));
    assert!(!xml.contains("w:rPr"));
}

#[test]
fn test_foreign_content_survives() {
    let body = concat!(
        r#"<w:p w14:paraId="0A1B2C3D"><w:pPr><w:jc w:val="center"/><w:snapToGrid w:val="0"/></w:pPr>"#,
        r#"<w:r><w:rPr><w:b/><w:noProof/></w:rPr><w:t>keep</w:t></w:r>"#,
        r#"<w:proofErr w:type="spellStart"/></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
    );
    let mut package = Package::from_bytes(&package_with_body(body)).unwrap();
    let custom = PackURI::new("/customXml/item1.xml").unwrap();
    package.set_part(custom.clone(), b"<root xmlns=\"urn:x\">data</root>".to_vec());

    let mut doc = Document::from_package(package, &LoadOptions::default()).unwrap();
    assert_eq!(doc.paragraph_count(), 1);
    assert_eq!(doc.blocks().len(), 2);
    assert_eq!(
        doc.paragraph(0).unwrap().formatting().alignment(),
        Some(Alignment::Center)
    );
    doc.add_paragraph("added");

    let saved = doc.to_package().unwrap();
    assert_eq!(
        saved.part(&custom),
        Some(&b"<root xmlns=\"urn:x\">data</root>"[..])
    );
    let xml = document_xml(&doc);
    for fragment in [
        r#"w14:paraId="0A1B2C3D""#,
        r#"<w:snapToGrid w:val="0"/>"#,
        "<w:noProof/>",
        r#"<w:proofErr w:type="spellStart"/>"#,
        "<w:tbl>",
        r#"<w:pgSz w:w="11906" w:h="16838"/>"#,
        r#"mc:Ignorable="w14""#,
    ] {
        assert!(xml.contains(fragment), "{fragment} missing from {xml}");
    }
    // new paragraphs go before the final section properties
    let added = xml.find("added").unwrap();
    assert!(added < xml.find("<w:sectPr>").unwrap());
}

#[test]
fn test_unknown_values_strict_and_lenient() {
    let bytes = package_with_body(
        r#"<w:p><w:pPr><w:jc w:val="sideways"/><w:spacing w:after="120"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
    );

    let err = Document::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        OoxmlError::SerializationMapping { ref element, ref value, .. }
            if element == "w:jc" && value == "sideways"
    ));

    let package = Package::from_bytes(&bytes).unwrap();
    let options = LoadOptions::new().with_lenient_values(true);
    let doc = Document::from_package(package, &options).unwrap();
    let fmt = doc.paragraph(0).unwrap().formatting();
    assert_eq!(fmt.alignment(), None);
    assert_eq!(fmt.space_after(), Some(Twips::from_subunits(120)));
    assert!(document_xml(&doc).contains(r#"<w:jc w:val="sideways"/>"#));
}

#[test]
fn test_negative_indent_loads_and_round_trips() {
    let bytes = package_with_body(
        r#"<w:p><w:pPr><w:ind w:left="-360"/></w:pPr><w:r><w:t>outdented</w:t></w:r></w:p>"#,
    );
    let doc = Document::from_bytes(&bytes).unwrap();
    let para = doc.paragraph(0).unwrap();
    assert_eq!(
        para.formatting().indent_left(),
        Some(SignedTwips::from_subunits(-360))
    );
    let resolved = doc.resolve_paragraph(para).value;
    assert_eq!(resolved.indent_left.size(), -360);
    assert_eq!(resolved.indent_right, SignedTwips::ZERO);

    let xml = document_xml(&doc);
    assert!(xml.contains(r#"<w:ind w:left="-360"/>"#), "{xml}");
    let reloaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(reloaded.paragraph(0), doc.paragraph(0));
}

#[test]
fn test_create_save_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("styled.docx");

    let mut doc = sample_document();
    assert!(matches!(doc.save(), Err(OoxmlError::NoTargetPath)));

    let mut created = Document::create(&path);
    assert_eq!(created.state(), DocumentState::Created);
    assert!(!path.exists());
    created.add_paragraph("hello");
    assert_eq!(created.state(), DocumentState::Modified);
    created.save().unwrap();
    assert_eq!(created.state(), DocumentState::Saved);

    let opened = Document::open(&path).unwrap();
    assert_eq!(opened.state(), DocumentState::Loaded);
    assert_eq!(opened.text(), "hello");
    assert_eq!(opened.path(), Some(path.as_path()));

    let other = dir.path().join("copy.docx");
    doc.save_as(&other).unwrap();
    assert_eq!(doc.path(), Some(other.as_path()));
    assert_eq!(Document::open(&other).unwrap().paragraph_count(), 2);
}

#[test]
fn test_repeated_saves_are_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("twice.docx");

    let mut doc = sample_document();
    doc.save_as(&path).unwrap();
    let first = fs::read(&path).unwrap();
    doc.save().unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(first, second);

    let mut reopened = Document::open(&path).unwrap();
    reopened.save().unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[test]
fn test_stored_compression() {
    let mut doc = sample_document();
    doc.set_save_options(SaveOptions::new().with_compression(Compression::Stored));
    let bytes = doc.to_bytes().unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("Shaded "));
    assert_eq!(Document::from_bytes(&bytes).unwrap().paragraph_count(), 2);
}

#[test]
fn test_removed_style_is_gone_after_reload() {
    let mut doc = sample_document();
    assert!(matches!(
        doc.remove_style("Boxed", StyleType::Paragraph),
        Err(OoxmlError::StyleInUse { .. })
    ));
    doc.paragraph_mut(0).unwrap().set_style(None);
    let removed = doc.remove_style("Boxed", StyleType::Paragraph).unwrap();
    assert_eq!(removed.name(), "Boxed");

    let reloaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert!(!reloaded.styles().contains("Boxed", StyleType::Paragraph));
    assert!(reloaded.styles().contains("Normal", StyleType::Paragraph));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = Document::open(dir.path().join("absent.docx")).unwrap_err();
    assert!(matches!(err, OoxmlError::Opc(_) | OoxmlError::Io(_)));
}

#[test]
fn test_corrupt_package() {
    let err = Document::from_bytes(b"not a zip").unwrap_err();
    assert!(matches!(err, OoxmlError::Opc(_)));
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_length_round_trip(eighths in 0u32..100_000) {
            let points = eighths as f64 / 8.0;
            let uom = Uom::from_points(points).unwrap();
            prop_assert_eq!(uom.to_points(), points);
            prop_assert_eq!(uom.size(), eighths);
        }

        #[test]
        fn prop_text_survives_save_and_load(
            texts in proptest::collection::vec("[A-Za-z0-9 .,;:!?&<>\"'-]{0,24}", 1..5)
        ) {
            let mut doc = Document::new();
            for text in &texts {
                doc.add_paragraph(text);
            }
            let reloaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
            let got: Vec<String> = reloaded.paragraphs().map(Paragraph::text).collect();
            prop_assert_eq!(got, texts);
        }
    }
}
