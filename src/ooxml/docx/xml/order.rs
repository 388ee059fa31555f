//! WordprocessingML child order.
//!
//! Containers are regenerated from the model and then merged with preserved
//! foreign children, so the result is sorted by schema rank before it is
//! written. Elements missing from a table sort after every known element and
//! keep their relative order.

use crate::common::xml::{XmlElement, XmlNode};
use phf::phf_map;

pub(crate) type RankTable = phf::Map<&'static str, u16>;

/// `CT_PPr`
pub(crate) static PARAGRAPH_PROPERTIES: RankTable = phf_map! {
    "w:pStyle" => 0,
    "w:keepNext" => 1,
    "w:keepLines" => 2,
    "w:pageBreakBefore" => 3,
    "w:framePr" => 4,
    "w:widowControl" => 5,
    "w:numPr" => 6,
    "w:suppressLineNumbers" => 7,
    "w:pBdr" => 8,
    "w:shd" => 9,
    "w:tabs" => 10,
    "w:suppressAutoHyphens" => 11,
    "w:kinsoku" => 12,
    "w:wordWrap" => 13,
    "w:overflowPunct" => 14,
    "w:topLinePunct" => 15,
    "w:autoSpaceDE" => 16,
    "w:autoSpaceDN" => 17,
    "w:bidi" => 18,
    "w:adjustRightInd" => 19,
    "w:snapToGrid" => 20,
    "w:spacing" => 21,
    "w:ind" => 22,
    "w:contextualSpacing" => 23,
    "w:mirrorIndents" => 24,
    "w:suppressOverlap" => 25,
    "w:jc" => 26,
    "w:textDirection" => 27,
    "w:textAlignment" => 28,
    "w:textboxTightWrap" => 29,
    "w:outlineLvl" => 30,
    "w:divId" => 31,
    "w:cnfStyle" => 32,
    "w:rPr" => 33,
    "w:sectPr" => 34,
    "w:pPrChange" => 35,
};

/// `CT_RPr`
pub(crate) static RUN_PROPERTIES: RankTable = phf_map! {
    "w:rStyle" => 0,
    "w:rFonts" => 1,
    "w:b" => 2,
    "w:bCs" => 3,
    "w:i" => 4,
    "w:iCs" => 5,
    "w:caps" => 6,
    "w:smallCaps" => 7,
    "w:strike" => 8,
    "w:dstrike" => 9,
    "w:outline" => 10,
    "w:shadow" => 11,
    "w:emboss" => 12,
    "w:imprint" => 13,
    "w:noProof" => 14,
    "w:snapToGrid" => 15,
    "w:vanish" => 16,
    "w:webHidden" => 17,
    "w:color" => 18,
    "w:spacing" => 19,
    "w:w" => 20,
    "w:kern" => 21,
    "w:position" => 22,
    "w:sz" => 23,
    "w:szCs" => 24,
    "w:highlight" => 25,
    "w:u" => 26,
    "w:effect" => 27,
    "w:bdr" => 28,
    "w:shd" => 29,
    "w:fitText" => 30,
    "w:vertAlign" => 31,
    "w:rtl" => 32,
    "w:cs" => 33,
    "w:em" => 34,
    "w:lang" => 35,
    "w:eastAsianLayout" => 36,
    "w:specVanish" => 37,
    "w:oMath" => 38,
    "w:rPrChange" => 39,
};

/// `CT_PBdr`
pub(crate) static PARAGRAPH_BORDERS: RankTable = phf_map! {
    "w:top" => 0,
    "w:left" => 1,
    "w:start" => 1,
    "w:bottom" => 2,
    "w:right" => 3,
    "w:end" => 3,
    "w:between" => 4,
    "w:bar" => 5,
};

/// `CT_Style`
pub(crate) static STYLE: RankTable = phf_map! {
    "w:name" => 0,
    "w:aliases" => 1,
    "w:basedOn" => 2,
    "w:next" => 3,
    "w:link" => 4,
    "w:autoRedefine" => 5,
    "w:hidden" => 6,
    "w:uiPriority" => 7,
    "w:semiHidden" => 8,
    "w:unhideWhenUsed" => 9,
    "w:qFormat" => 10,
    "w:locked" => 11,
    "w:personal" => 12,
    "w:personalCompose" => 13,
    "w:personalReply" => 14,
    "w:rsid" => 15,
    "w:pPr" => 16,
    "w:rPr" => 17,
    "w:tblPr" => 18,
    "w:trPr" => 19,
    "w:tcPr" => 20,
    "w:tblStylePr" => 21,
};

/// `CT_DocDefaults`
pub(crate) static DOC_DEFAULTS: RankTable = phf_map! {
    "w:rPrDefault" => 0,
    "w:pPrDefault" => 1,
};

/// Rank of `name` in `table`; unknown names sort last.
#[inline]
pub(crate) fn rank(table: &RankTable, name: &str) -> u16 {
    table.get(name).copied().unwrap_or(u16::MAX)
}

/// Stable-sort the child elements of `parent` by schema rank. Character
/// data between elements is dropped; property containers have none.
pub(crate) fn sort_children(parent: &mut XmlElement, table: &RankTable) {
    parent
        .children
        .retain(|node| matches!(node, XmlNode::Element(_)));
    parent.children.sort_by_key(|node| match node {
        XmlNode::Element(e) => rank(table, &e.name),
        XmlNode::Text(_) => u16::MAX,
    });
}
