/// Enumerations used in WordprocessingML formatting.
///
/// Every enum maps one to one onto the string values of its XML simple type.
use std::fmt;

/// Declares a fieldless enum together with its XML string mapping.
macro_rules! xml_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $xml:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Convert to the XML attribute value.
            #[inline]
            pub const fn to_xml(self) -> &'static str {
                match self {
                    $($name::$variant => $xml),+
                }
            }

            /// Parse from the XML attribute value.
            ///
            /// Returns `None` if the value is not recognized.
            #[inline]
            pub fn from_xml(s: &str) -> Option<Self> {
                match s {
                    $($xml => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.to_xml())
            }
        }
    };
}

/// Specifies one of the four style types: paragraph, character, table or
/// numbering.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::docx::enums::StyleType;
///
/// assert_eq!(StyleType::Paragraph.to_xml(), "paragraph");
/// assert_eq!(StyleType::from_xml("numbering"), Some(StyleType::Numbering));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StyleType {
    /// Paragraph style. A `w:style` without `w:type` is a paragraph style.
    #[default]
    Paragraph = 1,
    /// Character style.
    Character = 2,
    /// Table style.
    Table = 3,
    /// Numbering (list) style.
    Numbering = 4,
}

impl StyleType {
    #[inline]
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
            Self::Table => "table",
            Self::Numbering => "numbering",
        }
    }

    #[inline]
    pub fn from_xml(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(Self::Paragraph),
            "character" => Some(Self::Character),
            "table" => Some(Self::Table),
            "numbering" => Some(Self::Numbering),
            _ => None,
        }
    }

    /// Suffix appended to a generated style id, so that a paragraph style and
    /// a character style of the same name get distinct ids.
    pub(crate) const fn id_suffix(self) -> &'static str {
        match self {
            Self::Paragraph => "",
            Self::Character => "Char",
            Self::Table => "Table",
            Self::Numbering => "List",
        }
    }
}

impl fmt::Display for StyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paragraph => write!(f, "Paragraph"),
            Self::Character => write!(f, "Character"),
            Self::Table => write!(f, "Table"),
            Self::Numbering => write!(f, "Numbering"),
        }
    }
}

xml_enum! {
    /// Paragraph alignment (`ST_Jc`).
    pub enum Alignment {
        Left => "left",
        Center => "center",
        Right => "right",
        /// Justified.
        Both => "both",
        Distribute => "distribute",
        Start => "start",
        End => "end",
        MediumKashida => "mediumKashida",
        HighKashida => "highKashida",
        LowKashida => "lowKashida",
        ThaiDistribute => "thaiDistribute",
    }
}

xml_enum! {
    /// Border line style (`ST_Border`, line styles only).
    pub enum BorderStyle {
        /// No border, overriding any inherited border.
        Nil => "nil",
        None => "none",
        Single => "single",
        Thick => "thick",
        Double => "double",
        Dotted => "dotted",
        Dashed => "dashed",
        DotDash => "dotDash",
        DotDotDash => "dotDotDash",
        Triple => "triple",
        ThinThickSmallGap => "thinThickSmallGap",
        ThickThinSmallGap => "thickThinSmallGap",
        ThinThickThinSmallGap => "thinThickThinSmallGap",
        ThinThickMediumGap => "thinThickMediumGap",
        ThickThinMediumGap => "thickThinMediumGap",
        ThinThickThinMediumGap => "thinThickThinMediumGap",
        ThinThickLargeGap => "thinThickLargeGap",
        ThickThinLargeGap => "thickThinLargeGap",
        ThinThickThinLargeGap => "thinThickThinLargeGap",
        Wave => "wave",
        DoubleWave => "doubleWave",
        DashSmallGap => "dashSmallGap",
        DashDotStroked => "dashDotStroked",
        ThreeDEmboss => "threeDEmboss",
        ThreeDEngrave => "threeDEngrave",
        Outset => "outset",
        Inset => "inset",
    }
}

xml_enum! {
    /// Shading pattern (`ST_Shd`).
    ///
    /// The pattern is drawn in the shading color over the fill color.
    pub enum ShadePattern {
        Nil => "nil",
        /// Fill color only, no pattern.
        Clear => "clear",
        /// Shading color only.
        Solid => "solid",
        HorzStripe => "horzStripe",
        VertStripe => "vertStripe",
        ReverseDiagStripe => "reverseDiagStripe",
        DiagStripe => "diagStripe",
        HorzCross => "horzCross",
        DiagCross => "diagCross",
        ThinHorzStripe => "thinHorzStripe",
        ThinVertStripe => "thinVertStripe",
        ThinReverseDiagStripe => "thinReverseDiagStripe",
        ThinDiagStripe => "thinDiagStripe",
        ThinHorzCross => "thinHorzCross",
        ThinDiagCross => "thinDiagCross",
        Pct5 => "pct5",
        Pct10 => "pct10",
        Pct12 => "pct12",
        Pct15 => "pct15",
        Pct20 => "pct20",
        Pct25 => "pct25",
        Pct30 => "pct30",
        Pct35 => "pct35",
        Pct37 => "pct37",
        Pct40 => "pct40",
        Pct45 => "pct45",
        Pct50 => "pct50",
        Pct55 => "pct55",
        Pct60 => "pct60",
        Pct62 => "pct62",
        Pct65 => "pct65",
        Pct70 => "pct70",
        Pct75 => "pct75",
        Pct80 => "pct80",
        Pct85 => "pct85",
        Pct87 => "pct87",
        Pct90 => "pct90",
        Pct95 => "pct95",
    }
}

xml_enum! {
    /// Run underline style (`ST_Underline`).
    pub enum UnderlineStyle {
        Single => "single",
        Words => "words",
        Double => "double",
        Thick => "thick",
        Dotted => "dotted",
        DottedHeavy => "dottedHeavy",
        Dash => "dash",
        DashedHeavy => "dashedHeavy",
        DashLong => "dashLong",
        DashLongHeavy => "dashLongHeavy",
        DotDash => "dotDash",
        DashDotHeavy => "dashDotHeavy",
        DotDotDash => "dotDotDash",
        DashDotDotHeavy => "dashDotDotHeavy",
        Wave => "wave",
        WavyHeavy => "wavyHeavy",
        WavyDouble => "wavyDouble",
        None => "none",
    }
}

xml_enum! {
    /// Vertical position of run text (`ST_VerticalAlignRun`).
    pub enum VerticalAlign {
        Baseline => "baseline",
        Superscript => "superscript",
        Subscript => "subscript",
    }
}

xml_enum! {
    /// One edge of a paragraph's border box.
    pub enum BorderSide {
        Top => "top",
        Left => "left",
        Bottom => "bottom",
        Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_type_conversion() {
        for t in [
            StyleType::Paragraph,
            StyleType::Character,
            StyleType::Table,
            StyleType::Numbering,
        ] {
            assert_eq!(StyleType::from_xml(t.to_xml()), Some(t));
        }
        assert_eq!(StyleType::from_xml("list"), None);
        assert_eq!(StyleType::default(), StyleType::Paragraph);
        assert_eq!(StyleType::Character.to_string(), "Character");
    }

    #[test]
    fn test_every_value_maps_back() {
        for v in BorderStyle::ALL {
            assert_eq!(BorderStyle::from_xml(v.to_xml()), Some(*v));
        }
        for v in ShadePattern::ALL {
            assert_eq!(ShadePattern::from_xml(v.to_xml()), Some(*v));
        }
        for v in UnderlineStyle::ALL {
            assert_eq!(UnderlineStyle::from_xml(v.to_xml()), Some(*v));
        }
        for v in Alignment::ALL {
            assert_eq!(Alignment::from_xml(v.to_xml()), Some(*v));
        }
    }

    #[test]
    fn test_unknown_values() {
        assert_eq!(BorderStyle::from_xml("apples"), None);
        assert_eq!(ShadePattern::from_xml("pct11"), None);
        assert_eq!(Alignment::from_xml("Center"), None);
        assert_eq!(VerticalAlign::from_xml("super"), None);
    }

    #[test]
    fn test_display_uses_xml_value() {
        assert_eq!(ShadePattern::Pct25.to_string(), "pct25");
        assert_eq!(BorderSide::Bottom.to_string(), "bottom");
    }
}
