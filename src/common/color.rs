use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use longan::common::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// assert_eq!(red.to_hex(), "FF0000");
/// assert_eq!(blue.b, 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string such as `"FF0000"` or `"#FF0000"`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to an upper-case hex string without `#` prefix.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// A WordprocessingML color value (`ST_HexColor`).
///
/// Either the literal `auto`, which lets the consumer pick a contrasting color,
/// or an explicit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Auto,
    Rgb(RGBColor),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(RGBColor::new(0, 0, 0));
    pub const WHITE: Color = Color::Rgb(RGBColor::new(255, 255, 255));

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(RGBColor::new(r, g, b))
    }

    /// Parse the attribute form: `auto` (case-insensitive) or six hex digits.
    pub fn from_xml(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Some(Color::Auto);
        }
        RGBColor::from_hex(s).map(Color::Rgb)
    }

    pub fn to_xml(&self) -> String {
        match self {
            Color::Auto => "auto".to_string(),
            Color::Rgb(rgb) => rgb.to_hex(),
        }
    }

    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl From<RGBColor> for Color {
    fn from(rgb: RGBColor) -> Self {
        Color::Rgb(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Rgb(rgb) => rgb.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = RGBColor::from_hex("#1f2E3d").unwrap();
        assert_eq!(c, RGBColor::new(0x1F, 0x2E, 0x3D));
        assert_eq!(c.to_hex(), "1F2E3D");
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(RGBColor::from_hex("12345").is_none());
        assert!(RGBColor::from_hex("GGGGGG").is_none());
        assert!(RGBColor::from_hex("ééé").is_none());
    }

    #[test]
    fn test_color_xml_forms() {
        assert_eq!(Color::from_xml("auto"), Some(Color::Auto));
        assert_eq!(Color::from_xml("AUTO"), Some(Color::Auto));
        assert_eq!(Color::from_xml("FF0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_xml("red"), None);
        assert_eq!(Color::Auto.to_xml(), "auto");
        assert_eq!(Color::rgb(0, 128, 255).to_xml(), "0080FF");
    }
}
