//! 24-bit RGB colors.
//!
//! Colors are plain `0xRRGGBB` integers on the public surface, the way
//! callers write them (`0x00FFFF`, `RED`). Each backend converts them to
//! its own representation: a CSS hex string for the browser, a
//! `peniko::Color` for the desktop painter.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An opaque RGB color. Bits above the low 24 are ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

pub const BLACK: Color = Color(0x000000);
pub const WHITE: Color = Color(0xFFFFFF);
pub const RED: Color = Color(0xFF0000);
pub const GREEN: Color = Color(0x00FF00);
pub const BLUE: Color = Color(0x0000FF);
pub const YELLOW: Color = Color(0xFFFF00);
pub const CYAN: Color = Color(0x00FFFF);
pub const MAGENTA: Color = Color(0xFF00FF);

impl Color {
    /// Build a color from a `0xRRGGBB` value.
    pub const fn new(rgb: u32) -> Self {
        Color(rgb & 0xFF_FFFF)
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// CSS form used by the browser backend: `#rrggbb`, lowercase,
    /// always six digits.
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Parse `#rrggbb` or `rrggbb`. Returns `None` on anything else.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Color::new)
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Color::new(rgb)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`, expected #rrggbb")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_is_zero_padded_lowercase() {
        assert_eq!(CYAN.to_css(), "#00ffff");
        assert_eq!(BLACK.to_css(), "#000000");
        assert_eq!(Color::new(0xAAAAAA).to_css(), "#aaaaaa");
        assert_eq!(BLUE.to_css(), "#0000ff");
    }

    #[test]
    fn high_bits_are_dropped() {
        let c = Color::new(0xFF12_3456);
        assert_eq!(c.value(), 0x12_3456);
        assert_eq!(c.to_css(), "#123456");
    }

    #[test]
    fn channels() {
        let c = Color::new(0x7777FF);
        assert_eq!((c.red(), c.green(), c.blue()), (0x77, 0x77, 0xFF));
        assert_eq!(Color::rgb(0x77, 0x77, 0xFF), c);
    }

    #[test]
    fn parse_hex_accepts_optional_hash() {
        assert_eq!(Color::parse_hex("#FF7777"), Some(Color::new(0xFF7777)));
        assert_eq!(Color::parse_hex("c0c0c0"), Some(Color::new(0xC0C0C0)));
        assert_eq!(Color::parse_hex("#fff"), None);
        assert_eq!(Color::parse_hex("#gggggg"), None);
    }

    #[test]
    fn serde_uses_css_string() {
        let json = serde_json::to_string(&MAGENTA).unwrap();
        assert_eq!(json, "\"#ff00ff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MAGENTA);
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
