//! Window and canvas configuration.

use crate::color::Color;
use crate::draw::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::error::CanvasError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the window hosting the canvases.
///
/// Every field has a default, so a JSON config only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Color around and between canvases.
    pub background: Color,
    pub font_family: String,
    pub font_size: u32,
    /// TrueType/OpenType file for desktop text. Text is skipped without one.
    pub font_path: Option<PathBuf>,
    /// Searched for sound files after the working directory.
    pub sound_dirs: Vec<PathBuf>,
    /// Pixels between and around canvases.
    pub gap: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sketchpad".to_string(),
            background: Color::new(0xC0C0C0),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_path: None,
            sound_dirs: Vec::new(),
            gap: 5,
        }
    }
}

impl WindowConfig {
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(text)?)
    }

    /// CSS font shorthand, e.g. `"32px verdana"`.
    pub fn css_font(&self, size: u32) -> String {
        format!("{size}px {}", self.font_family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = WindowConfig::from_json(r##"{ "title": "Demo", "background": "#808080" }"##).unwrap();
        assert_eq!(cfg.title, "Demo");
        assert_eq!(cfg.background, Color::new(0x808080));
        assert_eq!(cfg.font_size, 32);
        assert_eq!(cfg.gap, 5);
        assert_eq!(cfg.font_path, None);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let err = WindowConfig::from_json("{ \"gap\": \"wide\" }").unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
    }

    #[test]
    fn css_font() {
        assert_eq!(WindowConfig::default().css_font(18), "18px verdana");
    }
}
