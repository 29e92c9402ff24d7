//! Single-line text for the desktop painter.
//!
//! Canvas text is one left-aligned line on a baseline, so glyphs are placed
//! by summing advance widths from the font's character map. No shaping,
//! kerning or fallback fonts.

use kurbo::{Affine, Point};
use peniko::{Blob, Color, Fill, Font};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vello::Glyph;
use vello::Scene;
use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, MetadataProvider};

/// A loaded font file, ready for glyph drawing.
#[derive(Clone)]
pub struct GlyphFont {
    font: Font,
}

impl GlyphFont {
    /// Wrap font bytes. Returns `None` if they are not a readable font.
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        FontRef::from_index(&data, 0).ok()?;
        let font = Font::new(Blob::new(Arc::new(data)), 0);
        Some(Self { font })
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not a TrueType/OpenType font", path.display()),
            )
        })
    }

    /// Look for `<family>.ttf` (any case) in the usual system font folders.
    pub fn find_system(family: &str) -> Option<Self> {
        let wanted = format!("{}.ttf", family.to_ascii_lowercase());
        font_dirs()
            .into_iter()
            .find_map(|dir| find_file(&dir, &wanted, 3))
            .and_then(|path| match Self::load(&path) {
                Ok(font) => {
                    log::info!("using font {}", path.display());
                    Some(font)
                }
                Err(err) => {
                    log::warn!("can't load font {}: {err}", path.display());
                    None
                }
            })
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.font.data.data(), self.font.index).ok()
    }

    /// Pen positions for `text` at `size` pixels, relative to the origin.
    pub fn layout(&self, text: &str, size: f32) -> Vec<Glyph> {
        let Some(font_ref) = self.font_ref() else {
            return Vec::new();
        };
        let charmap = font_ref.charmap();
        let metrics = font_ref.glyph_metrics(Size::new(size), LocationRef::default());

        let mut pen_x = 0.0f32;
        text.chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or_default();
                let x = pen_x;
                pen_x += metrics.advance_width(gid).unwrap_or_default();
                Glyph {
                    id: gid.to_u32(),
                    x,
                    y: 0.0,
                }
            })
            .collect()
    }

    /// Draw `text` with its baseline starting at `origin`.
    pub fn draw(&self, scene: &mut Scene, origin: Point, text: &str, size: f32, color: Color) {
        let glyphs = self.layout(text, size);
        if glyphs.is_empty() {
            return;
        }
        scene
            .draw_glyphs(&self.font)
            .font_size(size)
            .transform(Affine::translate(origin.to_vec2()))
            .brush(color)
            .draw(Fill::NonZero, glyphs.into_iter());
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(Path::new(&home).join(".fonts"));
        dirs.push(Path::new(&home).join(".local/share/fonts"));
    }
    dirs
}

fn find_file(dir: &Path, wanted_lowercase: &str, depth: u32) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_ascii_lowercase() == wanted_lowercase)
        {
            return Some(path);
        }
    }
    if depth == 0 {
        return None;
    }
    subdirs
        .into_iter()
        .find_map(|sub| find_file(&sub, wanted_lowercase, depth - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_a_font() {
        assert!(GlyphFont::from_bytes(b"definitely not a font".to_vec()).is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(GlyphFont::load(Path::new("/nonexistent/verdana.ttf")).is_err());
    }

    #[test]
    fn find_file_respects_depth() {
        let root = std::env::temp_dir().join(format!("sketch-font-{}", std::process::id()));
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Verdana.TTF"), b"x").unwrap();

        assert!(find_file(&root, "verdana.ttf", 0).is_none());
        assert_eq!(find_file(&root, "verdana.ttf", 2), Some(nested.join("Verdana.TTF")));

        fs::remove_dir_all(&root).unwrap();
    }
}
