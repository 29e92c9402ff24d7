//! Sound file naming shared by both backends.

/// Extension appended to sound names that have none.
pub const DEFAULT_SOUND_EXTENSION: &str = "wav";

/// `"click"` → `"click.wav"`; names with an extension are kept as-is.
///
/// A leading dot does not count as an extension, so `".wav"` becomes
/// `".wav.wav"`.
pub fn sound_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.to_string(),
        _ => format!("{name}.{DEFAULT_SOUND_EXTENSION}"),
    }
}
