//! Input events delivered to canvas handlers.
//!
//! Both backends normalize their native keyboard events through
//! [`KeyEvent::from_key_name`], which takes the DOM `KeyboardEvent.key`
//! vocabulary (`"a"`, `"ArrowLeft"`, `"Escape"`, ...). The desktop backend
//! translates window-system keys to the same names first.

use serde::{Deserialize, Serialize};

/// Value of [`KeyEvent::ch`] when the key does not represent a Unicode symbol.
pub const UNDEFINED_CHAR: char = '\u{FFFF}';
pub const ESCAPE: char = '\u{1b}';

pub const ESCAPE_CODE: u32 = 27;
pub const LEFT_CODE: u32 = 37;
pub const UP_CODE: u32 = 38;
pub const RIGHT_CODE: u32 = 39;
pub const DOWN_CODE: u32 = 40;

/// A mouse position in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    /// Primary button held. Always `true` for mouse-down events.
    pub down: bool,
}

impl MouseEvent {
    pub fn new(x: i32, y: i32, down: bool) -> Self {
        Self { x, y, down }
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The typed character, or [`UNDEFINED_CHAR`].
    pub ch: char,
    /// Virtual key code (`ESCAPE_CODE`, `LEFT_CODE`, upper-case ASCII for letters, ...).
    /// Zero when the key has no known code.
    pub code: u32,
    /// Human-readable key name, e.g. `"Escape"`, `"Left"`, `"A"`.
    pub text: String,
}

impl KeyEvent {
    pub fn new(ch: char, code: u32, text: impl Into<String>) -> Self {
        Self {
            ch,
            code,
            text: text.into(),
        }
    }

    /// Build a key event from a DOM-style key name.
    pub fn from_key_name(key: &str) -> Self {
        if let Some(named) = named_key(key) {
            return named;
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::new(ch, char_code(ch), char_text(ch)),
            _ => Self::new(UNDEFINED_CHAR, 0, key),
        }
    }

    /// `true` when the key produced a printable character.
    pub fn is_char(&self) -> bool {
        self.ch != UNDEFINED_CHAR && !self.ch.is_control()
    }
}

fn named_key(key: &str) -> Option<KeyEvent> {
    let (ch, code, text) = match key {
        "Escape" | "Esc" => (ESCAPE, ESCAPE_CODE, "Escape"),
        "ArrowLeft" | "Left" => (UNDEFINED_CHAR, LEFT_CODE, "Left"),
        "ArrowUp" | "Up" => (UNDEFINED_CHAR, UP_CODE, "Up"),
        "ArrowRight" | "Right" => (UNDEFINED_CHAR, RIGHT_CODE, "Right"),
        "ArrowDown" | "Down" => (UNDEFINED_CHAR, DOWN_CODE, "Down"),
        "Enter" => ('\n', 10, "Enter"),
        "Backspace" => ('\u{8}', 8, "Backspace"),
        "Tab" => ('\t', 9, "Tab"),
        "Delete" => ('\u{7f}', 127, "Delete"),
        " " | "Spacebar" => (' ', 32, "Space"),
        "Shift" => (UNDEFINED_CHAR, 16, "Shift"),
        "Control" => (UNDEFINED_CHAR, 17, "Ctrl"),
        "Alt" => (UNDEFINED_CHAR, 18, "Alt"),
        "CapsLock" => (UNDEFINED_CHAR, 20, "Caps Lock"),
        "PageUp" => (UNDEFINED_CHAR, 33, "Page Up"),
        "PageDown" => (UNDEFINED_CHAR, 34, "Page Down"),
        "End" => (UNDEFINED_CHAR, 35, "End"),
        "Home" => (UNDEFINED_CHAR, 36, "Home"),
        "Insert" => (UNDEFINED_CHAR, 155, "Insert"),
        _ => return function_key(key),
    };
    Some(KeyEvent::new(ch, code, text))
}

fn function_key(key: &str) -> Option<KeyEvent> {
    let n: u32 = key.strip_prefix('F')?.parse().ok()?;
    if (1..=12).contains(&n) {
        Some(KeyEvent::new(UNDEFINED_CHAR, 111 + n, key))
    } else {
        None
    }
}

fn char_code(ch: char) -> u32 {
    match ch {
        'a'..='z' => ch.to_ascii_uppercase() as u32,
        'A'..='Z' | '0'..='9' => ch as u32,
        ',' | '-' | '.' | '/' | ';' | '=' | '[' | '\\' | ']' => ch as u32,
        _ => 0,
    }
}

fn char_text(ch: char) -> String {
    let name = match ch {
        ',' => "Comma",
        '-' => "Minus",
        '.' => "Period",
        '/' => "Slash",
        ';' => "Semicolon",
        '=' => "Equals",
        '[' => "Open Bracket",
        '\\' => "Back Slash",
        ']' => "Close Bracket",
        _ => return ch.to_ascii_uppercase().to_string(),
    };
    name.to_string()
}
