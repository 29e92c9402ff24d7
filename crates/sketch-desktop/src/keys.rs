//! winit logical keys → DOM key names, so both backends share
//! [`sketch_core::KeyEvent::from_key_name`].

use sketch_core::KeyEvent;
use winit::keyboard::{Key, NamedKey};

/// DOM `KeyboardEvent.key` name for a winit key, if it has one.
pub fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Character(s) => Some(s.as_str()),
        Key::Named(named) => named_key_name(*named),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

fn named_key_name(key: NamedKey) -> Option<&'static str> {
    let name = match key {
        NamedKey::Escape => "Escape",
        NamedKey::ArrowLeft => "ArrowLeft",
        NamedKey::ArrowUp => "ArrowUp",
        NamedKey::ArrowRight => "ArrowRight",
        NamedKey::ArrowDown => "ArrowDown",
        NamedKey::Enter => "Enter",
        NamedKey::Backspace => "Backspace",
        NamedKey::Tab => "Tab",
        NamedKey::Delete => "Delete",
        NamedKey::Space => " ",
        NamedKey::Shift => "Shift",
        NamedKey::Control => "Control",
        NamedKey::Alt => "Alt",
        NamedKey::CapsLock => "CapsLock",
        NamedKey::PageUp => "PageUp",
        NamedKey::PageDown => "PageDown",
        NamedKey::End => "End",
        NamedKey::Home => "Home",
        NamedKey::Insert => "Insert",
        NamedKey::F1 => "F1",
        NamedKey::F2 => "F2",
        NamedKey::F3 => "F3",
        NamedKey::F4 => "F4",
        NamedKey::F5 => "F5",
        NamedKey::F6 => "F6",
        NamedKey::F7 => "F7",
        NamedKey::F8 => "F8",
        NamedKey::F9 => "F9",
        NamedKey::F10 => "F10",
        NamedKey::F11 => "F11",
        NamedKey::F12 => "F12",
        _ => return None,
    };
    Some(name)
}

/// Key event for a pressed winit key. Keys without a DOM name are skipped.
pub fn key_event(key: &Key) -> Option<KeyEvent> {
    key_name(key).map(KeyEvent::from_key_name)
}
