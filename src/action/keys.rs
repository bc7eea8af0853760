//! A small, explicit key table for `SendKeys` (§4.6). Chromium's own key
//! tables (`ui/events/keycodes/dom/keycode_converter_data.inc`) are much
//! larger; this covers the printable-character and common control-key
//! cases the driver needs, modeled the same way: `key`/`code`/Windows
//! virtual-key-code triples.

/// A single key press, either a printable character or a named control
/// key. `SendKeys` dispatches one `rawKeyDown`+`keyUp` pair per `Key`,
/// plus a `char` event for `Char` so text actually appears in inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Shift,
    Control,
    Alt,
    Meta,
}

impl Key {
    /// The CDP `key` value (`UIEvents.KeyboardEvent.key`).
    pub fn key_value(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Space => " ".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::Home => "Home".to_string(),
            Key::End => "End".to_string(),
            Key::PageUp => "PageUp".to_string(),
            Key::PageDown => "PageDown".to_string(),
            Key::Shift => "Shift".to_string(),
            Key::Control => "Control".to_string(),
            Key::Alt => "Alt".to_string(),
            Key::Meta => "Meta".to_string(),
        }
    }

    /// The CDP `code` value (`UIEvents.KeyboardEvent.code`, physical key).
    pub fn code(&self) -> String {
        match self {
            Key::Char(c) if c.is_ascii_digit() => format!("Digit{c}"),
            Key::Char(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
            Key::Char(_) => "Unidentified".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Space => "Space".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::Home => "Home".to_string(),
            Key::End => "End".to_string(),
            Key::PageUp => "PageUp".to_string(),
            Key::PageDown => "PageDown".to_string(),
            Key::Shift => "ShiftLeft".to_string(),
            Key::Control => "ControlLeft".to_string(),
            Key::Alt => "AltLeft".to_string(),
            Key::Meta => "MetaLeft".to_string(),
        }
    }

    /// The Windows virtual-key code CDP expects in
    /// `windowsVirtualKeyCode`.
    pub fn virtual_key_code(&self) -> i64 {
        match self {
            Key::Char(c) if c.is_ascii_digit() => 0x30 + (*c as i64 - '0' as i64),
            Key::Char(c) if c.is_ascii_alphabetic() => 0x41 + (c.to_ascii_uppercase() as i64 - 'A' as i64),
            Key::Char(_) => 0,
            Key::Enter => 0x0D,
            Key::Tab => 0x09,
            Key::Backspace => 0x08,
            Key::Delete => 0x2E,
            Key::Escape => 0x1B,
            Key::Space => 0x20,
            Key::ArrowUp => 0x26,
            Key::ArrowDown => 0x28,
            Key::ArrowLeft => 0x25,
            Key::ArrowRight => 0x27,
            Key::Home => 0x24,
            Key::End => 0x23,
            Key::PageUp => 0x21,
            Key::PageDown => 0x22,
            Key::Shift => 0x10,
            Key::Control => 0x11,
            Key::Alt => 0x12,
            Key::Meta => 0x5B,
        }
    }

    /// Whether this key should also emit a `char` CDP event (text actually
    /// lands in editable elements without one).
    pub fn is_printable(&self) -> bool {
        matches!(self, Key::Char(_) | Key::Space)
    }
}

/// Splits a plain string into its constituent `Key::Char`s, the common
/// case for `SendKeys("some text")`.
pub fn chars(text: &str) -> Vec<Key> {
    text.chars()
        .map(|c| if c == ' ' { Key::Space } else { Key::Char(c) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_code_and_vk_match() {
        let key = Key::Char('7');
        assert_eq!(key.code(), "Digit7");
        assert_eq!(key.virtual_key_code(), 0x37);
    }

    #[test]
    fn letter_code_and_vk_match() {
        let key = Key::Char('q');
        assert_eq!(key.code(), "KeyQ");
        assert_eq!(key.virtual_key_code(), 0x51);
    }

    #[test]
    fn chars_splits_and_maps_spaces() {
        let keys = chars("ab c");
        assert_eq!(keys, vec![Key::Char('a'), Key::Char('b'), Key::Space, Key::Char('c')]);
    }
}
