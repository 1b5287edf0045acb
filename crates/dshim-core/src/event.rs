#![forbid(unsafe_code)]

//! Keyboard events delivered to the dialog engine.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    Char(char),
    /// A key the engine has no behaviour for, carried by its legacy code.
    Other(u32),
}

impl KeyCode {
    /// Decode a legacy numeric `keyCode` (27 = Escape, 9 = Tab, 13 = Enter).
    pub fn from_legacy(code: u32) -> Self {
        match code {
            27 => Self::Escape,
            9 => Self::Tab,
            13 => Self::Enter,
            32..=126 => char::from_u32(code).map_or(Self::Other(code), Self::Char),
            other => Self::Other(other),
        }
    }
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is a press of `code`.
    #[inline]
    pub fn is_press_of(&self, code: KeyCode) -> bool {
        self.kind == KeyEventKind::Press && self.code == code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes_decode() {
        assert_eq!(KeyCode::from_legacy(27), KeyCode::Escape);
        assert_eq!(KeyCode::from_legacy(9), KeyCode::Tab);
        assert_eq!(KeyCode::from_legacy(13), KeyCode::Enter);
        assert_eq!(KeyCode::from_legacy(65), KeyCode::Char('A'));
        assert_eq!(KeyCode::from_legacy(112), KeyCode::Char('p'));
        assert_eq!(KeyCode::from_legacy(200), KeyCode::Other(200));
    }

    #[test]
    fn release_is_not_a_press() {
        let mut ev = KeyEvent::press(KeyCode::Escape);
        assert!(ev.is_press_of(KeyCode::Escape));
        ev.kind = KeyEventKind::Release;
        assert!(!ev.is_press_of(KeyCode::Escape));
    }

    #[test]
    fn modifiers_builder() {
        let ev = KeyEvent::press(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
        assert!(ev.modifiers.contains(Modifiers::SHIFT));
        assert!(!ev.modifiers.contains(Modifiers::CTRL));
    }
}
