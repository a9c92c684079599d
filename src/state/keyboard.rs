//! Keyboard Module - Key event types
//!
//! The host translates native `keydown` events into [`KeyboardEvent`]s.
//! Widgets only care about a handful of keys (Tab, Escape, Enter, Space),
//! everything else passes through as [`KeyCode::Char`] or [`KeyCode::Other`].
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::{KeyboardEvent, KeyCode, Modifiers};
//!
//! let back_tab = KeyboardEvent::with_modifiers(KeyCode::Tab, Modifiers::SHIFT);
//! assert!(back_tab.is_shift());
//!
//! // From a DOM `KeyboardEvent.key` value
//! let esc = KeyboardEvent::from_dom_key("Escape");
//! assert_eq!(esc.code, KeyCode::Escape);
//! ```

// =============================================================================
// TYPES
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifiers held during the key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const META  = 1 << 3;
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Key code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    /// Any named key the widgets do not react to.
    Other(String),
}

impl KeyCode {
    /// Space arrives as a character, like the DOM's `" "` key value.
    pub const SPACE: KeyCode = KeyCode::Char(' ');
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Build from a DOM `KeyboardEvent.key` string.
    pub fn from_dom_key(key: &str) -> Self {
        let code = match key {
            "Enter" => KeyCode::Enter,
            "Tab" => KeyCode::Tab,
            "Escape" | "Esc" => KeyCode::Escape,
            "Backspace" => KeyCode::Backspace,
            "ArrowUp" => KeyCode::Up,
            "ArrowDown" => KeyCode::Down,
            "ArrowLeft" => KeyCode::Left,
            "ArrowRight" => KeyCode::Right,
            "Spacebar" => KeyCode::SPACE,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => KeyCode::Other(other.to_string()),
                }
            }
        };
        Self::new(code)
    }

    /// Press or auto-repeat. Releases never drive widget behaviour.
    pub fn is_down(&self) -> bool {
        self.state != KeyState::Release
    }

    pub fn is_shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Enter or Space: the keys that activate a focused control.
    pub fn is_activation(&self) -> bool {
        matches!(self.code, KeyCode::Enter) || self.code == KeyCode::SPACE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key() {
        assert_eq!(KeyboardEvent::from_dom_key("Escape").code, KeyCode::Escape);
        assert_eq!(KeyboardEvent::from_dom_key(" ").code, KeyCode::SPACE);
        assert_eq!(KeyboardEvent::from_dom_key("a").code, KeyCode::Char('a'));
        assert_eq!(
            KeyboardEvent::from_dom_key("PageDown").code,
            KeyCode::Other("PageDown".to_string())
        );
    }

    #[test]
    fn test_activation_keys() {
        assert!(KeyboardEvent::new(KeyCode::Enter).is_activation());
        assert!(KeyboardEvent::new(KeyCode::SPACE).is_activation());
        assert!(!KeyboardEvent::new(KeyCode::Tab).is_activation());
    }

    #[test]
    fn test_release_is_not_down() {
        let mut ev = KeyboardEvent::new(KeyCode::Enter);
        assert!(ev.is_down());
        ev.state = KeyState::Repeat;
        assert!(ev.is_down());
        ev.state = KeyState::Release;
        assert!(!ev.is_down());
    }

    #[test]
    fn test_shift_modifier() {
        let ev = KeyboardEvent::with_modifiers(KeyCode::Tab, Modifiers::SHIFT | Modifiers::CTRL);
        assert!(ev.is_shift());
        assert!(!KeyboardEvent::new(KeyCode::Tab).is_shift());
    }
}
