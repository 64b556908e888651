//! DOM Events
//!
//! Keyboard and mouse events dispatched through a [`crate::Document`], and
//! the listener handles returned when registering for them.

use std::rc::Rc;

use crate::{Document, NodeId};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseDown,
    KeyDown,
    KeyUp,
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,
    Shift,
    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "Shift" => Self::Shift,
            " " => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: KeyModifiers = KeyModifiers { shift: true, ctrl: false, alt: false, meta: false };
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Key for keyboard events
    pub key: Option<Key>,
    pub modifiers: KeyModifiers,
    pub target: NodeId,
    pub current_target: NodeId,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_stopped: bool,
}

impl Event {
    fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            key: None,
            modifiers: KeyModifiers::NONE,
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
            immediate_stopped: false,
        }
    }

    /// Create a keydown event
    pub fn key_down(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            key: Some(key),
            modifiers,
            ..Self::new(EventType::KeyDown)
        }
    }

    /// Create a keyup event
    pub fn key_up(key: Key, modifiers: KeyModifiers) -> Self {
        Self {
            key: Some(key),
            modifiers,
            ..Self::new(EventType::KeyUp)
        }
    }

    /// Create a click event
    pub fn click() -> Self {
        Self::new(EventType::Click)
    }

    /// Create a mousedown event
    pub fn mouse_down() -> Self {
        Self::new(EventType::MouseDown)
    }

    /// Check the key of a keyboard event
    pub fn is_key(&self, key: &Key) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation to ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip remaining listeners on the current target
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    pub(crate) fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn is_immediate_stopped(&self) -> bool {
        self.immediate_stopped
    }
}

/// Listener callback. Handlers get the document back so they can move
/// focus, toggle classes or request scrolls while the event is in flight.
pub type EventHandler = Rc<dyn Fn(&mut Document, &mut Event)>;

/// Handle of a registered listener, unique within one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("Tab"), Key::Tab);
        assert_eq!(Key::parse("a"), Key::Character('a'));
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("é"), Key::Character('é'));
        assert_eq!(Key::parse("F13"), Key::Unidentified("F13".to_string()));
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut ev = Event::click();
        ev.cancelable = false;
        ev.prevent_default();
        assert!(!ev.is_default_prevented());

        let mut ev = Event::key_down(Key::Tab, KeyModifiers::SHIFT);
        ev.prevent_default();
        assert!(ev.is_default_prevented());
        assert!(ev.modifiers.shift);
    }
}
