//! Keyboard navigation detection
//!
//! Marks `<body>` with `keyboard-navigation` once the user presses Tab so
//! focus rings can be shown, and clears it on the next mouse press.

use std::cell::Cell;
use std::rc::Rc;

use folio_dom::{Document, EventType, Key, ListenerId};

pub const KEYBOARD_NAVIGATION_CLASS: &str = "keyboard-navigation";

/// Input modality tracker
#[derive(Debug, Default)]
pub struct KeyboardModality {
    active: Rc<Cell<bool>>,
    listeners: Vec<ListenerId>,
}

impl KeyboardModality {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen on the document. Installing twice replaces the old listeners.
    pub fn install(&mut self, doc: &mut Document) {
        self.uninstall(doc);
        let root = doc.root();

        let active = Rc::clone(&self.active);
        let keydown = doc.add_event_listener(root, EventType::KeyDown, move |doc, ev| {
            if !ev.is_key(&Key::Tab) {
                return;
            }
            active.set(true);
            let body = doc.body();
            if let Err(err) = doc.add_class(body, KEYBOARD_NAVIGATION_CLASS) {
                tracing::debug!("Cannot mark keyboard navigation: {}", err);
            }
        });

        let active = Rc::clone(&self.active);
        let mousedown = doc.add_event_listener(root, EventType::MouseDown, move |doc, _| {
            if !active.replace(false) {
                return;
            }
            let body = doc.body();
            if let Err(err) = doc.remove_class(body, KEYBOARD_NAVIGATION_CLASS) {
                tracing::debug!("Cannot clear keyboard navigation: {}", err);
            }
        });

        self.listeners = vec![keydown, mousedown];
    }

    /// Remove the listeners. The body class is left as it is.
    pub fn uninstall(&mut self, doc: &mut Document) {
        for id in self.listeners.drain(..) {
            doc.remove_event_listener(id);
        }
    }

    pub fn is_installed(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn is_keyboard_navigation(&self) -> bool {
        self.active.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_dom::{Event, KeyModifiers};

    #[test]
    fn test_tab_then_mouse() {
        let mut doc = Document::default();
        let body = doc.body();
        let button = doc.append_element(body, "button", &[]).unwrap();
        let mut modality = KeyboardModality::new();
        modality.install(&mut doc);

        doc.dispatch_event(button, &mut Event::key_down(Key::Enter, KeyModifiers::NONE));
        assert!(!modality.is_keyboard_navigation());

        doc.dispatch_event(button, &mut Event::key_down(Key::Tab, KeyModifiers::SHIFT));
        assert!(modality.is_keyboard_navigation());
        assert!(doc.has_class(body, KEYBOARD_NAVIGATION_CLASS));

        doc.dispatch_event(button, &mut Event::mouse_down());
        assert!(!modality.is_keyboard_navigation());
        assert!(!doc.has_class(body, KEYBOARD_NAVIGATION_CLASS));
    }

    #[test]
    fn test_tab_does_not_prevent_default() {
        let mut doc = Document::default();
        let body = doc.body();
        let mut modality = KeyboardModality::new();
        modality.install(&mut doc);
        let mut tab = Event::key_down(Key::Tab, KeyModifiers::NONE);
        assert!(doc.dispatch_event(body, &mut tab));
    }

    #[test]
    fn test_reinstall_and_uninstall() {
        let mut doc = Document::default();
        let mut modality = KeyboardModality::new();
        modality.install(&mut doc);
        modality.install(&mut doc);
        assert_eq!(doc.listener_count(doc.root()), 2);

        modality.uninstall(&mut doc);
        assert!(!modality.is_installed());
        assert_eq!(doc.listener_count(doc.root()), 0);
        let body = doc.body();
        doc.dispatch_event(body, &mut Event::key_down(Key::Tab, KeyModifiers::NONE));
        assert!(!doc.has_class(body, KEYBOARD_NAVIGATION_CLASS));
    }
}
