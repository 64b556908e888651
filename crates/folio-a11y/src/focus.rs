//! Focus Management
//!
//! Focusable-element discovery and the Tab-cycle trap used by modals.

use folio_dom::{Document, ElementData, Event, EventType, Key, ListenerId, NodeId};

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    NotFocusable,    // negative or unparsable
    Sequential(i32), // tabindex="0" or positive
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Links with an `href`, enabled form controls, and anything with a
/// non-negative explicit `tabindex`
pub fn is_focusable(element: &ElementData) -> bool {
    let natively = match element.tag.as_str() {
        "a" => element.has_attr("href"),
        "button" | "input" | "select" | "textarea" => !element.has_attr("disabled"),
        _ => false,
    };
    natively || element.get_attr("tabindex").map(TabIndex::parse).is_some_and(|t| t.is_focusable())
}

/// Focusable descendants of `container`, in document order
pub fn focusable_elements(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.tree()
        .descendants(container)
        .filter(|&id| doc.element(id).is_some_and(is_focusable))
        .collect()
}

/// Keyboard focus trap on a container
///
/// Returned by [`FocusTrap::activate`]; call [`FocusTrap::release`] when the
/// dialog closes. Every activation registers its own listener, so callers
/// pair each activate with exactly one release.
#[derive(Debug)]
#[must_use = "release the trap when the dialog closes"]
pub struct FocusTrap {
    container: NodeId,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    /// Focus the first focusable descendant of `container` and keep Tab /
    /// Shift+Tab cycling inside it. A container without focusable
    /// descendants yields an inert trap and focus is left alone.
    pub fn activate(doc: &mut Document, container: NodeId) -> Self {
        let focusable = focusable_elements(doc, container);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            tracing::debug!("No focusable elements in {:?}, trap inactive", container);
            return Self { container, listener: None };
        };

        doc.focus(first);
        let listener = doc.add_event_listener(container, EventType::KeyDown, move |doc, ev| {
            cycle_tab(doc, ev, first, last);
        });
        tracing::debug!("Focus trap on {:?} over {} elements", container, focusable.len());

        Self { container, listener: Some(listener) }
    }

    /// Remove this trap's listener. Further calls do nothing.
    pub fn release(&mut self, doc: &mut Document) {
        if let Some(id) = self.listener.take() {
            doc.remove_event_listener(id);
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// False for inert or released traps
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }
}

fn cycle_tab(doc: &mut Document, ev: &mut Event, first: NodeId, last: NodeId) {
    if !ev.is_key(&Key::Tab) {
        return;
    }
    let active = doc.active_element();
    if ev.modifiers.shift {
        if active == Some(first) {
            doc.focus(last);
            ev.prevent_default();
        }
    } else if active == Some(last) {
        doc.focus(first);
        ev.prevent_default();
    }
}
