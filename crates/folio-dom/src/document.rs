//! Document - High-level document API
//!
//! Wraps the tree arena with the state a browsing context keeps next to
//! it: the focused element, event listeners, layout rects, and pending
//! scroll requests.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{
    DOMRect, DOMTokenList, DomError, DomTree, ElementData, Event, EventHandler, EventType,
    ListenerId, NodeId, Result, ScrollIntoViewOptions, ScrollRequest, SelectorList,
};

struct RegisteredListener {
    id: ListenerId,
    event_type: EventType,
    handler: EventHandler,
}

/// HTML Document
pub struct Document {
    tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    active_element: Option<NodeId>,
    listeners: HashMap<NodeId, Vec<RegisteredListener>>,
    next_listener_id: u64,
    layout: HashMap<NodeId, DOMRect>,
    scroll_requests: Vec<ScrollRequest>,
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let mut doc = Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            active_element: None,
            listeners: HashMap::new(),
            next_listener_id: 1,
            layout: HashMap::new(),
            scroll_requests: Vec::new(),
        };
        // Freshly created nodes under a fresh root cannot violate the hierarchy.
        let root = doc.tree.root();
        for (parent, child) in [(root, html), (html, head), (html, body)] {
            if let Err(err) = doc.tree.append_child(parent, child) {
                tracing::error!("Failed to build document skeleton: {}", err);
            }
        }
        doc
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.tree.append_child(parent, child)
    }

    /// Create an element with attributes and append it under `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let id = self.tree.create_element(tag);
        if let Some(el) = self.element_mut(id) {
            for (name, value) in attrs {
                el.set_attr(name, value);
            }
        }
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> Result<NodeId> {
        let id = self.tree.create_text(content);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Detach a node and its subtree. Listeners and layout registered on
    /// the subtree are dropped; focus inside it is cleared.
    pub fn remove_child(&mut self, node: NodeId) -> Result<()> {
        if node == self.root() {
            return Err(DomError::HierarchyRequest { parent: NodeId::NONE, child: node });
        }
        self.tree.get(node).ok_or(DomError::NodeNotFound(node))?;

        let subtree: Vec<NodeId> = std::iter::once(node).chain(self.tree.descendants(node)).collect();
        self.tree.detach(node)?;

        let mut dropped = 0;
        for id in &subtree {
            if let Some(list) = self.listeners.remove(id) {
                dropped += list.len();
            }
            self.layout.remove(id);
        }
        if self.active_element.is_some_and(|a| subtree.contains(&a)) {
            self.active_element = None;
        }
        tracing::trace!("Removed {} nodes, {} listeners", subtree.len(), dropped);
        Ok(())
    }

    /// True when the node is attached to this document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.tree.get_mut(id)?.as_element_mut()
    }

    fn element_or_err(&mut self, id: NodeId) -> Result<&mut ElementData> {
        let node = self.tree.get_mut(id).ok_or(DomError::NodeNotFound(id))?;
        node.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_or_err(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.element_or_err(id)?.remove_attr(name))
    }

    pub fn class_list(&self, id: NodeId) -> Option<&DOMTokenList> {
        self.element(id).map(|e| &e.classes)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).is_some_and(|c| c.contains(class))
    }

    /// Add a class. Returns whether the class was newly added.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        Ok(self.element_or_err(id)?.classes.add(class))
    }

    /// Remove a class. Returns whether the class was present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        Ok(self.element_or_err(id)?.classes.remove(class))
    }

    /// Concatenated descendant text
    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Elements below `scope` matching `selectors`, in document order
    pub fn select_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.tree
            .descendants(scope)
            .filter(|&id| self.element(id).is_some_and(|el| selectors.matches(el)))
            .collect()
    }

    /// `scope.querySelectorAll(selectors)`
    pub fn query_selector_all(&self, scope: NodeId, selectors: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selectors)?;
        Ok(self.select_all(scope, &list))
    }

    /// `scope.querySelector(selectors)`
    pub fn query_selector(&self, scope: NodeId, selectors: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selectors)?;
        Ok(self
            .tree
            .descendants(scope)
            .find(|&id| self.element(id).is_some_and(|el| list.matches(el))))
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .descendants(self.root())
            .find(|&node| self.element(node).and_then(ElementData::id) == Some(id))
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    /// Move focus to a connected element. Returns false otherwise.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.element(id).is_none() || !self.is_connected(id) {
            return false;
        }
        self.active_element = Some(id);
        true
    }

    /// Remove focus
    pub fn blur(&mut self) {
        self.active_element = None;
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a listener on `target`
    pub fn add_event_listener<F>(&mut self, target: NodeId, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.entry(target).or_default().push(RegisteredListener {
            id,
            event_type,
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        for (target, list) in self.listeners.iter_mut() {
            if let Some(pos) = list.iter().position(|l| l.id == id) {
                list.remove(pos);
                removed = true;
                if list.is_empty() {
                    emptied = Some(*target);
                }
                break;
            }
        }
        if let Some(target) = emptied {
            self.listeners.remove(&target);
        }
        removed
    }

    /// Number of listeners registered directly on `target`
    pub fn listener_count(&self, target: NodeId) -> usize {
        self.listeners.get(&target).map_or(0, Vec::len)
    }

    fn is_registered(&self, target: NodeId, id: ListenerId) -> bool {
        self.listeners.get(&target).is_some_and(|l| l.iter().any(|r| r.id == id))
    }

    /// Dispatch `event` at `target`, bubbling up to the document node.
    /// Returns false when a listener prevented the default action.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> bool {
        event.target = target;
        if self.tree.get(target).is_none() {
            return true;
        }

        let path: Vec<NodeId> = std::iter::once(target).chain(self.tree.ancestors(target)).collect();
        for node in path {
            event.current_target = node;
            let handlers: Vec<(ListenerId, EventHandler)> = self
                .listeners
                .get(&node)
                .map(|list| {
                    list.iter()
                        .filter(|l| l.event_type == event.event_type)
                        .map(|l| (l.id, Rc::clone(&l.handler)))
                        .collect()
                })
                .unwrap_or_default();

            for (id, handler) in handlers {
                // A handler earlier in this dispatch may have removed it.
                if !self.is_registered(node, id) {
                    continue;
                }
                handler(self, event);
                if event.is_immediate_stopped() {
                    break;
                }
            }
            if !event.bubbles || event.is_propagation_stopped() {
                break;
            }
        }
        !event.is_default_prevented()
    }

    // ------------------------------------------------------------------
    // Geometry & scrolling
    // ------------------------------------------------------------------

    /// Record an element's layout box in document coordinates
    pub fn set_layout_rect(&mut self, id: NodeId, rect: DOMRect) {
        self.layout.insert(id, rect);
    }

    pub fn layout_rect(&self, id: NodeId) -> Option<DOMRect> {
        self.layout.get(&id).copied()
    }

    /// `element.scrollIntoView(options)`; the host performs the scroll
    pub fn scroll_into_view(&mut self, id: NodeId, options: ScrollIntoViewOptions) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        self.scroll_requests.push(ScrollRequest { target: id, options });
        true
    }

    /// Scroll requests not yet performed by the host
    pub fn pending_scrolls(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Drain pending scroll requests
    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("active_element", &self.active_element)
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
