//! Edge case tests for folio-dom
//!
//! Boundary conditions for tree mutation, queries and event dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use folio_dom::{Document, DomError, Event, EventType, Key, KeyModifiers, NodeId, SelectorList};

// ============================================================================
// TREE EDGE CASES
// ============================================================================

#[test]
fn test_reparent_moves_node() {
    let mut doc = Document::default();
    let body = doc.body();
    let left = doc.append_element(body, "div", &[]).unwrap();
    let right = doc.append_element(body, "div", &[]).unwrap();
    let card = doc.append_element(left, "article", &[]).unwrap();

    doc.append_child(right, card).unwrap();
    assert_eq!(doc.tree().children(left).count(), 0);
    assert_eq!(doc.tree().parent(card), Some(right));
}

#[test]
fn test_cannot_remove_document_node() {
    let mut doc = Document::default();
    let root = doc.root();
    assert!(matches!(doc.remove_child(root), Err(DomError::HierarchyRequest { .. })));
}

#[test]
fn test_remove_unknown_node() {
    let mut doc = Document::default();
    let ghost = NodeId::from_raw(12_345);
    assert_eq!(doc.remove_child(ghost), Err(DomError::NodeNotFound(ghost)));
}

#[test]
fn test_deep_tree_descendants() {
    let mut doc = Document::default();
    let mut parent = doc.body();
    for _ in 0..500 {
        parent = doc.append_element(parent, "div", &[]).unwrap();
    }
    let count = doc.tree().descendants(doc.body()).count();
    assert_eq!(count, 500);
    assert!(doc.is_connected(parent));
}

#[test]
fn test_text_content() {
    let mut doc = Document::default();
    let body = doc.body();
    let p = doc.append_element(body, "p", &[]).unwrap();
    doc.append_text(p, "Hello, ").unwrap();
    let strong = doc.append_element(p, "strong", &[]).unwrap();
    doc.append_text(strong, "visitor").unwrap();
    assert_eq!(doc.text_content(p), "Hello, visitor");
}

#[test]
fn test_text_node_cannot_have_children() {
    let mut doc = Document::default();
    let text = doc.append_text(doc.body(), "leaf").unwrap();
    let span = doc.create_element("span");
    assert!(matches!(doc.append_child(text, span), Err(DomError::HierarchyRequest { .. })));
}

// ============================================================================
// QUERY EDGE CASES
// ============================================================================

#[test]
fn test_query_scope_excludes_scope_itself() {
    let mut doc = Document::default();
    let body = doc.body();
    let outer = doc.append_element(body, "div", &[("class", "fade-in")]).unwrap();
    let inner = doc.append_element(outer, "div", &[("class", "fade-in")]).unwrap();
    assert_eq!(doc.query_selector_all(outer, ".fade-in").unwrap(), vec![inner]);
}

#[test]
fn test_detached_nodes_not_queried() {
    let mut doc = Document::default();
    let body = doc.body();
    let gone = doc.append_element(body, "div", &[("class", "fade-up")]).unwrap();
    doc.remove_child(gone).unwrap();
    assert!(doc.query_selector_all(doc.root(), ".fade-up").unwrap().is_empty());
}

#[test]
fn test_invalid_selector_surfaces_error() {
    let doc = Document::default();
    let err = doc.query_selector_all(doc.root(), "div > p").unwrap_err();
    assert!(matches!(err, DomError::InvalidSelector { .. }));
}

#[test]
fn test_attribute_selector_on_class() {
    let list = SelectorList::parse("[class*=fade]").unwrap();
    let mut doc = Document::default();
    let body = doc.body();
    let a = doc.append_element(body, "div", &[("class", "card fade-left")]).unwrap();
    doc.append_element(body, "div", &[("class", "card")]).unwrap();
    assert_eq!(doc.select_all(doc.root(), &list), vec![a]);
}

// ============================================================================
// EVENT EDGE CASES
// ============================================================================

#[test]
fn test_stop_propagation_halts_bubbling() {
    let mut doc = Document::default();
    let body = doc.body();
    let button = doc.append_element(body, "button", &[]).unwrap();
    let reached_body = Rc::new(RefCell::new(false));

    doc.add_event_listener(button, EventType::Click, |_, ev| ev.stop_propagation());
    let flag = Rc::clone(&reached_body);
    doc.add_event_listener(body, EventType::Click, move |_, _| *flag.borrow_mut() = true);

    doc.dispatch_event(button, &mut Event::click());
    assert!(!*reached_body.borrow());
}

#[test]
fn test_stop_immediate_skips_siblings_listeners() {
    let mut doc = Document::default();
    let body = doc.body();
    let calls = Rc::new(RefCell::new(0));

    doc.add_event_listener(body, EventType::KeyDown, |_, ev| ev.stop_immediate_propagation());
    let counter = Rc::clone(&calls);
    doc.add_event_listener(body, EventType::KeyDown, move |_, _| *counter.borrow_mut() += 1);

    doc.dispatch_event(body, &mut Event::key_down(Key::Enter, KeyModifiers::NONE));
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_dispatch_to_unknown_target_is_noop() {
    let mut doc = Document::default();
    let mut ev = Event::click();
    assert!(doc.dispatch_event(NodeId::from_raw(77_777), &mut ev));
    assert!(!ev.is_default_prevented());
}

#[test]
fn test_listener_ids_unique_per_document() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = doc.add_event_listener(body, EventType::Click, |_, _| {});
    let b = doc.add_event_listener(body, EventType::Click, |_, _| {});
    assert_ne!(a, b);
    assert!(doc.remove_event_listener(a));
    assert_eq!(doc.listener_count(body), 1);
}
