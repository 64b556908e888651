//! Anchor smooth scrolling
//!
//! Same-document links (`href` starting with `#`) scroll their target into
//! view smoothly instead of jumping.

use folio_dom::{
    AttributeMatcher, AttributeSelector, CompoundSelector, Document, EventType, ListenerId, ScrollIntoViewOptions,
    SelectorList,
};

/// `a[href^="#"]`
pub fn anchor_selector() -> SelectorList {
    SelectorList::new(vec![CompoundSelector::tag("a").with_attribute(AttributeSelector {
        name: "href".to_string(),
        matcher: Some(AttributeMatcher::Prefix("#".to_string())),
    })])
}

/// Scroll the element named by `href` (`#id`) into view, smoothly and
/// aligned to the top. Returns false when there is no such element.
pub fn smooth_scroll_to(doc: &mut Document, href: &str) -> bool {
    let Some(id) = href.strip_prefix('#') else {
        return false;
    };
    let Some(target) = doc.get_element_by_id(id) else {
        tracing::trace!("No anchor target for {:?}", href);
        return false;
    };
    doc.scroll_into_view(target, ScrollIntoViewOptions::smooth_start())
}

/// Attach click handlers to every same-document anchor currently in the
/// document. The `href` is read at click time.
pub fn install_anchor_scrolling(doc: &mut Document) -> Vec<ListenerId> {
    let anchors = doc.select_all(doc.root(), &anchor_selector());
    anchors
        .into_iter()
        .map(|anchor| {
            doc.add_event_listener(anchor, EventType::Click, move |doc, ev| {
                let Some(href) = doc.get_attribute(anchor, "href").map(str::to_owned) else {
                    return;
                };
                if smooth_scroll_to(doc, &href) {
                    ev.prevent_default();
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_dom::{Event, ScrollBehavior, ScrollBlock};

    #[test]
    fn test_click_scrolls_to_target() {
        let mut doc = Document::default();
        let body = doc.body();
        let link = doc.append_element(body, "a", &[("href", "#projects")]).unwrap();
        let projects = doc.append_element(body, "section", &[("id", "projects")]).unwrap();
        let listeners = install_anchor_scrolling(&mut doc);
        assert_eq!(listeners.len(), 1);

        let mut click = Event::click();
        assert!(!doc.dispatch_event(link, &mut click));

        let requests = doc.take_scroll_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, projects);
        assert_eq!(requests[0].options.behavior, ScrollBehavior::Smooth);
        assert_eq!(requests[0].options.block, ScrollBlock::Start);
    }

    #[test]
    fn test_external_links_untouched() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "a", &[("href", "https://github.com")]).unwrap();
        doc.append_element(body, "a", &[]).unwrap();
        assert!(install_anchor_scrolling(&mut doc).is_empty());
    }

    #[test]
    fn test_bare_hash_is_noop() {
        let mut doc = Document::default();
        let body = doc.body();
        let link = doc.append_element(body, "a", &[("href", "#")]).unwrap();
        install_anchor_scrolling(&mut doc);

        let mut click = Event::click();
        assert!(doc.dispatch_event(link, &mut click));
        assert!(doc.pending_scrolls().is_empty());
    }

    #[test]
    fn test_smooth_scroll_to_requires_hash() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "section", &[("id", "contact")]).unwrap();
        assert!(!smooth_scroll_to(&mut doc, "contact"));
        assert!(smooth_scroll_to(&mut doc, "#contact"));
    }
}
