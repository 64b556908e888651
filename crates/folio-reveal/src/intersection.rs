//! Intersection Observer seam
//!
//! Observers talk to intersection detection through
//! [`IntersectionPrimitive`]. Hosts with their own notification source push
//! entries into the observers directly; hosts that only know layout boxes use
//! [`ViewportIntersector`], which derives entries from the document's layout
//! rects and the current viewport.

use std::collections::BTreeMap;

use folio_dom::{DOMRect, Document, NodeId};

use crate::config::IntersectionOptions;

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    /// Target box relative to the viewport
    pub bounding_client_rect: DOMRect,
    /// Visible part of the target relative to the viewport
    pub intersection_rect: DOMRect,
    /// Root box (viewport plus margin) relative to the viewport
    pub root_bounds: Option<DOMRect>,
}

impl IntersectionEntry {
    /// Entry reporting `target` as entering the root
    pub fn entering(target: NodeId) -> Self {
        Self {
            target,
            is_intersecting: true,
            intersection_ratio: 1.0,
            bounding_client_rect: DOMRect::default(),
            intersection_rect: DOMRect::default(),
            root_bounds: None,
        }
    }

    /// Entry reporting `target` as leaving the root
    pub fn leaving(target: NodeId) -> Self {
        Self {
            is_intersecting: false,
            intersection_ratio: 0.0,
            ..Self::entering(target)
        }
    }
}

/// One intersection-detection instance, owned by a single observer lifecycle
pub trait IntersectionPrimitive {
    /// Start observing a target
    fn observe(&mut self, target: NodeId);

    /// Stop observing a target
    fn unobserve(&mut self, target: NodeId);

    /// Stop observing everything
    fn disconnect(&mut self);

    /// Number of observed targets
    fn observed_count(&self) -> usize;

    /// Entries produced since the last call, for the given viewport
    /// (document coordinates). Push-driven primitives report nothing here.
    fn take_entries(&mut self, _doc: &Document, _viewport: DOMRect) -> Vec<IntersectionEntry> {
        Vec::new()
    }
}

/// Capability check for intersection detection
pub trait IntersectionSupport {
    /// Create a primitive, or `None` when the host has no such capability
    fn create(&self, options: &IntersectionOptions) -> Option<Box<dyn IntersectionPrimitive>>;
}

/// Geometry-backed support handing out [`ViewportIntersector`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportIntersection;

impl IntersectionSupport for ViewportIntersection {
    fn create(&self, options: &IntersectionOptions) -> Option<Box<dyn IntersectionPrimitive>> {
        Some(Box::new(ViewportIntersector::new(options.clone())))
    }
}

/// Support for hosts without intersection detection
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntersection;

impl IntersectionSupport for NoIntersection {
    fn create(&self, _options: &IntersectionOptions) -> Option<Box<dyn IntersectionPrimitive>> {
        None
    }
}

/// Intersection observer computing entries from layout rects
#[derive(Debug)]
pub struct ViewportIntersector {
    options: IntersectionOptions,
    /// Last reported intersecting state; `None` until first checked
    observed: BTreeMap<NodeId, Option<bool>>,
}

impl ViewportIntersector {
    pub fn new(options: IntersectionOptions) -> Self {
        Self { options, observed: BTreeMap::new() }
    }

    pub fn options(&self) -> &IntersectionOptions {
        &self.options
    }

    /// Check intersections against `viewport`, reporting first sightings
    /// and changes of the intersecting state
    pub fn check_intersections(&mut self, doc: &Document, viewport: DOMRect) -> Vec<IntersectionEntry> {
        let margin = self.options.root_margin;
        let root = viewport.expand(margin.top, margin.right, margin.bottom, margin.left);
        let threshold = self.options.threshold;
        let mut entries = Vec::new();

        for (&node, last) in self.observed.iter_mut() {
            if !doc.is_connected(node) {
                continue;
            }
            let Some(rect) = doc.layout_rect(node) else {
                continue;
            };

            let intersection = rect.intersection(&root);
            let ratio = match intersection {
                Some(_) if rect.area() == 0.0 => 1.0,
                Some(i) => i.area() / rect.area(),
                None => 0.0,
            };
            let is_intersecting = intersection.is_some() && ratio >= threshold;

            if *last == Some(is_intersecting) {
                continue;
            }
            *last = Some(is_intersecting);

            entries.push(IntersectionEntry {
                target: node,
                is_intersecting,
                intersection_ratio: ratio,
                bounding_client_rect: rect.translate_y(-viewport.y),
                intersection_rect: intersection.unwrap_or_default().translate_y(-viewport.y),
                root_bounds: Some(root.translate_y(-viewport.y)),
            });
        }
        entries
    }
}

impl IntersectionPrimitive for ViewportIntersector {
    fn observe(&mut self, target: NodeId) {
        self.observed.entry(target).or_insert(None);
    }

    fn unobserve(&mut self, target: NodeId) {
        self.observed.remove(&target);
    }

    fn disconnect(&mut self) {
        self.observed.clear();
    }

    fn observed_count(&self) -> usize {
        self.observed.len()
    }

    fn take_entries(&mut self, doc: &Document, viewport: DOMRect) -> Vec<IntersectionEntry> {
        self.check_intersections(doc, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntersectionOptions, RootMargin};

    fn page_with_box(y: f64, height: f64) -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let card = doc.append_element(body, "div", &[]).unwrap();
        doc.set_layout_rect(card, DOMRect::from_xywh(0.0, y, 200.0, height));
        (doc, card)
    }

    #[test]
    fn test_first_check_reports_state() {
        let (doc, card) = page_with_box(100.0, 100.0);
        let mut observer = ViewportIntersector::new(IntersectionOptions::default());
        observer.observe(card);

        let entries = observer.check_intersections(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].intersection_ratio, 1.0);
    }

    #[test]
    fn test_reports_transitions_only() {
        let (doc, card) = page_with_box(1000.0, 100.0);
        let mut observer = ViewportIntersector::new(IntersectionOptions::reveal());
        observer.observe(card);

        let top = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let entries = observer.check_intersections(&doc, top);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);

        assert!(observer.check_intersections(&doc, top).is_empty());

        let scrolled = DOMRect::from_xywh(0.0, 600.0, 800.0, 600.0);
        let entries = observer.check_intersections(&doc, scrolled);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert_eq!(entries[0].bounding_client_rect.y, 400.0);
    }

    #[test]
    fn test_negative_bottom_margin_delays_trigger() {
        // Box top sits 30px above the viewport bottom: inside the viewport,
        // but below the -50px trigger line.
        let (doc, card) = page_with_box(570.0, 100.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);

        let mut plain = ViewportIntersector::new(IntersectionOptions {
            root_margin: RootMargin::default(),
            threshold: 0.1,
        });
        plain.observe(card);
        assert!(plain.check_intersections(&doc, viewport)[0].is_intersecting);

        let mut reveal = ViewportIntersector::new(IntersectionOptions::reveal());
        reveal.observe(card);
        assert!(!reveal.check_intersections(&doc, viewport)[0].is_intersecting);
    }

    #[test]
    fn test_threshold_fraction() {
        // 5% of the box is visible: below the 10% reveal threshold.
        let (doc, card) = page_with_box(545.0, 100.0);
        let mut observer = ViewportIntersector::new(IntersectionOptions {
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
            threshold: 0.1,
        });
        observer.observe(card);
        let entry = &observer.check_intersections(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0))[0];
        assert!(!entry.is_intersecting);
        assert!((entry.intersection_ratio - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_skips_targets_without_layout() {
        let mut doc = Document::default();
        let body = doc.body();
        let bare = doc.append_element(body, "div", &[]).unwrap();
        let mut observer = ViewportIntersector::new(IntersectionOptions::default());
        observer.observe(bare);
        assert!(observer.check_intersections(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0)).is_empty());
        assert_eq!(observer.observed_count(), 1);
    }

    #[test]
    fn test_unobserve_and_disconnect() {
        let (doc, card) = page_with_box(0.0, 10.0);
        let mut observer = ViewportIntersector::new(IntersectionOptions::default());
        observer.observe(card);
        observer.observe(card);
        assert_eq!(observer.observed_count(), 1);
        observer.unobserve(card);
        assert!(observer.check_intersections(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0)).is_empty());
        observer.observe(card);
        observer.disconnect();
        observer.disconnect();
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_support_detection() {
        assert!(ViewportIntersection.create(&IntersectionOptions::reveal()).is_some());
        assert!(NoIntersection.create(&IntersectionOptions::reveal()).is_none());
    }
}
