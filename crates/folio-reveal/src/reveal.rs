//! Reveal Observer
//!
//! One-shot entrance animations. Elements carrying an animation class (or
//! `data-animate`) are observed from `start()` on; the first time one of
//! them is reported intersecting it receives the `animate` class and is no
//! longer observed. Styling owns what each animation looks like.

use std::collections::BTreeMap;

use folio_dom::{AttributeSelector, CompoundSelector, DOMRect, Document, ListenerId, NodeId, SelectorList};

use crate::anchor::install_anchor_scrolling;
use crate::config::{IntersectionOptions, REVEAL_ATTRIBUTE, REVEALED_CLASS};
use crate::intersection::{IntersectionEntry, IntersectionPrimitive, IntersectionSupport};

/// Animation kind, named after the class that selects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    FadeUp,
    FadeDown,
    FadeLeft,
    FadeRight,
    ZoomIn,
    FadeIn,
    SlideUp,
    SlideLeft,
    SlideRight,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 9] = [
        Self::FadeUp,
        Self::FadeDown,
        Self::FadeLeft,
        Self::FadeRight,
        Self::ZoomIn,
        Self::FadeIn,
        Self::SlideUp,
        Self::SlideLeft,
        Self::SlideRight,
    ];

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::FadeUp => "fade-up",
            Self::FadeDown => "fade-down",
            Self::FadeLeft => "fade-left",
            Self::FadeRight => "fade-right",
            Self::ZoomIn => "zoom-in",
            Self::FadeIn => "fade-in",
            Self::SlideUp => "slide-up",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class_name() == class)
    }

    /// First animation class on an element, in class-list order
    pub fn of(doc: &Document, id: NodeId) -> Option<Self> {
        doc.class_list(id)?.iter().find_map(Self::from_class)
    }
}

/// Selector list matching every element that wants a reveal
pub fn reveal_selectors() -> SelectorList {
    let mut selectors = vec![CompoundSelector::default().with_attribute(AttributeSelector::exists(REVEAL_ATTRIBUTE))];
    selectors.extend(AnimationKind::ALL.iter().map(|k| CompoundSelector::class(k.class_name())));
    SelectorList::new(selectors)
}

/// Scroll-triggered reveal observer
///
/// Each instance owns its own intersection primitive; independent mounts
/// never share one.
#[derive(Default)]
pub struct RevealObserver {
    primitive: Option<Box<dyn IntersectionPrimitive>>,
    /// Watched elements and their animation kind (`None` for `data-animate` only)
    watched: BTreeMap<NodeId, Option<AnimationKind>>,
    anchor_listeners: Vec<ListenerId>,
    started: bool,
}

impl RevealObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the document and begin observing. Returns the number of
    /// elements that matched the reveal selectors.
    ///
    /// Without intersection support every match is revealed immediately.
    pub fn start(&mut self, doc: &mut Document, support: &dyn IntersectionSupport) -> usize {
        if self.started {
            self.stop(doc);
        }

        let targets = doc.select_all(doc.root(), &reveal_selectors());
        self.anchor_listeners = install_anchor_scrolling(doc);
        self.started = true;

        let Some(mut primitive) = support.create(&IntersectionOptions::reveal()) else {
            tracing::warn!("Intersection detection unavailable, revealing {} elements", targets.len());
            for &target in &targets {
                reveal(doc, target);
            }
            return targets.len();
        };

        for &target in &targets {
            if doc.has_class(target, REVEALED_CLASS) {
                continue;
            }
            primitive.observe(target);
            self.watched.insert(target, AnimationKind::of(doc, target));
        }
        self.primitive = Some(primitive);

        tracing::debug!(
            "Reveal observer started: {} watched, {} anchors",
            self.watched.len(),
            self.anchor_listeners.len()
        );
        targets.len()
    }

    /// Intersection callback. Every intersecting entry for a watched element
    /// reveals it and stops observing it; other entries are ignored.
    /// Returns the elements revealed by this batch.
    pub fn handle_entries(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> Vec<NodeId> {
        let mut revealed = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(kind) = self.watched.remove(&entry.target) else {
                continue;
            };
            if let Some(primitive) = self.primitive.as_mut() {
                primitive.unobserve(entry.target);
            }
            if !doc.is_connected(entry.target) {
                tracing::trace!("Dropping reveal for detached {:?}", entry.target);
                continue;
            }
            if reveal(doc, entry.target) {
                tracing::trace!("Revealed {:?} ({:?})", entry.target, kind);
                revealed.push(entry.target);
            }
        }
        revealed
    }

    /// Pull entries from the primitive for `viewport` and handle them
    pub fn poll(&mut self, doc: &mut Document, viewport: DOMRect) -> Vec<NodeId> {
        let entries = match self.primitive.as_mut() {
            Some(primitive) => primitive.take_entries(doc, viewport),
            None => return Vec::new(),
        };
        self.handle_entries(doc, &entries)
    }

    /// Release the primitive, clear the registry and remove anchor
    /// listeners. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self, doc: &mut Document) {
        if let Some(mut primitive) = self.primitive.take() {
            primitive.disconnect();
        }
        self.watched.clear();
        for id in self.anchor_listeners.drain(..) {
            doc.remove_event_listener(id);
        }
        if self.started {
            tracing::debug!("Reveal observer stopped");
        }
        self.started = false;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_watching(&self, id: NodeId) -> bool {
        self.watched.contains_key(&id)
    }

    /// Number of elements still waiting for their reveal
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    /// Animation kind a watched element was registered with
    pub fn kind_of(&self, id: NodeId) -> Option<AnimationKind> {
        self.watched.get(&id).copied().flatten()
    }
}

impl std::fmt::Debug for RevealObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealObserver")
            .field("started", &self.started)
            .field("watched", &self.watched.len())
            .field("has_primitive", &self.primitive.is_some())
            .finish()
    }
}

/// Mark an element revealed. Returns false if it already was.
fn reveal(doc: &mut Document, target: NodeId) -> bool {
    match doc.add_class(target, REVEALED_CLASS) {
        Ok(added) => added,
        Err(err) => {
            tracing::debug!("Cannot reveal {:?}: {}", target, err);
            false
        }
    }
}
