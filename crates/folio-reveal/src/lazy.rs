//! Lazy image loading
//!
//! `img[data-src]` elements get their real `src` once they come within
//! 50px of the viewport. Fetching is the host's job: the loader hands out
//! [`ImageRequest`]s and the host reports back through
//! [`LazyImageLoader::complete`].

use std::collections::BTreeSet;

use folio_dom::{AttributeSelector, CompoundSelector, DOMRect, Document, DomError, NodeId, SelectorList};

use crate::config::{ERROR_CLASS, IntersectionOptions, LAZY_SOURCE_ATTRIBUTE, LOADED_CLASS};
use crate::intersection::{IntersectionEntry, IntersectionPrimitive, IntersectionSupport};

/// An image the host should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub node: NodeId,
    pub src: String,
}

/// Image fetch failure reported by the host
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Failed to load image: {0}")]
    Failed(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// `img[data-src]`
pub fn lazy_image_selector() -> SelectorList {
    SelectorList::new(vec![
        CompoundSelector::tag("img").with_attribute(AttributeSelector::exists(LAZY_SOURCE_ATTRIBUTE)),
    ])
}

/// Lazy image loader
#[derive(Default)]
pub struct LazyImageLoader {
    primitive: Option<Box<dyn IntersectionPrimitive>>,
    watched: BTreeSet<NodeId>,
    started: bool,
}

impl LazyImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every `img[data-src]`. Without intersection support the
    /// images get their source right away. Returns the number of images.
    pub fn start(&mut self, doc: &mut Document, support: &dyn IntersectionSupport) -> usize {
        if self.started {
            self.stop();
        }
        self.started = true;

        let images = doc.select_all(doc.root(), &lazy_image_selector());
        match support.create(&IntersectionOptions::lazy_images()) {
            Some(mut primitive) => {
                for &img in &images {
                    primitive.observe(img);
                    self.watched.insert(img);
                }
                self.primitive = Some(primitive);
                tracing::debug!("Lazy loader observing {} images", images.len());
            }
            None => {
                tracing::warn!("Intersection detection unavailable, loading {} images eagerly", images.len());
                for &img in &images {
                    if let Err(err) = load_directly(doc, img) {
                        tracing::debug!("Skipping eager load of {:?}: {}", img, err);
                    }
                }
            }
        }
        images.len()
    }

    /// Intersection callback. Returns a request for each image that came
    /// into range. Every watched image reported in range stops being
    /// observed, including ones that lost their `data-src` in the meantime.
    pub fn handle_entries(&mut self, doc: &Document, entries: &[IntersectionEntry]) -> Vec<ImageRequest> {
        let mut requests = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if !self.watched.remove(&entry.target) {
                continue;
            }
            if let Some(primitive) = self.primitive.as_mut() {
                primitive.unobserve(entry.target);
            }
            let Some(src) = doc.get_attribute(entry.target, LAZY_SOURCE_ATTRIBUTE) else {
                tracing::trace!("Dropping {:?}, no {} left", entry.target, LAZY_SOURCE_ATTRIBUTE);
                continue;
            };
            requests.push(ImageRequest { node: entry.target, src: src.to_string() });
        }
        requests
    }

    /// Pull entries from the primitive for `viewport` and handle them
    pub fn poll(&mut self, doc: &Document, viewport: DOMRect) -> Vec<ImageRequest> {
        let entries = match self.primitive.as_mut() {
            Some(primitive) => primitive.take_entries(doc, viewport),
            None => return Vec::new(),
        };
        self.handle_entries(doc, &entries)
    }

    /// Apply the host's fetch outcome to the image element
    pub fn complete(
        doc: &mut Document,
        request: &ImageRequest,
        outcome: Result<(), LoadError>,
    ) -> Result<(), DomError> {
        match outcome {
            Ok(()) => {
                doc.set_attribute(request.node, "src", &request.src)?;
                doc.add_class(request.node, LOADED_CLASS)?;
                doc.remove_attribute(request.node, LAZY_SOURCE_ATTRIBUTE)?;
            }
            Err(err) => {
                tracing::error!("{} ({})", err, request.src);
                doc.add_class(request.node, ERROR_CLASS)?;
            }
        }
        Ok(())
    }

    /// Observe an image added after `start`. Only images still carrying
    /// `data-src` are accepted, and only while a primitive is active.
    pub fn observe_image(&mut self, doc: &Document, img: NodeId) -> bool {
        let Some(primitive) = self.primitive.as_mut() else {
            return false;
        };
        if doc.get_attribute(img, LAZY_SOURCE_ATTRIBUTE).is_none() {
            return false;
        }
        primitive.observe(img);
        self.watched.insert(img)
    }

    /// Stop observing an image
    pub fn unobserve_image(&mut self, img: NodeId) {
        if let Some(primitive) = self.primitive.as_mut() {
            primitive.unobserve(img);
        }
        self.watched.remove(&img);
    }

    /// Disconnect and forget all images. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut primitive) = self.primitive.take() {
            primitive.disconnect();
        }
        self.watched.clear();
        self.started = false;
    }

    pub fn is_watching(&self, img: NodeId) -> bool {
        self.watched.contains(&img)
    }

    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }
}

impl std::fmt::Debug for LazyImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyImageLoader")
            .field("started", &self.started)
            .field("watched", &self.watched.len())
            .finish()
    }
}

fn load_directly(doc: &mut Document, img: NodeId) -> Result<(), DomError> {
    let Some(src) = doc.get_attribute(img, LAZY_SOURCE_ATTRIBUTE).map(str::to_owned) else {
        return Ok(());
    };
    doc.set_attribute(img, "src", &src)?;
    doc.remove_attribute(img, LAZY_SOURCE_ATTRIBUTE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::{NoIntersection, ViewportIntersection};

    fn gallery() -> (Document, NodeId, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let near = doc.append_element(body, "img", &[("data-src", "/img/hero.webp")]).unwrap();
        let far = doc.append_element(body, "img", &[("data-src", "/img/project.webp")]).unwrap();
        doc.append_element(body, "img", &[("src", "/img/logo.svg")]).unwrap();
        doc.set_layout_rect(near, DOMRect::from_xywh(0.0, 620.0, 300.0, 200.0));
        doc.set_layout_rect(far, DOMRect::from_xywh(0.0, 2000.0, 300.0, 200.0));
        (doc, near, far)
    }

    #[test]
    fn test_margin_preloads_just_below_fold() {
        let (mut doc, near, far) = gallery();
        let mut loader = LazyImageLoader::new();
        assert_eq!(loader.start(&mut doc, &ViewportIntersection), 2);

        // `near` starts 20px below the fold, inside the 50px margin.
        let requests = loader.poll(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0));
        assert_eq!(requests, vec![ImageRequest { node: near, src: "/img/hero.webp".into() }]);
        assert!(!loader.is_watching(near));
        assert!(loader.is_watching(far));
    }

    #[test]
    fn test_image_without_source_is_dropped() {
        let (mut doc, near, far) = gallery();
        let mut loader = LazyImageLoader::new();
        loader.start(&mut doc, &ViewportIntersection);
        doc.remove_attribute(near, LAZY_SOURCE_ATTRIBUTE).unwrap();

        let entries = [IntersectionEntry::entering(near), IntersectionEntry::entering(far)];
        let requests = loader.handle_entries(&doc, &entries);
        assert_eq!(requests, vec![ImageRequest { node: far, src: "/img/project.webp".into() }]);
        assert!(!loader.is_watching(near));
        assert_eq!(loader.watched_len(), 0);

        // Later viewport checks no longer consider it.
        assert!(loader.poll(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0)).is_empty());
    }

    #[test]
    fn test_complete_success_and_failure() {
        let (mut doc, near, far) = gallery();
        let ok = ImageRequest { node: near, src: "/img/hero.webp".into() };
        LazyImageLoader::complete(&mut doc, &ok, Ok(())).unwrap();
        assert_eq!(doc.get_attribute(near, "src"), Some("/img/hero.webp"));
        assert_eq!(doc.get_attribute(near, "data-src"), None);
        assert!(doc.has_class(near, LOADED_CLASS));

        let bad = ImageRequest { node: far, src: "/img/project.webp".into() };
        LazyImageLoader::complete(&mut doc, &bad, Err(LoadError::Failed("404".into()))).unwrap();
        assert!(doc.has_class(far, ERROR_CLASS));
        assert_eq!(doc.get_attribute(far, "src"), None);
        assert_eq!(doc.get_attribute(far, "data-src"), Some("/img/project.webp"));
    }

    #[test]
    fn test_without_support_loads_eagerly() {
        let (mut doc, near, far) = gallery();
        let mut loader = LazyImageLoader::new();
        loader.start(&mut doc, &NoIntersection);
        for img in [near, far] {
            assert!(doc.get_attribute(img, "src").is_some());
            assert_eq!(doc.get_attribute(img, "data-src"), None);
        }
        assert_eq!(loader.watched_len(), 0);
        assert!(loader.poll(&doc, DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0)).is_empty());
    }

    #[test]
    fn test_observe_image_after_start() {
        let (mut doc, _, _) = gallery();
        let mut loader = LazyImageLoader::new();
        let late = doc.append_element(doc.body(), "img", &[("data-src", "/img/late.webp")]).unwrap();
        let plain = doc.append_element(doc.body(), "img", &[]).unwrap();
        assert!(!loader.observe_image(&doc, late));

        loader.start(&mut doc, &ViewportIntersection);
        loader.unobserve_image(late);
        assert!(loader.observe_image(&doc, late));
        assert!(!loader.observe_image(&doc, plain));

        loader.stop();
        loader.stop();
        assert_eq!(loader.watched_len(), 0);
    }
}
