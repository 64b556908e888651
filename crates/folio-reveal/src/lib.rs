//! folio Reveal
//!
//! Viewport-driven behaviors for the portfolio page.
//!
//! Features:
//! - One-shot reveal animations on scroll (`RevealObserver`)
//! - Smooth scrolling for same-document anchors
//! - Lazy image loading (`LazyImageLoader`)
//! - A pluggable intersection-detection seam with a geometry-backed default
//!
//! # Example
//! ```rust,ignore
//! use folio_reveal::{RevealObserver, ViewportIntersection};
//!
//! let mut reveal = RevealObserver::new();
//! reveal.start(&mut doc, &ViewportIntersection);
//! reveal.poll(&mut doc, viewport);
//! reveal.stop(&mut doc);
//! ```

pub mod anchor;
pub mod config;
pub mod intersection;
pub mod lazy;
pub mod reveal;

pub use anchor::{install_anchor_scrolling, smooth_scroll_to};
pub use config::{IntersectionOptions, MarginError, RootMargin};
pub use intersection::{
    IntersectionEntry, IntersectionPrimitive, IntersectionSupport, NoIntersection,
    ViewportIntersection, ViewportIntersector,
};
pub use lazy::{ImageRequest, LazyImageLoader, LoadError};
pub use reveal::{AnimationKind, RevealObserver};
