//! folio
//!
//! Scroll-driven reveal animations and keyboard accessibility for a
//! single-page portfolio, over an abstract document.
//!
//! # Example
//! ```rust,ignore
//! use folio::{Config, Page};
//! use folio_reveal::ViewportIntersection;
//!
//! let mut page = Page::new(document, Config::default());
//! page.mount(&ViewportIntersection);
//! let outcome = page.scroll_to(900.0);
//! ```

mod config;
mod page;

pub use config::Config;
pub use page::{Page, PageError, ScrollOutcome};

pub use folio_a11y as a11y;
pub use folio_dom as dom;
pub use folio_reveal as reveal;

/// folio version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
