//! Reveal configuration
//!
//! Process-wide constants for the observers. They are not runtime options;
//! [`IntersectionOptions`] only bundles them for the intersection seam.

use std::fmt;
use std::str::FromStr;

/// Fraction of an element's box that must be visible to reveal it
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Trigger zone for reveals: the viewport minus 50px at the bottom
pub const REVEAL_ROOT_MARGIN: RootMargin = RootMargin::new(0.0, 0.0, -50.0, 0.0);

/// Class added to an element once it has been revealed
pub const REVEALED_CLASS: &str = "animate";

/// Attribute opting an element into reveal without an animation class
pub const REVEAL_ATTRIBUTE: &str = "data-animate";

/// Lazy images start loading when 1% is inside the expanded root
pub const LAZY_THRESHOLD: f64 = 0.01;

/// Lazy images load 50px before they scroll into view
pub const LAZY_ROOT_MARGIN: RootMargin = RootMargin::uniform(50.0);

/// Attribute holding the deferred image source
pub const LAZY_SOURCE_ATTRIBUTE: &str = "data-src";

pub const LOADED_CLASS: &str = "loaded";
pub const ERROR_CLASS: &str = "error";

/// CSS-style root margin in pixels. Positive values grow the root.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(px: f64) -> Self {
        Self::new(px, px, px, px)
    }

    /// Parse `rootMargin` shorthand: one to four `px` lengths.
    ///
    /// The observers use the constants above; this is for hosts whose
    /// [`IntersectionSupport`](crate::IntersectionSupport) reads margins
    /// written the CSS way, and for checking a native primitive's margin
    /// against [`IntersectionOptions::root_margin`].
    pub fn parse(input: &str) -> Result<Self, MarginError> {
        let values = input
            .split_whitespace()
            .map(|part| parse_px(part).ok_or_else(|| MarginError::InvalidLength(part.to_string())))
            .collect::<Result<Vec<f64>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self::new(*vertical, *horizontal, *vertical, *horizontal)),
            [top, horizontal, bottom] => Ok(Self::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(Self::new(*top, *right, *bottom, *left)),
            _ => Err(MarginError::WrongCount(values.len())),
        }
    }
}

fn parse_px(part: &str) -> Option<f64> {
    if part == "0" {
        return Some(0.0);
    }
    part.strip_suffix("px")?.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FromStr for RootMargin {
    type Err = MarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}px {}px {}px", self.top, self.right, self.bottom, self.left)
    }
}

/// Root margin parse error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MarginError {
    #[error("Invalid margin length: {0:?}")]
    InvalidLength(String),

    #[error("Expected 1 to 4 margin values, got {0}")]
    WrongCount(usize),
}

/// Intersection observer options
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOptions {
    /// Root margin applied to the viewport
    pub root_margin: RootMargin,
    /// Visible fraction at which a target counts as intersecting
    pub threshold: f64,
}

impl IntersectionOptions {
    /// Options used by the reveal observer
    pub fn reveal() -> Self {
        Self { root_margin: REVEAL_ROOT_MARGIN, threshold: REVEAL_THRESHOLD }
    }

    /// Options used by the lazy image loader
    pub fn lazy_images() -> Self {
        Self { root_margin: LAZY_ROOT_MARGIN, threshold: LAZY_THRESHOLD }
    }
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self { root_margin: RootMargin::default(), threshold: 0.0 }
    }
}
