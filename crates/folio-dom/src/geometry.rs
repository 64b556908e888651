//! Geometry APIs
//!
//! DOMRect and scrollIntoView requests.

use crate::NodeId;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Get intersection rect. Edge-adjacent rects yield a zero-area rect.
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }
        Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
    }

    /// Grow each edge outward by the given amounts (negative values shrink)
    pub fn expand(&self, top: f64, right: f64, bottom: f64, left: f64) -> DOMRect {
        DOMRect::from_xywh(
            self.x - left,
            self.y - top,
            (self.width + left + right).max(0.0),
            (self.height + top + bottom).max(0.0),
        )
    }

    /// Shift vertically (used to move document rects into viewport space)
    pub fn translate_y(&self, dy: f64) -> DOMRect {
        DOMRect { y: self.y + dy, ..*self }
    }
}

/// scrollIntoView behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Instant,
    Smooth,
}

/// Vertical alignment for scrollIntoView
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

/// scrollIntoView options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollIntoViewOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollIntoViewOptions {
    /// `{ behavior: 'smooth', block: 'start' }`
    pub fn smooth_start() -> Self {
        Self {
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }
    }
}

/// A scroll the host should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub options: ScrollIntoViewOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = DOMRect::from_xywh(50.0, 50.0, 100.0, 100.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, DOMRect::from_xywh(50.0, 50.0, 50.0, 50.0));

        let far = DOMRect::from_xywh(300.0, 300.0, 10.0, 10.0);
        assert!(a.intersection(&far).is_none());

        let touching = DOMRect::from_xywh(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&touching).unwrap().area(), 0.0);
    }

    #[test]
    fn test_expand_negative_bottom() {
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let root = viewport.expand(0.0, 0.0, -50.0, 0.0);
        assert_eq!(root.bottom(), 550.0);
        assert_eq!(root.width, 800.0);
    }
}
