//! folio DOM - Document Object Model
//!
//! Arena-backed element tree the folio behaviors run against. Hosts
//! mirror their render tree into a [`Document`], feed it layout rects,
//! and dispatch input through it.

mod classlist;
mod document;
mod events;
mod geometry;
mod node;
mod selector;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use events::{Event, EventHandler, EventType, Key, KeyModifiers, ListenerId};
pub use geometry::{DOMRect, ScrollBehavior, ScrollBlock, ScrollIntoViewOptions, ScrollRequest};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{AttributeMatcher, AttributeSelector, CompoundSelector, SelectorList};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Build an id from its raw arena index
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

pub type Result<T> = std::result::Result<T, DomError>;
