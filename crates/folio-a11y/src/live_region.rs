//! Live Region Support
//!
//! Transient screen-reader announcements. Each message gets its own
//! visually-hidden live region under `<body>`, which the host removes after
//! [`ANNOUNCEMENT_TTL`].

use std::time::Duration;

use folio_dom::{Document, DomError, NodeId};

/// How long an announcement stays in the document
pub const ANNOUNCEMENT_TTL: Duration = Duration::from_secs(3);

/// Class hiding the region visually while keeping it readable
pub const SCREEN_READER_ONLY_CLASS: &str = "sr-only";

/// Politeness level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Politeness {
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// A pending announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dismiss the announcement once ANNOUNCEMENT_TTL has elapsed"]
pub struct Announcement {
    node: NodeId,
    politeness: Politeness,
}

impl Announcement {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    /// Remove the region. Returns false if it was already gone.
    pub fn dismiss(&self, doc: &mut Document) -> bool {
        doc.is_connected(self.node) && doc.remove_child(self.node).is_ok()
    }
}

/// Append a live region carrying `message`
pub fn announce(doc: &mut Document, message: &str, politeness: Politeness) -> Result<Announcement, DomError> {
    let body = doc.body();
    let node = doc.append_element(
        body,
        "div",
        &[("role", "status"), ("aria-live", politeness.as_str()), ("class", SCREEN_READER_ONLY_CLASS)],
    )?;
    doc.append_text(node, message)?;
    tracing::trace!("Announced ({}): {}", politeness.as_str(), message);
    Ok(Announcement { node, politeness })
}
