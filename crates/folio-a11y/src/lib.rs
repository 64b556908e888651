//! folio Accessibility
//!
//! Accessibility helpers for the portfolio page.
//!
//! Features:
//! - Focus trapping for modal dialogs
//! - Keyboard-navigation detection
//! - High-contrast mode with a persisted preference
//! - Screen-reader announcements

pub mod contrast;
pub mod focus;
pub mod keyboard;
pub mod live_region;
pub mod storage;

pub use contrast::HighContrast;
pub use focus::{FocusTrap, TabIndex, focusable_elements, is_focusable};
pub use keyboard::KeyboardModality;
pub use live_region::{Announcement, Politeness, announce};
pub use storage::{FilePreferences, MemoryPreferences, PreferenceStore};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Preference storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preference {key:?}: {reason}")]
    InvalidPreference { key: String, reason: String },

    #[error(transparent)]
    Dom(#[from] folio_dom::DomError),
}

pub type Result<T> = std::result::Result<T, A11yError>;
