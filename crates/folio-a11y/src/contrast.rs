//! High-contrast mode
//!
//! Toggles the `high-contrast` class on `<body>`. An explicit user choice
//! is persisted and always wins over the system preference.

use folio_dom::Document;

use crate::Result;
use crate::storage::PreferenceStore;

/// Class applied to `<body>` while high contrast is on
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";

/// Preference key holding `"true"` or `"false"`
pub const HIGH_CONTRAST_KEY: &str = "highContrast";

/// High-contrast controller
#[derive(Debug)]
pub struct HighContrast<S: PreferenceStore> {
    store: S,
    enabled: bool,
}

impl<S: PreferenceStore> HighContrast<S> {
    /// Apply the saved preference, or the system one when nothing is saved
    pub fn load(doc: &mut Document, store: S, system_prefers_high: bool) -> Result<Self> {
        let saved = saved_choice(&store)?;
        let mut contrast = Self { store, enabled: false };
        match saved.as_deref() {
            Some("true") => contrast.enable(doc)?,
            Some(_) => {}
            None if system_prefers_high => contrast.enable(doc)?,
            None => {}
        }
        tracing::debug!("High contrast {} (saved: {:?})", contrast.enabled, saved);
        Ok(contrast)
    }

    /// Persist the flipped choice, then apply it. Returns the new state.
    /// If saving fails the page is left as it was.
    pub fn toggle(&mut self, doc: &mut Document) -> Result<bool> {
        let enable = !self.enabled;
        self.store.set(HIGH_CONTRAST_KEY, if enable { "true" } else { "false" })?;
        if enable {
            self.enable(doc)?;
        } else {
            self.disable(doc)?;
        }
        Ok(self.enabled)
    }

    /// Turn on without touching the stored preference
    pub fn enable(&mut self, doc: &mut Document) -> Result<()> {
        let body = doc.body();
        doc.add_class(body, HIGH_CONTRAST_CLASS)?;
        self.enabled = true;
        Ok(())
    }

    /// Turn off without touching the stored preference
    pub fn disable(&mut self, doc: &mut Document) -> Result<()> {
        let body = doc.body();
        doc.remove_class(body, HIGH_CONTRAST_CLASS)?;
        self.enabled = false;
        Ok(())
    }

    /// The system preference changed. Only a switch to high contrast is
    /// followed, and only while the user has not chosen explicitly.
    pub fn on_system_change(&mut self, doc: &mut Document, prefers_high: bool) -> Result<()> {
        if prefers_high && saved_choice(&self.store)?.is_none() {
            self.enable(doc)?;
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

// An empty stored value counts as no choice.
fn saved_choice<S: PreferenceStore>(store: &S) -> Result<Option<String>> {
    Ok(store.get(HIGH_CONTRAST_KEY)?.filter(|v| !v.is_empty()))
}
