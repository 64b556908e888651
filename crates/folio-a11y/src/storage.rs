//! Preference storage
//!
//! Key/value persistence for user preferences such as high-contrast mode.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{A11yError, Result};

/// Key/value preference backend
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory preferences, lost on drop
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    data: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

/// File-backed preferences
///
/// One `key\tvalue` pair per line. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Load `path`, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut data = BTreeMap::new();
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            for line in contents.lines() {
                match line.split_once('\t') {
                    Some((key, value)) => {
                        data.insert(key.to_string(), value.to_string());
                    }
                    None if line.is_empty() => {}
                    None => tracing::warn!("Ignoring malformed preference line in {}", path.display()),
                }
            }
        }
        tracing::debug!("Loaded {} preferences from {}", data.len(), path.display());
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let contents = self
            .data
            .iter()
            .map(|(k, v)| format!("{}\t{}", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    /// Nothing changes in memory unless the file write succeeds
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate(key, value)?;
        let previous = self.data.insert(key.to_string(), value.to_string());
        self.persist().inspect_err(|_| self.restore(key, previous))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.data.remove(key) else {
            return Ok(());
        };
        self.persist().inspect_err(|_| self.restore(key, Some(previous)))
    }
}

impl FilePreferences {
    fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.data.insert(key.to_string(), value),
            None => self.data.remove(key),
        };
        tracing::warn!("Preference {:?} not saved to {}", key, self.path.display());
    }
}

fn validate(key: &str, value: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "empty key"
    } else if key.contains(['\t', '\n', '\r']) {
        "key contains a tab or line break"
    } else if value.contains(['\t', '\n', '\r']) {
        "value contains a tab or line break"
    } else {
        return Ok(());
    };
    Err(A11yError::InvalidPreference { key: key.to_string(), reason: reason.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("folio-prefs-{}-{}-{}", std::process::id(), n, name))
    }

    #[test]
    fn test_memory_preferences() {
        let mut prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("highContrast").unwrap(), None);
        prefs.set("highContrast", "true").unwrap();
        assert_eq!(prefs.get("highContrast").unwrap().as_deref(), Some("true"));
        prefs.remove("highContrast").unwrap();
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_file_preferences_survive_reopen() {
        let path = scratch_path("reopen");
        {
            let mut prefs = FilePreferences::open(&path).unwrap();
            prefs.set("highContrast", "true").unwrap();
            prefs.set("theme", "dark").unwrap();
        }
        let prefs = FilePreferences::open(&path).unwrap();
        assert_eq!(prefs.get("highContrast").unwrap().as_deref(), Some("true"));
        assert_eq!(prefs.get("theme").unwrap().as_deref(), Some("dark"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_preferences_reject_separators() {
        let path = scratch_path("reject");
        let mut prefs = FilePreferences::open(&path).unwrap();
        assert!(matches!(prefs.set("a\tb", "x"), Err(A11yError::InvalidPreference { .. })));
        assert!(matches!(prefs.set("key", "line\nbreak"), Err(A11yError::InvalidPreference { .. })));
        assert!(matches!(prefs.set("", "x"), Err(A11yError::InvalidPreference { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_values() {
        let dir = scratch_path("vanishing-dir");
        fs::create_dir(&dir).unwrap();
        let path = dir.join("prefs.tsv");
        let mut prefs = FilePreferences::open(&path).unwrap();
        prefs.set("highContrast", "false").unwrap();

        fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(prefs.set("highContrast", "true"), Err(A11yError::Io(_))));
        assert_eq!(prefs.get("highContrast").unwrap().as_deref(), Some("false"));
        assert!(matches!(prefs.set("theme", "dark"), Err(A11yError::Io(_))));
        assert_eq!(prefs.get("theme").unwrap(), None);
        assert!(matches!(prefs.remove("highContrast"), Err(A11yError::Io(_))));
        assert_eq!(prefs.get("highContrast").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let path = scratch_path("malformed");
        fs::write(&path, "highContrast\tfalse\ngarbage\n\ntheme\tlight").unwrap();
        let prefs = FilePreferences::open(&path).unwrap();
        assert_eq!(prefs.get("highContrast").unwrap().as_deref(), Some("false"));
        assert_eq!(prefs.get("garbage").unwrap(), None);
        assert_eq!(prefs.get("theme").unwrap().as_deref(), Some("light"));
        fs::remove_file(&path).unwrap();
    }
}
