use crate::models::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed persistence for the catalog document.
///
/// Every operation reads and rewrites the whole file. Writes are not atomic
/// and there is no locking: concurrent mutations are last-writer-wins on the
/// entire document.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, falling back to empty defaults when the file is
    /// missing or unreadable. The fallback is written back to disk so the
    /// next load succeeds; corruption is logged but never surfaced.
    pub fn load(&self) -> Document {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(
                        "Failed to parse {}, reinitializing with defaults: {}",
                        self.path.display(),
                        err
                    );
                    self.reset_to_default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    "Failed to read {}, reinitializing with defaults: {}",
                    self.path.display(),
                    err
                );
                self.reset_to_default()
            }
        }
    }

    /// Serializes the full document and overwrites the backing file
    pub fn save(&self, doc: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).context("Failed to serialize document")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn reset_to_default(&self) -> Document {
        let doc = Document::default();
        if let Err(err) = self.save(&doc) {
            tracing::error!("Failed to write default document: {}", err);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::sample_app;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("data.json"));

        let doc = store.load();
        assert!(doc.apps.is_empty());
        assert_eq!(doc.analytics.total_downloads, 0);
        // The default document was written back
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_corrupt_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{not json").unwrap();

        let store = Store::new(&path);
        let doc = store.load();
        assert!(doc.apps.is_empty());

        // Subsequent loads see the reinitialized file
        let doc = store.load();
        assert!(doc.apps.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("data.json"));

        let mut doc = Document::default();
        let mut app = sample_app(1, "Alpha", "Tools");
        app.downloads = 7;
        doc.apps.push(app);
        doc.add_category("Tools");
        doc.analytics.total_downloads = 7;
        doc.analytics.daily_entry("2026-08-30").downloads = 7;

        store.save(&doc).unwrap();
        let loaded = store.load();

        assert_eq!(loaded.apps.len(), 1);
        assert_eq!(loaded.apps[0].name, "Alpha");
        assert_eq!(loaded.apps[0].downloads, 7);
        assert_eq!(loaded.categories, vec!["Tools"]);
        assert_eq!(loaded.analytics.daily_stats["2026-08-30"].downloads, 7);
    }

    #[test]
    fn test_save_load_idempotent_serialization() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("data.json"));

        let mut doc = Document::default();
        doc.apps.push(sample_app(1, "Alpha", "Tools"));
        store.save(&doc).unwrap();

        let first = fs::read_to_string(store.path()).unwrap();
        store.save(&store.load()).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
    }
}
