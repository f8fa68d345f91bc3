//! On-disk store for the last update record.

use super::UpdateRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON file holding one [`UpdateRecord`].
#[derive(Debug, Clone)]
pub struct UpdateCache {
    path: PathBuf,
}

impl UpdateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache under a user configuration root (`<root>/cache/updates.json`).
    pub fn in_user_root(root: &Path) -> Self {
        Self::new(root.join("cache").join("updates.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached record. Missing or unreadable files count as no record.
    pub fn load(&self) -> Option<UpdateRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no cached update record");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "discarding corrupt update record");
                None
            }
        }
    }

    /// Persist `record`, creating parent directories as needed.
    pub fn save(&self, record: &UpdateRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, format!("{json}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let cache = UpdateCache::in_user_root(temp.path());
        let record = UpdateRecord {
            version: "3.1.0".to_string(),
            url: "https://github.com/lando/cli/releases/tag/v3.1.0".to_string(),
            expires: 1_700_000_000_000,
        };

        cache.save(&record).unwrap();

        assert!(cache.path().ends_with("cache/updates.json"));
        assert_eq!(cache.load(), Some(record));
    }

    #[test]
    fn test_missing_and_corrupt_files_load_as_none() {
        let temp = TempDir::new().unwrap();
        let cache = UpdateCache::new(temp.path().join("updates.json"));
        assert_eq!(cache.load(), None);

        std::fs::write(cache.path(), "{not json").unwrap();
        assert_eq!(cache.load(), None);
    }
}
