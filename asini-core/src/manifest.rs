//! `package.json` handling for the temporary-manifest install workflow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fs::FileStore;
use crate::specifier::DependencySpecifier;

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// A manifest that declares nothing but the requested dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticManifest {
    pub dependencies: IndexMap<String, String>,
}

impl SyntheticManifest {
    /// Builds the manifest from specifiers, keeping their order.
    ///
    /// Specifiers without a range map to `"*"`. A repeated name keeps its
    /// first position and takes the last range.
    pub fn from_specifiers<S: AsRef<str>>(specs: &[S]) -> Self {
        let dependencies = specs
            .iter()
            .map(|spec| DependencySpecifier::parse(spec.as_ref()))
            .map(|dep| {
                let range = dep.range_or_any().to_string();
                (dep.name, range)
            })
            .collect();
        Self { dependencies }
    }

    /// Compact JSON, as written to disk.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reads the `version` field of `dir/package.json`.
pub fn read_package_version(store: &dyn FileStore, dir: &Path) -> Result<String> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let content = store.read_to_string(&path)?;
    let json: Value = serde_json::from_str(&content)?;

    json.get("version")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Parse(format!("No version field in {}", path.display())))
}

/// The manifest of a directory, moved aside for the duration of an install.
///
/// Created by renaming `package.json` to a backup name unique to this
/// invocation. [`restore`](Self::restore) moves it back; if the guard is
/// dropped without being restored (a panic, a cancelled future) the drop
/// performs the restore instead.
pub struct ManifestBackup {
    store: Arc<dyn FileStore>,
    original: PathBuf,
    backup: PathBuf,
    restored: bool,
}

impl ManifestBackup {
    /// Moves `dir/package.json` aside and returns the guard that owns it.
    ///
    /// The rename is synchronous, so the manifest is never moved without a
    /// guard owning it.
    pub fn create(store: Arc<dyn FileStore>, dir: &Path, prefix: &str) -> Result<Self> {
        let original = dir.join(MANIFEST_FILE_NAME);
        let backup = dir.join(backup_file_name(prefix));

        store.rename_sync(&original, &backup)?;
        debug!(backup = %backup.display(), "manifest moved aside");

        Ok(Self {
            store,
            original,
            backup,
            restored: false,
        })
    }

    pub fn original_path(&self) -> &Path {
        &self.original
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Moves the backup back over the original manifest path.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.store
            .rename_sync(&self.backup, &self.original)
            .map_err(|e| Error::ManifestRestore {
                backup: self.backup.clone(),
                message: e.to_string(),
            })
    }
}

impl Drop for ManifestBackup {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.store.rename_sync(&self.backup, &self.original) {
            warn!(
                backup = %self.backup.display(),
                error = %e,
                "failed to restore manifest"
            );
        }
    }
}

fn backup_file_name(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}.{}-{}_backup", MANIFEST_FILE_NAME, prefix, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_file_name_is_unique() {
        let a = backup_file_name("asini");
        let b = backup_file_name("asini");
        assert!(a.starts_with("package.json.asini-"));
        assert!(a.ends_with("_backup"));
        assert_eq!(a.len(), "package.json.asini-".len() + 8 + "_backup".len());
        assert_ne!(a, b);
    }

    #[test]
    fn test_synthetic_manifest_json() {
        let manifest = SyntheticManifest::from_specifiers(&["foo@1.0.0", "bar"]);
        assert_eq!(
            manifest.to_json().unwrap(),
            r#"{"dependencies":{"foo":"1.0.0","bar":"*"}}"#
        );
    }

    #[test]
    fn test_synthetic_manifest_scoped_and_repeated() {
        let manifest =
            SyntheticManifest::from_specifiers(&["@scope/a@^2", "b@1", "@scope/a@^3"]);
        let entries: Vec<(&str, &str)> = manifest
            .dependencies
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(entries, vec![("@scope/a", "^3"), ("b", "1")]);
    }

    #[test]
    fn test_dropped_backup_restores_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&manifest, r#"{"name":"stub"}"#).unwrap();

        let store: Arc<dyn FileStore> = Arc::new(crate::fs::OsFileStore::new());
        let backup = ManifestBackup::create(store, dir.path(), "asini").unwrap();
        assert!(!manifest.exists());
        assert!(backup.backup_path().is_file());
        assert_eq!(backup.original_path(), manifest.as_path());

        drop(backup);
        assert_eq!(
            std::fs::read_to_string(&manifest).unwrap(),
            r#"{"name":"stub"}"#
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
