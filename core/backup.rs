//! The backup store: a directory mirroring the scanned tree, written before
//! any file is modified, plus a manifest recording when each entry was
//! taken. Restore is driven by what is actually on disk in the store, so a
//! store directory alone is enough to undo a run.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

pub const DEFAULT_STORE_DIR: &str = ".comms-backup";
pub const STORE_DIR_ENV: &str = "COMMS_BACKUP_DIR";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    timestamp: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    entries: BTreeMap<String, EntryMeta>,
}

/// One original file's record in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub original: PathBuf,
    pub backup: PathBuf,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    Restored,
    NoBackup,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    pub restored: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct BackupStore {
    /// Store directory holding the mirror and the manifest.
    root: PathBuf,
    /// Directory the mirrored paths are relative to.
    base: PathBuf,
    manifest: Manifest,
}

impl BackupStore {
    /// Resolves the store location for `target` (CLI/config override first,
    /// then the environment, then `<target>/.comms-backup`) and loads the
    /// manifest when one exists. A manifest that cannot be parsed is fatal:
    /// restoring from a corrupt store must not guess.
    pub fn open(target: &Path, override_dir: Option<&Path>) -> Result<Self, CoreError> {
        let base = if target.is_dir() {
            target.to_path_buf()
        } else {
            target
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf()
        };
        let root = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os(STORE_DIR_ENV) {
                Some(dir) => PathBuf::from(dir),
                None => base.join(DEFAULT_STORE_DIR),
            },
        };

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            let text = fs::read_to_string(&manifest_path)?;
            serde_json::from_str(&text).map_err(|e| {
                CoreError::Backup(format!("unreadable manifest {}: {}", manifest_path.display(), e))
            })?
        } else {
            Manifest::default()
        };

        Ok(Self { root, base, manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> Vec<BackupEntry> {
        self.manifest
            .entries
            .iter()
            .map(|(key, meta)| BackupEntry {
                original: self.base.join(key),
                backup: self.root.join(key),
                timestamp: meta.timestamp,
            })
            .collect()
    }

    /// Whether the store holds anything restorable.
    pub fn has_backups(&self) -> bool {
        if !self.root.exists() {
            return false;
        }
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .any(|e| e.file_type().is_file() && e.file_name() != MANIFEST_FILE)
    }

    /// Number of restorable files currently in the store.
    pub fn backup_count(&self) -> usize {
        if !self.root.exists() {
            return 0;
        }
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && e.file_name() != MANIFEST_FILE)
            .count()
    }

    /// Copies `path`'s current bytes into the store and records the entry.
    /// Callers must not touch the original until this returns Ok.
    pub fn backup(&mut self, path: &Path) -> Result<(), CoreError> {
        let key = self.key_for(path)?;
        let destination = self.root.join(&key);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &destination)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.manifest.entries.insert(key, EntryMeta { timestamp });
        self.save_manifest()
    }

    /// Puts the backed-up bytes for `path` back and drops the entry. A path
    /// without a backup is reported, not an error.
    pub fn restore(&mut self, path: &Path) -> Result<RestoreStatus, CoreError> {
        let key = self.key_for(path)?;
        let source = self.root.join(&key);
        if !self.manifest.entries.contains_key(&key) || !source.is_file() {
            return Ok(RestoreStatus::NoBackup);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(&source, path)?;
        self.manifest.entries.remove(&key);
        self.save_manifest()?;
        Ok(RestoreStatus::Restored)
    }

    /// Restores every file present in the store, regardless of manifest
    /// health, and counts manifest entries whose backing file has vanished
    /// as skipped.
    pub fn restore_all(&mut self) -> Result<RestoreSummary, CoreError> {
        let mut summary = RestoreSummary::default();
        if !self.root.exists() {
            summary.skipped = self.manifest.entries.len();
            self.manifest.entries.clear();
            return Ok(summary);
        }
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| CoreError::Backup(e.to_string()))?;
            if !entry.file_type().is_file() || entry.file_name() == MANIFEST_FILE {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| CoreError::Backup("backup entry outside store".to_string()))?;
            let target = self.base.join(rel);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            summary.restored += 1;
            self.manifest.entries.remove(&rel.to_string_lossy().replace('\\', "/"));
        }
        summary.skipped = self.manifest.entries.len();
        self.manifest.entries.clear();
        self.save_manifest()?;
        Ok(summary)
    }

    /// Deletes the store directory.
    pub fn delete(self) -> Result<(), CoreError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    fn key_for(&self, path: &Path) -> Result<String, CoreError> {
        let rel = path.strip_prefix(&self.base).map_err(|_| {
            CoreError::Backup(format!(
                "{} is outside the scanned tree {}",
                path.display(),
                self.base.display()
            ))
        })?;
        Ok(rel.to_string_lossy().replace('\\', "/"))
    }

    fn save_manifest(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.root)?;
        let text = serde_json::to_string_pretty(&self.manifest)
            .map_err(|e| CoreError::Backup(e.to_string()))?;
        fs::write(self.root.join(MANIFEST_FILE), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_then_restore_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("src/a.py");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "# original\nprint(1)\n").unwrap();

        let mut store = BackupStore::open(dir.path(), None).unwrap();
        store.backup(&file).unwrap();
        fs::write(&file, "print(1)\n").unwrap();

        assert_eq!(store.restore(&file).unwrap(), RestoreStatus::Restored);
        assert_eq!(fs::read_to_string(&file).unwrap(), "# original\nprint(1)\n");
    }

    #[test]
    fn restore_without_backup_reports_and_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.sh");
        fs::write(&file, "echo hi\n").unwrap();

        let mut store = BackupStore::open(dir.path(), None).unwrap();
        assert_eq!(store.restore(&file).unwrap(), RestoreStatus::NoBackup);
        assert_eq!(fs::read_to_string(&file).unwrap(), "echo hi\n");
    }

    #[test]
    fn restore_all_counts_restored_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.py");
        let b = dir.path().join("b.py");
        fs::write(&a, "# a\n").unwrap();
        fs::write(&b, "# b\n").unwrap();

        let mut store = BackupStore::open(dir.path(), None).unwrap();
        store.backup(&a).unwrap();
        store.backup(&b).unwrap();
        fs::write(&a, "\n").unwrap();
        fs::write(&b, "\n").unwrap();
        // Losing one backing file turns that entry into a skip.
        fs::remove_file(store.root().join("b.py")).unwrap();

        let summary = store.restore_all().unwrap();
        assert_eq!(summary, RestoreSummary { restored: 1, skipped: 1 });
        assert_eq!(fs::read_to_string(&a).unwrap(), "# a\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "\n");
    }

    #[test]
    fn override_dir_wins_over_default_location() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.toml");
        fs::write(&file, "# c\nk = 1\n").unwrap();

        let mut store = BackupStore::open(dir.path(), Some(elsewhere.path())).unwrap();
        store.backup(&file).unwrap();
        assert!(elsewhere.path().join("a.toml").is_file());
        assert!(!dir.path().join(DEFAULT_STORE_DIR).exists());
    }

    #[test]
    fn second_backup_of_same_path_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "v1\n").unwrap();

        let mut store = BackupStore::open(dir.path(), None).unwrap();
        store.backup(&file).unwrap();
        fs::write(&file, "v2\n").unwrap();
        store.backup(&file).unwrap();

        assert_eq!(store.backup_count(), 1);
        fs::write(&file, "v3\n").unwrap();
        store.restore(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "v2\n");
    }
}
