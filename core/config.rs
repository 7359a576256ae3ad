//! Optional `.comms.json` configuration: extra preserve patterns and a
//! backup store location. Looked up next to the target first, then in the
//! working directory. A missing file means defaults; a file that fails to
//! parse is a setup error, not a per-file skip.

use crate::CoreError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".comms.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub preserve_patterns: Vec<String>,
    pub override_defaults: bool,
    pub backup_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(target: &Path) -> Result<Self, CoreError> {
        let target_dir = if target.is_dir() {
            target
        } else {
            target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
        };
        let candidates = [target_dir.join(CONFIG_FILE_NAME), PathBuf::from(CONFIG_FILE_NAME)];
        for candidate in candidates {
            if candidate.is_file() {
                let text = fs::read_to_string(&candidate)?;
                return serde_json::from_str(&text).map_err(|e| {
                    CoreError::Config(format!("{}: {}", candidate.display(), e))
                });
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.preserve_patterns.is_empty());
        assert!(!config.override_defaults);
        assert!(config.backup_dir.is_none());
    }

    #[test]
    fn reads_patterns_and_backup_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"preserve_patterns": ["LICENSE.*"], "backup_dir": "/tmp/b"}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.preserve_patterns, vec!["LICENSE.*"]);
        assert_eq!(config.backup_dir.as_deref(), Some(Path::new("/tmp/b")));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{not json").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CoreError::Config(_))
        ));
    }
}
