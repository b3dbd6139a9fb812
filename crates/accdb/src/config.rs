//! # Configuration
//!
//! accdb configuration is loaded with [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `ACCDB`, `ACCDB_CACHE`.
//! 2. **Config file**: `accdb.toml` in the OS config directory (via the
//!    `directories` crate), e.g. `~/.config/accdb/accdb.toml` on Linux.
//! 3. **Compiled defaults**.
//!
//! The CLI's `--file` flag overrides the database path on top of all layers.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `db_path` | `ACCDB` | `~/accounts.db.txt` | The account database |
//! | `cache_path` | `ACCDB_CACHE` | `~/Private/accounts.cache.txt` | Read-only fallback copy |
//!
//! A leading `~/` in either path is expanded to the home directory.

use crate::error::Result;
use confique::Config;
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "accdb.toml";

const DEFAULT_DB_PATH: &str = "~/accounts.db.txt";
const DEFAULT_CACHE_PATH: &str = "~/Private/accounts.cache.txt";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccdbConfig {
    /// Path of the account database.
    #[config(env = "ACCDB", default = "~/accounts.db.txt")]
    pub db_path: String,

    /// Copy opened read-only when the database itself is missing.
    #[config(env = "ACCDB_CACHE", default = "~/Private/accounts.cache.txt")]
    pub cache_path: String,
}

impl Default for AccdbConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            cache_path: DEFAULT_CACHE_PATH.to_string(),
        }
    }
}

impl AccdbConfig {
    /// Loads environment, config file and defaults, in that priority.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_file().as_deref())
    }

    /// Like [`AccdbConfig::load`], reading the given file instead of the
    /// default one. A missing file is skipped.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(file) = file {
            builder = builder.file(file);
        }
        Ok(builder.load()?)
    }

    pub fn db_path(&self) -> PathBuf {
        expand_home(&self.db_path)
    }

    pub fn cache_path(&self) -> PathBuf {
        expand_home(&self.cache_path)
    }
}

/// `accdb.toml` in the OS config directory, when one can be determined.
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("org", "accdb", "accdb").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    match (path, home) {
        ("~", Some(home)) => home,
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AccdbConfig::default();
        assert_eq!(config.db_path, "~/accounts.db.txt");
        assert_eq!(config.cache_path, "~/Private/accounts.cache.txt");
    }

    #[test]
    fn test_expand_home() {
        let home = BaseDirs::new().unwrap().home_dir().to_path_buf();
        assert_eq!(expand_home("~/x.txt"), home.join("x.txt"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/tmp/x.txt"), PathBuf::from("/tmp/x.txt"));
        assert_eq!(expand_home("rel/~/x"), PathBuf::from("rel/~/x"));
    }

    #[test]
    fn test_paths_are_expanded() {
        let config = AccdbConfig {
            db_path: "/srv/accounts.txt".to_string(),
            ..Default::default()
        };
        assert_eq!(config.db_path(), PathBuf::from("/srv/accounts.txt"));
        assert!(config.cache_path().ends_with("Private/accounts.cache.txt"));
    }

    #[test]
    fn test_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, "cache_path = \"/srv/cache.txt\"\n").unwrap();

        let config = AccdbConfig::builder().file(&file).load().unwrap();
        assert_eq!(config.cache_path, "/srv/cache.txt");
        assert_eq!(config.db_path, "~/accounts.db.txt");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AccdbConfig::builder()
            .file(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert_eq!(config, AccdbConfig::default());
    }
}
