//! Open/close lifecycle around one [`Database`].
//!
//! Opening prefers the database file. When it does not exist, the cache copy
//! is opened read-only instead, so lookups keep working while the primary
//! location is unavailable; changes made then are discarded on close.
//!
//! Closing flushes the database. When the database was modified and carries
//! the `cache` flag, its storage dump is also mirrored to the cache path.

use crate::config::AccdbConfig;
use crate::database::{Database, FlushOutcome, CACHE_FLAG};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Session {
    pub db: Database,
    cache_path: PathBuf,
    using_cache: bool,
}

/// What happened when a [`Session`] was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseReport {
    pub flush: FlushOutcome,
    /// The storage dump was copied to the cache path.
    pub mirrored: bool,
}

impl Session {
    pub fn open(db_path: &Path, cache_path: &Path) -> Result<Self> {
        let using_cache = !db_path.exists();
        let db = if using_cache {
            debug!(path = %cache_path.display(), "database missing, using read-only cache");
            let mut db = Database::from_file(cache_path)?;
            db.set_readonly(true);
            db
        } else {
            Database::from_file(db_path)?
        };

        Ok(Self {
            db,
            cache_path: cache_path.to_path_buf(),
            using_cache,
        })
    }

    pub fn from_config(config: &AccdbConfig) -> Result<Self> {
        Self::open(&config.db_path(), &config.cache_path())
    }

    /// True when the session fell back to the read-only cache.
    pub fn using_cache(&self) -> bool {
        self.using_cache
    }

    pub fn close(mut self) -> Result<CloseReport> {
        let modified = self.db.is_dirty();
        let flush = self.db.flush()?;

        let mirror = modified
            && self.db.has_flag(CACHE_FLAG)
            && self.db.path() != Some(self.cache_path.as_path());
        if mirror {
            self.db.to_file(&self.cache_path)?;
            debug!(path = %self.cache_path.display(), "mirrored database to cache");
        }

        Ok(CloseReport {
            flush,
            mirrored: mirror,
        })
    }
}
