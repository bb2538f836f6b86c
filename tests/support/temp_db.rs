use std::path::PathBuf;

use flipper::adapter::outbound::sqlite::{open, DbPool};
use tempfile::TempDir;

/// SQLite database file in its own temporary directory.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("flipper.db");
        Self { dir, path }
    }

    /// A fresh, migrated pool on the same file, as a restarted process would open.
    pub fn pool(&self) -> DbPool {
        open(self.url()).expect("open sqlite database")
    }

    pub fn url(&self) -> &str {
        self.path.to_str().expect("utf-8 temp path")
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
