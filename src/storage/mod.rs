pub mod database;
pub mod error;
pub mod models;
pub mod persistence;
pub mod snapshot_db;

pub use persistence::{PersistenceSubscriber, rehydrate};
pub use snapshot_db::SnapshotDatabase;

use std::fs;
use std::path::Path;

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
