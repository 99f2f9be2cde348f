// src/watch/snapshot.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::config::Settings;
use crate::fs::FileSystem;

/// Modification time in nanoseconds relative to the Unix epoch.
///
/// Signed so that pre-epoch mtimes still order correctly.
pub type Timestamp = i128;

/// Point-in-time mapping of watched file paths to modification times.
pub type Snapshot = HashMap<PathBuf, Timestamp>;

/// Walks the watched directory and produces [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct SnapshotCollector {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    extensions: Vec<String>,
}

impl SnapshotCollector {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            fs,
            root: root.into(),
            extensions,
        }
    }

    pub fn from_settings(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self::new(fs, settings.watch_dir.clone(), settings.extensions.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect a fresh snapshot.
    ///
    /// Best effort: an entry that cannot be listed or stat'ed is left out and
    /// the walk carries on.
    pub fn collect(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();

        for entry in self.fs.walk_files(&self.root) {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if !has_allowed_extension(&path, &self.extensions) {
                continue;
            }

            match self.fs.modified(&path) {
                Ok(mtime) => {
                    snapshot.insert(path, to_timestamp(mtime));
                }
                Err(err) => {
                    debug!(path = ?path, error = %err, "skipping file without readable mtime");
                }
            }
        }

        debug!(root = ?self.root, files = snapshot.len(), "collected snapshot");
        snapshot
    }
}

/// True if the file name ends in `.<ext>` for one of `extensions`.
///
/// Extensions are expected without their leading dot.
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        name.len() > ext.len()
            && name.ends_with(ext.as_str())
            && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

fn to_timestamp(t: SystemTime) -> Timestamp {
    match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(after) => after.as_nanos() as Timestamp,
        Err(before) => -(before.duration().as_nanos() as Timestamp),
    }
}
