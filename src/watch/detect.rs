// src/watch/detect.rs

use crate::watch::snapshot::Snapshot;

/// Whether anything changed between two snapshots.
///
/// True iff the mappings differ: a file appeared, disappeared, or has a
/// different mtime. Size is compared first since it is the cheap check.
pub fn snapshot_changed(previous: &Snapshot, current: &Snapshot) -> bool {
    if previous.len() != current.len() {
        return true;
    }

    previous
        .iter()
        .any(|(path, mtime)| current.get(path) != Some(mtime))
}
