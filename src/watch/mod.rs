// src/watch/mod.rs

//! Change detection by polling.
//!
//! This module is responsible for:
//! - Walking the watched directory into a [`Snapshot`] of file mtimes,
//!   filtered by extension.
//! - Comparing two snapshots.
//!
//! It knows nothing about builds; the poll loop in `engine` decides what a
//! change means.

pub mod detect;
pub mod snapshot;

pub use detect::snapshot_changed;
pub use snapshot::{has_allowed_extension, Snapshot, SnapshotCollector, Timestamp};
