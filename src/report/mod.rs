// src/report/mod.rs

//! Operator-facing output about build failures.
//!
//! - [`tail`] prints the end of the captured build log after a failed build.
//! - [`error_files`] watches for build-error report files and prints each
//!   new one once.

pub mod error_files;
pub mod tail;

pub use error_files::ErrorFileWatcher;
pub use tail::{tail_lines, ErrorReporter, FAILURE_HEADER, TAIL_LINES, TRAILER};
