// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the production
//!   `RealProcessBackend` built on `tokio::process::Command`.
//! - [`build`] runs the build command with its output captured to a file.
//! - [`publish`] runs the stage/commit/push sequence.

pub mod backend;
pub mod build;
pub mod publish;

pub use backend::{CommandSpec, ProcessBackend, ProcessOutcome, RealProcessBackend};
pub use build::{BuildResult, BuildRunner, BuildStatus};
pub use publish::{CommitPublisher, COMMIT_MESSAGE};
