// src/exec/build.rs

//! Build invocation.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::exec::backend::{CommandSpec, ProcessBackend, ProcessOutcome};

/// How a build invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    Failed { exit_code: i32 },
    /// The command could not be started, or the capture file could not be
    /// opened. Treated exactly like a failed build.
    LaunchFailed,
}

/// Result of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub status: BuildStatus,
    /// Where the merged stdout/stderr of this invocation was written.
    pub capture: PathBuf,
}

impl BuildResult {
    pub fn succeeded(&self) -> bool {
        self.status == BuildStatus::Succeeded
    }
}

/// Runs the configured build command with output captured to a file.
#[derive(Debug, Clone)]
pub struct BuildRunner {
    command: CommandSpec,
    capture: PathBuf,
}

impl BuildRunner {
    pub fn new(command: CommandSpec, capture: impl Into<PathBuf>) -> Self {
        Self {
            command,
            capture: capture.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            CommandSpec::shell(&settings.build_cmd, &settings.root),
            &settings.capture_file,
        )
    }

    pub fn capture(&self) -> &Path {
        &self.capture
    }

    /// Run the build to completion. Never fails: launch errors become
    /// [`BuildStatus::LaunchFailed`].
    pub async fn run<B: ProcessBackend + ?Sized>(&self, backend: &mut B) -> BuildResult {
        info!(cmd = %self.command.display(), "running build");

        let status = match backend.run_captured(&self.command, &self.capture).await {
            Ok(ProcessOutcome::Success) => BuildStatus::Succeeded,
            Ok(ProcessOutcome::Failed(exit_code)) => BuildStatus::Failed { exit_code },
            Err(err) => {
                warn!(cmd = %self.command.display(), error = %err, "build could not be launched");
                BuildStatus::LaunchFailed
            }
        };

        info!(?status, capture = ?self.capture, "build finished");

        BuildResult {
            status,
            capture: self.capture.clone(),
        }
    }
}
