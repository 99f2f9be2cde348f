// src/exec/publish.rs

//! Stage, commit and push after a green build.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Settings;
use crate::exec::backend::{CommandSpec, ProcessBackend, ProcessOutcome};

pub const COMMIT_MESSAGE: &str = "Auto-commit: build succeeded";

/// Publishes the working tree with `git add -A`, `git commit`, `git push`.
///
/// Fire and forget: every step runs even if the previous one failed, and
/// failures are only logged. A failed push leaves the commit local.
#[derive(Debug, Clone)]
pub struct CommitPublisher {
    root: PathBuf,
}

impl CommitPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.root)
    }

    /// The three VCS invocations, in order.
    pub fn steps(&self) -> [CommandSpec; 3] {
        [
            CommandSpec::new("git", &self.root).arg("add").arg("-A"),
            CommandSpec::new("git", &self.root)
                .arg("commit")
                .arg("-m")
                .arg(COMMIT_MESSAGE),
            CommandSpec::new("git", &self.root).arg("push"),
        ]
    }

    pub async fn publish<B: ProcessBackend + ?Sized>(&self, backend: &mut B) {
        for step in self.steps() {
            match backend.run_inherited(&step).await {
                Ok(ProcessOutcome::Success) => {
                    info!(cmd = %step.display(), "publish step done");
                }
                Ok(ProcessOutcome::Failed(code)) => {
                    warn!(cmd = %step.display(), exit_code = code, "publish step failed; continuing");
                }
                Err(err) => {
                    warn!(cmd = %step.display(), error = %err, "publish step could not run; continuing");
                }
            }
        }
    }
}
