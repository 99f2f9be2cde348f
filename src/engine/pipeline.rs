// src/engine/pipeline.rs

//! The build → report/publish chain shared by the poll loop and the one-shot
//! runner.

use std::io::Write;
use std::sync::Arc;

use tracing::warn;

use crate::config::Settings;
use crate::exec::{BuildResult, BuildRunner, CommitPublisher, ProcessBackend};
use crate::fs::FileSystem;
use crate::report::ErrorReporter;

#[derive(Debug, Clone)]
pub struct BuildPipeline {
    builder: BuildRunner,
    reporter: ErrorReporter,
    publisher: CommitPublisher,
}

impl BuildPipeline {
    pub fn new(builder: BuildRunner, reporter: ErrorReporter, publisher: CommitPublisher) -> Self {
        Self {
            builder,
            reporter,
            publisher,
        }
    }

    pub fn from_settings(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self::new(
            BuildRunner::from_settings(settings),
            ErrorReporter::from_settings(fs, settings),
            CommitPublisher::from_settings(settings),
        )
    }

    pub async fn build<B: ProcessBackend + ?Sized>(&self, backend: &mut B) -> BuildResult {
        self.builder.run(backend).await
    }

    /// Print the tail of the capture. Output errors are logged, not returned.
    pub fn report(&self, out: &mut dyn Write) {
        if let Err(err) = self.reporter.report(out) {
            warn!(error = %err, "failed to print build failure report");
        }
    }

    pub async fn publish<B: ProcessBackend + ?Sized>(&self, backend: &mut B) {
        self.publisher.publish(backend).await
    }
}

/// Write one status line to the operator. Output errors are logged only.
pub(crate) fn status_line(out: &mut dyn Write, line: &str) {
    if let Err(err) = writeln!(out, "{line}").and_then(|_| out.flush()) {
        warn!(error = %err, "failed to write status line");
    }
}
