// src/engine/once.rs

//! Single build attempt, for scripted use.

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::exec::{BuildResult, ProcessBackend};
use crate::fs::FileSystem;

use super::pipeline::{status_line, BuildPipeline};

pub const FAILURE_STATUS: &str = "Build failed.";

/// Build once, then publish or report, then print a final status line.
///
/// The build outcome is returned for callers that care; the CLI ignores it
/// and exits 0 either way.
pub async fn run_once<B: ProcessBackend + ?Sized>(
    settings: &Settings,
    fs: Arc<dyn FileSystem>,
    backend: &mut B,
    out: &mut dyn Write,
) -> BuildResult {
    let pipeline = BuildPipeline::from_settings(fs, settings);
    let result = pipeline.build(&mut *backend).await;

    if result.succeeded() {
        pipeline.publish(&mut *backend).await;
        status_line(out, super::runtime::SUCCESS_MESSAGE);
    } else {
        pipeline.report(out);
        status_line(out, FAILURE_STATUS);
    }

    info!(status = ?result.status, "one-shot build finished");
    result
}
