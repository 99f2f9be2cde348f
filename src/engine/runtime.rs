// src/engine/runtime.rs

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Settings;
use crate::errors::Result;
use crate::exec::{BuildResult, ProcessBackend};
use crate::fs::FileSystem;
use crate::watch::SnapshotCollector;

use super::core::{CoreCommand, PollCore};
use super::pipeline::{status_line, BuildPipeline};
use super::shutdown::ShutdownSignal;

pub const WATCHING_MESSAGE: &str = "Watching for changes...";
pub const CHANGE_MESSAGE: &str = "Change detected. Running build...";
pub const SUCCESS_MESSAGE: &str = "Build succeeded.";

/// What a single iteration of the poll loop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No change; nothing ran.
    Unchanged,
    /// The build failed and its log tail was printed.
    Reported(BuildResult),
    /// The build succeeded and the publish steps ran.
    Published(BuildResult),
}

/// Async shell around [`PollCore`]: takes snapshots, runs the build and its
/// follow-up, sleeps between ticks.
///
/// Everything happens on the calling task. A running build blocks the loop,
/// so there is never more than one build in flight.
pub struct PollLoop<B: ProcessBackend> {
    core: PollCore,
    collector: SnapshotCollector,
    pipeline: BuildPipeline,
    backend: B,
    out: Box<dyn Write + Send>,
    interval: Duration,
}

impl<B: ProcessBackend> fmt::Debug for PollLoop<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollLoop")
            .field("core", &self.core)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> PollLoop<B> {
    /// Build the loop and take the initial baseline snapshot.
    pub fn new(
        settings: &Settings,
        fs: Arc<dyn FileSystem>,
        backend: B,
        out: Box<dyn Write + Send>,
    ) -> Self {
        let collector = SnapshotCollector::from_settings(Arc::clone(&fs), settings);
        let core = PollCore::new(collector.collect());

        Self {
            core,
            collector,
            pipeline: BuildPipeline::from_settings(fs, settings),
            backend,
            out,
            interval: settings.poll_interval,
        }
    }

    pub fn core(&self) -> &PollCore {
        &self.core
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Main loop: tick every `interval` until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<()> {
        info!(
            dir = ?self.collector.root(),
            files = self.core.baseline().len(),
            interval_ms = self.interval.as_millis() as u64,
            "poll loop started"
        );
        status_line(self.out.as_mut(), WATCHING_MESSAGE);

        loop {
            if shutdown.sleep_or_shutdown(self.interval).await {
                info!("shutdown requested; stopping poll loop");
                break;
            }
            self.tick().await;
        }

        info!(builds = self.core.builds(), "poll loop exiting");
        Ok(())
    }

    /// One iteration without the wait: snapshot, and if anything changed,
    /// build and then report or publish.
    pub async fn tick(&mut self) -> TickOutcome {
        self.core.begin_tick();
        let current = self.collector.collect();

        let Some(CoreCommand::RunBuild) = self.core.on_snapshot(current) else {
            debug!("no changes");
            return TickOutcome::Unchanged;
        };

        status_line(self.out.as_mut(), CHANGE_MESSAGE);
        let result = self.pipeline.build(&mut self.backend).await;

        let outcome = if self.core.on_build_finished(&result) == CoreCommand::Publish {
            status_line(self.out.as_mut(), SUCCESS_MESSAGE);
            self.pipeline.publish(&mut self.backend).await;
            TickOutcome::Published(result)
        } else {
            self.pipeline.report(self.out.as_mut());
            TickOutcome::Reported(result)
        };

        self.core.on_followup_done();
        outcome
    }
}
