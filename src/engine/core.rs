// src/engine/core.rs

//! Pure core state machine of the poll loop.
//!
//! The core owns the baseline snapshot and the current [`PollState`], and
//! tells the async shell (`engine::runtime::PollLoop`) what to do next via
//! [`CoreCommand`]s. It performs no IO and has no Tokio types, so every
//! transition is unit-testable.
//!
//! ```text
//! Idle --tick--> Snapshotting --unchanged--> Idle
//!                     |
//!                  changed
//!                     v
//!                 Building --failed--> Reporting --done--> Idle
//!                     |
//!                 succeeded
//!                     v
//!                Publishing --done--> Idle
//! ```

use crate::exec::BuildResult;
use crate::watch::{snapshot_changed, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Snapshotting,
    Building,
    Reporting,
    Publishing,
}

/// Command produced by the core, to be executed by the IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    RunBuild,
    ReportFailure,
    Publish,
}

#[derive(Debug)]
pub struct PollCore {
    baseline: Snapshot,
    state: PollState,
    builds: u64,
}

impl PollCore {
    /// Start idle with `initial` as the snapshot to compare against.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            baseline: initial,
            state: PollState::Idle,
            builds: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Number of builds started so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// The poll timer elapsed.
    pub fn begin_tick(&mut self) {
        debug_assert_eq!(self.state, PollState::Idle);
        self.state = PollState::Snapshotting;
    }

    /// A fresh snapshot is available.
    ///
    /// On change the snapshot becomes the new baseline right away, so edits
    /// made while the build runs are picked up by the next tick.
    pub fn on_snapshot(&mut self, current: Snapshot) -> Option<CoreCommand> {
        debug_assert_eq!(self.state, PollState::Snapshotting);

        if !snapshot_changed(&self.baseline, &current) {
            self.state = PollState::Idle;
            return None;
        }

        self.baseline = current;
        self.builds += 1;
        self.state = PollState::Building;
        Some(CoreCommand::RunBuild)
    }

    /// The build finished; exactly one follow-up is chosen.
    pub fn on_build_finished(&mut self, result: &BuildResult) -> CoreCommand {
        debug_assert_eq!(self.state, PollState::Building);

        if result.succeeded() {
            self.state = PollState::Publishing;
            CoreCommand::Publish
        } else {
            self.state = PollState::Reporting;
            CoreCommand::ReportFailure
        }
    }

    /// Reporting or publishing is done.
    pub fn on_followup_done(&mut self) {
        debug_assert!(matches!(
            self.state,
            PollState::Reporting | PollState::Publishing
        ));
        self.state = PollState::Idle;
    }
}
