use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use autobuild::exec::backend::{BackendFuture, CommandSpec, ProcessBackend, ProcessOutcome};
use autobuild::fs::mock::MockFileSystem;

/// One recorded call into the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Captured { cmd: CommandSpec, capture: PathBuf },
    Inherited(CommandSpec),
}

impl Invocation {
    pub fn command(&self) -> &CommandSpec {
        match self {
            Invocation::Captured { cmd, .. } | Invocation::Inherited(cmd) => cmd,
        }
    }

    /// `program arg1 arg2 ...`
    pub fn line(&self) -> String {
        self.command().display()
    }
}

/// A fake process backend that:
/// - records every invocation
/// - "writes" the scripted build output into the mock filesystem's capture
///   file and returns the scripted build outcome
/// - returns a fixed outcome for inherited (VCS) commands.
pub struct FakeBackend {
    fs: MockFileSystem,
    calls: Arc<Mutex<Vec<Invocation>>>,
    build_outcome: ProcessOutcome,
    build_output: String,
    launch_fails: bool,
    inherited_outcome: ProcessOutcome,
}

impl FakeBackend {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            calls: Arc::new(Mutex::new(Vec::new())),
            build_outcome: ProcessOutcome::Success,
            build_output: String::new(),
            launch_fails: false,
            inherited_outcome: ProcessOutcome::Success,
        }
    }

    pub fn with_build(mut self, outcome: ProcessOutcome, output: impl Into<String>) -> Self {
        self.build_outcome = outcome;
        self.build_output = output.into();
        self
    }

    /// Captured commands fail to start.
    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn with_inherited_outcome(mut self, outcome: ProcessOutcome) -> Self {
        self.inherited_outcome = outcome;
        self
    }

    /// Shared handle to the recorded calls; stays valid after the backend
    /// is moved into a loop.
    pub fn calls(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.calls)
    }

    pub fn recorded(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Invocation) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ProcessBackend for FakeBackend {
    fn run_captured<'a>(&'a mut self, cmd: &'a CommandSpec, capture: &'a Path) -> BackendFuture<'a> {
        self.record(Invocation::Captured {
            cmd: cmd.clone(),
            capture: capture.to_path_buf(),
        });

        let result = if self.launch_fails {
            Err(anyhow!("spawning `{}`: No such file or directory", cmd.display()))
        } else {
            self.fs.add_file(capture, self.build_output.clone());
            Ok(self.build_outcome)
        };
        Box::pin(async move { result })
    }

    fn run_inherited<'a>(&'a mut self, cmd: &'a CommandSpec) -> BackendFuture<'a> {
        self.record(Invocation::Inherited(cmd.clone()));
        let outcome = self.inherited_outcome;
        Box::pin(async move { Ok(outcome) })
    }
}
