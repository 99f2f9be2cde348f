// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The build runner and commit publisher talk to a `ProcessBackend` instead of
//! spawning processes themselves. Production uses [`RealProcessBackend`]
//! (`tokio::process`); tests provide a backend that records invocations and
//! returns scripted outcomes.

use std::fs::{self, File};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Boxed future returned by backend methods.
pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<ProcessOutcome>> + Send + 'a>>;

/// Outcome of a process that was spawned successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    /// Non-zero exit; `-1` when the process was terminated by a signal.
    Failed(i32),
}

impl ProcessOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, ProcessOutcome::Success)
    }

    fn from_status(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ProcessOutcome::Success
        } else {
            ProcessOutcome::Failed(status.code().unwrap_or(-1))
        }
    }
}

/// A command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run `cmd` through the platform shell.
    pub fn shell(cmd: &str, cwd: impl Into<PathBuf>) -> Self {
        if cfg!(windows) {
            Self::new("cmd", cwd).arg("/C").arg(cmd)
        } else {
            Self::new("sh", cwd).arg("-c").arg(cmd)
        }
    }

    /// Human-readable command line, for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// Trait abstracting how external commands are run.
///
/// An `Err` means the process could not be started (or waited on) at all;
/// a process that ran and exited non-zero is `Ok(ProcessOutcome::Failed(_))`.
pub trait ProcessBackend: Send {
    /// Run `cmd` to completion with stdout and stderr both written to
    /// `capture`, which is truncated first.
    fn run_captured<'a>(&'a mut self, cmd: &'a CommandSpec, capture: &'a Path) -> BackendFuture<'a>;

    /// Run `cmd` to completion with the parent's stdout/stderr.
    fn run_inherited<'a>(&'a mut self, cmd: &'a CommandSpec) -> BackendFuture<'a>;
}

/// Real process backend used in production.
#[derive(Debug, Clone, Default)]
pub struct RealProcessBackend;

impl RealProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessBackend for RealProcessBackend {
    fn run_captured<'a>(&'a mut self, cmd: &'a CommandSpec, capture: &'a Path) -> BackendFuture<'a> {
        Box::pin(async move {
            let (stdout, stderr) = open_capture(capture)?;

            let mut command = cmd.to_command();
            command.stdout(stdout).stderr(stderr);

            let mut child = command
                .spawn()
                .with_context(|| format!("spawning `{}`", cmd.display()))?;
            debug!(cmd = %cmd.display(), capture = ?capture, "process started");

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for `{}`", cmd.display()))?;

            // Both write handles were moved into the child's stdio and are
            // closed by now, so the capture file is complete.
            Ok(ProcessOutcome::from_status(status))
        })
    }

    fn run_inherited<'a>(&'a mut self, cmd: &'a CommandSpec) -> BackendFuture<'a> {
        Box::pin(async move {
            let mut command = cmd.to_command();
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());

            let status = command
                .status()
                .await
                .with_context(|| format!("running `{}`", cmd.display()))?;

            Ok(ProcessOutcome::from_status(status))
        })
    }
}

/// Truncate/create the capture file and return two handles to it, one for
/// stdout and one for stderr.
fn open_capture(capture: &Path) -> Result<(Stdio, Stdio)> {
    if let Some(parent) = capture.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {:?}", parent))?;
        }
    }
    let file = File::create(capture)
        .with_context(|| format!("creating capture file {:?}", capture))?;
    let err_file = file
        .try_clone()
        .with_context(|| format!("duplicating handle for {:?}", capture))?;
    Ok((Stdio::from(file), Stdio::from(err_file)))
}
