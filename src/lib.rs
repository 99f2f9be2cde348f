// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod report;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_or_default, Settings};
use crate::engine::{run_once, shutdown_channel, PollLoop, ShutdownHandle};
use crate::exec::RealProcessBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::ErrorFileWatcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the real filesystem and process backends
/// - the selected program (poll loop, one-shot build, error-file watcher)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.as_ref().map(PathBuf::from);
    let (cfg, base_dir) = load_or_default(explicit.as_deref())?;
    let settings = cfg.settings(base_dir);

    if args.dry_run {
        print_dry_run(args.command, &settings);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let stdout = Box::new(std::io::stdout());

    match args.command {
        Command::Watch => {
            let (handle, signal) = shutdown_channel();
            spawn_ctrl_c(handle);

            let poll_loop = PollLoop::new(&settings, fs, RealProcessBackend::new(), stdout);
            poll_loop.run(signal).await?;
        }
        Command::Once => {
            let mut backend = RealProcessBackend::new();
            let mut out = std::io::stdout();
            // Exit status does not depend on the build outcome.
            let _ = run_once(&settings, fs, &mut backend, &mut out).await;
        }
        Command::Errors => {
            let (handle, signal) = shutdown_channel();
            spawn_ctrl_c(handle);

            let watcher = ErrorFileWatcher::from_settings(fs, &settings)?;
            watcher
                .run(settings.report_interval, signal, stdout)
                .await?;
        }
    }

    info!("autobuild finished");
    Ok(())
}

/// Ctrl-C → graceful shutdown.
fn spawn_ctrl_c(handle: ShutdownHandle) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        handle.shutdown();
    });
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(command: Command, settings: &Settings) {
    println!("autobuild dry-run ({command:?})");
    println!("  root:           {}", settings.root.display());
    println!("  watch dir:      {}", settings.watch_dir.display());
    println!("  extensions:     {:?}", settings.extensions);
    println!("  poll interval:  {:?}", settings.poll_interval);
    println!("  build cmd:      {}", settings.build_cmd);
    println!("  capture file:   {}", settings.capture_file.display());
    println!("  report pattern: {}", settings.report_pattern);
    println!("  report interval: {:?}", settings.report_interval);

    debug!("dry-run complete (no execution)");
}
