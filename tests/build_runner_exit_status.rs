// tests/build_runner_exit_status.rs
//
// Runs real processes through `sh`, so these only run on unix.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, SettingsBuilder};

use std::error::Error;
use std::fs;

use tempfile::tempdir;

use autobuild::exec::{BuildRunner, BuildStatus, CommandSpec, RealProcessBackend};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn zero_exit_is_success() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let settings = SettingsBuilder::new(dir.path()).build_cmd("exit 0").build();

    let result = BuildRunner::from_settings(&settings)
        .run(&mut RealProcessBackend::new())
        .await;

    assert_eq!(result.status, BuildStatus::Succeeded);
    assert!(result.succeeded());
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_failure_with_code() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let settings = SettingsBuilder::new(dir.path()).build_cmd("exit 3").build();

    let result = BuildRunner::from_settings(&settings)
        .run(&mut RealProcessBackend::new())
        .await;

    assert_eq!(result.status, BuildStatus::Failed { exit_code: 3 });
    assert!(!result.succeeded());
    Ok(())
}

#[tokio::test]
async fn missing_binary_is_launch_failure() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let capture = dir.path().join("build-error.txt");
    let runner = BuildRunner::new(
        CommandSpec::new("autobuild-definitely-not-installed-xyz", dir.path()),
        &capture,
    );

    let result = runner.run(&mut RealProcessBackend::new()).await;

    assert_eq!(result.status, BuildStatus::LaunchFailed);
    assert!(!result.succeeded());
    Ok(())
}

#[tokio::test]
async fn unknown_shell_command_is_a_failed_build() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let settings = SettingsBuilder::new(dir.path())
        .build_cmd("autobuild-definitely-not-installed-xyz --prod")
        .build();

    let result = BuildRunner::from_settings(&settings)
        .run(&mut RealProcessBackend::new())
        .await;

    // The shell starts fine and reports 127 for the missing program.
    assert_eq!(result.status, BuildStatus::Failed { exit_code: 127 });
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_land_in_one_capture_in_project_root() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let settings = SettingsBuilder::new(dir.path())
        .build_cmd("echo out; echo err 1>&2; pwd; exit 1")
        .build();

    let result = BuildRunner::from_settings(&settings)
        .run(&mut RealProcessBackend::new())
        .await;

    assert_eq!(result.capture, dir.path().join("build-error.txt"));
    let captured = fs::read_to_string(&result.capture)?;
    assert!(captured.contains("out\n"));
    assert!(captured.contains("err\n"));

    let cwd = fs::canonicalize(dir.path())?;
    assert!(captured.contains(cwd.to_string_lossy().as_ref()));
    Ok(())
}

#[tokio::test]
async fn capture_is_truncated_on_every_build() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let mut backend = RealProcessBackend::new();

    let first = SettingsBuilder::new(dir.path())
        .build_cmd("for i in 1 2 3 4 5 6 7 8 9; do echo long-previous-output-$i; done")
        .build();
    BuildRunner::from_settings(&first).run(&mut backend).await;

    let second = SettingsBuilder::new(dir.path()).build_cmd("echo short").build();
    let result = BuildRunner::from_settings(&second).run(&mut backend).await;

    assert_eq!(fs::read_to_string(&result.capture)?, "short\n");
    Ok(())
}

#[tokio::test]
async fn capture_parent_directories_are_created() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let settings = SettingsBuilder::new(dir.path())
        .build_cmd("echo nested")
        .capture_file(dir.path().join("logs/build/out.txt"))
        .build();

    let result = BuildRunner::from_settings(&settings)
        .run(&mut RealProcessBackend::new())
        .await;

    assert_eq!(result.status, BuildStatus::Succeeded);
    assert_eq!(fs::read_to_string(&result.capture)?, "nested\n");
    Ok(())
}
