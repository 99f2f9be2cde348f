// tests/poll_loop_scenarios.rs

mod common;
use crate::common::{init_tracing, mock_project, numbered_lines, FakeBackend, Invocation, SharedOutput};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use autobuild::engine::runtime::{CHANGE_MESSAGE, SUCCESS_MESSAGE, WATCHING_MESSAGE};
use autobuild::engine::{shutdown_channel, PollLoop, PollState, TickOutcome};
use autobuild::exec::{BuildStatus, ProcessOutcome, COMMIT_MESSAGE};
use autobuild::fs::FileSystem;
use autobuild::report::{FAILURE_HEADER, TRAILER};

type TestResult = Result<(), Box<dyn Error>>;

fn git_lines(calls: &[Invocation]) -> Vec<String> {
    calls
        .iter()
        .filter(|c| matches!(c, Invocation::Inherited(_)))
        .map(Invocation::line)
        .collect()
}

fn build_count(calls: &[Invocation]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, Invocation::Captured { .. }))
        .count()
}

#[tokio::test]
async fn no_change_between_polls_triggers_no_build() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone());
    let calls = backend.calls();
    let out = SharedOutput::new();

    let mut poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());

    assert_eq!(poll_loop.tick().await, TickOutcome::Unchanged);
    assert_eq!(poll_loop.tick().await, TickOutcome::Unchanged);

    assert!(calls.lock().unwrap().is_empty());
    assert!(out.contents().is_empty());
    assert_eq!(poll_loop.core().state(), PollState::Idle);
}

#[tokio::test]
async fn untracked_file_changes_are_ignored() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone());
    let calls = backend.calls();

    let mut poll_loop =
        PollLoop::new(&settings, Arc::new(fs.clone()), backend, SharedOutput::new().boxed());

    fs.touch("/project/src/styles.css");
    fs.add_file("/project/src/notes.md", "todo");
    fs.touch("/project/package.json");

    assert_eq!(poll_loop.tick().await, TickOutcome::Unchanged);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn touched_file_triggers_exactly_one_build_and_one_followup() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone());
    let calls = backend.calls();
    let out = SharedOutput::new();

    let mut poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());

    fs.touch("/project/src/App.tsx");

    let outcome = poll_loop.tick().await;
    assert!(matches!(outcome, TickOutcome::Published(_)));

    let recorded = calls.lock().unwrap().clone();
    assert_eq!(build_count(&recorded), 1);
    // Publishing happened, reporting did not.
    assert_eq!(git_lines(&recorded).len(), 3);
    assert!(!out.contents().contains(FAILURE_HEADER));

    // The new mtime is the baseline now, so the next tick is quiet.
    assert_eq!(poll_loop.tick().await, TickOutcome::Unchanged);
    assert_eq!(build_count(&calls.lock().unwrap()), 1);
    assert_eq!(poll_loop.core().builds(), 1);
}

#[tokio::test]
async fn new_and_deleted_sources_trigger_builds() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone());
    let calls = backend.calls();

    let mut poll_loop =
        PollLoop::new(&settings, Arc::new(fs.clone()), backend, SharedOutput::new().boxed());

    fs.add_file("/project/src/hooks/useThing.ts", "export {}");
    assert!(matches!(poll_loop.tick().await, TickOutcome::Published(_)));

    fs.remove_file("/project/src/model/engine.js");
    assert!(matches!(poll_loop.tick().await, TickOutcome::Published(_)));

    assert_eq!(build_count(&calls.lock().unwrap()), 2);
}

#[tokio::test]
async fn failed_build_reports_last_thirty_lines_and_skips_publish() -> TestResult {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend =
        FakeBackend::new(fs.clone()).with_build(ProcessOutcome::Failed(1), numbered_lines(50));
    let calls = backend.calls();
    let out = SharedOutput::new();

    let mut poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());

    fs.touch("/project/src/model/engine.js");

    match poll_loop.tick().await {
        TickOutcome::Reported(result) => {
            assert_eq!(result.status, BuildStatus::Failed { exit_code: 1 });
            assert_eq!(result.capture, settings.capture_file);
        }
        other => panic!("expected Reported, got {other:?}"),
    }

    let recorded = calls.lock().unwrap().clone();
    assert_eq!(build_count(&recorded), 1);
    assert!(git_lines(&recorded).is_empty(), "publisher must not run");

    let lines = out.lines();
    assert_eq!(lines[0], CHANGE_MESSAGE);

    let shown: Vec<&String> = lines.iter().filter(|l| l.starts_with("line ")).collect();
    let expected: Vec<String> = (21..=50).map(|i| format!("line {i}")).collect();
    assert_eq!(shown, expected.iter().collect::<Vec<_>>());

    let header = lines.iter().position(|l| l == FAILURE_HEADER).ok_or("no header")?;
    let trailer = lines.iter().position(|l| l == TRAILER).ok_or("no trailer")?;
    assert!(header < trailer);
    assert_eq!(lines[header + 1], "line 21");
    assert!(!out.contents().contains(SUCCESS_MESSAGE));

    // The capture the reporter read is the one the build wrote.
    assert_eq!(fs.read_to_string(&settings.capture_file)?, numbered_lines(50));
    Ok(())
}

#[tokio::test]
async fn successful_build_runs_stage_commit_push_once_in_order() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone()).with_build(ProcessOutcome::Success, "compiled\n");
    let calls = backend.calls();
    let out = SharedOutput::new();

    let mut poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());

    fs.touch("/project/src/App.tsx");
    assert!(matches!(poll_loop.tick().await, TickOutcome::Published(_)));

    let recorded = calls.lock().unwrap().clone();
    assert!(matches!(recorded[0], Invocation::Captured { .. }));
    assert_eq!(
        git_lines(&recorded),
        vec![
            "git add -A".to_string(),
            format!("git commit -m {COMMIT_MESSAGE}"),
            "git push".to_string(),
        ]
    );
    assert!(recorded
        .iter()
        .all(|c| c.command().cwd == settings.root));

    assert_eq!(out.lines(), vec![CHANGE_MESSAGE, SUCCESS_MESSAGE]);
}

#[tokio::test]
async fn failing_publish_steps_are_all_attempted_and_loop_continues() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone()).with_inherited_outcome(ProcessOutcome::Failed(128));
    let calls = backend.calls();

    let mut poll_loop =
        PollLoop::new(&settings, Arc::new(fs.clone()), backend, SharedOutput::new().boxed());

    fs.touch("/project/src/App.tsx");
    assert!(matches!(poll_loop.tick().await, TickOutcome::Published(_)));
    fs.touch("/project/src/App.tsx");
    assert!(matches!(poll_loop.tick().await, TickOutcome::Published(_)));

    assert_eq!(git_lines(&calls.lock().unwrap()).len(), 6);
}

#[tokio::test]
async fn launch_failure_is_reported_like_a_failed_build() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone()).failing_launch();
    let calls = backend.calls();
    let out = SharedOutput::new();

    let mut poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());

    fs.touch("/project/src/App.tsx");
    match poll_loop.tick().await {
        TickOutcome::Reported(result) => assert_eq!(result.status, BuildStatus::LaunchFailed),
        other => panic!("expected Reported, got {other:?}"),
    }

    assert!(git_lines(&calls.lock().unwrap()).is_empty());
    // No capture was written, so the reporter falls back to its notice.
    assert!(out.contents().contains("Could not read build-error.txt."));
}

#[tokio::test]
async fn run_stops_when_cancelled() {
    init_tracing();
    let (fs, settings) = mock_project();
    let backend = FakeBackend::new(fs.clone());
    let calls = backend.calls();
    let out = SharedOutput::new();

    let poll_loop = PollLoop::new(&settings, Arc::new(fs.clone()), backend, out.boxed());
    let (handle, signal) = shutdown_channel();

    let task = tokio::spawn(poll_loop.run(signal));

    tokio::time::sleep(Duration::from_millis(50)).await;
    fs.touch("/project/src/App.tsx");

    // Wait until the loop has picked the change up.
    let picked_up = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if !calls.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(picked_up.is_ok(), "loop never built after a change");

    handle.shutdown();
    let joined = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("loop did not stop after shutdown")
        .expect("loop task panicked");
    assert!(joined.is_ok());

    assert_eq!(out.lines()[0], WATCHING_MESSAGE);
}
