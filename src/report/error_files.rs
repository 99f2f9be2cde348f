// src/report/error_files.rs

//! Watcher for build-error report files.
//!
//! Other tooling drops files such as `build-error-1699999999.txt` into the
//! project root. Each one is printed in full the first time it is seen and
//! never again for the life of the process.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use globset::{Glob, GlobMatcher};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::engine::ShutdownSignal;
use crate::engine::pipeline::status_line;
use crate::errors::Result;
use crate::fs::FileSystem;

#[derive(Debug)]
pub struct ErrorFileWatcher {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
    matcher: GlobMatcher,
    /// File names already shown. Only grows; report files are expected to be
    /// few.
    seen: HashSet<String>,
}

impl ErrorFileWatcher {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        let matcher = Glob::new(pattern)?.compile_matcher();
        Ok(Self {
            fs,
            dir: dir.into(),
            matcher,
            seen: HashSet::new(),
        })
    }

    pub fn from_settings(fs: Arc<dyn FileSystem>, settings: &Settings) -> Result<Self> {
        Self::new(fs, &settings.root, &settings.report_pattern)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// List matching files not shown yet.
    ///
    /// Order follows the directory listing and is unspecified. Nothing is
    /// marked seen here; [`Self::poll`] does that once a file is printed.
    pub fn scan(&self) -> Vec<PathBuf> {
        let entries = match self.fs.read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = ?self.dir, error = %err, "cannot list report directory");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|path| match file_name(path) {
                Some(name) => {
                    self.matcher.is_match(&name)
                        && !self.seen.contains(&name)
                        && self.fs.is_file(path)
                }
                None => false,
            })
            .collect()
    }

    /// One tick: print every newly appeared report file. Returns how many
    /// were printed.
    ///
    /// A file is marked seen only after its block is written, so files left
    /// over by an output error are retried on the next tick.
    pub fn poll(&mut self, out: &mut dyn Write) -> io::Result<usize> {
        let mut printed = 0;

        for path in self.scan() {
            let name = file_name(&path).unwrap_or_default();
            info!(file = %name, "new build error report");

            self.print_report(out, &path, &name)?;
            self.seen.insert(name);
            printed += 1;
        }

        Ok(printed)
    }

    fn print_report(&self, out: &mut dyn Write, path: &Path, name: &str) -> io::Result<()> {
        writeln!(out, "\n=== {name} ===")?;
        match self.fs.read(path) {
            Ok(bytes) => {
                let contents = String::from_utf8_lossy(&bytes);
                write!(out, "{contents}")?;
                if !contents.is_empty() && !contents.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            Err(err) => {
                debug!(file = %name, error = %err, "report file unreadable");
                writeln!(out, "Could not read {name}.")?;
            }
        }
        out.flush()
    }

    /// Poll every `interval` until `shutdown` fires.
    pub async fn run(
        mut self,
        interval: Duration,
        mut shutdown: ShutdownSignal,
        mut out: Box<dyn Write + Send>,
    ) -> Result<()> {
        info!(dir = ?self.dir, pattern = %self.matcher.glob(), "watching for build error reports");
        status_line(out.as_mut(), &format!("Watching for {} files...", self.matcher.glob()));

        loop {
            if let Err(err) = self.poll(out.as_mut()) {
                warn!(error = %err, "failed to print build error report");
            }
            if shutdown.sleep_or_shutdown(interval).await {
                break;
            }
        }

        info!(seen = self.seen.len(), "error report watcher stopped");
        Ok(())
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn only_matching_files_are_reported() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/build-error-1.txt", "boom");
        fs.add_file("/p/build-error.txt", "capture, not a report");
        fs.add_file("/p/build-error-2.log", "wrong extension");
        fs.add_file("/p/sub/build-error-3.txt", "nested");

        let watcher = ErrorFileWatcher::new(Arc::new(fs), "/p", "build-error-*.txt").unwrap();

        assert_eq!(watcher.scan(), vec![PathBuf::from("/p/build-error-1.txt")]);
    }

    #[test]
    fn poll_prints_contents_once() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/build-error-a.txt", "TS2322: Type 'string' is not assignable");

        let mut watcher =
            ErrorFileWatcher::new(Arc::new(fs.clone()), "/p", "build-error-*.txt").unwrap();

        let mut out = Vec::new();
        assert_eq!(watcher.poll(&mut out).unwrap(), 1);
        assert_eq!(watcher.poll(&mut out).unwrap(), 0);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("=== build-error-a.txt ===").count(), 1);
        assert!(text.contains("TS2322"));
    }

    #[test]
    fn non_utf8_report_is_printed_lossily() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/build-error-1.txt", b"error: caf\xE9 failed\nline two\n".to_vec());

        let mut watcher = ErrorFileWatcher::new(Arc::new(fs), "/p", "build-error-*.txt").unwrap();

        let mut out = Vec::new();
        assert_eq!(watcher.poll(&mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error: caf\u{FFFD} failed\nline two\n"));
        assert!(!text.contains("Could not read"));
    }

    /// Sink whose first write fails; later writes succeed.
    struct FailOnce {
        failed: bool,
        buf: Vec<u8>,
    }

    impl Write for FailOnce {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn files_not_printed_after_write_error_are_retried() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/build-error-a.txt", "first\n");
        fs.add_file("/p/build-error-b.txt", "second\n");

        let mut watcher = ErrorFileWatcher::new(Arc::new(fs), "/p", "build-error-*.txt").unwrap();
        let mut out = FailOnce {
            failed: false,
            buf: Vec::new(),
        };

        assert!(watcher.poll(&mut out).is_err());
        assert_eq!(watcher.seen_count(), 0);

        assert_eq!(watcher.poll(&mut out).unwrap(), 2);
        assert_eq!(watcher.poll(&mut out).unwrap(), 0);

        let text = String::from_utf8(out.buf).unwrap();
        assert_eq!(text.matches("=== build-error-a.txt ===").count(), 1);
        assert_eq!(text.matches("=== build-error-b.txt ===").count(), 1);
        assert!(text.contains("first\n") && text.contains("second\n"));
    }

    #[test]
    fn missing_directory_is_quietly_empty() {
        let fs = MockFileSystem::new();
        let watcher = ErrorFileWatcher::new(Arc::new(fs), "/gone", "build-error-*.txt").unwrap();
        assert!(watcher.scan().is_empty());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let fs = MockFileSystem::new();
        assert!(ErrorFileWatcher::new(Arc::new(fs), "/p", "build-error-[").is_err());
    }
}
