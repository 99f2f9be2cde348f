// src/report/tail.rs

//! Shows the tail of a failed build's captured output.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::fs::FileSystem;

/// Maximum number of captured lines shown after a failed build.
pub const TAIL_LINES: usize = 30;

pub const FAILURE_HEADER: &str = "=== Build failed! ===";
pub const TRAILER: &str = "Copy the error log above and paste it to your assistant for fixes.";

/// The last `n` lines of `text`, in their original order.
pub fn tail_lines(text: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

/// Prints the actionable end of the capture file.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    fs: Arc<dyn FileSystem>,
    capture: PathBuf,
}

impl ErrorReporter {
    pub fn new(fs: Arc<dyn FileSystem>, capture: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            capture: capture.into(),
        }
    }

    pub fn from_settings(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self::new(fs, &settings.capture_file)
    }

    pub fn capture(&self) -> &Path {
        &self.capture
    }

    /// Write the failure header, the last [`TAIL_LINES`] captured lines and
    /// the trailer to `out`. An unreadable capture gets a one-line notice
    /// instead.
    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{FAILURE_HEADER}")?;

        let text = match self.fs.read(&self.capture) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                debug!(capture = ?self.capture, error = %err, "capture file unreadable");
                writeln!(out, "Could not read {}.", self.capture_name())?;
                return out.flush();
            }
        };

        for line in tail_lines(&text, TAIL_LINES) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        writeln!(out, "{TRAILER}")?;
        out.flush()
    }

    fn capture_name(&self) -> String {
        self.capture
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.capture.display().to_string())
    }
}
