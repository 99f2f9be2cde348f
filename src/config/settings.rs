// src/config/settings.rs

//! Resolved runtime settings.
//!
//! `ConfigFile` mirrors the TOML; `Settings` is what the components actually
//! consume: absolute-ish paths joined onto the project root, normalized
//! extensions and `Duration`s. Every component receives the settings it needs
//! at construction, so tests can point them at a temp dir or a mock
//! filesystem.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::ConfigFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Working directory for the build and VCS commands.
    pub root: PathBuf,
    /// Directory polled by the snapshot collector.
    pub watch_dir: PathBuf,
    /// Allowed extensions, without leading dot.
    pub extensions: Vec<String>,
    pub poll_interval: Duration,
    pub build_cmd: String,
    pub capture_file: PathBuf,
    pub report_pattern: String,
    pub report_interval: Duration,
}

impl Settings {
    /// Default settings rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        ConfigFile::default().settings(root.into())
    }
}

impl ConfigFile {
    /// Resolve this config against `base_dir` (the directory holding the
    /// config file, or the current directory when running on defaults).
    pub fn settings(&self, base_dir: impl AsRef<Path>) -> Settings {
        let root = join_relative(base_dir.as_ref(), &self.project.root);

        Settings {
            watch_dir: join_relative(&root, &self.watch.dir),
            extensions: normalize_extensions(&self.watch.extensions),
            poll_interval: Duration::from_millis(self.watch.interval_ms),
            build_cmd: self.build.cmd.clone(),
            capture_file: join_relative(&root, &self.build.capture_file),
            report_pattern: self.report.pattern.clone(),
            report_interval: Duration::from_millis(self.report.interval_ms),
            root,
        }
    }
}

/// `"."` resolves to `base` itself rather than `base/.`.
fn join_relative(base: &Path, rel: &str) -> PathBuf {
    let rel = Path::new(rel.trim());
    if rel == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}

fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .collect()
}
