#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use autobuild::config::Settings;

/// Builder for `Settings` to simplify test setup.
///
/// Starts from the defaults rooted at the given directory, with short poll
/// intervals so loop tests finish quickly.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut settings = Settings::for_root(root);
        settings.poll_interval = Duration::from_millis(10);
        settings.report_interval = Duration::from_millis(10);
        Self { settings }
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.settings.build_cmd = cmd.to_string();
        self
    }

    pub fn watch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.watch_dir = dir.into();
        self
    }

    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.settings.extensions = exts.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn capture_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.capture_file = path.into();
        self
    }

    pub fn report_pattern(mut self, pattern: &str) -> Self {
        self.settings.report_pattern = pattern.to_string();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
