// src/config/model.rs

use serde::Deserialize;

pub const DEFAULT_PROJECT_ROOT: &str = ".";
pub const DEFAULT_WATCH_DIR: &str = "src";
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];
pub const DEFAULT_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_BUILD_CMD: &str = "npm run build";
pub const DEFAULT_CAPTURE_FILE: &str = "build-error.txt";
pub const DEFAULT_REPORT_PATTERN: &str = "build-error-*.txt";

/// Validated configuration.
///
/// Obtained from a [`RawConfigFile`] through `TryFrom`, which runs the checks
/// in `validate.rs`. Every section is optional in TOML:
///
/// ```toml
/// [project]
/// root = "."
///
/// [watch]
/// dir = "src"
/// extensions = ["js", "jsx", "ts", "tsx"]
/// interval_ms = 2000
///
/// [build]
/// cmd = "npm run build"
/// capture_file = "build-error.txt"
///
/// [report]
/// pattern = "build-error-*.txt"
/// interval_ms = 2000
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub watch: WatchSection,
    pub build: BuildSection,
    pub report: ReportSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        watch: WatchSection,
        build: BuildSection,
        report: ReportSection,
    ) -> Self {
        Self {
            project,
            watch,
            build,
            report,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            ProjectSection::default(),
            WatchSection::default(),
            BuildSection::default(),
            ReportSection::default(),
        )
    }
}

/// Configuration exactly as deserialized, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub report: ReportSection,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Project root. Relative paths are resolved against the directory that
    /// holds the config file.
    #[serde(default = "default_project_root")]
    pub root: String,
}

fn default_project_root() -> String {
    DEFAULT_PROJECT_ROOT.to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            root: default_project_root(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory under the project root that is polled for changes.
    #[serde(default = "default_watch_dir")]
    pub dir: String,

    /// File extensions that take part in change detection. A leading dot is
    /// accepted and ignored (`".ts"` and `"ts"` are equivalent).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Poll interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_watch_dir() -> String {
    DEFAULT_WATCH_DIR.to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
            extensions: default_extensions(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Shell command that builds the project.
    #[serde(default = "default_build_cmd")]
    pub cmd: String,

    /// File (relative to the project root) receiving the merged
    /// stdout/stderr of the last build. Overwritten on every build.
    #[serde(default = "default_capture_file")]
    pub capture_file: String,
}

fn default_build_cmd() -> String {
    DEFAULT_BUILD_CMD.to_string()
}

fn default_capture_file() -> String {
    DEFAULT_CAPTURE_FILE.to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: default_build_cmd(),
            capture_file: default_capture_file(),
        }
    }
}

/// `[report]` section, used by the error-file watcher.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSection {
    /// Glob matched against file names directly inside the project root.
    #[serde(default = "default_report_pattern")]
    pub pattern: String,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_report_pattern() -> String {
    DEFAULT_REPORT_PATTERN.to_string()
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            pattern: default_report_pattern(),
            interval_ms: default_interval_ms(),
        }
    }
}
