#![allow(dead_code, unused_imports)]

pub use autobuild_test_utils::builders::SettingsBuilder;
pub use autobuild_test_utils::fake_backend::{FakeBackend, Invocation};
pub use autobuild_test_utils::output::SharedOutput;
pub use autobuild_test_utils::{init_tracing, with_timeout};

use autobuild::config::Settings;
use autobuild::fs::mock::MockFileSystem;

pub const ROOT: &str = "/project";

/// In-memory project with a couple of tracked sources and one untracked
/// file, plus default settings rooted at [`ROOT`].
pub fn mock_project() -> (MockFileSystem, Settings) {
    let fs = MockFileSystem::new();
    fs.add_file("/project/src/App.tsx", "export default function App() {}");
    fs.add_file("/project/src/model/engine.js", "export const step = () => {};");
    fs.add_file("/project/src/styles.css", "body {}");
    fs.add_file("/project/package.json", "{}");

    (fs, SettingsBuilder::new(ROOT).build())
}

/// `line 1\n` .. `line n\n`
pub fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("line {i}\n")).collect()
}
