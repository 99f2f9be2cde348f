// src/config/mod.rs

//! Configuration loading and validation for autobuild.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Resolve the config into the `Settings` components consume
//!   (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BuildSection, ConfigFile, ProjectSection, RawConfigFile, ReportSection, WatchSection,
};
pub use settings::Settings;
