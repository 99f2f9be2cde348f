// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AutobuildError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AutobuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.project,
            raw.watch,
            raw.build,
            raw.report,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_extensions(cfg)?;
    validate_intervals(cfg)?;
    validate_build(cfg)?;
    validate_report_pattern(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.root.trim().is_empty() {
        return Err(config_error("[project].root must not be empty"));
    }
    if cfg.watch.dir.trim().is_empty() {
        return Err(config_error("[watch].dir must not be empty"));
    }
    Ok(())
}

fn validate_extensions(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.extensions.is_empty() {
        return Err(config_error(
            "[watch].extensions must list at least one extension",
        ));
    }

    for ext in cfg.watch.extensions.iter() {
        if ext.trim().trim_start_matches('.').is_empty() {
            return Err(AutobuildError::ConfigError(format!(
                "[watch].extensions contains an empty extension ({ext:?})"
            )));
        }
    }
    Ok(())
}

fn validate_intervals(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.interval_ms == 0 {
        return Err(config_error("[watch].interval_ms must be >= 1 (got 0)"));
    }
    if cfg.report.interval_ms == 0 {
        return Err(config_error("[report].interval_ms must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_build(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(config_error("[build].cmd must not be empty"));
    }
    if cfg.build.capture_file.trim().is_empty() {
        return Err(config_error("[build].capture_file must not be empty"));
    }
    Ok(())
}

fn validate_report_pattern(cfg: &RawConfigFile) -> Result<()> {
    Glob::new(&cfg.report.pattern)?;
    Ok(())
}

fn config_error(msg: &str) -> AutobuildError {
    AutobuildError::ConfigError(msg.to_string())
}
