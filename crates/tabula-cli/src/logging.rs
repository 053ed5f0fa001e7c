// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, parse_level};

/// Installs a file-backed subscriber when `[log].file` is set. The terminal
/// belongs to the table, so nothing is ever written to stdout or stderr.
pub fn init(config: &Config) -> Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };

    let filter = build_filter(config.log_level())?;
    let file = open_log_file(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = parse_level(level)?;
    Ok(EnvFilter::new(level.to_string()))
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{build_filter, open_log_file};
    use anyhow::Result;
    use std::io::Write;

    #[test]
    fn open_log_file_creates_parent_and_appends() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("tabula.log");

        writeln!(open_log_file(&path)?, "first")?;
        writeln!(open_log_file(&path)?, "second")?;
        assert_eq!(std::fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn build_filter_rejects_unknown_level() {
        // RUST_LOG takes precedence when set, so only assert on a clean env.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let error = build_filter("loud").expect_err("unknown level should fail");
        assert!(error.to_string().contains("unknown log level"));
        assert!(build_filter("debug").is_ok());
    }
}
