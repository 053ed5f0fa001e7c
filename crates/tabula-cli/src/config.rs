// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tabula_app::{PageSize, TableOptions};

pub const APP_NAME: &str = "tabula";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub table: Table,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            table: Table::default(),
            data: Data::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub rows_per_page: Option<i64>,
    pub show_sorting: Option<bool>,
    pub show_pagination: Option<bool>,
    pub show_checkbox: Option<bool>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows_per_page: Some(PageSize::DEFAULT.get() as i64),
            show_sorting: Some(true),
            show_pagination: Some(true),
            show_checkbox: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub file: Option<String>,
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: None,
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TABULA_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TABULA_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [table], [data], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(rows) = self.table.rows_per_page
            && rows <= 0
        {
            bail!(
                "table.rows_per_page in {} must be positive, got {}",
                path.display(),
                rows
            );
        }

        if let Some(data_path) = &self.data.path
            && data_path.trim().is_empty()
        {
            bail!(
                "data.path in {} is empty; remove it or point it at a JSON dataset",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            parse_level(level).with_context(|| format!("invalid log.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn table_options(&self) -> Result<TableOptions> {
        let rows_per_page = match self.table.rows_per_page {
            Some(rows) => {
                let rows = usize::try_from(rows)
                    .with_context(|| format!("table.rows_per_page {rows} is out of range"))?;
                PageSize::new(rows)?
            }
            None => PageSize::DEFAULT,
        };
        Ok(TableOptions {
            rows_per_page,
            show_sorting: self.table.show_sorting.unwrap_or(true),
            show_pagination: self.table.show_pagination.unwrap_or(true),
            show_checkbox: self.table.show_checkbox.unwrap_or(true),
        })
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data.path.as_deref().map(PathBuf::from)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tabula config\n# Place this file at: {}\n\nversion = 1\n\n[table]\n# One of 5, 10, 25, 50, 100 keeps +/- stepping predictable\nrows_per_page = {}\nshow_sorting = true\nshow_pagination = true\nshow_checkbox = true\n\n[data]\n# Optional. JSON file with \"header\" and \"items\"; --data overrides it\n# path = \"/absolute/path/to/rows.json\"\n\n[log]\n# Optional. Logs are only written when a file is set\n# file = \"/tmp/tabula.log\"\nlevel = \"{}\"\n",
            path.display(),
            PageSize::DEFAULT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_level(raw: &str) -> Result<tracing::Level> {
    raw.trim().parse::<tracing::Level>().map_err(|_| {
        anyhow!("unknown log level {raw:?}; use one of: error, warn, info, debug, trace")
    })
}
