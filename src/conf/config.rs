// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{core::facts::OutputFormat, defs, utils};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_dev_dir")]
    pub dev_dir: PathBuf,
    #[serde(default = "default_mount_table")]
    pub mount_table: PathBuf,
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

fn default_dev_dir() -> PathBuf {
    PathBuf::from(defs::DEFAULT_DEV_DIR)
}

fn default_mount_table() -> PathBuf {
    PathBuf::from(defs::DEFAULT_MOUNT_TABLE)
}

fn default_source_pattern() -> String {
    defs::DEFAULT_SOURCE_PATTERN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dev_dir: default_dev_dir(),
            mount_table: default_mount_table(),
            source_pattern: default_source_pattern(),
            format: OutputFormat::default(),
            log_file: None,
            verbose: false,
        }
    }
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub dev_dir: Option<PathBuf>,
    pub mount_table: Option<PathBuf>,
    pub source_pattern: Option<String>,
    pub format: Option<OutputFormat>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).context("failed to read config file")?;

        let config: Config = toml::from_str(&content).context("failed to parse config file")?;

        Ok(config)
    }

    pub fn load_default() -> Result<Self> {
        Self::from_file(defs::CONFIG_FILE)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }

        utils::atomic_write(path.as_ref(), content).context("failed to write config file")?;

        Ok(())
    }

    pub fn merge_with_cli(&mut self, overrides: Overrides) {
        if let Some(dir) = overrides.dev_dir {
            self.dev_dir = dir;
        }

        if let Some(table) = overrides.mount_table {
            self.mount_table = table;
        }

        if let Some(pattern) = overrides.source_pattern {
            self.source_pattern = pattern;
        }

        if let Some(format) = overrides.format {
            self.format = format;
        }

        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }

        self.verbose |= overrides.verbose;
    }
}
