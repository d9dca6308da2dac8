// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::{
    conf::{cli::Cli, config::Config},
    core::{NfsProbe, facts::NfsFacts},
    defs,
    utils::platform,
};

pub fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(config_path) = &cli.config {
        return Config::from_file(config_path).with_context(|| {
            format!(
                "Failed to load config from custom path: {}",
                config_path.display()
            )
        });
    }

    match Config::load_default() {
        Ok(config) => Ok(config),
        Err(e) => {
            let is_not_found = e
                .root_cause()
                .downcast_ref::<std::io::Error>()
                .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                .unwrap_or(false);

            if is_not_found {
                Ok(Config::default())
            } else {
                Err(e).context(format!(
                    "Failed to load default config from {}",
                    defs::CONFIG_FILE
                ))
            }
        }
    }
}

/// Runs the probe. An unreadable mount table yields empty facts; only a
/// bad source pattern is reported as an error.
pub fn collect_facts(config: &Config) -> Result<NfsFacts> {
    let probe = NfsProbe::new(config.clone())?.index_devices();

    match probe.scan_mounts() {
        Ok(probe) => Ok(probe.correlate()),
        Err(e) => {
            tracing::warn!("NFS probe incomplete: {:#}", e);
            Ok(NfsFacts::default())
        }
    }
}

pub fn handle_facts(config: &Config) -> Result<()> {
    if !platform::is_linux() {
        tracing::info!("Not running on a Linux kernel, no facts to report");
        return Ok(());
    }

    let facts = collect_facts(config)?;

    if facts.is_empty() {
        tracing::debug!("No NFS mounts found in {}", config.mount_table.display());
    }

    print!("{}", facts.render(config.format)?);

    Ok(())
}

pub fn handle_get(config: &Config, name: &str) -> Result<()> {
    if name != defs::FACT_NFS_DEVICES && name != defs::FACT_NFS_MOUNTS {
        bail!(
            "Unknown fact '{}'. Known facts: {}, {}",
            name,
            defs::FACT_NFS_DEVICES,
            defs::FACT_NFS_MOUNTS
        );
    }

    if !platform::is_linux() {
        tracing::info!("Not running on a Linux kernel, '{}' is undefined", name);
        return Ok(());
    }

    if let Some(value) = collect_facts(config)?.get(name) {
        println!("{}", value);
    }

    Ok(())
}

pub fn handle_gen_config(output: &Path) -> Result<()> {
    Config::default()
        .save_to_file(output)
        .with_context(|| format!("Failed to save generated config to {}", output.display()))?;

    println!("Default configuration written to {}", output.display());

    Ok(())
}

pub fn handle_show_config(config: &Config) -> Result<()> {
    let json = serde_json::to_string(config).context("Failed to serialize config to JSON")?;

    println!("{}", json);

    Ok(())
}
