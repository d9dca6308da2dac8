// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later
mod conf;
mod core;
mod defs;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use conf::{
    cli::{Cli, Commands},
    cli_handlers,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::GenConfig { output }) = &cli.command {
        return cli_handlers::handle_gen_config(output);
    }

    let mut config = cli_handlers::load_config(&cli)?;

    config.merge_with_cli(cli.overrides());

    let _log_guard = utils::init_logging(config.verbose, config.log_file.as_deref())
        .context("Failed to initialize logging")?;

    tracing::debug!("Kernel: {}", utils::platform::kernel_name());

    if let Some(release) = utils::platform::kernel_release() {
        tracing::debug!("Kernel Version: {}", release);
    }

    match &cli.command {
        Some(Commands::Get { name }) => cli_handlers::handle_get(&config, name)?,
        Some(Commands::ShowConfig) => cli_handlers::handle_show_config(&config)?,
        Some(Commands::GenConfig { .. }) => {}
        None => cli_handlers::handle_facts(&config)?,
    }

    Ok(())
}
