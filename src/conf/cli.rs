// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{conf::config::Overrides, core::facts::OutputFormat, defs};

#[derive(Parser, Debug)]
#[command(
    name = "nfs-facts",
    version,
    about = "Report block devices and mount points backing NFS mounts"
)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    #[arg(short = 'd', long = "dev-dir")]
    pub dev_dir: Option<PathBuf>,
    #[arg(short = 't', long = "mount-table")]
    pub mount_table: Option<PathBuf>,
    #[arg(short = 'p', long = "pattern")]
    pub pattern: Option<String>,
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,
    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            dev_dir: self.dev_dir.clone(),
            mount_table: self.mount_table.clone(),
            source_pattern: self.pattern.clone(),
            format: self.format,
            log_file: self.log_file.clone(),
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value of a single fact
    Get { name: String },
    GenConfig {
        #[arg(short = 'o', long = "output", default_value = defs::CONFIG_FILE)]
        output: PathBuf,
    },
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_and_subcommand() {
        let cli = Cli::parse_from([
            "nfs-facts",
            "-t",
            "/tmp/mounts",
            "--format",
            "json",
            "-v",
            "get",
            "nfs_mounts",
        ]);

        assert_eq!(cli.mount_table, Some(PathBuf::from("/tmp/mounts")));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Get { ref name }) if name == "nfs_mounts"));
    }

    #[test]
    fn gen_config_defaults_to_system_path() {
        let cli = Cli::parse_from(["nfs-facts", "gen-config"]);

        match cli.command {
            Some(Commands::GenConfig { output }) => {
                assert_eq!(output, PathBuf::from(defs::CONFIG_FILE))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
