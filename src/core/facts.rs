// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::defs;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `key=value` lines
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct FactsReport {
    nfs_devices: String,
    nfs_mounts: String,
    collected_at: String,
}

/// Devices and mount points collected from NFS entries, in table order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NfsFacts {
    devices: Vec<String>,
    mounts: Vec<String>,
}

impl NfsFacts {
    pub fn push(&mut self, device: String, mount: String) {
        self.devices.push(device);
        self.mounts.push(mount);
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Sorted, without duplicates.
    pub fn devices(&self) -> Vec<String> {
        let mut devices = self.devices.clone();
        devices.sort();
        devices.dedup();
        devices
    }

    /// First occurrence wins, order otherwise preserved.
    pub fn mounts(&self) -> Vec<String> {
        let mut seen = HashSet::new();

        self.mounts
            .iter()
            .filter(|m| seen.insert(*m))
            .cloned()
            .collect()
    }

    pub fn devices_fact(&self) -> String {
        self.devices().join(",")
    }

    pub fn mounts_fact(&self) -> String {
        self.mounts().join(",")
    }

    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            defs::FACT_NFS_DEVICES => Some(self.devices_fact()),
            defs::FACT_NFS_MOUNTS => Some(self.mounts_fact()),
            _ => None,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(format!(
                "{}={}\n{}={}\n",
                defs::FACT_NFS_DEVICES,
                self.devices_fact(),
                defs::FACT_NFS_MOUNTS,
                self.mounts_fact()
            )),
            OutputFormat::Json => {
                let report = FactsReport {
                    nfs_devices: self.devices_fact(),
                    nfs_mounts: self.mounts_fact(),
                    collected_at: chrono::Utc::now().to_rfc3339(),
                };

                let mut json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize facts to JSON")?;
                json.push('\n');

                Ok(json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NfsFacts {
        let mut facts = NfsFacts::default();
        facts.push("nfs:/b".to_string(), "/mnt/b".to_string());
        facts.push("/dev/sdc1".to_string(), "/mnt/a".to_string());
        facts.push("nfs:/b".to_string(), "/mnt/b".to_string());
        facts.push("nfs:/a".to_string(), "/mnt/c".to_string());
        facts
    }

    #[test]
    fn devices_are_sorted_and_unique() {
        assert_eq!(sample().devices(), vec!["/dev/sdc1", "nfs:/a", "nfs:/b"]);
    }

    #[test]
    fn mounts_keep_first_seen_order() {
        assert_eq!(sample().mounts(), vec!["/mnt/b", "/mnt/a", "/mnt/c"]);
    }

    #[test]
    fn facts_are_comma_joined() {
        let facts = sample();

        assert_eq!(facts.devices_fact(), "/dev/sdc1,nfs:/a,nfs:/b");
        assert_eq!(facts.mounts_fact(), "/mnt/b,/mnt/a,/mnt/c");
        assert_eq!(facts.get("nfs_mounts"), Some(facts.mounts_fact()));
        assert_eq!(facts.get("nfs_shares"), None);
    }

    #[test]
    fn empty_facts_render_empty_values() {
        let facts = NfsFacts::default();

        assert!(facts.is_empty());
        assert_eq!(
            facts.render(OutputFormat::Text).unwrap(),
            "nfs_devices=\nnfs_mounts=\n"
        );
    }

    #[test]
    fn json_carries_both_facts() {
        let json = sample().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nfs_devices"], "/dev/sdc1,nfs:/a,nfs:/b");
        assert_eq!(value["nfs_mounts"], "/mnt/b,/mnt/a,/mnt/c");
        assert!(value["collected_at"].is_string());
    }
}
