// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{Context, Result};

use crate::{
    conf::config::Config,
    core::{
        correlate,
        devices::DeviceIndex,
        facts::NfsFacts,
        mounts::{self, NfsMount, SourceFilter},
    },
};

pub struct Init;

pub struct DevicesIndexed {
    pub index: DeviceIndex,
}

pub struct MountsScanned {
    pub index: DeviceIndex,
    pub mounts: Vec<NfsMount>,
}

/// Runs the inventory in stages: device index, mount table, correlation.
pub struct NfsProbe<S> {
    config: Config,
    filter: SourceFilter,
    state: S,
}

impl NfsProbe<Init> {
    /// Fails only on an unusable source pattern.
    pub fn new(config: Config) -> Result<Self> {
        let filter = SourceFilter::new(&config.source_pattern)?;

        Ok(Self {
            config,
            filter,
            state: Init,
        })
    }

    /// An unreadable device directory leaves the index empty, so every
    /// mount falls back to its source field.
    pub fn index_devices(self) -> NfsProbe<DevicesIndexed> {
        let index = match DeviceIndex::scan(&self.config.dev_dir) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Device index unavailable: {:#}", e);
                DeviceIndex::default()
            }
        };

        tracing::debug!(
            ">> Device Index: {} block devices under {}",
            index.len(),
            self.config.dev_dir.display()
        );

        NfsProbe {
            config: self.config,
            filter: self.filter,
            state: DevicesIndexed { index },
        }
    }
}

impl NfsProbe<DevicesIndexed> {
    pub fn scan_mounts(self) -> Result<NfsProbe<MountsScanned>> {
        let content = mounts::read_mount_table(&self.config.mount_table)
            .context("Mount table unavailable")?;

        let mounts = mounts::parse_mount_table(&content, &self.filter);

        tracing::debug!(">> Mount Table: {} NFS entries", mounts.len());

        Ok(NfsProbe {
            config: self.config,
            filter: self.filter,
            state: MountsScanned {
                index: self.state.index,
                mounts,
            },
        })
    }
}

impl NfsProbe<MountsScanned> {
    pub fn correlate(self) -> NfsFacts {
        let mut facts = NfsFacts::default();

        for mount in &self.state.mounts {
            let device = correlate::correlate(&self.state.index, mount);

            tracing::debug!("{} on {}", device, mount.mount_point.display());

            facts.push(device, mount.mount_point.to_string_lossy().into_owned());
        }

        facts
    }
}
