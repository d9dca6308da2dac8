// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, io, os::unix::fs::MetadataExt, path::Path};

use crate::core::{
    devices::{DeviceId, DeviceIndex},
    mounts::NfsMount,
};

/// Device that the filesystem holding `path` lives on.
pub fn mount_device_id(path: &Path) -> io::Result<DeviceId> {
    let meta = fs::metadata(path)?;

    Ok(DeviceId::from_raw(meta.dev()))
}

/// Names the device backing `mount`: the indexed node when one matches,
/// otherwise the source field from the mount table.
pub fn correlate(index: &DeviceIndex, mount: &NfsMount) -> String {
    match mount_device_id(&mount.mount_point) {
        Ok(id) => match index.lookup(id) {
            Some(node) => node.to_string_lossy().into_owned(),
            None => {
                tracing::debug!(
                    "No device node for {} ({}), using source {}",
                    mount.mount_point.display(),
                    id,
                    mount.source
                );
                mount.source.clone()
            }
        },
        Err(e) => {
            tracing::debug!("Cannot stat {}: {}", mount.mount_point.display(), e);
            mount.source.clone()
        }
    }
}
