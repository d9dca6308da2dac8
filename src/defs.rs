// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

// Probe inputs
pub const DEFAULT_DEV_DIR: &str = "/dev";
pub const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";

// Source field filter applied to every mount table line
pub const DEFAULT_SOURCE_PATTERN: &str = r"nfs:/.*";

// Pseudo entries without a backing device are reported with this prefix
pub const NONE_SOURCE_PREFIX: &str = "none";

pub const CONFIG_FILE: &str = "/etc/nfs-facts/config.toml";

// Fact names as seen by the collection host
pub const FACT_NFS_DEVICES: &str = "nfs_devices";
pub const FACT_NFS_MOUNTS: &str = "nfs_mounts";

// Upper bound on symlink hops when resolving device nodes
pub const MAX_LINK_HOPS: usize = 8;
