// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    collections::HashMap,
    fmt, fs, io,
    os::unix::fs::{FileTypeExt, MetadataExt},
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use crate::defs;

/// Major/minor pair identifying a device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId {
    pub major: u32,
    pub minor: u32,
}

impl DeviceId {
    pub fn from_raw(dev: u64) -> Self {
        Self {
            major: rustix::fs::major(dev),
            minor: rustix::fs::minor(dev),
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

/// Block devices found under a device directory, keyed by the device they
/// point at. Built once and only read afterwards.
#[derive(Debug, Default)]
pub struct DeviceIndex {
    nodes: HashMap<DeviceId, PathBuf>,
}

impl DeviceIndex {
    pub fn scan(dev_dir: &Path) -> Result<Self> {
        let meta = fs::metadata(dev_dir)
            .with_context(|| format!("Failed to open device directory {}", dev_dir.display()))?;

        if !meta.is_dir() {
            bail!("Device directory {} is not a directory", dev_dir.display());
        }

        let mut index = Self::default();

        let walker = WalkDir::new(dev_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("Skipping unreadable device entry: {}", e);
                    continue;
                }
            };

            match index_entry(entry.path()) {
                Ok(Some((id, path))) => index.insert(id, path),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", entry.path().display(), e);
                }
            }
        }

        Ok(index)
    }

    /// Later inserts replace earlier ones for the same device.
    pub fn insert(&mut self, id: DeviceId, path: PathBuf) {
        if let Some(previous) = self.nodes.insert(id, path) {
            tracing::debug!(
                "Device {} already known as {}, replaced",
                id,
                previous.display()
            );
        }
    }

    pub fn lookup(&self, id: DeviceId) -> Option<&Path> {
        self.nodes.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn index_entry(path: &Path) -> io::Result<Option<(DeviceId, PathBuf)>> {
    // Follows symlinks, so dangling links fail here.
    let meta = fs::metadata(path)?;

    if !meta.file_type().is_block_device() {
        return Ok(None);
    }

    let resolved = resolve_link(path)?;
    let rdev = fs::metadata(&resolved)?.rdev();

    Ok(Some((DeviceId::from_raw(rdev), resolved)))
}

/// Follows `path` through symbolic links until it names a non-link.
/// Relative targets are anchored at the directory holding the link.
pub fn resolve_link(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();

    for _ in 0..defs::MAX_LINK_HOPS {
        if !fs::symlink_metadata(&current)?.file_type().is_symlink() {
            return Ok(current);
        }

        let target = fs::read_link(&current)?;

        current = if target.is_absolute() {
            target
        } else {
            let base = current.parent().unwrap_or_else(|| Path::new("/"));
            normalize_lexically(&base.join(target))
        };
    }

    Err(io::Error::other(format!(
        "too many levels of symbolic links: {}",
        path.display()
    )))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::symlink;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn device_id_splits_raw_dev() {
        let id = DeviceId::from_raw(rustix::fs::makedev(8, 17));
        assert_eq!(id, DeviceId { major: 8, minor: 17 });
        assert_eq!(id.to_string(), "8:17");
    }

    #[test]
    fn resolve_link_returns_plain_files_unchanged() {
        let dir = TempDir::new().unwrap();
        let node = dir.path().join("sda1");
        fs::write(&node, b"").unwrap();

        assert_eq!(resolve_link(&node).unwrap(), node);
    }

    #[test]
    fn resolve_link_anchors_relative_targets_at_link_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sr0"), b"").unwrap();
        symlink("sr0", dir.path().join("cdrom")).unwrap();

        let resolved = resolve_link(&dir.path().join("cdrom")).unwrap();
        assert_eq!(resolved, dir.path().join("sr0"));
    }

    #[test]
    fn resolve_link_handles_parent_components() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("mapper")).unwrap();
        fs::write(dir.path().join("dm-0"), b"").unwrap();
        symlink("../dm-0", dir.path().join("mapper/root")).unwrap();

        let resolved = resolve_link(&dir.path().join("mapper/root")).unwrap();
        assert_eq!(resolved, dir.path().join("dm-0"));
    }

    #[test]
    fn resolve_link_follows_chains_and_absolute_targets() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("nvme0n1p2");
        fs::write(&real, b"").unwrap();
        symlink(&real, dir.path().join("root")).unwrap();
        symlink("root", dir.path().join("system")).unwrap();

        assert_eq!(resolve_link(&dir.path().join("system")).unwrap(), real);
    }

    #[test]
    fn resolve_link_gives_up_on_loops() {
        let dir = TempDir::new().unwrap();
        symlink("b", dir.path().join("a")).unwrap();
        symlink("a", dir.path().join("b")).unwrap();

        assert!(resolve_link(&dir.path().join("a")).is_err());
    }

    #[test]
    fn insert_keeps_last_path_for_a_device() {
        let mut index = DeviceIndex::default();
        let id = DeviceId { major: 8, minor: 0 };

        index.insert(id, PathBuf::from("/dev/sda"));
        index.insert(id, PathBuf::from("/dev/root"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(id), Some(Path::new("/dev/root")));
        assert_eq!(index.lookup(DeviceId { major: 8, minor: 1 }), None);
    }

    #[test]
    fn scan_ignores_non_block_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("null"), b"").unwrap();
        fs::create_dir(dir.path().join("pts")).unwrap();
        symlink("missing", dir.path().join("broken")).unwrap();
        symlink("null", dir.path().join("stdout")).unwrap();

        let index = DeviceIndex::scan(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    fn host_block_device() -> Option<PathBuf> {
        fs::read_dir("/dev").ok()?.flatten().map(|e| e.path()).find(|p| {
            fs::symlink_metadata(p)
                .map(|m| m.file_type().is_block_device())
                .unwrap_or(false)
        })
    }

    #[test]
    fn scan_resolves_relative_links_to_canonical_nodes() {
        let Some(node) = host_block_device() else {
            return;
        };

        let dir = TempDir::new().unwrap();
        let depth = dir.path().components().count() - 1;
        let relative = PathBuf::from("../".repeat(depth)).join(node.strip_prefix("/").unwrap());
        symlink(&relative, dir.path().join("disk")).unwrap();

        let index = DeviceIndex::scan(dir.path()).unwrap();
        let id = DeviceId::from_raw(fs::metadata(&node).unwrap().rdev());

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(id), Some(node.as_path()));
    }

    #[test]
    fn scan_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(DeviceIndex::scan(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn scan_of_host_dev_only_yields_real_block_devices() {
        let Ok(index) = DeviceIndex::scan(Path::new("/dev")) else {
            return;
        };

        for path in index.nodes.values() {
            let meta = fs::symlink_metadata(path).unwrap();
            assert!(!meta.file_type().is_symlink(), "{}", path.display());
            assert!(meta.file_type().is_block_device(), "{}", path.display());
        }
    }
}
