// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

/// Facts are only reported when the running kernel is Linux.
pub fn is_linux() -> bool {
    cfg!(target_os = "linux") && kernel_name() == "Linux"
}

pub fn kernel_name() -> String {
    rustix::system::uname()
        .sysname()
        .to_string_lossy()
        .into_owned()
}

#[cfg(target_os = "linux")]
pub fn kernel_release() -> Option<String> {
    procfs::KernelVersion::current()
        .ok()
        .map(|v| format!("{}.{}.{}", v.major, v.minor, v.patch))
}

#[cfg(not(target_os = "linux"))]
pub fn kernel_release() -> Option<String> {
    None
}
