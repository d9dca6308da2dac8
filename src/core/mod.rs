// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod correlate;
pub mod devices;
pub mod facts;
pub mod mounts;
pub mod probe;

pub use probe::NfsProbe;
