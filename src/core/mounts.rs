// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use regex_lite::Regex;

use crate::defs;

static DEFAULT_SOURCE_REGEX: OnceLock<Regex> = OnceLock::new();

/// One NFS line from the mount table with escapes already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfsMount {
    pub source: String,
    pub mount_point: PathBuf,
}

/// Decides which mount sources count as NFS.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    regex: Regex,
}

impl SourceFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid source pattern: '{}'", pattern))?;

        Ok(Self { regex })
    }

    pub fn matches(&self, source: &str) -> bool {
        self.regex.is_match(source)
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        let regex = DEFAULT_SOURCE_REGEX.get_or_init(|| {
            Regex::new(defs::DEFAULT_SOURCE_PATTERN).expect("Invalid Regex pattern")
        });

        Self {
            regex: regex.clone(),
        }
    }
}

/// Reads the table as text. Lines that are not valid UTF-8 are dropped so
/// one odd mount point cannot hide the rest of the table.
pub fn read_mount_table(path: &Path) -> Result<String> {
    let raw = fs::read(path)
        .with_context(|| format!("Failed to read mount table {}", path.display()))?;

    let mut content = String::with_capacity(raw.len());

    for line in raw.split(|&b| b == b'\n') {
        match std::str::from_utf8(line) {
            Ok(line) => {
                content.push_str(line);
                content.push('\n');
            }
            Err(_) => {
                tracing::debug!(
                    "Skipping non UTF-8 mount table line: {}",
                    String::from_utf8_lossy(line)
                );
            }
        }
    }

    Ok(content)
}

/// Picks the NFS entries out of a mount table in `source target fstype ...`
/// layout. Lines that do not parse are dropped.
pub fn parse_mount_table(content: &str, filter: &SourceFilter) -> Vec<NfsMount> {
    content
        .lines()
        .filter_map(|line| parse_line(line, filter))
        .collect()
}

fn parse_line(line: &str, filter: &SourceFilter) -> Option<NfsMount> {
    let line = line.trim();

    if line.is_empty() || line.starts_with(defs::NONE_SOURCE_PREFIX) {
        return None;
    }

    let mut fields = line.split_whitespace();
    let source = fields.next()?;

    if !filter.matches(source) {
        return None;
    }

    let Some(target) = fields.next() else {
        tracing::debug!("Malformed mount table line: '{}'", line);
        return None;
    };

    Some(NfsMount {
        source: unescape_octal(source),
        mount_point: PathBuf::from(unescape_octal(target)),
    })
}

/// Decodes the `\NNN` octal escapes the kernel writes for whitespace and
/// backslashes in mount fields, e.g. `My\040Files` -> `My Files`.
pub fn unescape_octal(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\'
            && let Some(value) = bytes.get(i + 1..i + 4).and_then(decode_octal)
        {
            out.push(value);
            i += 4;
            continue;
        }

        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn decode_octal(digits: &[u8]) -> Option<u8> {
    let value = digits.iter().try_fold(0u16, |acc, &d| match d {
        b'0'..=b'7' => Some(acc * 8 + u16::from(d - b'0')),
        _ => None,
    })?;

    u8::try_from(value).ok()
}
