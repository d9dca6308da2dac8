// Copyright 2026 Hybrid Mount Developers
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fmt as std_fmt,
    fs::create_dir_all,
    io::IsTerminal,
    path::Path,
};

use anyhow::{Context, Result};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

struct SimpleFormatter;

impl<S, N> FormatEvent<S, N> for SimpleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let level = *event.metadata().level();
        write!(writer, "[{}] ", level)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Logs go to stderr, plus `log_path` when given. Stdout is reserved for
/// facts. The returned guard must live until the process exits.
pub fn init_logging(verbose: bool, log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_target(false);

    let mut guard = None;

    let file_layer = if let Some(path) = log_path {
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
        let directory = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        create_dir_all(directory)
            .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

        let file_appender = tracing_appender::rolling::never(directory, file_name);
        let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
        guard = Some(g);

        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .event_format(SimpleFormatter),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing_log::LogTracer::init().ok();

    Ok(guard)
}
