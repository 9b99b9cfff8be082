//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - JSON/non-JSON stdout formatting is selected via the `json` flag.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.

use anyhow::Result;
use chrono::Local;
use inbox_sorter::output as out;
use inbox_sorter::platform::open_log_file_secure_append;
use inbox_sorter::{path_has_symlink_ancestor, LogLevel};
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

/// Filter our own crate at `level`; dependencies (notify) stay at warn.
fn env_filter_for(level: LevelFilter) -> EnvFilter {
    let lvl = level.to_string().to_ascii_lowercase();
    EnvFilter::new(format!("warn,inbox_sorter={lvl}"))
}

/// Open a non-blocking file writer, refusing symlinked ancestors.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing file logging: an ancestor of {} is a symlink.",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "Could not check log path {} for symlinks: {e}",
                path.display()
            ));
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Failed to open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Initialize tracing. Returns the WorkerGuard of the file appender, if any;
/// it must be held until shutdown so buffered lines get flushed.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_for(to_level_filter(lvl));

    if let Some(path) = log_file {
        if let Some((writer, guard)) = maybe_open_non_blocking_writer(path) {
            if json {
                let stdout_layer = tsfmt::layer()
                    .event_format(tsfmt::format().json())
                    .with_timer(LocalHumanTime)
                    .with_target(true);
                let file_layer = tsfmt::layer()
                    .event_format(tsfmt::format().json())
                    .with_timer(LocalHumanTime)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer);
                registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .try_init()?;
            } else {
                let stdout_layer = tsfmt::layer()
                    .with_timer(LocalHumanTime)
                    .with_target(false)
                    .compact();
                let file_layer = tsfmt::layer()
                    .with_timer(LocalHumanTime)
                    .with_target(false)
                    .with_ansi(false)
                    .compact()
                    .with_writer(writer);
                registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .try_init()?;
            }
            return Ok(Some(guard));
        }
        out::print_warn(&format!(
            "File logging to '{}' was not enabled; logs continue on stdout.",
            path.display()
        ));
    }

    if json {
        let stdout_layer = tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_target(true);
        registry().with(env_filter).with(stdout_layer).try_init()?;
    } else {
        let stdout_layer = tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(false)
            .compact();
        registry().with(env_filter).with(stdout_layer).try_init()?;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_one_step_louder() {
        assert_eq!(to_level_filter(&LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(&LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(&LogLevel::Info), LevelFilter::DEBUG);
        assert_eq!(to_level_filter(&LogLevel::Debug), LevelFilter::TRACE);
    }
}
