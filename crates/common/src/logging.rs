// Redex - Abstract Machine Debugger
// Copyright (C) 2025 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Logging setup shared by redex binaries.
//!
//! The TUI owns the terminal's alternate screen, so its logs must never hit
//! stdout/stderr; [`init_file_only_logging`] routes everything to a
//! timestamped file instead and returns its path so the binary can tell the
//! user where to look.

use std::{fs, path::PathBuf};

use eyre::{eyre, Context, Result};
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// The non-blocking writer stops flushing once its guard drops, so the guard
// lives for the remainder of the process.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialize file-only logging for the named program.
///
/// Respects `RUST_LOG` for filtering (default `info`). Returns the path of
/// the log file being written.
pub fn init_file_only_logging(program: &str) -> Result<PathBuf> {
    let log_dir = dirs_next::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("redex")
        .join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_name = format!("{}-{}.log", program, chrono::Local::now().format("%Y%m%d-%H%M%S"));
    let log_path = log_dir.join(file_name);
    let log_file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(log_file);
    LOG_GUARD
        .set(guard)
        .map_err(|_| eyre!("logging already initialized"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install tracing subscriber: {e}"))?;

    Ok(log_path)
}
