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

//! Redex TUI - terminal client for the redex trace debugger
//!
//! This binary submits a program to a running execution engine and steps
//! through the recorded trace(s) it produces.

use clap::Parser;
use eyre::Result;
use redex_common::logging;
use redex_tui::{Config, TuiConfig};
use std::path::PathBuf;

/// Redex Terminal User Interface
#[derive(Debug, Parser)]
#[command(name = "redex-tui")]
#[command(about = "Terminal User Interface for the redex trace debugger", version)]
struct Args {
    /// Program file to evaluate
    file: PathBuf,

    /// Parameters applied to the program, in order
    parameters: Vec<String>,

    /// Engine RPC server URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Root directory for source resolution (overrides the config file)
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Config file path (uses ~/.redex.toml if not specified)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terminal refresh interval in milliseconds
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// Data fetch interval in milliseconds
    #[arg(long)]
    data_fetch_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to a file; the terminal belongs to the TUI.
    let log_file_path = logging::init_file_only_logging("redex-tui")?;
    eprintln!("redex-tui logs: {}", log_file_path.display());

    // Load configuration
    let config = if let Some(config_path) = args.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    let tui_config = TuiConfig {
        rpc_url: args.url.unwrap_or_else(|| config.rpc_url.clone()),
        program: args.file,
        parameters: args.parameters,
        source_root: args.source_root.or_else(|| config.source_root.clone()),
        refresh_interval: std::time::Duration::from_millis(
            args.refresh_interval.unwrap_or(config.refresh_interval),
        ),
        data_fetch_interval: std::time::Duration::from_millis(
            args.data_fetch_interval.unwrap_or(config.data_fetch_interval),
        ),
    };

    tracing::info!("Starting redex TUI");
    tracing::info!("Connecting to engine at: {}", tui_config.rpc_url);

    match redex_tui::api::start_tui(tui_config).await {
        Ok(_) => {
            tracing::info!("TUI exited normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("TUI error: {}", e);
            Err(e)
        }
    }
}
