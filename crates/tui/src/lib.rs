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

// Copyright (C) 2025 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! Terminal User Interface for the redex trace debugger
//!
//! This crate provides a terminal client for stepping through recorded
//! abstract-machine execution traces served by an execution engine over
//! JSON-RPC. The engine evaluates the program; this side owns navigation,
//! lazy frame fetching, and presentation.

mod app;
mod config;
mod data;
mod keymap;
mod panels;
mod rpc;

pub use app::App;
pub use config::Config;
pub use data::{DataManager, DisplayLabel, SessionManager, SourceView, ViewMode};
pub use keymap::{key_to_action, Action};
pub use panels::EventResponse;
pub use rpc::RpcClient;

use crossterm::{
    event::{Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, sync::Arc, time::Duration};
use tokio::{select, time::interval};
use tracing::{debug, error, info, warn};

/// Configuration for the TUI
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// RPC endpoint URL of the execution engine
    pub rpc_url: String,
    /// Program file to evaluate
    pub program: PathBuf,
    /// Program parameters, in application order
    pub parameters: Vec<String>,
    /// Root directory for source resolution, if configured
    pub source_root: Option<PathBuf>,
    /// Terminal refresh interval
    pub refresh_interval: Duration,
    /// Background data fetch interval
    pub data_fetch_interval: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:3030".to_string(),
            program: PathBuf::new(),
            parameters: Vec::new(),
            source_root: None,
            refresh_interval: Duration::from_millis(50),
            data_fetch_interval: Duration::from_millis(100),
        }
    }
}

/// Main TUI runner that manages the terminal interface and event loop
pub struct Tui {
    /// The main application state
    app: App,
    /// RPC client shared with the session core
    rpc_client: Arc<RpcClient>,
    /// Terminal backend for rendering and input handling
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Configuration settings for the TUI behavior
    config: TuiConfig,
}

impl Tui {
    /// Create a new TUI instance
    pub async fn new(config: TuiConfig) -> Result<Self> {
        info!("Initializing TUI with config: {:?}", config);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create RPC client
        let rpc_client = Arc::new(RpcClient::new(&config.rpc_url).await?);

        let app = App::new(config.source_root.clone());

        Ok(Self { app, rpc_client, terminal, config })
    }

    /// Run the main TUI event loop
    pub async fn run(mut self) -> Result<()> {
        info!("Starting TUI event loop");

        let mut data_manager = DataManager::new(
            self.rpc_client.clone(),
            self.config.program.clone(),
            self.config.parameters.clone(),
        );

        // Spawn a background task that executes queued engine fetches. The
        // UI side only ever try-locks the core, so rendering never waits on
        // RPC traffic.
        let core = data_manager.get_core();
        let fetch_interval = self.config.data_fetch_interval;
        let core_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(fetch_interval);
            loop {
                interval.tick().await;
                let mut core = core.write().await;
                if let Err(e) = core.process_pending_requests().await {
                    error!("Error processing session requests: {}", e);
                }
            }
        });

        let mut event_stream = EventStream::new();
        let mut ticker = interval(self.config.refresh_interval);

        let result = loop {
            // Render current state
            let render_result = self.terminal.draw(|frame| {
                self.app.render(frame, &mut data_manager);
            });

            if let Err(e) = render_result {
                break Err(e.into());
            }

            select! {
                // Handle terminal events (keyboard, resize)
                event_result = event_stream.next() => {
                    if let Some(Ok(current_event)) = event_result {
                        debug!("Received event: {:?}", current_event);

                        match current_event {
                            Event::Key(key_event) => {
                                if self.handle_key_event(key_event, &mut data_manager).await? {
                                    break Ok(());
                                }
                            }
                            // Redraw happens on the next loop iteration.
                            Event::Resize(width, height) => {
                                debug!("Terminal resized: {}x{}", width, height);
                            }
                            _ => {}
                        }
                    }
                }

                // Periodic refresh tick
                _ = ticker.tick() => {
                    // Pull updates from the core (new frames, errors)
                    data_manager.process_core_updates();

                    // Push pending requests to the core, then pull once more
                    data_manager.update_pending_requests();
                    data_manager.process_core_updates();
                }
            }

            if self.app.should_exit() {
                info!("App requested exit");
                break Ok(());
            }
        };

        // Abort background task
        core_handle.abort();

        info!("TUI event loop ended");
        result
    }

    // Handle a single key event, returning true if the app should exit
    async fn handle_key_event(
        &mut self,
        key_event: KeyEvent,
        data_manager: &mut DataManager,
    ) -> Result<bool> {
        match self.app.handle_key_event(key_event, data_manager).await? {
            EventResponse::Exit => {
                info!("Exit requested");
                return Ok(true);
            }
            EventResponse::Handled => {}
            EventResponse::NotHandled => {
                warn!("Unhandled key event: {:?}", key_event);
            }
        }

        Ok(false)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Public API for the TUI module
pub mod api {
    use super::*;

    /// Start the TUI with the given configuration
    pub async fn start_tui(config: TuiConfig) -> Result<()> {
        let tui = Tui::new(config).await?;
        tui.run().await
    }
}
