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

//! Centralized state management for the TUI
//!
//! This module follows a two-layer design:
//!
//! 1. **Manager layer** ([`SessionManager`])
//!    - Holds mirrored state for immediate, non-blocking reads
//!    - Owns the user-controlled navigation state (active trace, current
//!      frame, view mode, modal)
//!    - Stashes fetch requests when data is not cached
//!
//! 2. **Core layer** ([`SessionCore`])
//!    - Wrapped in `Arc<tokio::sync::RwLock>`
//!    - Handles all engine RPC communication
//!    - Processed by a background task spawned in `Tui::run()`
//!
//! # Data flow
//!
//! 1. Panels read from the manager during render (never blocking)
//! 2. Cache misses create pending requests
//! 3. `Tui::run()` pushes pending requests to the core each tick
//! 4. The background task processes the core's pending requests
//! 5. The next tick pulls processed data back into the manager
//!
//! Rendering therefore never waits on an RPC call, and a frame fetched for
//! a position the user has already left is never displayed.

use std::{path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use crate::rpc::RpcClient;

pub mod core;
pub mod session;
pub mod source;

pub use self::core::{SessionCore, SessionError, Severity};
pub use session::{DisplayLabel, SessionManager, ViewMode};
pub use source::SourceView;

/// Central data manager passed to all app functions
#[derive(Debug)]
pub struct DataManager {
    /// Trace session state and navigation
    pub session: SessionManager,
}

impl DataManager {
    /// Create a new data manager for one program + parameter submission
    pub fn new(rpc_client: Arc<RpcClient>, program: PathBuf, parameters: Vec<String>) -> Self {
        let program_name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());

        let core = Arc::new(RwLock::new(SessionCore::new(rpc_client, program, parameters)));

        Self { session: SessionManager::new(core, program_name) }
    }

    /// Get a clone of the core for background processing
    pub fn get_core(&self) -> Arc<RwLock<SessionCore>> {
        self.session.get_core()
    }

    /// Push pending fetch requests to the core.
    ///
    /// Called from the run loop each tick.
    pub fn update_pending_requests(&mut self) {
        self.session.push_pending_to_core();
    }

    /// Pull processed data from the core and advance derived state
    pub fn process_core_updates(&mut self) {
        self.session.pull_from_core();
        self.session.maintain();
    }
}
