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
//! Redex Common - Shared functionality for redex components
//!
//! This crate provides the data model spoken between the redex TUI and the
//! execution engine, along with the error kinds and logging setup shared by
//! both sides of that boundary.

/// Wire types exchanged with the execution engine: frames, budgets, trace
/// summaries, and source locations
pub mod types;

/// Error kinds surfaced across the engine boundary
pub mod error;
/// Logging setup and utilities for consistent logging across redex components
pub mod logging;

pub use error::*;
pub use logging::*;
