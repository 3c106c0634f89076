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

//! Error kinds surfaced across the engine boundary.

use thiserror::Error;

/// Failures reported by the execution engine.
///
/// Both kinds are captured at the failing call site and stored, never
/// retried automatically; recovery is user-initiated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Trace or source creation/resolution was rejected by the engine
    #[error("backend error: {0}")]
    Backend(String),
    /// A specific frame could not be retrieved
    #[error("fetch error: {0}")]
    Fetch(String),
}

impl TraceError {
    /// Whether this error came from a per-frame fetch
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
