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

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    hash::Hash,
    mem,
    ops::{Deref, DerefMut},
    path::PathBuf,
    sync::Arc,
};

use eyre::Result;
use redex_common::{
    types::{Frame, TraceSummary},
    TraceError,
};
use tracing::{debug, warn};

use crate::rpc::RpcClient;

/// Opaque trace identifier handed out by the engine
pub type TraceId = String;

/// A cache map that tracks three states for each key:
/// 1. Key not in map = not fetched
/// 2. Key maps to `Some(v)` = fetched with valid value
/// 3. Key maps to `None` = fetched but no valid value
#[derive(Debug, Clone)]
pub struct FetchCache<K, V> {
    data: HashMap<K, Option<V>>,
}

impl<K, V> Deref for FetchCache<K, V> {
    type Target = HashMap<K, Option<V>>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<K, V> DerefMut for FetchCache<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<K, V> FetchCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Check if the cache has an entry (valid or invalid) for the given key
    pub fn has_cached(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    /// Check if the reference holds entries this cache is missing
    pub fn need_update(&self, reference: &Self) -> bool {
        reference.keys().any(|key| !self.data.contains_key(key))
    }

    /// Merge entries fetched by the reference into this cache
    pub fn update(&mut self, reference: &Self) {
        for (key, value) in reference.iter() {
            if !self.data.contains_key(key) {
                self.data.insert(key.clone(), value.clone());
            }
        }
    }
}

impl<K, V> Default for FetchCache<K, V> {
    fn default() -> Self {
        Self { data: HashMap::new() }
    }
}

/// How far an engine failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The whole session is unusable; only a user-initiated restart recovers
    Fatal,
    /// A pending view switch was aborted; the session itself stays live
    Transient,
}

/// An engine failure parked in the shared last-error slot
#[derive(Debug, Clone)]
pub struct SessionError {
    /// Reach of the failure
    pub severity: Severity,
    /// The underlying boundary error
    pub error: TraceError,
}

/// A single fetch the UI side has asked for.
///
/// Requests are deduplicated through a `HashSet`, so no two fetches for the
/// same `(trace, index)` pair are ever in flight at once, and the cache
/// guard in [`SessionCore::process_pending_requests`] makes each pair fetch
/// at most once per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionRequest {
    /// Evaluate the program and create the session's traces
    CreateTraces,
    /// Fetch the summary of one trace
    Summary(TraceId),
    /// Fetch one frame of one trace
    Frame(TraceId, usize),
    /// Resolve the source files of one trace under a root directory
    SourceFiles(TraceId, PathBuf),
}

/// Everything fetched from the engine so far, plus the shared error slot.
///
/// The core owns the authoritative copy; the session manager keeps a mirror
/// it refreshes with [`SessionState::update`] whenever the core lock is
/// free, so rendering never blocks on RPC traffic.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Ordered trace identifiers, `None` until creation completes
    pub identifiers: Option<Vec<TraceId>>,
    /// Per-trace summaries
    pub summaries: FetchCache<TraceId, TraceSummary>,
    /// Individually fetched frames, keyed by `(trace, index)`
    pub frames: FetchCache<(TraceId, usize), Frame>,
    /// Per-trace resolved source files (relative path to file text)
    pub source_files: FetchCache<TraceId, BTreeMap<String, String>>,
    /// Last engine failure, replacing the normal presentation when fatal
    pub last_error: Option<SessionError>,
    /// Bumped every time `last_error` is set, so mirrors can tell a new
    /// failure from one the user already dismissed
    pub error_seq: u64,
}

impl SessionState {
    /// Merge data the core has fetched since the last pull
    pub fn update(&mut self, other: &Self) {
        if self.identifiers.is_none() {
            self.identifiers.clone_from(&other.identifiers);
        }
        if self.summaries.need_update(&other.summaries) {
            self.summaries.update(&other.summaries);
        }
        if self.frames.need_update(&other.frames) {
            self.frames.update(&other.frames);
        }
        if self.source_files.need_update(&other.source_files) {
            self.source_files.update(&other.source_files);
        }
        if other.error_seq > self.error_seq {
            self.last_error.clone_from(&other.last_error);
            self.error_seq = other.error_seq;
        }
    }

    /// Record a failure in the shared slot
    pub fn set_error(&mut self, severity: Severity, error: TraceError) {
        self.last_error = Some(SessionError { severity, error });
        self.error_seq += 1;
    }
}

/// Engine-facing half of the session.
///
/// Lives inside an `Arc<tokio::sync::RwLock<_>>` and is driven by a
/// background task; the UI side only ever `try_lock`s it.
#[derive(Debug)]
pub struct SessionCore {
    rpc_client: Arc<RpcClient>,
    program: PathBuf,
    parameters: Vec<String>,
    pub(crate) state: SessionState,
    pending_requests: HashSet<SessionRequest>,
}

impl SessionCore {
    /// Create a new core for one program + parameter submission
    pub fn new(rpc_client: Arc<RpcClient>, program: PathBuf, parameters: Vec<String>) -> Self {
        Self {
            rpc_client,
            program,
            parameters,
            state: SessionState::default(),
            pending_requests: HashSet::new(),
        }
    }

    /// Queue a request to be processed on the next background tick
    pub fn add_pending_request(&mut self, request: SessionRequest) {
        self.pending_requests.insert(request);
    }

    /// Discard every fetched result and restart trace creation from scratch.
    ///
    /// This is the "try again" path: partial or stale state is never
    /// resumed, the next tick re-submits the program.
    pub fn reset(&mut self) {
        let error_seq = self.state.error_seq;
        self.state = SessionState { error_seq, ..Default::default() };
        self.pending_requests.clear();
        self.pending_requests.insert(SessionRequest::CreateTraces);
    }

    /// Process all pending requests
    pub async fn process_pending_requests(&mut self) -> Result<()> {
        let requests = mem::take(&mut self.pending_requests);
        for request in requests {
            self.fetch_data(request).await;
        }
        Ok(())
    }

    /// Execute one request against the engine, recording the result (or the
    /// failure) in the session state. Other queued requests still run after
    /// a failure; whether the session survives is the error slot's call.
    async fn fetch_data(&mut self, request: SessionRequest) {
        match request {
            SessionRequest::CreateTraces => {
                if self.state.identifiers.is_some() {
                    return;
                }

                match self.rpc_client.create_traces(&self.program, &self.parameters).await {
                    Ok(identifiers) if identifiers.is_empty() => {
                        self.state.set_error(
                            Severity::Fatal,
                            TraceError::Backend(format!(
                                "program {} produced no traces",
                                self.program.display()
                            )),
                        );
                    }
                    Ok(identifiers) => {
                        debug!("Created {} trace(s)", identifiers.len());
                        self.state.identifiers = Some(identifiers);
                    }
                    Err(e) => {
                        warn!("Trace creation failed: {}", e);
                        self.state.set_error(Severity::Fatal, e);
                    }
                }
            }
            SessionRequest::Summary(id) => {
                if self.state.summaries.has_cached(&id) {
                    return;
                }

                match self.rpc_client.get_trace_summary(&id).await {
                    Ok(summary) => {
                        // An empty trace has no valid index at all; surface it
                        // instead of letting navigation clamp to -1.
                        if summary.frame_count == 0 {
                            self.state.set_error(
                                Severity::Fatal,
                                TraceError::Backend(format!("trace {id} contains no frames")),
                            );
                        }
                        self.state.summaries.insert(id, Some(summary));
                    }
                    Err(e) => {
                        warn!("Summary fetch failed for {}: {}", id, e);
                        self.state.set_error(Severity::Fatal, e);
                    }
                }
            }
            SessionRequest::Frame(id, index) => {
                if self.state.frames.has_cached(&(id.clone(), index)) {
                    return;
                }

                match self.rpc_client.get_frame(&id, index).await {
                    Ok(frame) => {
                        self.state.frames.insert((id, index), Some(frame));
                    }
                    Err(e) => {
                        warn!("Frame fetch failed for ({}, {}): {}", id, index, e);
                        self.state.set_error(Severity::Fatal, e);
                    }
                }
            }
            SessionRequest::SourceFiles(id, root) => {
                if self.state.source_files.has_cached(&id) {
                    return;
                }

                match self.rpc_client.get_source_files(&id, &root).await {
                    Ok(files) => {
                        debug!("Resolved {} source file(s) for {}", files.len(), id);
                        self.state.source_files.insert(id, Some(files));
                    }
                    Err(e) => {
                        // Source resolution never takes the session down; it
                        // only aborts the pending switch to source view.
                        warn!("Source resolution failed for {}: {}", id, e);
                        self.state.set_error(Severity::Transient, e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_cache_states() {
        let mut cache: FetchCache<usize, &str> = FetchCache::default();
        assert!(!cache.has_cached(&0));

        cache.insert(0, Some("frame"));
        cache.insert(1, None);
        assert!(cache.has_cached(&0));
        assert!(cache.has_cached(&1));
        assert_eq!(cache.get(&1), Some(&None));
    }

    #[test]
    fn test_fetch_cache_update_never_overwrites() {
        let mut mirror: FetchCache<usize, &str> = FetchCache::default();
        mirror.insert(0, Some("original"));

        let mut core = FetchCache::default();
        core.insert(0, Some("changed"));
        core.insert(1, Some("new"));

        assert!(mirror.need_update(&core));
        mirror.update(&core);
        assert_eq!(mirror.get(&0), Some(&Some("original")));
        assert_eq!(mirror.get(&1), Some(&Some("new")));
    }

    #[test]
    fn test_error_seq_distinguishes_new_failures() {
        let mut mirror = SessionState::default();
        let mut core = SessionState::default();

        core.set_error(Severity::Transient, TraceError::Backend("bad root".into()));
        mirror.update(&core);
        assert!(mirror.last_error.is_some());

        // Dismissal clears the mirror only; an unchanged core seq must not
        // resurrect the error on the next pull.
        mirror.last_error = None;
        mirror.update(&core);
        assert!(mirror.last_error.is_none());

        core.set_error(Severity::Fatal, TraceError::Fetch("gone".into()));
        mirror.update(&core);
        assert!(mirror.last_error.unwrap().error.is_fetch());
    }
}
