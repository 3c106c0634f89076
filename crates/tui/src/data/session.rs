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

//! Trace navigation state management.
//!
//! [`SessionManager`] is the UI-side half of the session: it mirrors the
//! engine data fetched by [`SessionCore`], owns the navigation state
//! (active trace, current frame, view mode, return-value modal), and turns
//! navigation commands into at-most-one fetch per `(trace, index)` pair.
//!
//! The displayed frame is always read back out of the cache under the key
//! of the *current* position. A slow fetch that completes after the user
//! has moved on lands in the cache under its own key and is simply never
//! displayed, which is the whole stale-result story: no cancellation, no
//! flicker, last navigation wins.

use std::{
    collections::{BTreeMap, HashSet},
    mem,
    path::Path,
    sync::Arc,
};

use redex_common::{types::Frame, TraceError};
use tokio::sync::RwLock;
use tracing::debug;

use crate::data::{
    core::{SessionCore, SessionError, SessionRequest, SessionState, Severity, TraceId},
    source::{self, SourceView},
};

/// Which pane occupies the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Show the term under reduction
    Term,
    /// Show the source file the current frame maps into
    Source,
}

/// Presentation label of a frame index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLabel {
    /// The final frame of the trace
    Done,
    /// The unreachable index just past the trace
    None,
    /// A frame carrying a return value
    Return,
    /// An ordinary reduction step
    Compute,
}

impl DisplayLabel {
    /// Presentation text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::None => "None",
            Self::Return => "Return",
            Self::Compute => "Compute",
        }
    }
}

/// Compute the label for a frame index.
///
/// Returns `Option::None` while the frame is within bounds but not yet
/// resident, so callers can render a placeholder instead of guessing.
pub fn display_label(index: usize, frame_count: usize, frame: Option<&Frame>) -> Option<DisplayLabel> {
    if index >= frame_count {
        return (index == frame_count).then_some(DisplayLabel::None);
    }
    if index + 1 == frame_count {
        return Some(DisplayLabel::Done);
    }
    frame.map(|f| if f.has_return_value() { DisplayLabel::Return } else { DisplayLabel::Compute })
}

/// Smallest source-token index strictly after `current`, falling back to
/// the final frame so the end of the trace stays reachable.
pub(crate) fn next_source_index(indices: &[usize], current: usize, frame_count: usize) -> usize {
    indices.iter().copied().find(|&i| i > current).unwrap_or(frame_count - 1)
}

/// Largest source-token index strictly before `current`, falling back to
/// the first frame.
pub(crate) fn prev_source_index(indices: &[usize], current: usize) -> usize {
    // indices are strictly ascending
    indices.iter().copied().take_while(|&i| i < current).last().unwrap_or(0)
}

/// UI-side session manager with cached state for rendering.
///
/// All reads are immediate; cache misses enqueue a fetch and return `None`
/// until the background task commits the result. Navigation computation is
/// synchronous and side-effect-free apart from those enqueues.
#[derive(Debug)]
pub struct SessionManager {
    /// Program name shown in the title
    program_name: String,

    /// State mirrored from the core
    state: SessionState,
    /// Requests stashed while the core lock was busy
    pending_requests: HashSet<SessionRequest>,
    core: Arc<RwLock<SessionCore>>,

    /// Errors raised on this side of the lock (e.g. missing source root)
    local_error: Option<SessionError>,

    // Navigation state
    active_trace: usize,
    current_frame: usize,
    view_mode: ViewMode,
    modal_open: bool,

    /// Whether the active trace's summary has been applied (index reset)
    summary_ready: bool,
    /// A switch into source view waiting on file resolution
    pending_source_switch: bool,
    /// Position the return-value gate last evaluated at
    last_gate_key: Option<(usize, usize)>,
}

impl SessionManager {
    /// Create a new manager; trace creation is queued immediately
    pub fn new(core: Arc<RwLock<SessionCore>>, program_name: impl Into<String>) -> Self {
        let mut pending_requests = HashSet::new();
        pending_requests.insert(SessionRequest::CreateTraces);

        Self {
            program_name: program_name.into(),
            state: SessionState::default(),
            pending_requests,
            core,
            local_error: None,
            active_trace: 0,
            current_frame: 0,
            view_mode: ViewMode::Term,
            modal_open: false,
            summary_ready: false,
            pending_source_switch: false,
            last_gate_key: None,
        }
    }

    /// Get a clone of the core for background processing
    pub fn get_core(&self) -> Arc<RwLock<SessionCore>> {
        self.core.clone()
    }

    /// Push stashed requests to the core
    pub fn push_pending_to_core(&mut self) {
        if self.pending_requests.is_empty() {
            return;
        }
        let requests = mem::take(&mut self.pending_requests);
        if let Ok(mut core) = self.core.try_write() {
            for request in requests {
                core.add_pending_request(request);
            }
        } else {
            // Lock busy; keep them for the next tick.
            self.pending_requests = requests;
        }
    }

    /// Pull data processed by the core into the local mirror
    pub fn pull_from_core(&mut self) {
        if let Ok(core) = self.core.try_read() {
            self.state.update(&core.state);
        }
    }

    fn new_fetching_request(&mut self, request: SessionRequest) {
        if let Ok(mut core) = self.core.try_write() {
            core.add_pending_request(request);
        } else {
            self.pending_requests.insert(request);
        }
    }

    /// Advance derived state after a pull: apply freshly arrived summaries,
    /// keep the current frame resident, re-evaluate the return-value gate,
    /// and complete or abort a pending switch into source view.
    pub fn maintain(&mut self) {
        if self.has_fatal_error() {
            return;
        }

        if !self.summary_ready {
            if let Some(id) = self.active_identifier().cloned() {
                let cached =
                    self.state.summaries.get(&id).and_then(|s| s.as_ref()).map(|s| s.frame_count);
                match cached {
                    Some(frame_count) => {
                        debug!("Summary ready for {}: {} frame(s)", id, frame_count);
                        self.summary_ready = true;
                        self.current_frame = 0;
                        self.modal_open = false;
                        self.last_gate_key = None;
                    }
                    None if !self.state.summaries.has_cached(&id) => {
                        self.new_fetching_request(SessionRequest::Summary(id));
                    }
                    None => {}
                }
            }
        }

        if !self.summary_ready || self.frame_count().is_none_or(|fc| fc == 0) {
            // No frame fetch before the summary arrives (or for empty traces,
            // which the core has already surfaced as an error).
            return;
        }

        let _ = self.request_frame(self.current_frame);

        // The gate fires once per displayed position: navigation closed the
        // modal already, and it re-opens only if the frame that actually
        // lands here carries a return value.
        let key = (self.active_trace, self.current_frame);
        if self.last_gate_key != Some(key) {
            if let Some(frame) = self.peek_frame(self.current_frame) {
                self.modal_open = frame.has_return_value();
                self.last_gate_key = Some(key);
            }
        }

        if self.pending_source_switch {
            if self.transient_error().is_some() {
                // Resolution failed; the session survives but the switch is off.
                self.pending_source_switch = false;
            } else if self.active_source_files().is_some() {
                self.view_mode = ViewMode::Source;
                self.pending_source_switch = false;
            }
        }
    }

    /////////////////////////////////////////////
    // Errors
    /////////////////////////////////////////////

    /// The last error, if any (local ones take precedence)
    pub fn last_error(&self) -> Option<&SessionError> {
        self.local_error.as_ref().or(self.state.last_error.as_ref())
    }

    /// Whether a session-fatal error is active
    pub fn has_fatal_error(&self) -> bool {
        self.last_error().is_some_and(|e| e.severity == Severity::Fatal)
    }

    fn transient_error(&self) -> Option<&SessionError> {
        self.last_error().filter(|e| e.severity == Severity::Transient)
    }

    /// Clear a transient error (fatal ones only clear through [`Self::retry`])
    pub fn dismiss_transient_error(&mut self) {
        if self.transient_error().is_some() {
            self.local_error = None;
            self.state.last_error = None;
        }
    }

    /// Discard the entire session and restart trace creation from scratch.
    ///
    /// Only meaningful while a fatal error is showing; partial state is
    /// never resumed.
    pub async fn retry(&mut self) {
        if !self.has_fatal_error() {
            return;
        }

        let error_seq = {
            let mut core = self.core.write().await;
            core.reset();
            core.state.error_seq
        };

        self.state = SessionState { error_seq, ..Default::default() };
        self.pending_requests.clear();
        self.local_error = None;
        self.active_trace = 0;
        self.current_frame = 0;
        self.view_mode = ViewMode::Term;
        self.modal_open = false;
        self.summary_ready = false;
        self.pending_source_switch = false;
        self.last_gate_key = None;
    }

    /////////////////////////////////////////////
    // Session accessors
    /////////////////////////////////////////////

    /// Identifier of the active trace
    pub fn active_identifier(&self) -> Option<&TraceId> {
        self.state.identifiers.as_ref()?.get(self.active_trace)
    }

    /// Number of traces created for this session
    pub fn trace_count(&self) -> usize {
        self.state.identifiers.as_ref().map_or(0, Vec::len)
    }

    /// Frame count of the active trace, once its summary is known
    pub fn frame_count(&self) -> Option<usize> {
        let id = self.active_identifier()?;
        Some(self.state.summaries.get(id)?.as_ref()?.frame_count)
    }

    fn source_token_indices(&self) -> &[usize] {
        self.active_identifier()
            .and_then(|id| self.state.summaries.get(id))
            .and_then(|s| s.as_ref())
            .map_or(&[], |s| s.source_token_indices.as_slice())
    }

    /// Index of the frame currently displayed
    pub fn current_index(&self) -> usize {
        self.current_frame
    }

    /// Current view mode
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Whether the return-value modal is open
    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Title text: program name, plus a trace ordinal only when the session
    /// holds more than one trace
    pub fn title(&self) -> String {
        let mut title = format!("Redex Debugger ({})", self.program_name);
        if self.trace_count() > 1 {
            title.push_str(&format!(" [trace {}/{}]", self.active_trace + 1, self.trace_count()));
        }
        title
    }

    /// Whether the next-trace affordance should be offered at all
    pub fn next_trace_available(&self) -> bool {
        self.trace_count() > 1
    }

    /// Whether source view can be toggled right now
    pub fn source_toggle_available(&self) -> bool {
        self.view_mode == ViewMode::Source
            || self.peek_frame(self.current_frame).is_some_and(|f| f.location.is_some())
    }

    /////////////////////////////////////////////
    // Frames
    /////////////////////////////////////////////

    /// Cache-only read of a frame; never triggers a fetch
    fn peek_frame(&self, index: usize) -> Option<&Frame> {
        let id = self.active_identifier()?;
        self.state.frames.get(&(id.clone(), index))?.as_ref()
    }

    /// Ensure the frame at `index` has been requested; true if resident.
    /// No fetch is issued before the summary arrives or out of bounds.
    fn request_frame(&mut self, index: usize) -> bool {
        let Some(frame_count) = self.frame_count() else {
            return false;
        };
        if index >= frame_count {
            return false;
        }
        let Some(id) = self.active_identifier().cloned() else {
            return false;
        };
        if !self.state.frames.has_cached(&(id.clone(), index)) {
            self.new_fetching_request(SessionRequest::Frame(id, index));
            return false;
        }
        self.peek_frame(index).is_some()
    }

    /// Fetch-or-read a frame by index
    pub fn frame_at(&mut self, index: usize) -> Option<&Frame> {
        self.pull_from_core();
        let _ = self.request_frame(index);
        self.peek_frame(index)
    }

    /// The frame at the current position, if already committed
    pub fn displayed_frame(&mut self) -> Option<&Frame> {
        self.frame_at(self.current_frame)
    }

    /// Display label for a frame index; `None` while the frame is loading
    pub fn display_label_at(&mut self, index: usize) -> Option<DisplayLabel> {
        let frame_count = self.frame_count()?;
        if frame_count == 0 {
            // An empty trace has no valid index; the error view owns it.
            return None;
        }
        // Endpoint labels don't depend on the frame contents, so don't make
        // them wait on (or trigger) a fetch.
        if index + 1 >= frame_count {
            return display_label(index, frame_count, None);
        }
        let frame = self.frame_at(index);
        display_label(index, frame_count, frame)
    }

    /////////////////////////////////////////////
    // Navigation
    /////////////////////////////////////////////

    fn can_navigate(&self) -> bool {
        !self.has_fatal_error() && self.summary_ready && self.frame_count().is_some_and(|fc| fc > 0)
    }

    fn goto(&mut self, target: usize) {
        let Some(frame_count) = self.frame_count() else {
            return;
        };
        if frame_count == 0 {
            return;
        }
        self.current_frame = target.min(frame_count - 1);
        let _ = self.request_frame(self.current_frame);
    }

    /// Step forward. In term view this is a clamped linear step; in source
    /// view it jumps to the next source-token frame (the final frame acting
    /// as the fallback endpoint). Always closes the modal first.
    pub fn next(&mut self, stride: usize) {
        if !self.can_navigate() {
            return;
        }
        self.modal_open = false;
        let frame_count = self.frame_count().unwrap_or(1);
        let target = match self.view_mode {
            ViewMode::Term => self.current_frame.saturating_add(stride).min(frame_count - 1),
            ViewMode::Source => {
                next_source_index(self.source_token_indices(), self.current_frame, frame_count)
            }
        };
        self.goto(target);
    }

    /// Step backward; mirror image of [`Self::next`]
    pub fn previous(&mut self, stride: usize) {
        if !self.can_navigate() {
            return;
        }
        self.modal_open = false;
        let target = match self.view_mode {
            ViewMode::Term => self.current_frame.saturating_sub(stride),
            ViewMode::Source => prev_source_index(self.source_token_indices(), self.current_frame),
        };
        self.goto(target);
    }

    /// Cycle to the next trace, wrapping from the last back to the first.
    /// A no-op unless more than one trace exists.
    pub fn next_trace(&mut self) {
        if self.has_fatal_error() || !self.next_trace_available() {
            return;
        }
        self.active_trace = (self.active_trace + 1) % self.trace_count();
        self.current_frame = 0;
        self.modal_open = false;
        self.view_mode = ViewMode::Term;
        self.summary_ready = false;
        self.pending_source_switch = false;
        self.last_gate_key = None;
        debug!("Switched to trace {}", self.active_trace);
    }

    /// Close the return-value modal without moving
    pub fn dismiss_modal(&mut self) {
        self.modal_open = false;
    }

    /////////////////////////////////////////////
    // Source view
    /////////////////////////////////////////////

    fn active_source_files(&self) -> Option<&BTreeMap<String, String>> {
        let id = self.active_identifier()?;
        self.state.source_files.get(id)?.as_ref()
    }

    /// Toggle between term and source view.
    ///
    /// Entering source view requires the current frame to carry a location.
    /// On the first entry per trace the configured root is sent to the
    /// engine for file resolution and the switch stays pending until the
    /// files arrive; with no root configured a transient error points the
    /// user at the flag. Leaving source view never drops the cache.
    pub fn toggle_source_view(&mut self, source_root: Option<&Path>) {
        if self.has_fatal_error() {
            return;
        }

        if self.view_mode == ViewMode::Source {
            self.view_mode = ViewMode::Term;
            self.pending_source_switch = false;
            return;
        }

        if !self.peek_frame(self.current_frame).is_some_and(|f| f.location.is_some()) {
            return;
        }

        if self.active_source_files().is_some() {
            self.view_mode = ViewMode::Source;
            return;
        }

        let Some(root) = source_root else {
            self.local_error = Some(SessionError {
                severity: Severity::Transient,
                error: TraceError::Backend(
                    "no source root configured; pass --source-root or set source_root in ~/.redex.toml"
                        .into(),
                ),
            });
            return;
        };

        let Some(id) = self.active_identifier().cloned() else {
            return;
        };
        self.new_fetching_request(SessionRequest::SourceFiles(id, root.to_path_buf()));
        self.pending_source_switch = true;
    }

    /// Resolve what the source pane should show for the current frame
    pub fn source_view(&mut self) -> Option<SourceView> {
        self.pull_from_core();
        let _ = self.request_frame(self.current_frame);
        let frame = self.peek_frame(self.current_frame)?;
        source::resolve(self.active_source_files(), frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcClient;
    use redex_common::types::{ExBudget, TraceSummary};
    use std::path::PathBuf;

    fn frame(ret_value: Option<&str>, location: Option<&str>) -> Frame {
        Frame {
            term: "(force (delay x))".into(),
            context: vec!["Force".into(), "Root".into()],
            env: vec![],
            budget: ExBudget::default(),
            ret_value: ret_value.map(String::from),
            location: location.map(String::from),
        }
    }

    async fn manager_with(
        traces: &[&str],
        frame_count: usize,
        source_token_indices: Vec<usize>,
    ) -> SessionManager {
        let rpc = Arc::new(RpcClient::new("http://localhost:3030").await.unwrap());
        let core = Arc::new(RwLock::new(SessionCore::new(
            rpc,
            PathBuf::from("fibonacci.uplc"),
            vec![],
        )));
        let mut mgr = SessionManager::new(core, "fibonacci.uplc");
        mgr.state.identifiers = Some(traces.iter().map(|t| t.to_string()).collect());
        for trace in traces {
            mgr.state.summaries.insert(
                trace.to_string(),
                Some(TraceSummary {
                    frame_count,
                    source_token_indices: source_token_indices.clone(),
                }),
            );
        }
        mgr.maintain();
        assert!(mgr.summary_ready);
        mgr
    }

    fn commit_frame(mgr: &mut SessionManager, index: usize, f: Frame) {
        let id = mgr.active_identifier().unwrap().clone();
        mgr.state.frames.insert((id, index), Some(f));
    }

    #[tokio::test]
    async fn test_linear_boundary_idempotence() {
        let mut mgr = manager_with(&["t1"], 5, vec![]).await;
        for i in 0..5 {
            mgr.goto(i);
            mgr.previous(1);
            mgr.next(1);
            let expected = if i == 0 { 1 } else { i };
            assert_eq!(mgr.current_index(), expected, "next(previous({i}))");

            mgr.goto(i);
            mgr.next(1);
            mgr.previous(1);
            let expected = if i == 4 { 3 } else { i };
            assert_eq!(mgr.current_index(), expected, "previous(next({i}))");
        }
    }

    #[tokio::test]
    async fn test_linear_noop_at_boundaries() {
        let mut mgr = manager_with(&["t1"], 3, vec![]).await;
        mgr.previous(1);
        assert_eq!(mgr.current_index(), 0);
        mgr.goto(2);
        mgr.next(1);
        assert_eq!(mgr.current_index(), 2);
    }

    #[tokio::test]
    async fn test_stride_clamps_to_last_frame() {
        let mut mgr = manager_with(&["t1"], 449, vec![]).await;
        mgr.goto(430);
        mgr.next(50);
        assert_eq!(mgr.current_index(), 448);
        mgr.previous(50);
        assert_eq!(mgr.current_index(), 398);
        mgr.goto(20);
        mgr.previous(50);
        assert_eq!(mgr.current_index(), 0);
    }

    #[test]
    fn test_source_index_helpers() {
        let indices = [0, 12, 57, 448];
        assert_eq!(next_source_index(&indices, 12, 449), 57);
        assert_eq!(prev_source_index(&indices, 12), 0);
        // No greater member: falls back to the final frame.
        assert_eq!(next_source_index(&indices, 448, 449), 448);
        // No smaller member: falls back to the first frame.
        assert_eq!(prev_source_index(&indices, 0), 0);
        // Between tokens.
        assert_eq!(next_source_index(&indices, 30, 449), 57);
        assert_eq!(prev_source_index(&indices, 30), 12);
    }

    #[test]
    fn test_source_next_is_monotone_and_closed() {
        let indices = [3, 9, 20];
        let frame_count = 40;
        for current in 0..frame_count {
            let next = next_source_index(&indices, current, frame_count);
            assert!(next >= current);
            if next == current {
                assert_eq!(current, frame_count - 1);
            }
            assert!(indices.contains(&next) || next == frame_count - 1);
        }
    }

    #[tokio::test]
    async fn test_source_mode_stepping_scenario() {
        let mut mgr = manager_with(&["t1"], 449, vec![0, 12, 57, 448]).await;
        mgr.view_mode = ViewMode::Source;

        mgr.goto(12);
        mgr.next(1);
        assert_eq!(mgr.current_index(), 57);
        mgr.goto(12);
        mgr.previous(1);
        assert_eq!(mgr.current_index(), 0);

        mgr.goto(448);
        mgr.next(1);
        assert_eq!(mgr.current_index(), 448);
        mgr.goto(0);
        mgr.previous(1);
        assert_eq!(mgr.current_index(), 0);
    }

    #[tokio::test]
    async fn test_trace_cycling_wraps_and_resets() {
        let mut mgr = manager_with(&["t1", "t2"], 10, vec![]).await;
        mgr.goto(7);
        mgr.modal_open = true;

        mgr.next_trace();
        mgr.maintain();
        assert_eq!(mgr.active_identifier().unwrap(), "t2");
        assert_eq!(mgr.current_index(), 0);
        assert!(!mgr.is_modal_open());

        mgr.next_trace();
        assert_eq!(mgr.active_identifier().unwrap(), "t1");
    }

    #[tokio::test]
    async fn test_trace_cycling_noop_for_single_trace() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        assert!(!mgr.next_trace_available());
        mgr.goto(4);
        mgr.next_trace();
        assert_eq!(mgr.active_identifier().unwrap(), "t1");
        assert_eq!(mgr.current_index(), 4);
    }

    #[tokio::test]
    async fn test_modal_gate_opens_only_for_return_frames() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 0, frame(None, None));
        mgr.maintain();
        assert!(!mgr.is_modal_open());

        commit_frame(&mut mgr, 3, frame(Some("(con integer 55)"), None));
        mgr.goto(3);
        mgr.maintain();
        assert!(mgr.is_modal_open());

        // Navigation closes the modal before the gate re-evaluates.
        commit_frame(&mut mgr, 4, frame(None, None));
        mgr.next(1);
        assert!(!mgr.is_modal_open());
        mgr.maintain();
        assert!(!mgr.is_modal_open());
    }

    #[tokio::test]
    async fn test_modal_dismissal_is_sticky_per_position() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 2, frame(Some("(con unit ())"), None));
        mgr.goto(2);
        mgr.maintain();
        assert!(mgr.is_modal_open());

        mgr.dismiss_modal();
        mgr.maintain();
        assert!(!mgr.is_modal_open());

        // Leaving and returning re-evaluates the gate.
        commit_frame(&mut mgr, 3, frame(None, None));
        mgr.next(1);
        mgr.maintain();
        mgr.previous(1);
        mgr.maintain();
        assert!(mgr.is_modal_open());
    }

    #[tokio::test]
    async fn test_stale_fetch_result_is_never_displayed() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        mgr.goto(5);
        mgr.goto(6);

        // The fetch for index 6 resolves first...
        commit_frame(&mut mgr, 6, frame(None, Some("lib/a.ak:6:1")));
        mgr.maintain();
        assert_eq!(mgr.displayed_frame().unwrap().location.as_deref(), Some("lib/a.ak:6:1"));

        // ...and the stale index-5 result lands afterwards. The display
        // still shows frame 6.
        commit_frame(&mut mgr, 5, frame(None, Some("lib/a.ak:5:1")));
        mgr.maintain();
        assert_eq!(mgr.current_index(), 6);
        assert_eq!(mgr.displayed_frame().unwrap().location.as_deref(), Some("lib/a.ak:6:1"));
    }

    #[tokio::test]
    async fn test_no_navigation_before_summary() {
        let rpc = Arc::new(RpcClient::new("http://localhost:3030").await.unwrap());
        let core = Arc::new(RwLock::new(SessionCore::new(rpc, PathBuf::from("f.uplc"), vec![])));
        let mut mgr = SessionManager::new(core, "f.uplc");
        mgr.state.identifiers = Some(vec!["t1".to_string()]);

        mgr.next(1);
        assert_eq!(mgr.current_index(), 0);
        assert!(mgr.displayed_frame().is_none());
    }

    #[tokio::test]
    async fn test_empty_trace_navigation_is_inert() {
        let mut mgr = manager_with(&["t1"], 0, vec![]).await;
        mgr.next(1);
        mgr.previous(1);
        assert_eq!(mgr.current_index(), 0);
        assert!(mgr.displayed_frame().is_none());
        assert_eq!(mgr.display_label_at(0), None);
    }

    #[tokio::test]
    async fn test_display_labels() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 4, frame(Some("(con integer 1)"), None));
        commit_frame(&mut mgr, 5, frame(None, None));

        assert_eq!(mgr.display_label_at(9), Some(DisplayLabel::Done));
        assert_eq!(mgr.display_label_at(10), Some(DisplayLabel::None));
        assert_eq!(mgr.display_label_at(4), Some(DisplayLabel::Return));
        assert_eq!(mgr.display_label_at(5), Some(DisplayLabel::Compute));
        // Within bounds but not yet resident: no label, show a placeholder.
        assert_eq!(mgr.display_label_at(7), None);
    }

    #[tokio::test]
    async fn test_title_carries_ordinal_only_for_multiple_traces() {
        let mgr = manager_with(&["t1"], 10, vec![]).await;
        assert_eq!(mgr.title(), "Redex Debugger (fibonacci.uplc)");

        let mut mgr = manager_with(&["t1", "t2", "t3"], 10, vec![]).await;
        mgr.next_trace();
        assert_eq!(mgr.title(), "Redex Debugger (fibonacci.uplc) [trace 2/3]");
    }

    #[tokio::test]
    async fn test_toggle_source_requires_location() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 0, frame(None, None));
        mgr.maintain();

        assert!(!mgr.source_toggle_available());
        mgr.toggle_source_view(Some(Path::new("/proj")));
        assert_eq!(mgr.view_mode(), ViewMode::Term);
    }

    #[tokio::test]
    async fn test_toggle_source_without_root_raises_transient_error() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 0, frame(None, Some("lib/a.ak:1:1")));
        mgr.maintain();

        mgr.toggle_source_view(None);
        assert_eq!(mgr.view_mode(), ViewMode::Term);
        let err = mgr.last_error().unwrap();
        assert_eq!(err.severity, Severity::Transient);
        assert!(!mgr.has_fatal_error());

        // Dismissal brings the session back to a clean slate.
        mgr.dismiss_transient_error();
        assert!(mgr.last_error().is_none());
    }

    #[tokio::test]
    async fn test_source_switch_pends_until_files_arrive() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 0, frame(None, Some("lib/a.ak:1:1")));
        mgr.maintain();

        mgr.toggle_source_view(Some(Path::new("/proj")));
        assert_eq!(mgr.view_mode(), ViewMode::Term);

        let mut files = BTreeMap::new();
        files.insert("lib/a.ak".to_string(), "pub fn a() {}\n".to_string());
        mgr.state.source_files.insert("t1".to_string(), Some(files));
        mgr.maintain();
        assert_eq!(mgr.view_mode(), ViewMode::Source);

        match mgr.source_view() {
            Some(SourceView::Loaded { location, .. }) => assert_eq!(location.line, 1),
            other => panic!("expected loaded source view, got {other:?}"),
        }

        // Toggling off keeps the cache; re-entry is immediate.
        mgr.toggle_source_view(None);
        assert_eq!(mgr.view_mode(), ViewMode::Term);
        mgr.toggle_source_view(None);
        assert_eq!(mgr.view_mode(), ViewMode::Source);
    }

    #[tokio::test]
    async fn test_source_failure_aborts_switch_but_not_session() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        commit_frame(&mut mgr, 0, frame(None, Some("lib/a.ak:1:1")));
        mgr.maintain();

        mgr.toggle_source_view(Some(Path::new("/bad/root")));
        mgr.state.set_error(Severity::Transient, TraceError::Backend("invalid root".into()));
        mgr.maintain();

        assert_eq!(mgr.view_mode(), ViewMode::Term);
        assert!(!mgr.has_fatal_error());
        // Navigation still works.
        mgr.dismiss_transient_error();
        mgr.next(1);
        assert_eq!(mgr.current_index(), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_freezes_navigation_until_retry() {
        let mut mgr = manager_with(&["t1"], 10, vec![]).await;
        mgr.goto(5);
        mgr.state.set_error(Severity::Fatal, TraceError::Fetch("frame 6 unavailable".into()));

        mgr.next(1);
        mgr.previous(1);
        mgr.next_trace();
        assert_eq!(mgr.current_index(), 5);

        mgr.retry().await;
        assert!(mgr.last_error().is_none());
        assert_eq!(mgr.current_index(), 0);
        assert_eq!(mgr.trace_count(), 0);
        assert!(!mgr.summary_ready);
    }
}
