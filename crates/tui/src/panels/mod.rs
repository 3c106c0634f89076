//! Panel framework and implementations
//!
//! Each pane of the debugger renders one facet of the current frame from
//! the shared [`DataManager`]; panes own nothing but their scroll and focus
//! state.

use ratatui::{layout::Rect, Frame};

use crate::data::DataManager;

/// Panel types for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Term pane showing the expression under reduction
    Term,
    /// Context pane showing the evaluation stack
    Context,
    /// Env pane showing visible bindings
    Env,
    /// Source pane showing the mapped source file
    Source,
}

/// Response from event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request application exit
    Exit,
}

/// Trait for UI panes
pub trait PanelTr {
    /// Render the pane content
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager);

    /// Called when this pane gains focus
    fn on_focus(&mut self) {}

    /// Called when this pane loses focus
    fn on_blur(&mut self) {}

    /// Scroll one line up
    fn scroll_up(&mut self) {}

    /// Scroll one line down
    fn scroll_down(&mut self) {}

    /// Get the pane type
    fn panel_type(&self) -> PanelType;
}

/// Clamp a scroll offset so the last content line stays reachable
pub(crate) fn clamp_scroll(scroll: u16, text: &str) -> u16 {
    let max_scroll = text.lines().count().saturating_sub(1) as u16;
    scroll.min(max_scroll)
}

pub mod context;
pub mod env;
pub mod source;
pub mod term;

pub use context::ContextPanel;
pub use env::EnvPanel;
pub use source::SourcePanel;
pub use term::TermPanel;
