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

//! Main application state and logic
//!
//! This module owns pane focus and action dispatch, and draws everything
//! around the panes: title, progress gauge, the Current/Budget/Next command
//! line, the enabled-action instructions, the error views, and the
//! return-value popup.

use std::path::PathBuf;

use crossterm::event::{KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use redex_common::types::ExBudget;
use tracing::debug;

use crate::{
    data::{DataManager, Severity, ViewMode},
    keymap::{key_to_action, Action},
    panels::{
        ContextPanel, EnvPanel, EventResponse, PanelTr, PanelType, SourcePanel, TermPanel,
    },
};

/// Budget line content with zero diffs suppressed
fn budget_spans(budget: &ExBudget) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        format!("{} steps ", budget.steps),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )];
    if budget.steps_diff != 0 {
        spans.push(format!("(+{}) ", budget.steps_diff).fg(Color::Green));
    }
    spans.push(Span::styled(
        format!("{} mem", budget.mem),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    ));
    if budget.mem_diff != 0 {
        spans.push(format!(" (+{})", budget.mem_diff).fg(Color::Green));
    }
    spans
}

/// Main application state
pub struct App {
    /// Term pane (left, term view)
    term: TermPanel,
    /// Source pane (left, source view)
    source: SourcePanel,
    /// Context pane (top right)
    context: ContextPanel,
    /// Env pane (bottom right)
    env: EnvPanel,
    /// Currently focused pane
    focus: PanelType,
    /// Root directory for source resolution, if configured
    source_root: Option<PathBuf>,
    /// Whether the application should exit
    should_exit: bool,
}

impl App {
    /// Create a new application instance
    pub fn new(source_root: Option<PathBuf>) -> Self {
        Self {
            term: TermPanel::default(),
            source: SourcePanel::default(),
            context: ContextPanel::default(),
            env: EnvPanel::default(),
            focus: PanelType::Term,
            source_root,
            should_exit: false,
        }
    }

    /// Check if the app should exit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Handle a keyboard event
    pub async fn handle_key_event(
        &mut self,
        key: KeyEvent,
        dm: &mut DataManager,
    ) -> Result<EventResponse> {
        // Key release and repeat events never fire actions.
        if key.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        let Some(action) = key_to_action(&key) else {
            return Ok(EventResponse::NotHandled);
        };
        debug!("Dispatching action: {:?}", action);

        // A fatal error replaces the whole presentation; only leaving or
        // restarting the session get through.
        if dm.session.has_fatal_error() {
            return match action {
                Action::Quit => {
                    self.should_exit = true;
                    Ok(EventResponse::Exit)
                }
                Action::Retry => {
                    dm.session.retry().await;
                    Ok(EventResponse::Handled)
                }
                _ => Ok(EventResponse::Handled),
            };
        }

        // Any action acknowledges a transient (source) error.
        dm.session.dismiss_transient_error();

        match action {
            Action::Next { stride } => dm.session.next(stride),
            Action::Previous { stride } => dm.session.previous(stride),
            Action::Quit => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            Action::NextTrace => dm.session.next_trace(),
            Action::ToggleSource => {
                dm.session.toggle_source_view(self.source_root.as_deref());
            }
            Action::Retry => {}
            Action::DismissModal => dm.session.dismiss_modal(),
            Action::FocusNext => self.cycle_focus(dm),
            Action::ScrollUp => self.focused_panel_mut().scroll_up(),
            Action::ScrollDown => self.focused_panel_mut().scroll_down(),
        }

        Ok(EventResponse::Handled)
    }

    /// Left pane identity depends on the view mode
    fn left_panel_type(dm: &DataManager) -> PanelType {
        match dm.session.view_mode() {
            ViewMode::Term => PanelType::Term,
            ViewMode::Source => PanelType::Source,
        }
    }

    fn cycle_focus(&mut self, dm: &DataManager) {
        self.focus = match self.focus {
            PanelType::Term | PanelType::Source => PanelType::Context,
            PanelType::Context => PanelType::Env,
            PanelType::Env => Self::left_panel_type(dm),
        };
    }

    fn focused_panel_mut(&mut self) -> &mut dyn PanelTr {
        match self.focus {
            PanelType::Term => &mut self.term,
            PanelType::Source => &mut self.source,
            PanelType::Context => &mut self.context,
            PanelType::Env => &mut self.env,
        }
    }

    /// Update pane focus states, folding an out-of-mode focus back onto the
    /// visible left pane
    fn update_panel_focus(&mut self, dm: &DataManager) {
        let left = Self::left_panel_type(dm);
        if matches!(self.focus, PanelType::Term | PanelType::Source) && self.focus != left {
            self.focus = left;
        }

        for panel in [
            &mut self.term as &mut dyn PanelTr,
            &mut self.source,
            &mut self.context,
            &mut self.env,
        ] {
            if panel.panel_type() == self.focus {
                panel.on_focus();
            } else {
                panel.on_blur();
            }
        }
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame<'_>, dm: &mut DataManager) {
        let area = frame.area();

        if let Some(error) = dm.session.last_error() {
            if error.severity == Severity::Fatal {
                let message = error.error.to_string();
                Self::render_error_view(frame, area, &message);
                return;
            }
        }

        self.update_panel_focus(dm);

        let layout = Self::render_outer_block(frame, area, dm);
        let gauge_region = layout[0];
        let command_region = layout[1];
        let status_region = layout[2];
        let main_region = layout[3];

        Self::render_gauge_region(frame, gauge_region, dm);
        Self::render_command_region(frame, command_region, dm);
        Self::render_status_region(frame, status_region, dm);

        let main_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_region);
        let right_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_layout[1]);

        match dm.session.view_mode() {
            ViewMode::Term => self.term.render(frame, main_layout[0], dm),
            ViewMode::Source => self.source.render(frame, main_layout[0], dm),
        }
        self.context.render(frame, right_layout[0], dm);
        self.env.render(frame, right_layout[1], dm);

        Self::render_return_popup(frame, area, dm);
    }

    /// Draw the outer frame and split its interior
    fn render_outer_block(
        frame: &mut Frame<'_>,
        area: Rect,
        dm: &mut DataManager,
    ) -> std::rc::Rc<[Rect]> {
        let title = Line::from(format!(" {} ", dm.session.title()).bold()).centered();

        let mut instructions = vec![
            " Next ".into(),
            "<N>".blue().bold(),
            " Previous ".into(),
            "<P>".blue().bold(),
        ];
        if dm.session.next_trace_available() {
            instructions.push(" Next Trace ".into());
            instructions.push("<T>".blue().bold());
        }
        if dm.session.source_toggle_available() {
            instructions.push(" Source ".into());
            instructions.push("<V>".blue().bold());
        }
        instructions.push(" Quit ".into());
        instructions.push("<Q> ".blue().bold());

        let block = Block::default()
            .title(title)
            .title_bottom(Line::from(instructions).centered())
            .borders(Borders::ALL)
            .border_set(border::THICK);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Percentage(100),
            ])
            .split(block.inner(area));

        frame.render_widget(block, area);
        layout
    }

    fn render_gauge_region(frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        let Some(frame_count) = dm.session.frame_count().filter(|fc| *fc > 0) else {
            frame.render_widget(
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Green))
                    .label("Loading trace...")
                    .ratio(0.0),
                area,
            );
            return;
        };

        let cursor = dm.session.current_index();
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Green))
                .label(format!("Step {}/{}", cursor, frame_count - 1))
                .ratio(cursor as f64 / frame_count as f64),
            area,
        );
    }

    fn render_command_region(frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        let cursor = dm.session.current_index();
        let current_label =
            dm.session.display_label_at(cursor).map_or("...", |l| l.as_str());
        let next_label =
            dm.session.display_label_at(cursor + 1).map_or("...", |l| l.as_str());

        frame.render_widget(
            Line::from(vec![
                "Current: ".into(),
                current_label.fg(Color::Blue).add_modifier(Modifier::BOLD),
            ])
            .left_aligned(),
            area,
        );

        if let Some(budget) = dm.session.displayed_frame().map(|f| f.budget) {
            let mut spans = vec![Span::raw("Budget: ")];
            spans.extend(budget_spans(&budget));
            frame.render_widget(Line::from(spans).centered(), area);
        }

        frame.render_widget(
            Line::from(vec![
                "Next: ".into(),
                next_label.fg(Color::Blue).add_modifier(Modifier::ITALIC),
            ])
            .right_aligned(),
            area,
        );
    }

    /// One line reserved for transient errors (e.g. source resolution)
    fn render_status_region(frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        if let Some(error) = dm.session.last_error() {
            if error.severity == Severity::Transient {
                frame.render_widget(
                    Line::from(error.error.to_string().fg(Color::Red)).centered(),
                    area,
                );
            }
        }
    }

    fn render_return_popup(frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        if !dm.session.is_modal_open() {
            return;
        }
        let Some(ret_value) = dm.session.displayed_frame().and_then(|f| f.ret_value.clone())
        else {
            return;
        };

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 3,
            width: area.width / 2,
            height: area.height / 3,
        };
        let block = Block::default()
            .title(" Return Value ")
            .title_bottom(Line::from(vec![" Dismiss ".into(), "<Esc> ".blue().bold()]).centered())
            .borders(Borders::ALL)
            .border_set(border::PLAIN);

        frame.render_widget(Clear, popup_area);
        frame.render_widget(Paragraph::new(ret_value).block(block), popup_area);
    }

    /// Fatal errors replace the whole presentation; only retry or quit
    /// leave this view
    fn render_error_view(frame: &mut Frame<'_>, area: Rect, message: &str) {
        let block = Block::default().borders(Borders::ALL).border_set(border::THICK);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Percentage(40),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Percentage(40),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new("An error occurred:")
                .style(Style::default().fg(Color::Blue))
                .alignment(Alignment::Center),
            layout[1],
        );
        frame.render_widget(
            Paragraph::new(message).alignment(Alignment::Center),
            layout[2],
        );
        frame.render_widget(
            Line::from(vec![
                " Try again ".into(),
                "<R>".blue().bold(),
                " Quit ".into(),
                "<Q> ".blue().bold(),
            ])
            .centered(),
            layout[3],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_budget_line_with_diffs() {
        let budget = ExBudget { steps: 2300, mem: 412, steps_diff: 100, mem_diff: 32 };
        assert_eq!(content(&budget_spans(&budget)), "2300 steps (+100) 412 mem (+32)");
    }

    #[test]
    fn test_budget_line_suppresses_zero_diffs() {
        let budget = ExBudget { steps: 2300, mem: 412, steps_diff: 0, mem_diff: 0 };
        assert_eq!(content(&budget_spans(&budget)), "2300 steps 412 mem");

        let budget = ExBudget { steps: 0, mem: 0, steps_diff: 0, mem_diff: 0 };
        assert_eq!(content(&budget_spans(&budget)), "0 steps 0 mem");
    }

    #[test]
    fn test_budget_line_mixed_diffs() {
        let budget = ExBudget { steps: 500, mem: 64, steps_diff: 100, mem_diff: 0 };
        assert_eq!(content(&budget_spans(&budget)), "500 steps (+100) 64 mem");
    }
}
