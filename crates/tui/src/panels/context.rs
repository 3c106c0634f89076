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

//! Context pane: the evaluation stack, outermost first.

use ratatui::{
    layout::Rect,
    style::{Color, Stylize},
    symbols::{self, border},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{clamp_scroll, PanelTr, PanelType};
use crate::data::DataManager;

/// Render the stack labels as one indented chain
fn context_to_string(context: &[String]) -> String {
    let mut text = String::new();
    for (i, label) in context.iter().enumerate() {
        if i > 0 {
            text.push_str("\n -> ");
        }
        text.push_str(label);
    }
    text
}

/// Context pane implementation
#[derive(Debug, Default)]
pub struct ContextPanel {
    scroll: u16,
    focused: bool,
}

impl PanelTr for ContextPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        // The top-left corner meets the command region's bottom edge.
        let top_right_border_set = symbols::border::Set {
            top_left: symbols::line::NORMAL.horizontal_down,
            ..border::PLAIN
        };
        let block = Block::default()
            .title(" Context ".fg(if self.focused { Color::Blue } else { Color::Reset }))
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_set(top_right_border_set);

        let text = dm
            .session
            .displayed_frame()
            .map(|f| context_to_string(&f.context))
            .unwrap_or_default();
        self.scroll = clamp_scroll(self.scroll, &text);

        frame.render_widget(Paragraph::new(text).block(block).scroll((self.scroll, 0)), area);
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_rendering() {
        let context =
            vec!["Get Function".to_string(), "Force".to_string(), "Root".to_string()];
        assert_eq!(context_to_string(&context), "Get Function\n -> Force\n -> Root");
        assert_eq!(context_to_string(&[]), "");
    }
}
