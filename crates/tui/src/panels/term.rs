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

//! Term pane: the expression currently under reduction.

use ratatui::{
    layout::Rect,
    style::{Color, Stylize},
    symbols::border,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{clamp_scroll, PanelTr, PanelType};
use crate::data::DataManager;

/// Term pane implementation
#[derive(Debug, Default)]
pub struct TermPanel {
    scroll: u16,
    focused: bool,
}

impl PanelTr for TermPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        let block = Block::default()
            .title(" Term ".fg(if self.focused { Color::Blue } else { Color::Reset }))
            .borders(Borders::TOP | Borders::LEFT)
            .border_set(border::PLAIN);

        let text = dm
            .session
            .displayed_frame()
            .map(|f| f.term.clone())
            .unwrap_or_else(|| "Loading frame...".to_string());
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
        PanelType::Term
    }
}
