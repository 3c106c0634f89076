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

//! Env pane: bindings visible at the current step, in visibility order.

use ratatui::{
    layout::Rect,
    style::{Color, Stylize},
    symbols::{self, border},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use redex_common::types::EnvVar;

use super::{clamp_scroll, PanelTr, PanelType};
use crate::data::DataManager;

fn env_to_string(env: &[EnvVar]) -> String {
    env.iter().map(|v| format!("{}: {}", v.name, v.value)).collect::<Vec<_>>().join("\n")
}

/// Env pane implementation
#[derive(Debug, Default)]
pub struct EnvPanel {
    scroll: u16,
    focused: bool,
}

impl PanelTr for EnvPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        // Corners collapse into the context pane above and the term pane to
        // the left.
        let collapsed_border_set = symbols::border::Set {
            top_left: symbols::line::NORMAL.vertical_right,
            top_right: symbols::line::NORMAL.vertical_left,
            bottom_left: symbols::line::NORMAL.horizontal_up,
            ..border::PLAIN
        };
        let block = Block::default()
            .title(" Env ".fg(if self.focused { Color::Blue } else { Color::Reset }))
            .borders(Borders::ALL)
            .border_set(collapsed_border_set);

        let text = dm
            .session
            .displayed_frame()
            .map(|f| env_to_string(&f.env))
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
        PanelType::Env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_preserves_order_and_duplicates() {
        let env = vec![
            EnvVar { name: "i_1".into(), value: "(con integer 1)".into() },
            EnvVar { name: "i_1".into(), value: "(con integer 2)".into() },
        ];
        assert_eq!(env_to_string(&env), "i_1: (con integer 1)\ni_1: (con integer 2)");
    }
}
