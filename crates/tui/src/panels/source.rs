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

//! Source pane: the file the current frame maps into, with the mapped line
//! highlighted. Takes the term pane's place while source view is active.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{PanelTr, PanelType};
use crate::data::{DataManager, SourceView};

/// Source pane implementation
#[derive(Debug, Default)]
pub struct SourcePanel {
    scroll: u16,
    focused: bool,
}

impl SourcePanel {
    /// Build the styled text, highlighting the 1-based mapped line
    fn styled_text(text: &str, highlight_line: usize) -> Text<'static> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i + 1 == highlight_line {
                    Line::from(line.to_string())
                        .style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    Line::from(line.to_string())
                }
            })
            .collect::<Vec<_>>();
        Text::from(lines)
    }
}

impl PanelTr for SourcePanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, dm: &mut DataManager) {
        let view = dm.session.source_view();

        let (title, text) = match view {
            Some(SourceView::Loaded { text, location }) => {
                // Keep the mapped line in the middle of the viewport; the
                // user scroll is applied on top of that.
                let viewport = area.height.saturating_sub(1) as usize;
                let centered = location.line.saturating_sub(viewport / 2 + 1);
                self.scroll = self.scroll.min(text.lines().count() as u16);
                let base = centered as u16 + self.scroll;
                let title =
                    format!(" Source ({}:{}:{}) ", location.file, location.line, location.column);
                frame.render_widget(
                    Paragraph::new(Self::styled_text(&text, location.line))
                        .block(
                            Block::default()
                                .title(title.fg(if self.focused {
                                    Color::Blue
                                } else {
                                    Color::Reset
                                }))
                                .borders(Borders::TOP | Borders::LEFT)
                                .border_set(border::PLAIN),
                        )
                        .scroll((base, 0)),
                    area,
                );
                return;
            }
            Some(SourceView::NeedsRoot) => {
                (" Source ".to_string(), "Resolving source files...".to_string())
            }
            Some(SourceView::Missing { file }) => {
                (" Source ".to_string(), format!("{file} not found under the source root"))
            }
            None => (" Source ".to_string(), "No source mapping for this step".to_string()),
        };

        let block = Block::default()
            .title(title.fg(if self.focused { Color::Blue } else { Color::Reset }))
            .borders(Borders::TOP | Borders::LEFT)
            .border_set(border::PLAIN);
        frame.render_widget(Paragraph::new(text).block(block), area);
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
        PanelType::Source
    }
}
