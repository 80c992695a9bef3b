/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Quizdeck.
 *
 * Quizdeck is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Quizdeck is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Quizdeck.  If not, see <http://www.gnu.org/licenses/>.
 */

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Stylize},
    symbols::border,
    widgets::{Block, Paragraph, Widget, Wrap},
};

use super::COLOR_HINT;

///Full screen message with a title and a key hint, used between questions
///and cards: generating, errors, game over.
#[derive(Clone)]
pub(super) struct StatusWidget<'a> {
    title: &'a str,
    lines: Vec<String>,
    hint: &'a str,
    color: Color,
}

impl<'a> StatusWidget<'a> {
    pub(super) fn new(title: &'a str, hint: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            hint,
            color: Color::default(),
        }
    }

    pub(super) fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub(super) fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (body_area, hint_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [
                    Constraint::Ratio(1, 4),
                    Constraint::Min(3),
                    Constraint::Ratio(1, 4),
                    Constraint::Length(1),
                ],
            );
            let split = layout.split(area);
            (split[1], split[3])
        };

        Paragraph::new(self.lines.join("\n"))
            .wrap(Wrap { trim: false })
            .centered()
            .fg(self.color)
            .block(
                Block::bordered()
                    .border_set(border::DOUBLE)
                    .title(self.title)
                    .title_alignment(ratatui::layout::Alignment::Center),
            )
            .render(body_area, buf);

        Paragraph::new(self.hint)
            .centered()
            .fg(COLOR_HINT)
            .render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    use super::StatusWidget;
    use crate::modes::buffer_text;

    #[test]
    fn renders_title_lines_and_hint() {
        let area = Rect::new(0, 0, 50, 16);
        let mut buf = Buffer::empty(area);

        StatusWidget::new("Quiz complete", "Press any key")
            .line("Final score: 3/4")
            .line("New best score!")
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Quiz complete"));
        assert!(text.contains("Final score: 3/4"));
        assert!(text.contains("New best score!"));
        assert!(text.contains("Press any key"));
    }
}
