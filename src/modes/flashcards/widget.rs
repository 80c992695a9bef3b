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
    style::Stylize,
    symbols::border,
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::{modes::COLOR_HINT, question::Flashcard};

pub(super) struct FlashcardWidget<'a> {
    card: &'a Flashcard,
    flipped: bool,
    position: (usize, usize),
}

impl<'a> FlashcardWidget<'a> {
    pub fn new(card: &'a Flashcard, flipped: bool, position: (usize, usize)) -> Self {
        Self {
            card,
            flipped,
            position,
        }
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Widget for FlashcardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (card_area, hint_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [Constraint::Min(3), Constraint::Length(1)],
            );
            let split = layout.split(area);
            (split[0], split[1])
        };

        let (number, total) = self.position;
        let title = match self.card.topic.as_deref() {
            Some(topic) => format!("Question {number}/{total} | {topic}"),
            None => format!("Question {number}/{total}"),
        };

        let block = Block::bordered().border_set(border::ROUNDED).title(title);
        let inner = block.inner(card_area);
        block.render(card_area, buf);

        let (face_name_area, face_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)],
            );

            let split = layout.split(inner);
            (split[0], split[1])
        };

        let (face_name, face) = if self.flipped {
            let answer = if self.card.answer.trim().is_empty() {
                "(no answer)".to_owned()
            } else {
                self.card.answer.to_owned()
            };
            ("Answer:", answer)
        } else {
            ("Question:", capitalize_first(&self.card.question))
        };

        Paragraph::new(face_name)
            .wrap(Wrap { trim: false })
            .centered()
            .render(face_name_area, buf);

        Paragraph::new(face)
            .wrap(Wrap { trim: false })
            .centered()
            .render(face_area, buf);

        Paragraph::new("space to flip, enter for next, up for previous, q to quit")
            .centered()
            .fg(COLOR_HINT)
            .render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    use super::{capitalize_first, FlashcardWidget};
    use crate::{modes::buffer_text, question::Flashcard};

    fn render(widget: FlashcardWidget) -> String {
        let area = Rect::new(0, 0, 70, 16);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn capitalize() {
        assert_eq!(capitalize_first("what is a list?"), "What is a list?");
        assert_eq!(capitalize_first("Already"), "Already");
        assert_eq!(capitalize_first("é"), "É");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn front_and_back() {
        let card = Flashcard::new("what is a tuple?", "An immutable sequence.", Some("data".to_owned()))
            .expect("Unable to build card");

        let front = render(FlashcardWidget::new(&card, false, (2, 5)));
        assert!(front.contains("Question 2/5 | data"));
        assert!(front.contains("What is a tuple?"));
        assert!(!front.contains("An immutable sequence."));

        let back = render(FlashcardWidget::new(&card, true, (2, 5)));
        assert!(back.contains("Answer:"));
        assert!(back.contains("An immutable sequence."));
    }

    #[test]
    fn blank_answer() {
        let card = Flashcard::new("What is nothing?", "", None).expect("Unable to build card");

        let back = render(FlashcardWidget::new(&card, true, (1, 1)));
        assert!(back.contains("Question 1/1"));
        assert!(back.contains("(no answer)"));
    }
}
