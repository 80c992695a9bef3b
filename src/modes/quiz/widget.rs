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

use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::{border, line},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::{
    modes::{COLOR_CORRECT, COLOR_HINT, COLOR_INCORRECT},
    question::{letter_for, QuizQuestion, OPTION_COUNT},
    session::{Feedback, QuizSession, Score},
};

pub(super) struct QuizWidget<'a> {
    name: &'a str,
    question: Option<&'a QuizQuestion>,
    question_index: u32,
    length: Option<u32>,
    topic: Option<&'a str>,
    score: Score,
    feedback: Option<&'a Feedback>,
}

impl<'a> QuizWidget<'a> {
    pub(super) fn new<R: Rng>(session: &'a QuizSession<R>, name: &'a str) -> Self {
        Self {
            name,
            question: session.current(),
            question_index: session.question_index(),
            length: session.length(),
            topic: session.topic(),
            score: session.score(),
            feedback: None,
        }
    }

    pub(super) fn answered(mut self, feedback: &'a Feedback) -> Self {
        self.feedback = Some(feedback);
        self
    }

    fn header(&self) -> String {
        let progress = match self.length {
            Some(length) => format!("Question {}/{length}", self.question_index),
            None => format!("Question {}", self.question_index),
        };

        match self.topic {
            Some(topic) => format!("{} | {progress} | {topic}", self.name),
            None => format!("{} | {progress}", self.name),
        }
    }

    fn hint(&self) -> &'static str {
        match self.feedback {
            None => "a-d or 1-4 to answer, q to quit",
            Some(Feedback::Correct { .. }) => "Any key to continue, q to quit",
            Some(Feedback::Wrong { .. }) => "Enter to continue, q to quit",
        }
    }
}

impl Widget for QuizWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (header_area, question_area, answer_areas, feedback_area, hint_area, progress_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [
                    Constraint::Length(1),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(2, 3),
                    Constraint::Length(4),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ],
            );
            let split = layout.split(area);

            let (answer_top, answer_bot) = {
                let layout = Layout::new(Direction::Vertical, [Constraint::Ratio(1, 2); 2]);
                let split = layout.split(split[2]);
                (split[0], split[1])
            };

            let layout = Layout::new(Direction::Horizontal, [Constraint::Ratio(1, 2); 2]);
            let (top_left, top_right) = {
                let split = layout.split(answer_top);
                (split[0], split[1])
            };
            let (bot_left, bot_right) = {
                let split = layout.split(answer_bot);
                (split[0], split[1])
            };

            (
                split[0],
                split[1],
                [top_left, top_right, bot_left, bot_right],
                split[3],
                split[4],
                split[5],
            )
        };

        Paragraph::new(self.header()).render(header_area, buf);
        Paragraph::new(format!("Score: {}", self.score))
            .right_aligned()
            .render(header_area, buf);

        let Some(question) = self.question else {
            return;
        };

        {
            let paragraph = Paragraph::new(question.question.to_owned())
                .wrap(Wrap { trim: false })
                .centered()
                .block(
                    Block::new()
                        .borders(Borders::BOTTOM)
                        .border_set(border::DOUBLE),
                );
            match self.feedback {
                None => paragraph.render(question_area, buf),
                Some(feedback) => paragraph
                    .fg(if feedback.is_correct() {
                        COLOR_CORRECT
                    } else {
                        COLOR_INCORRECT
                    })
                    .render(question_area, buf),
            }
        }

        let correct_index = question.correct_index();
        for (index, option) in question.options.iter().take(OPTION_COUNT).enumerate() {
            let outcome = self.feedback.map(|feedback| {
                let is_correct = Some(index) == correct_index;
                let is_selected = index == feedback.selected();
                (is_correct, is_selected)
            });

            OptionWidget::new(option, index, outcome).render(answer_areas[index], buf);
        }

        match self.feedback {
            None => {}
            Some(Feedback::Correct { .. }) => Paragraph::new("Correct!")
                .centered()
                .fg(COLOR_CORRECT)
                .render(feedback_area, buf),
            Some(Feedback::Wrong {
                correct_letter,
                explanation,
                ..
            }) => {
                let mut text = format!(
                    "Wrong! The correct answer was {correct_letter}) {}",
                    question.correct_option().unwrap_or_default()
                );
                if let Some(explanation) = explanation {
                    text.push('\n');
                    text.push_str(explanation);
                }
                Paragraph::new(text)
                    .wrap(Wrap { trim: false })
                    .centered()
                    .fg(COLOR_INCORRECT)
                    .render(feedback_area, buf)
            }
        }

        Paragraph::new(self.hint())
            .centered()
            .fg(COLOR_HINT)
            .render(hint_area, buf);

        {
            let Score { correct, total } = self.score;
            let (ratio, percent) = if total == 0 {
                //NOTE: Starting at ratio 1.0 so that
                //colors are "correct"
                (1.0, 0.0)
            } else {
                (correct as f64 / total as f64, self.score.percent())
            };

            Gauge::default()
                .ratio(ratio)
                .label(format!("{percent:05.2}% ({correct}/{total})"))
                .gauge_style(Style::default().fg(COLOR_CORRECT).bg(COLOR_INCORRECT))
                .use_unicode(true)
                .render(progress_area, buf);
        }
    }
}

struct OptionWidget<'a> {
    option: &'a str,
    index: usize,
    ///(is the correct option, was selected)
    outcome: Option<(bool, bool)>,
}

impl<'a> OptionWidget<'a> {
    fn new(option: &'a str, index: usize, outcome: Option<(bool, bool)>) -> Self {
        Self {
            option,
            index,
            outcome,
        }
    }
}

impl Widget for OptionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let letter = letter_for(self.index).unwrap_or('?');
        let borders = if self.index % 2 == 0 {
            Borders::TOP | Borders::RIGHT
        } else {
            Borders::TOP
        };

        Paragraph::new(format!("{letter}) {}", self.option))
            .wrap(Wrap { trim: false })
            .centered()
            .block(Block::new().borders(borders).border_set(border::Set {
                top_right: line::DOUBLE_HORIZONTAL_DOWN,
                ..border::DOUBLE
            }))
            .fg(match self.outcome {
                None | Some((false, false)) => Color::default(),
                Some((true, _)) => COLOR_CORRECT,
                Some((false, true)) => COLOR_INCORRECT,
            })
            .render(area, buf)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    use super::QuizWidget;
    use crate::{
        modes::buffer_text,
        question::QuizQuestion,
        rotation::RotationPool,
        session::{QuizSession, SessionConfig},
    };

    fn question() -> QuizQuestion {
        QuizQuestion {
            id: 1,
            topic: "basics".to_owned(),
            question: "Which keyword defines a function?".to_owned(),
            options: vec![
                "def".to_owned(),
                "fun".to_owned(),
                "fn".to_owned(),
                "lambda".to_owned(),
            ],
            correct: "a".to_owned(),
            explanation: Some("def starts a function definition.".to_owned()),
        }
    }

    fn session(length: Option<u32>) -> QuizSession<StdRng> {
        let pool = RotationPool::from_items([question()]).with_rng(StdRng::seed_from_u64(3));
        let mut session = QuizSession::new(
            pool,
            SessionConfig {
                topic: None,
                length,
            },
        );
        session.start().expect("Unable to start session");
        session
    }

    fn render(widget: QuizWidget) -> String {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn renders_question_and_options() {
        let session = session(Some(5));
        let text = render(QuizWidget::new(&session, "Ada"));

        assert!(text.contains("Ada | Question 1/5"));
        assert!(text.contains("Score: 0/0"));
        assert!(text.contains("Which keyword defines a function?"));
        assert!(text.contains("a) def"));
        assert!(text.contains("d) lambda"));
        assert!(!text.contains("Wrong!"));
    }

    #[test]
    fn renders_indefinite_progress() {
        let session = session(None);
        let text = render(QuizWidget::new(&session, "Ada"));

        assert!(text.contains("Ada | Question 1 "));
    }

    #[test]
    fn renders_wrong_feedback_with_explanation() {
        let mut session = session(Some(5));
        let feedback = session.submit_answer(2).expect("Unable to submit");
        let text = render(QuizWidget::new(&session, "Ada").answered(&feedback));

        assert!(text.contains("Wrong! The correct answer was a) def"));
        assert!(text.contains("def starts a function definition."));
        assert!(text.contains("Score: 0/1"));
    }

    #[test]
    fn renders_correct_feedback() {
        let mut session = session(Some(5));
        let feedback = session.submit_answer(0).expect("Unable to submit");
        let text = render(QuizWidget::new(&session, "Ada").answered(&feedback));

        assert!(text.contains("Correct!"));
        assert!(text.contains("Score: 1/1"));
    }
}
