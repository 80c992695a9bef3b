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

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode};
use log::{info, warn};
use rand::Rng;
use widget::QuizWidget;

use crate::{
    event::{clear_and_match_event, is_quit, key_press, match_event_until},
    modes::{status::StatusWidget, COLOR_CORRECT},
    question::{index_for, OPTION_COUNT},
    score::ScoreStore,
    session::{Feedback, QuizSession, Score, SessionEvent, Transition},
    terminal::TerminalWrapper,
    BestScore, Outcome, QuizdeckError,
};

mod widget;

const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(900);

///Plays `session` until it finishes or the user quits. A finished session
///of fixed length is offered to `scores` as a new best, and can be played
///again from the game over screen.
pub fn run_quiz<R: Rng>(
    term: &mut TerminalWrapper,
    mut session: QuizSession<R>,
    name: &str,
    scores: &ScoreStore,
) -> Result<Outcome, QuizdeckError> {
    let mut transition = session.handle(SessionEvent::Start)?;

    loop {
        transition = match transition {
            Transition::Question(_) => match ask(term, &session, name)? {
                Some(selected) => session.handle(SessionEvent::Submit(selected))?,
                None => return Ok(quit(&session, name)),
            },
            Transition::Answered(feedback) => {
                if !show_feedback(term, &session, &feedback, name)? {
                    return Ok(quit(&session, name));
                }
                session.handle(SessionEvent::Advance)?
            }
            Transition::Finished(score) => {
                let best = record_best(scores, score);
                if show_game_over(term, name, score, best)? == GameOverInput::Restart {
                    session.handle(SessionEvent::Restart)?
                } else {
                    return Ok(Outcome::Quiz {
                        name: name.to_owned(),
                        score,
                        finished: true,
                        best,
                    });
                }
            }
        };
    }
}

fn quit<R: Rng>(session: &QuizSession<R>, name: &str) -> Outcome {
    let score = session.score();
    info!("{name} left the quiz at question {} with {score}", session.question_index());

    Outcome::Quiz {
        name: name.to_owned(),
        score,
        finished: false,
        best: None,
    }
}

fn record_best(scores: &ScoreStore, score: Score) -> Option<BestScore> {
    scores
        .record(score.correct)
        .inspect_err(|err| warn!("Unable to save best score: {err}"))
        .ok()
}

fn ask<R: Rng>(
    term: &mut TerminalWrapper,
    session: &QuizSession<R>,
    name: &str,
) -> Result<Option<usize>, QuizdeckError> {
    loop {
        term.render_widget(QuizWidget::new(session, name))?;

        match clear_and_match_event(match_answer_input)? {
            AnswerInput::Answer(selected) => return Ok(Some(selected)),
            AnswerInput::Resize => continue,
            AnswerInput::Quit => return Ok(None),
        }
    }
}

///Returns false if the user quit instead of continuing.
fn show_feedback<R: Rng>(
    term: &mut TerminalWrapper,
    session: &QuizSession<R>,
    feedback: &Feedback,
    name: &str,
) -> Result<bool, QuizdeckError> {
    let deadline = Instant::now() + AUTO_ADVANCE_DELAY;

    loop {
        term.render_widget(QuizWidget::new(session, name).answered(feedback))?;

        let input = if feedback.is_correct() {
            match_event_until(deadline, match_correct_input)?
                .unwrap_or(ContinueInput::Continue)
        } else {
            clear_and_match_event(match_wrong_input)?
        };

        match input {
            ContinueInput::Continue => return Ok(true),
            ContinueInput::Quit => return Ok(false),
            ContinueInput::Resize => continue,
        }
    }
}

fn show_game_over(
    term: &mut TerminalWrapper,
    name: &str,
    score: Score,
    best: Option<BestScore>,
) -> Result<GameOverInput, QuizdeckError> {
    let mut widget = StatusWidget::new("Quiz complete", "r to play again, any other key to exit")
        .line(format!("Well played, {name}!"))
        .line(format!("Final score: {score} ({:.2}%)", score.percent()));
    widget = match best {
        Some(BestScore { new_best: true, .. }) => widget.line("New best score!").color(COLOR_CORRECT),
        Some(BestScore { score: best, .. }) => widget.line(format!("Best score: {best}")),
        None => widget,
    };

    loop {
        term.render_widget(widget.clone())?;

        match clear_and_match_event(match_game_over_input)? {
            GameOverInput::Resize => continue,
            input => return Ok(input),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum AnswerInput {
    Answer(usize),
    Resize,
    Quit,
}

fn match_answer_input(event: Event) -> Option<AnswerInput> {
    if let Event::Resize(_, _) = event {
        return Some(AnswerInput::Resize);
    }

    let key = key_press(event)?;
    if is_quit(&key) {
        return Some(AnswerInput::Quit);
    }

    match key.code {
        KeyCode::Char(digit @ '1'..='9') => digit
            .to_digit(10)
            .map(|digit| digit as usize - 1)
            .filter(|index| *index < OPTION_COUNT)
            .map(AnswerInput::Answer),
        KeyCode::Char(letter) => index_for(letter.to_ascii_lowercase()).map(AnswerInput::Answer),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ContinueInput {
    Continue,
    Resize,
    Quit,
}

fn match_correct_input(event: Event) -> Option<ContinueInput> {
    if let Event::Resize(_, _) = event {
        return Some(ContinueInput::Resize);
    }

    key_press(event).map(|key| {
        if is_quit(&key) {
            ContinueInput::Quit
        } else {
            ContinueInput::Continue
        }
    })
}

fn match_wrong_input(event: Event) -> Option<ContinueInput> {
    if let Event::Resize(_, _) = event {
        return Some(ContinueInput::Resize);
    }

    let key = key_press(event)?;
    if is_quit(&key) {
        return Some(ContinueInput::Quit);
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('n') => {
            Some(ContinueInput::Continue)
        }
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum GameOverInput {
    Restart,
    Resize,
    Exit,
}

fn match_game_over_input(event: Event) -> Option<GameOverInput> {
    if let Event::Resize(_, _) = event {
        return Some(GameOverInput::Resize);
    }

    key_press(event).map(|key| match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => GameOverInput::Restart,
        _ => GameOverInput::Exit,
    })
}
