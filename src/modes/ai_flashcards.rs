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

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use crossterm::event::{Event, KeyCode};
use log::{info, warn};

use crate::{
    ai::{FlashcardGenerator, FlashcardSource},
    event::{clear_and_match_event, is_quit, key_press, match_event_within},
    modes::{
        flashcards::{show_flashcards, Navigation},
        status::StatusWidget,
        COLOR_INCORRECT,
    },
    terminal::TerminalWrapper,
    QuizdeckError, Review,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

///Generates flashcards for `topic` and reviews them. Returns `None` if the
///user gave up before any cards arrived.
pub fn ai_flashcards<S: FlashcardSource + 'static>(
    term: &mut TerminalWrapper,
    generator: &mut FlashcardGenerator<S>,
    topic: &str,
    count: usize,
    model: &str,
) -> Result<Option<Review>, QuizdeckError> {
    loop {
        if !generator.is_pending() {
            generator.request(topic, count)?;
        }

        let started = Instant::now();
        let result = loop {
            let message = format!(
                "Asking {model} for {count} flashcards about \"{topic}\"{}",
                progress_dots(started.elapsed())
            );
            term.render_widget(
                StatusWidget::new("Generating flashcards", "q to cancel").line(message),
            )?;

            if let Some(result) = generator.poll(Duration::ZERO) {
                break result;
            }

            if let Some(StatusInput::Quit) = match_event_within(POLL_INTERVAL, match_status_input)? {
                info!("Flashcard generation cancelled");
                return Ok(None);
            }
        };

        let message = match result {
            Ok(cards) if !cards.is_empty() => {
                info!("Generated {} flashcards about \"{topic}\"", cards.len());
                let cards: Vec<_> = cards.into_iter().map(Rc::new).collect();
                return show_flashcards(term, &cards, Navigation::Linear).map(Some);
            }
            Ok(_) => {
                warn!("Generator returned no usable flashcards for \"{topic}\"");
                "The response did not contain any flashcards.".to_owned()
            }
            Err(err) => {
                warn!("Flashcard generation failed: {err}");
                err.to_string()
            }
        };

        if !show_retry(term, &message)? {
            return Ok(None);
        }
    }
}

fn progress_dots(elapsed: Duration) -> &'static str {
    match (elapsed.as_millis() / 400) % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

///Returns true if the user wants another attempt.
fn show_retry(term: &mut TerminalWrapper, message: &str) -> Result<bool, QuizdeckError> {
    loop {
        term.render_widget(
            StatusWidget::new("Unable to generate flashcards", "r to retry, q to quit")
                .line(message)
                .color(COLOR_INCORRECT),
        )?;

        match clear_and_match_event(match_status_input)? {
            StatusInput::Retry => return Ok(true),
            StatusInput::Quit => return Ok(false),
            StatusInput::Resize => continue,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StatusInput {
    Retry,
    Resize,
    Quit,
}

fn match_status_input(event: Event) -> Option<StatusInput> {
    if let Event::Resize(_, _) = event {
        return Some(StatusInput::Resize);
    }

    let key = key_press(event)?;
    if is_quit(&key) {
        return Some(StatusInput::Quit);
    }

    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => Some(StatusInput::Retry),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    use super::{match_status_input, progress_dots, StatusInput};

    #[test]
    fn dots_cycle() {
        assert_eq!(progress_dots(Duration::from_millis(0)), "");
        assert_eq!(progress_dots(Duration::from_millis(450)), ".");
        assert_eq!(progress_dots(Duration::from_millis(1300)), "...");
        assert_eq!(progress_dots(Duration::from_millis(1600)), "");
    }

    #[test]
    fn status_input() {
        let press = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));

        assert_eq!(match_status_input(press(KeyCode::Char('r'))), Some(StatusInput::Retry));
        assert_eq!(match_status_input(press(KeyCode::Esc)), Some(StatusInput::Quit));
        assert_eq!(match_status_input(press(KeyCode::Char('x'))), None);
        assert_eq!(match_status_input(Event::Resize(1, 1)), Some(StatusInput::Resize));
    }
}
