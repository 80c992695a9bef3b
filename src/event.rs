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

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{QuizdeckError, UiError};

///Drops anything typed ahead, then blocks until `match_fn` accepts an event.
pub fn clear_and_match_event<T>(
    match_fn: impl Fn(Event) -> Option<T>,
) -> Result<T, QuizdeckError> {
    clear_event_loop()?;
    match_user_input(match_fn)
}

///Like [clear_and_match_event], but gives up once `timeout` has passed.
pub fn match_event_within<T>(
    timeout: Duration,
    match_fn: impl Fn(Event) -> Option<T>,
) -> Result<Option<T>, QuizdeckError> {
    match_event_until(Instant::now() + timeout, match_fn)
}

///Like [`match_event_within`], but against a fixed point in time, so a caller
///that redraws and waits again keeps its original deadline.
pub fn match_event_until<T>(
    deadline: Instant,
    match_fn: impl Fn(Event) -> Option<T>,
) -> Result<Option<T>, QuizdeckError> {
    loop {
        if !event::poll(remaining(deadline)).map_err(UiError::IoError)? {
            return Ok(None);
        }
        let event = event::read().map_err(UiError::IoError)?;
        if let Some(value) = match_fn(event) {
            return Ok(Some(value));
        }
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

///Key presses only, so releases and repeats on platforms that report them
///are not counted twice.
pub fn key_press(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key @ KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) => Some(key),
        _ => None,
    }
}

pub fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn clear_event_loop() -> Result<(), QuizdeckError> {
    loop {
        if event::poll(Duration::from_millis(0)).map_err(UiError::IoError)? {
            event::read().map_err(UiError::IoError)?;
            continue;
        }
        break Ok(());
    }
}

fn match_user_input<T>(match_fn: impl Fn(Event) -> Option<T>) -> Result<T, QuizdeckError> {
    loop {
        if event::poll(Duration::MAX).map_err(UiError::IoError)? {
            let event = event::read().map_err(UiError::IoError)?;
            if let Some(value) = match_fn(event) {
                return Ok(value);
            }
        }
    }
}
