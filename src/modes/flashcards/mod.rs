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

use std::{ops::Deref, rc::Rc};

use crossterm::event::{Event, KeyCode};
use log::debug;
use widget::FlashcardWidget;

use crate::{
    event::{clear_and_match_event, is_quit, key_press},
    question::Flashcard,
    terminal::TerminalWrapper,
    QuizdeckError, Review,
};

mod widget;

///What happens when stepping past either end of the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    ///Premade cards: the last card leads back to the first.
    Wrapping,
    ///Generated cards: moving past the last card ends the review, and the
    ///first card has no previous.
    Linear,
}

enum Action {
    Prev,
    Next,
    Quit,
}

struct CardIndex {
    len: usize,
    index: usize,
    navigation: Navigation,
}

impl CardIndex {
    fn new(len: usize, navigation: Navigation) -> Self {
        assert!(len > 0, "Cannot index an empty deck");

        Self {
            len,
            index: 0,
            navigation,
        }
    }

    fn max_index(&self) -> usize {
        self.len - 1
    }

    ///Returns false when there is no next card.
    fn increment(&mut self) -> bool {
        if self.index < self.max_index() {
            self.index += 1;
            true
        } else {
            match self.navigation {
                Navigation::Wrapping => {
                    self.index = 0;
                    true
                }
                Navigation::Linear => false,
            }
        }
    }

    fn decrement(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        } else if self.navigation == Navigation::Wrapping {
            self.index = self.max_index();
        }
    }
}

impl Deref for CardIndex {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

pub fn show_flashcards(
    term: &mut TerminalWrapper,
    cards: &[Rc<Flashcard>],
    navigation: Navigation,
) -> Result<Review, QuizdeckError> {
    if cards.is_empty() {
        return Ok(Review {
            reviewed: 0,
            total: 0,
        });
    }

    let mut index = CardIndex::new(cards.len(), navigation);
    let mut seen = vec![false; cards.len()];

    loop {
        seen[*index] = true;

        let action = show_flashcard(term, &cards[*index], *index, cards.len())?;

        match action {
            Action::Prev => index.decrement(),
            Action::Next => {
                if !index.increment() {
                    break;
                }
            }
            Action::Quit => break,
        };
    }

    let reviewed = seen.iter().filter(|seen| **seen).count();
    debug!("Reviewed {reviewed} of {} flashcards", cards.len());

    Ok(Review {
        reviewed,
        total: cards.len(),
    })
}

fn show_flashcard(
    term: &mut TerminalWrapper,
    card: &Flashcard,
    index: usize,
    total: usize,
) -> Result<Action, QuizdeckError> {
    let mut flipped = false;

    loop {
        term.render_widget(FlashcardWidget::new(card, flipped, (index + 1, total)))?;

        let input = clear_and_match_event(match_user_input)?;

        match input {
            UserInput::Flip => flipped = !flipped,
            UserInput::NextCard => return Ok(Action::Next),
            UserInput::PrevCard => return Ok(Action::Prev),
            UserInput::Quit => return Ok(Action::Quit),
            UserInput::Resize => continue,
        };
    }
}

#[derive(Debug, PartialEq, Eq)]
enum UserInput {
    Flip,
    NextCard,
    PrevCard,
    Resize,
    Quit,
}

fn match_user_input(event: Event) -> Option<UserInput> {
    if let Event::Resize(_, _) = event {
        return Some(UserInput::Resize);
    }

    let key = key_press(event)?;
    if is_quit(&key) {
        return Some(UserInput::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') | KeyCode::Char('p') => {
            Some(UserInput::PrevCard)
        }
        KeyCode::Down
        | KeyCode::Enter
        | KeyCode::Char('j')
        | KeyCode::Char('s')
        | KeyCode::Char('n') => Some(UserInput::NextCard),
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char(' ')
        | KeyCode::Char('h')
        | KeyCode::Char('l')
        | KeyCode::Char('f') => Some(UserInput::Flip),
        _ => None,
    }
}
