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

use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

///Letters used to label the options of a [QuizQuestion], in order.
pub const OPTION_LETTERS: &str = "abcd";

///Every quiz question has exactly this many options.
pub const OPTION_COUNT: usize = 4;

pub fn letter_for(index: usize) -> Option<char> {
    OPTION_LETTERS.chars().nth(index)
}

pub fn index_for(letter: char) -> Option<usize> {
    OPTION_LETTERS.find(letter.to_ascii_lowercase())
}

///Items that can be filtered by topic inside a rotation pool.
pub trait Topical {
    fn topic(&self) -> Option<&str>;

    fn has_topic(&self, topic: &str) -> bool {
        self.topic().is_some_and(|own| own == topic)
    }
}

///Items loaded from static pool data. Validation runs once, right after
///deserialization, so the rest of the crate can rely on the invariants.
pub trait PoolItem: Topical + DeserializeOwned + Sized {
    fn validate(self) -> Result<Self, QuestionError>;

    ///Short human readable label used in error messages.
    fn label(&self) -> String;

    ///Checks that only make sense across the whole pool.
    fn validate_pool(_items: &[Self]) -> Result<(), QuestionError> {
        Ok(())
    }
}

///A multiple choice question. Loaded from the quiz pool and never mutated
///afterwards.
///
///Example:
///```
///# use quizdeck::question::QuizQuestion;
///let json = r#"{
///  "id": 1,
///  "topic": "basics",
///  "question": "Which keyword defines a function?",
///  "options": ["def", "fun", "fn", "function"],
///  "correct": "a"
///}"#;
///let question: QuizQuestion = serde_json::from_str(json).unwrap();
///assert!(question.is_correct("A."));
///assert!(!question.is_correct("b"));
///```
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct QuizQuestion {
    pub id: u32,
    pub topic: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    ///Whether `selected` picks the correct option.
    ///
    ///`selected` may be a bare letter (`"a"`), a decorated letter (`"A."`,
    ///`"b)"`) or a letter followed by option text (`"a - print()"`). Matching
    ///is a plain prefix test on the lowercased, trimmed input: the text after
    ///the letter is never compared with the option, so `"azzz"` counts as
    ///`"a"`. Callers that need a strict check should pass the bare letter.
    pub fn is_correct(&self, selected: &str) -> bool {
        let correct = self.correct.to_lowercase();
        let choice = selected.trim().to_lowercase();

        choice == correct || choice.starts_with(&correct)
    }

    pub fn correct_letter(&self) -> char {
        self.correct
            .chars()
            .next()
            .map(|letter| letter.to_ascii_lowercase())
            .unwrap_or('?')
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.correct.chars().next().and_then(index_for)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.correct_index()
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }
}

impl Topical for QuizQuestion {
    fn topic(&self) -> Option<&str> {
        Some(&self.topic)
    }
}

impl PoolItem for QuizQuestion {
    fn validate(self) -> Result<Self, QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion(self.label()));
        }

        if self.options.len() != OPTION_COUNT {
            let count = self.options.len();
            return Err(QuestionError::OptionCount(self.label(), count));
        }

        let mut letters = self.correct.chars();
        match (letters.next(), letters.next()) {
            (Some(letter), None) if index_for(letter).is_some() => Ok(self),
            _ => {
                let correct = self.correct.clone();
                Err(QuestionError::InvalidAnswerKey(self.label(), correct))
            }
        }
    }

    fn label(&self) -> String {
        format!("#{} \"{}\"", self.id, self.question)
    }

    fn validate_pool(items: &[Self]) -> Result<(), QuestionError> {
        let mut seen = hashbrown::HashSet::with_capacity(items.len());

        match items.iter().find(|item| !seen.insert(item.id)) {
            Some(duplicate) => Err(QuestionError::DuplicateId(duplicate.id)),
            None => Ok(()),
        }
    }
}

impl Display for QuizQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "QuizQuestion(id={}, topic=\"{}\", question=\"{}\")",
            self.id, self.topic, self.question
        ))
    }
}

///A plain question/answer pair.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Flashcard {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Flashcard {
    ///Builds a card, refusing a blank question.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        topic: Option<String>,
    ) -> Result<Self, QuestionError> {
        Self {
            question: question.into(),
            answer: answer.into(),
            topic,
        }
        .validate()
    }
}

impl Topical for Flashcard {
    fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

impl PoolItem for Flashcard {
    fn validate(self) -> Result<Self, QuestionError> {
        if self.question.trim().is_empty() {
            Err(QuestionError::EmptyQuestion(self.label()))
        } else {
            Ok(self)
        }
    }

    fn label(&self) -> String {
        format!("\"{}\"", self.question)
    }
}

#[derive(Error, Debug)]
pub enum QuestionError {
    #[error("Question {0} is blank")]
    EmptyQuestion(String),
    #[error("Question {0} has {1} options, needs exactly {count}", count = OPTION_COUNT)]
    OptionCount(String, usize),
    #[error("Question {0} has answer key \"{1}\", expected one of {letters}", letters = OPTION_LETTERS)]
    InvalidAnswerKey(String, String),
    #[error("Question id {0} is used more than once")]
    DuplicateId(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: 1,
            topic: "basics".to_owned(),
            question: "Pick one".to_owned(),
            options: vec![
                "first".to_owned(),
                "second".to_owned(),
                "third".to_owned(),
                "fourth".to_owned(),
            ],
            correct: correct.to_owned(),
            explanation: None,
        }
    }

    #[test]
    fn is_correct_accepts_letter_forms() {
        let q = question("b");
        assert!(q.is_correct("b"));
        assert!(q.is_correct("B."));
        assert!(q.is_correct(" b) "));
        assert!(q.is_correct("b - second"));
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn is_correct_is_a_plain_prefix_match() {
        let q = question("b");
        assert!(q.is_correct("bz"));
        assert!(!q.is_correct("ab"));
    }

    #[test]
    fn is_correct_ignores_answer_key_case() {
        let q = question("C");
        assert!(q.is_correct("c"));
        assert!(q.is_correct("C)"));
        assert_eq!(q.correct_letter(), 'c');
        assert_eq!(q.correct_option(), Some("third"));
    }

    #[test]
    fn letters_and_indices() {
        assert_eq!(letter_for(0), Some('a'));
        assert_eq!(letter_for(3), Some('d'));
        assert_eq!(letter_for(4), None);
        assert_eq!(index_for('D'), Some(3));
        assert_eq!(index_for('e'), None);
    }

    #[test]
    fn validate_option_count() {
        let mut q = question("a");
        q.options.pop();
        assert!(matches!(q.validate(), Err(QuestionError::OptionCount(_, 3))));
    }

    #[test]
    fn validate_answer_key() {
        assert!(question("A").validate().is_ok());
        assert!(matches!(
            question("e").validate(),
            Err(QuestionError::InvalidAnswerKey(_, _))
        ));
        assert!(matches!(
            question("ab").validate(),
            Err(QuestionError::InvalidAnswerKey(_, _))
        ));
        assert!(matches!(
            question("").validate(),
            Err(QuestionError::InvalidAnswerKey(_, _))
        ));
        assert!(matches!(
            question(" a").validate(),
            Err(QuestionError::InvalidAnswerKey(_, _))
        ));
    }

    #[test]
    fn flashcard_requires_question() {
        assert!(Flashcard::new("What is a tuple?", "", None).is_ok());
        assert!(matches!(
            Flashcard::new("   ", "answer", None),
            Err(QuestionError::EmptyQuestion(_))
        ));
    }

    #[test]
    fn deserialize_flashcard_defaults() {
        let card: Flashcard =
            serde_json::from_str(r#"{"question": "What is PEP 8?"}"#).expect("Unable to parse");
        assert_eq!(card.answer, "");
        assert_eq!(card.topic, None);
        assert!(!card.has_topic("style"));
    }

    #[test]
    fn error_messages_name_limits() {
        assert_eq!(
            QuestionError::OptionCount("#3".to_owned(), 3).to_string(),
            "Question #3 has 3 options, needs exactly 4"
        );
        assert_eq!(
            QuestionError::InvalidAnswerKey("#3".to_owned(), "e".to_owned()).to_string(),
            "Question #3 has answer key \"e\", expected one of abcd"
        );
    }
}
