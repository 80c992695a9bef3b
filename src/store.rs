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

use std::{borrow::Cow, fmt::Display, path::PathBuf};

use log::debug;
use thiserror::Error;

use crate::{
    question::{Flashcard, PoolItem, QuestionError, QuizQuestion},
    rotation::RotationPool,
};

const QUIZ_QUESTIONS_JSON: &str = include_str!("../data/quiz_questions.json");
const FLASHCARDS_JSON: &str = include_str!("../data/flashcards.json");

///Where a pool's JSON comes from. The built-in pools are compiled into the
///binary, but either can be swapped for a file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolSource {
    Embedded {
        name: &'static str,
        json: &'static str,
    },
    File(PathBuf),
}

impl PoolSource {
    pub fn embedded_quiz_questions() -> Self {
        Self::Embedded {
            name: "quiz_questions.json",
            json: QUIZ_QUESTIONS_JSON,
        }
    }

    pub fn embedded_flashcards() -> Self {
        Self::Embedded {
            name: "flashcards.json",
            json: FLASHCARDS_JSON,
        }
    }

    fn read(&self) -> Result<Cow<'static, str>, StoreError> {
        match self {
            Self::Embedded { json, .. } => Ok(Cow::Borrowed(*json)),
            Self::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|err| StoreError::Io(path.clone(), err)),
        }
    }
}

impl Display for PoolSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded { name, .. } => f.write_fmt(format_args!("built-in {name}")),
            Self::File(path) => f.write_str(path.to_str().unwrap_or("unknown")),
        }
    }
}

impl From<PathBuf> for PoolSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IoError: {1}, path: {path}", path = .0.to_str().unwrap_or("unknown"))]
    Io(PathBuf, #[source] std::io::Error),
    #[error("SerdeError: {1}, source: {0}")]
    Serde(String, #[source] serde_json::Error),
    #[error("InvalidItem: {0} contains an invalid entry: {1}")]
    InvalidItem(String, #[source] QuestionError),
}

///Reads, parses and validates every item of a pool.
pub fn load_pool<T: PoolItem>(source: &PoolSource) -> Result<Vec<T>, StoreError> {
    let json = source.read()?;
    let raw: Vec<T> =
        serde_json::from_str(&json).map_err(|err| StoreError::Serde(source.to_string(), err))?;

    let items = raw
        .into_iter()
        .map(PoolItem::validate)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| StoreError::InvalidItem(source.to_string(), err))?;

    T::validate_pool(&items).map_err(|err| StoreError::InvalidItem(source.to_string(), err))?;

    debug!("Loaded {} items from {source}", items.len());

    Ok(items)
}

///Knows where the quiz question and flashcard pools live and hands out
///rotation pools over them.
#[derive(Clone, Debug)]
pub struct QuestionStore {
    quiz_questions: PoolSource,
    flashcards: PoolSource,
}

impl QuestionStore {
    pub fn new(quiz_questions: impl Into<PoolSource>, flashcards: impl Into<PoolSource>) -> Self {
        Self {
            quiz_questions: quiz_questions.into(),
            flashcards: flashcards.into(),
        }
    }

    ///Built-in pools, optionally overridden by files.
    pub fn with_overrides(quiz_questions: Option<PathBuf>, flashcards: Option<PathBuf>) -> Self {
        Self::new(
            quiz_questions
                .map(PoolSource::File)
                .unwrap_or_else(PoolSource::embedded_quiz_questions),
            flashcards
                .map(PoolSource::File)
                .unwrap_or_else(PoolSource::embedded_flashcards),
        )
    }

    pub fn quiz_questions_source(&self) -> &PoolSource {
        &self.quiz_questions
    }

    pub fn flashcards_source(&self) -> &PoolSource {
        &self.flashcards
    }

    pub fn load_quiz_questions(&self) -> Result<Vec<QuizQuestion>, StoreError> {
        load_pool(&self.quiz_questions)
    }

    pub fn load_flashcards(&self) -> Result<Vec<Flashcard>, StoreError> {
        load_pool(&self.flashcards)
    }

    ///The pool is read lazily, on its first draw.
    pub fn quiz_pool(&self) -> RotationPool<QuizQuestion> {
        RotationPool::new(self.quiz_questions.clone())
    }

    pub fn flashcard_pool(&self) -> RotationPool<Flashcard> {
        RotationPool::new(self.flashcards.clone())
    }
}

impl Default for QuestionStore {
    fn default() -> Self {
        Self::with_overrides(None, None)
    }
}

#[cfg(test)]
mod tests {
    use crate::question::{QuestionError, Topical};

    use super::*;

    fn file(path: &str) -> PoolSource {
        PoolSource::File(path.into())
    }

    #[test]
    fn load_embedded_pools() {
        let store = QuestionStore::default();

        let questions = store
            .load_quiz_questions()
            .expect("Unable to load built-in quiz questions");
        assert!(questions.len() >= 10);
        assert!(questions.iter().all(|q| q.options.len() == 4));

        let flashcards = store
            .load_flashcards()
            .expect("Unable to load built-in flashcards");
        assert!(flashcards.len() >= 10);
        assert!(flashcards.iter().all(|card| card.topic().is_some()));
    }

    #[test]
    fn load_quiz_questions_from_file() {
        let questions = load_pool::<QuizQuestion>(&file("./tests/quiz_questions.json"))
            .expect("Unable to load quiz questions from file");
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].explanation, None);
        assert!(questions[1].explanation.is_some());
    }

    #[test]
    fn load_flashcards_from_file() {
        let cards = load_pool::<Flashcard>(&file("./tests/flashcards.json"))
            .expect("Unable to load flashcards from file");
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().any(|card| card.topic.is_none()));
    }

    #[test]
    fn load_missing_file() {
        assert!(load_pool::<Flashcard>(&file("./tests/does_not_exist.json"))
            .is_err_and(|err| matches!(err, StoreError::Io(_, _))));
    }

    #[test]
    fn load_malformed_file() {
        assert!(load_pool::<QuizQuestion>(&file("./tests/malformed.json"))
            .is_err_and(|err| matches!(err, StoreError::Serde(_, _))));
    }

    #[test]
    fn load_missing_required_field() {
        assert!(
            load_pool::<QuizQuestion>(&file("./tests/quiz_missing_correct.json"))
                .is_err_and(|err| matches!(err, StoreError::Serde(_, _)))
        );
    }

    #[test]
    fn load_wrong_option_count() {
        assert!(
            load_pool::<QuizQuestion>(&file("./tests/quiz_wrong_option_count.json")).is_err_and(
                |err| matches!(
                    err,
                    StoreError::InvalidItem(_, QuestionError::OptionCount(_, 3))
                )
            )
        );
    }

    #[test]
    fn load_invalid_answer_key() {
        assert!(
            load_pool::<QuizQuestion>(&file("./tests/quiz_bad_answer_key.json")).is_err_and(
                |err| matches!(
                    err,
                    StoreError::InvalidItem(_, QuestionError::InvalidAnswerKey(_, _))
                )
            )
        );
    }

    #[test]
    fn load_duplicate_ids() {
        assert!(
            load_pool::<QuizQuestion>(&file("./tests/quiz_duplicate_id.json")).is_err_and(
                |err| matches!(err, StoreError::InvalidItem(_, QuestionError::DuplicateId(2)))
            )
        );
    }

    #[test]
    fn load_blank_flashcard() {
        assert!(
            load_pool::<Flashcard>(&file("./tests/flashcards_blank_question.json")).is_err_and(
                |err| matches!(err, StoreError::InvalidItem(_, QuestionError::EmptyQuestion(_)))
            )
        );
    }

    #[test]
    fn overrides_replace_only_given_pool() {
        let store = QuestionStore::with_overrides(Some("./tests/quiz_questions.json".into()), None);
        assert_eq!(
            store.quiz_questions_source(),
            &file("./tests/quiz_questions.json")
        );
        assert_eq!(
            store.flashcards_source(),
            &PoolSource::embedded_flashcards()
        );
    }

    #[test]
    fn missing_file_error_names_path() {
        let err = load_pool::<Flashcard>(&file("./tests/does_not_exist.json"))
            .expect_err("File should not exist");
        assert!(err.to_string().starts_with("IoError: "));
        assert!(err.to_string().ends_with(", path: ./tests/does_not_exist.json"));
    }
}
