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

use clap::Parser;
use log::{error, info};
use std::{fmt::Display, panic::AssertUnwindSafe, path::PathBuf, rc::Rc, str::FromStr};
use thiserror::Error;

use ai::{FlashcardGenerator, GenerationError, OpenAiFlashcardSource};
use modes::{
    ai_flashcards::ai_flashcards,
    flashcards::{show_flashcards, Navigation},
    quiz::run_quiz,
};
use question::{Flashcard, PoolItem};
use rotation::{PoolError, RotationPool};
use score::{ScoreError, ScoreStore};
use session::{QuizSession, Score, SessionConfig, SessionError};
use store::{QuestionStore, StoreError};
use terminal::TerminalWrapper;

pub mod ai;
mod cli;
mod event;
mod logging;
mod modes;
pub mod question;
mod random;
pub mod rotation;
pub mod score;
pub mod session;
pub mod store;
mod terminal;

const CONFIG_DIR: &str = ".config/quizdeck";
const DEFAULT_FLASHCARD_COUNT: u32 = 20;
const DEFAULT_AI_FLASHCARD_COUNT: u32 = 10;

///Path of `file_name` inside the per-user quizdeck directory.
pub(crate) fn user_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(file_name))
}

pub fn run() -> Result<Outcome, QuizdeckError> {
    let cli = cli::QuizdeckCli::parse();

    match logging::init(cli.log_file.clone()) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(err) => eprintln!("Logging disabled: {err}"),
    }
    info!("Starting {} mode for {}", cli.mode, cli.name);

    let store = QuestionStore::with_overrides(cli.questions.clone(), cli.flashcards.clone());
    let topic = cli.topic.as_deref();

    //NOTE: Everything that can fail on bad input happens before the terminal
    //is taken over, so the error reaches the user as plain text.
    let prepared = match cli.mode {
        Mode::Quiz => {
            let mut pool = store.quiz_pool();
            check_topic(&mut pool, topic)?;

            let scores = match cli.score_file.clone() {
                Some(path) => ScoreStore::at(path),
                None => ScoreStore::in_user_home()?,
            };
            let config = SessionConfig {
                topic: cli.topic.clone(),
                length: cli.count,
            };

            Prepared::Quiz {
                session: QuizSession::new(pool, config),
                scores,
            }
        }
        Mode::Flash => {
            let mut pool = store.flashcard_pool();
            check_topic(&mut pool, topic)?;

            Prepared::Flash(draw_flashcards(
                &mut pool,
                topic,
                cli.count.unwrap_or(DEFAULT_FLASHCARD_COUNT),
            )?)
        }
        Mode::Ai => {
            let topic = cli
                .topic
                .clone()
                .filter(|topic| !topic.trim().is_empty())
                .ok_or(ArgError::MissingTopic(Mode::Ai))?;
            let source = OpenAiFlashcardSource::from_env()?;

            Prepared::Ai {
                model: source.model().to_owned(),
                generator: FlashcardGenerator::new(source),
                topic,
                count: cli.count.unwrap_or(DEFAULT_AI_FLASHCARD_COUNT) as usize,
            }
        }
    };

    let name = cli.name;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| error!("{info}")));

    let result = std::panic::catch_unwind(AssertUnwindSafe(
        move || -> Result<Outcome, QuizdeckError> {
            //NOTE: From this point, stdout/stderr will not be usable, hence we
            //need to catch any panics, since they are not printable. Mapping to
            //QuizdeckError allows us to gracefully exit and report the panic.
            let term = &mut TerminalWrapper::new().map_err(UiError::IoError)?;

            match prepared {
                Prepared::Quiz { session, scores } => run_quiz(term, session, &name, &scores),
                Prepared::Flash(cards) => show_flashcards(term, &cards, Navigation::Wrapping)
                    .map(|review| Outcome::Flashcards { name, review }),
                Prepared::Ai {
                    mut generator,
                    model,
                    topic,
                    count,
                } => ai_flashcards(term, &mut generator, &topic, count, &model).map(|review| {
                    review.map_or(Outcome::Cancelled, |review| Outcome::Flashcards {
                        name,
                        review,
                    })
                }),
            }
        },
    ));

    std::panic::set_hook(default_hook);

    result.map_err(|err| {
        QuizdeckError::Panic({
            // Attempt to extract the panic message
            if let Some(msg) = err.downcast_ref::<String>() {
                msg.clone()
            } else if let Some(msg) = err.downcast_ref::<&str>() {
                (*msg).to_owned()
            } else {
                "Unknown panic occurred".to_owned()
            }
        })
    })?
}

///Fails early with the known topics if `topic` matches nothing in `pool`.
fn check_topic<T: PoolItem>(
    pool: &mut RotationPool<T>,
    topic: Option<&str>,
) -> Result<(), QuizdeckError> {
    match pool.load(topic) {
        Ok(_) => Ok(()),
        Err(PoolError::EmptyTopic(topic)) => {
            Err(ArgError::UnknownTopic(topic, pool.topics()?).into())
        }
        Err(err) => Err(err.into()),
    }
}

fn draw_flashcards(
    pool: &mut RotationPool<Flashcard>,
    topic: Option<&str>,
    count: u32,
) -> Result<Vec<Rc<Flashcard>>, PoolError> {
    (0..count).map(|_| pool.next(topic)).collect()
}

enum Prepared {
    Quiz {
        session: QuizSession,
        scores: ScoreStore,
    },
    Flash(Vec<Rc<Flashcard>>),
    Ai {
        generator: FlashcardGenerator<OpenAiFlashcardSource>,
        model: String,
        topic: String,
        count: usize,
    },
}

///What the user did, reported once the terminal is restored.
#[derive(Debug)]
pub enum Outcome {
    Quiz {
        name: String,
        score: Score,
        ///False if the user quit before the last question.
        finished: bool,
        ///Only present for a finished quiz of fixed length.
        best: Option<BestScore>,
    },
    Flashcards {
        name: String,
        review: Review,
    },
    ///The user left before any flashcards were generated.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BestScore {
    pub score: u32,
    pub new_best: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Review {
    pub reviewed: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Quiz,
    Flash,
    Ai,
}

impl FromStr for Mode {
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();

        if s == "quiz" {
            Ok(Self::Quiz)
        } else if s == "flash" {
            Ok(Self::Flash)
        } else if s == "ai" {
            Ok(Self::Ai)
        } else {
            Err(format!("Mode argument not recognized: {s}"))
        }
    }

    type Err = String;
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Quiz => "quiz",
            Mode::Flash => "flash",
            Mode::Ai => "ai",
        })
    }
}

#[derive(Error, Debug)]
pub enum QuizdeckError {
    #[error("Store: {0}")]
    Store(#[from] StoreError),
    #[error("Pool: {0}")]
    Pool(#[from] PoolError),
    #[error("Session: {0}")]
    Session(#[from] SessionError),
    #[error("Score: {0}")]
    Score(#[from] ScoreError),
    #[error("Generation: {0}")]
    Generation(#[from] GenerationError),
    #[error("Ui: {0}")]
    Ui(#[from] UiError),
    #[error("Arg: {0}")]
    Arg(#[from] ArgError),
    #[error("Panicked: {0}")]
    Panic(String),
}

#[derive(Error, Debug)]
pub enum UiError {
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ArgError {
    #[error("No questions found for topic \"{0}\". Available topics: {topics}", topics = .1.join(", "))]
    UnknownTopic(String, Vec<String>),
    #[error("{0} mode needs a --topic to generate flashcards for")]
    MissingTopic(Mode),
}
