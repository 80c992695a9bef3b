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

use std::{fmt::Display, rc::Rc};

use log::{debug, info};
use rand::{rngs::ThreadRng, Rng};
use thiserror::Error;

use crate::{
    question::{letter_for, QuizQuestion, OPTION_COUNT},
    rotation::{PoolError, RotationPool},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    AwaitingQuestion,
    QuestionShown,
    AnswerSubmitted,
    Finished,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AwaitingQuestion => "awaiting a question",
            Self::QuestionShown => "a question is shown",
            Self::AnswerSubmitted => "an answer was submitted",
            Self::Finished => "finished",
        })
    }
}

///Messages the UI sends to a session instead of mutating it directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Submit(usize),
    Advance,
    ///Plays again after the session finished.
    Restart,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.correct as f64 / self.total as f64) * 100.0
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.correct, self.total))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    ///The caller is expected to advance on its own after a short pause.
    Correct { selected: usize },
    ///The caller waits for the user before advancing.
    Wrong {
        selected: usize,
        correct_letter: char,
        explanation: Option<String>,
    },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    pub fn selected(&self) -> usize {
        match self {
            Self::Correct { selected } | Self::Wrong { selected, .. } => *selected,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Question(Rc<QuizQuestion>),
    Answered(Feedback),
    Finished(Score),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("InvalidState: cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("InvalidInput: option index {0} is out of range, expected 0..{count}", count = OPTION_COUNT)]
    InvalidInput(usize),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    ///Only draw questions with this topic.
    pub topic: Option<String>,
    ///Number of questions before the session finishes. `None` keeps cycling
    ///through the pool until the user leaves.
    pub length: Option<u32>,
}

///One play-through of the quiz. Owns its rotation pool, so every session
///starts with a fresh no-repeat cycle.
pub struct QuizSession<R = ThreadRng> {
    pool: RotationPool<QuizQuestion, R>,
    config: SessionConfig,
    score: Score,
    current: Option<Rc<QuizQuestion>>,
    question_index: u32,
    state: SessionState,
}

impl<R: Rng> QuizSession<R> {
    pub fn new(pool: RotationPool<QuizQuestion, R>, config: SessionConfig) -> Self {
        Self {
            pool,
            config,
            score: Score::default(),
            current: None,
            question_index: 0,
            state: SessionState::AwaitingQuestion,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.current.as_deref()
    }

    ///1-based number of the question being shown. Once a fixed-length
    ///session finishes it is one past the length.
    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    pub fn length(&self) -> Option<u32> {
        self.config.length
    }

    pub fn topic(&self) -> Option<&str> {
        self.config.topic.as_deref()
    }

    ///Final score, once the session is finished.
    pub fn summary(&self) -> Option<Score> {
        (self.state == SessionState::Finished).then_some(self.score)
    }

    pub fn handle(&mut self, event: SessionEvent) -> Result<Transition, SessionError> {
        match event {
            SessionEvent::Start => self.start(),
            SessionEvent::Submit(selected) => self.submit_answer(selected).map(Transition::Answered),
            SessionEvent::Advance => self.advance(),
            SessionEvent::Restart => self.restart(),
        }
    }

    pub fn start(&mut self) -> Result<Transition, SessionError> {
        self.expect_state(SessionState::AwaitingQuestion, "start")?;
        self.show_question(1)
    }

    pub fn submit_answer(&mut self, selected: usize) -> Result<Feedback, SessionError> {
        self.expect_state(SessionState::QuestionShown, "submit an answer")?;

        let letter = letter_for(selected).ok_or(SessionError::InvalidInput(selected))?;
        let question = self
            .current
            .as_ref()
            .map(Rc::clone)
            .ok_or(SessionError::InvalidState {
                operation: "submit an answer",
                state: self.state,
            })?;

        self.score.total += 1;

        let feedback = if question.is_correct(&letter.to_string()) {
            self.score.correct += 1;
            Feedback::Correct { selected }
        } else {
            Feedback::Wrong {
                selected,
                correct_letter: question.correct_letter(),
                explanation: question.explanation.clone(),
            }
        };

        debug!(
            "Question {} answered {letter}: {}, score {}",
            question.id,
            if feedback.is_correct() { "correct" } else { "wrong" },
            self.score
        );

        self.state = SessionState::AnswerSubmitted;

        Ok(feedback)
    }

    pub fn advance(&mut self) -> Result<Transition, SessionError> {
        self.expect_state(SessionState::AnswerSubmitted, "advance")?;
        self.show_question(self.question_index + 1)
    }

    ///Resets the score and shows the first question again. The pool keeps its
    ///cycle, so the new round continues with unseen questions.
    pub fn restart(&mut self) -> Result<Transition, SessionError> {
        self.expect_state(SessionState::Finished, "restart")?;

        info!("Restarting quiz after {}", self.score);
        self.score = Score::default();
        self.question_index = 0;
        self.state = SessionState::AwaitingQuestion;

        self.start()
    }

    fn show_question(&mut self, question_index: u32) -> Result<Transition, SessionError> {
        if self
            .config
            .length
            .is_some_and(|length| question_index > length)
        {
            info!("Quiz finished with {}", self.score);
            self.current = None;
            self.question_index = question_index;
            self.state = SessionState::Finished;
            return Ok(Transition::Finished(self.score));
        }

        //NOTE: Drawing first so a pool error leaves the session untouched
        let question = self.pool.next(self.config.topic.as_deref())?;

        self.current = Some(Rc::clone(&question));
        self.question_index = question_index;
        self.state = SessionState::QuestionShown;

        Ok(Transition::Question(question))
    }

    fn expect_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::{question::QuizQuestion, rotation::RotationPool};

    use super::*;

    fn question(id: u32, topic: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id,
            topic: topic.to_owned(),
            question: format!("Question {id}"),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct: correct.to_owned(),
            explanation: Some(format!("Explanation {id}")),
        }
    }

    fn session(
        questions: Vec<QuizQuestion>,
        config: SessionConfig,
        seed: u64,
    ) -> QuizSession<StdRng> {
        QuizSession::new(
            RotationPool::from_items(questions).with_rng(StdRng::seed_from_u64(seed)),
            config,
        )
    }

    fn correct_index(session: &QuizSession<StdRng>) -> usize {
        session
            .current()
            .and_then(QuizQuestion::correct_index)
            .expect("No current question")
    }

    #[test]
    fn two_question_session() {
        for seed in 0..10 {
            let mut session = session(
                vec![question(1, "basics", "b"), question(2, "basics", "a")],
                SessionConfig::default(),
                seed,
            );
            let mut seen = HashSet::new();

            assert!(matches!(session.start(), Ok(Transition::Question(_))));
            assert_eq!(session.question_index(), 1);
            seen.insert(session.current().map(|q| q.id));

            let feedback = session
                .submit_answer(correct_index(&session))
                .expect("Unable to submit");
            assert!(feedback.is_correct());

            assert!(matches!(session.advance(), Ok(Transition::Question(_))));
            assert_eq!(session.question_index(), 2);
            seen.insert(session.current().map(|q| q.id));

            session
                .submit_answer(correct_index(&session))
                .expect("Unable to submit");

            assert_eq!(seen.len(), 2);
            assert_eq!(
                session.score(),
                Score {
                    correct: 2,
                    total: 2
                }
            );
        }
    }

    #[test]
    fn wrong_answer_reports_key_and_explanation() {
        let mut session = session(
            vec![question(7, "basics", "C")],
            SessionConfig::default(),
            0,
        );
        session.start().expect("Unable to start");

        assert_eq!(
            session.submit_answer(0).expect("Unable to submit"),
            Feedback::Wrong {
                selected: 0,
                correct_letter: 'c',
                explanation: Some("Explanation 7".to_owned()),
            }
        );
        assert_eq!(session.state(), SessionState::AnswerSubmitted);
        assert_eq!(
            session.score(),
            Score {
                correct: 0,
                total: 1
            }
        );
    }

    #[test]
    fn score_is_monotonic() {
        let rng = &mut StdRng::seed_from_u64(42);
        let mut session = session(
            (1..=5)
                .map(|id| question(id, "basics", ["a", "b", "c", "d"][id as usize % 4]))
                .collect(),
            SessionConfig::default(),
            5,
        );
        session.start().expect("Unable to start");

        let mut previous = session.score();
        for _ in 0..50 {
            session
                .submit_answer(rng.gen_range(0..4))
                .expect("Unable to submit");
            let score = session.score();

            assert!(score.correct <= score.total);
            assert!(score.correct >= previous.correct);
            assert_eq!(score.total, previous.total + 1);

            previous = score;
            session.advance().expect("Unable to advance");
        }
    }

    #[test]
    fn invalid_state_is_rejected() {
        let mut session = session(
            vec![question(1, "basics", "a")],
            SessionConfig::default(),
            0,
        );

        assert!(matches!(
            session.submit_answer(0),
            Err(SessionError::InvalidState {
                state: SessionState::AwaitingQuestion,
                ..
            })
        ));
        assert!(matches!(
            session.advance(),
            Err(SessionError::InvalidState { .. })
        ));

        session.start().expect("Unable to start");
        assert!(matches!(
            session.start(),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.advance(),
            Err(SessionError::InvalidState { .. })
        ));

        session.submit_answer(0).expect("Unable to submit");
        assert!(matches!(
            session.submit_answer(0),
            Err(SessionError::InvalidState {
                state: SessionState::AnswerSubmitted,
                ..
            })
        ));
        assert_eq!(
            session.score(),
            Score {
                correct: 1,
                total: 1
            }
        );
    }

    #[test]
    fn invalid_input_leaves_counters_alone() {
        let mut session = session(
            vec![question(1, "basics", "a")],
            SessionConfig::default(),
            0,
        );
        session.start().expect("Unable to start");

        assert!(matches!(
            session.submit_answer(4),
            Err(SessionError::InvalidInput(4))
        ));
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.state(), SessionState::QuestionShown);
    }

    #[test]
    fn fixed_length_session_finishes() {
        let mut session = session(
            (1..=5).map(|id| question(id, "basics", "a")).collect(),
            SessionConfig {
                topic: None,
                length: Some(3),
            },
            1,
        );

        assert!(matches!(
            session.handle(SessionEvent::Start),
            Ok(Transition::Question(_))
        ));
        for index in 1..=3 {
            assert_eq!(session.question_index(), index);
            assert!(matches!(
                session.handle(SessionEvent::Submit(if index == 2 { 1 } else { 0 })),
                Ok(Transition::Answered(_))
            ));

            let transition = session
                .handle(SessionEvent::Advance)
                .expect("Unable to advance");
            if index < 3 {
                assert!(matches!(transition, Transition::Question(_)));
            } else {
                assert_eq!(
                    transition,
                    Transition::Finished(Score {
                        correct: 2,
                        total: 3
                    })
                );
            }
        }

        assert_eq!(session.state(), SessionState::Finished);
        assert!(session.current().is_none());
        assert_eq!(session.summary().map(|score| score.correct), Some(2));
        assert!(matches!(
            session.handle(SessionEvent::Submit(0)),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn zero_length_session_finishes_immediately() {
        let mut session = session(
            vec![question(1, "basics", "a")],
            SessionConfig {
                topic: None,
                length: Some(0),
            },
            0,
        );

        assert_eq!(
            session.start().expect("Unable to start"),
            Transition::Finished(Score::default())
        );
        assert_eq!(session.question_index(), 1);
    }

    #[test]
    fn finished_session_moves_past_length() {
        let mut session = session(
            vec![question(1, "basics", "a"), question(2, "basics", "b")],
            SessionConfig {
                topic: None,
                length: Some(1),
            },
            5,
        );

        session.start().expect("Unable to start");
        assert_eq!(session.question_index(), 1);
        session.submit_answer(0).expect("Unable to submit");

        assert!(matches!(session.advance(), Ok(Transition::Finished(_))));
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.question_index(), 2);
    }

    #[test]
    fn restart_after_finish() {
        let mut session = session(
            vec![question(1, "basics", "a"), question(2, "basics", "a")],
            SessionConfig {
                topic: None,
                length: Some(1),
            },
            2,
        );

        assert!(matches!(
            session.handle(SessionEvent::Restart),
            Err(SessionError::InvalidState {
                operation: "restart",
                state: SessionState::AwaitingQuestion,
            })
        ));

        session.start().expect("Unable to start");
        let first = session.current().map(|q| q.id);
        session.submit_answer(0).expect("Unable to submit");
        assert_eq!(
            session.advance().expect("Unable to advance"),
            Transition::Finished(Score {
                correct: 1,
                total: 1
            })
        );

        assert!(matches!(
            session.handle(SessionEvent::Restart),
            Ok(Transition::Question(_))
        ));
        assert_eq!(session.state(), SessionState::QuestionShown);
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.question_index(), 1);
        assert_ne!(session.current().map(|q| q.id), first);
        assert_eq!(session.summary(), None);
    }

    #[test]
    fn invalid_input_message() {
        assert_eq!(
            SessionError::InvalidInput(7).to_string(),
            "InvalidInput: option index 7 is out of range, expected 0..4"
        );
    }

    #[test]
    fn topic_session_only_shows_topic() {
        let mut session = session(
            vec![
                question(1, "basics", "a"),
                question(2, "oop", "a"),
                question(3, "oop", "b"),
            ],
            SessionConfig {
                topic: Some("oop".to_owned()),
                length: None,
            },
            3,
        );

        session.start().expect("Unable to start");
        for _ in 0..10 {
            assert_eq!(session.current().map(|q| q.topic.as_str()), Some("oop"));
            session.submit_answer(0).expect("Unable to submit");
            session.advance().expect("Unable to advance");
        }
    }

    #[test]
    fn unknown_topic_keeps_session_waiting() {
        let mut session = session(
            vec![question(1, "basics", "a")],
            SessionConfig {
                topic: Some("missing".to_owned()),
                length: None,
            },
            0,
        );

        assert!(matches!(
            session.start(),
            Err(SessionError::Pool(PoolError::EmptyTopic(_)))
        ));
        assert_eq!(session.state(), SessionState::AwaitingQuestion);
        assert_eq!(session.question_index(), 0);
    }

    #[test]
    fn score_percent() {
        assert_eq!(Score::default().percent(), 0.0);
        assert_eq!(
            Score {
                correct: 1,
                total: 4
            }
            .percent(),
            25.0
        );
    }
}
