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
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    time::Duration,
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::question::Flashcard;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const API_KEY_VAR: &str = "OPENAI_API_KEY";
const MODEL_VAR: &str = "QUIZDECK_OPENAI_MODEL";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = r#"You are a helpful programming tutor.
Write flashcards using exactly this format for every card:
- question: <text>
answer: <text>"#;

const QUESTION_MARKER: &str = "- question:";
const ANSWER_PREFIX: &str = "answer:";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service answered {0}: {1}")]
    Status(u16, String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("A generation request is already running")]
    AlreadyPending,
    #[error("Unable to start generation worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Generation worker stopped without a result")]
    WorkerDisconnected,
}

///Anything that can produce a set of flashcards for a topic.
pub trait FlashcardSource: Send + Sync {
    fn generate(&self, topic: &str, count: usize) -> Result<Vec<Flashcard>, GenerationError>;
}

///Pulls flashcards out of free-form model output.
///
///Cards are introduced by a `- question:` marker. Within a card, the first
///non-empty line after the marker is the question and the first line starting
///with `answer:` (optionally preceded by `-`) is the answer. Cards missing
///either line, or with a blank question, are skipped. Text before the first
///marker is ignored.
pub fn parse_flashcards(text: &str, topic: Option<&str>) -> Vec<Flashcard> {
    text.split(QUESTION_MARKER)
        .skip(1)
        .filter_map(|block| parse_block(block, topic))
        .collect()
}

fn strip_answer_prefix(line: &str) -> Option<&str> {
    let line = line.trim_start_matches('-').trim_start();

    line.get(..ANSWER_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(ANSWER_PREFIX))
        .map(|_| line[ANSWER_PREFIX.len()..].trim())
}

fn parse_block(block: &str, topic: Option<&str>) -> Option<Flashcard> {
    let mut lines = block.lines().map(str::trim);

    let question = lines.by_ref().find(|line| !line.is_empty())?;
    if strip_answer_prefix(question).is_some() {
        return None;
    }

    let answer = lines.find_map(strip_answer_prefix)?;

    Flashcard::new(question, answer, topic.map(str::to_owned)).ok()
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

///Chat-completions backed source. Blocking, so run it through a
///[FlashcardGenerator] when a UI is waiting on it.
pub struct OpenAiFlashcardSource {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl OpenAiFlashcardSource {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    ///Reads the key (and optionally the model) from the environment, after
    ///loading a `.env` file if there is one.
    pub fn from_env() -> Result<Self, GenerationError> {
        if let Err(err) = dotenv::dotenv() {
            debug!("No .env file loaded: {err}");
        }

        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;
        let model = std::env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

        Self::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl FlashcardSource for OpenAiFlashcardSource {
    fn generate(&self, topic: &str, count: usize) -> Result<Vec<Flashcard>, GenerationError> {
        let prompt = format!("Generate {count} flashcards about: {topic}");
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        info!("Requesting {count} flashcards about \"{topic}\" from {}", self.model);

        let response = self
            .client
            .post(OPENAI_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16(), body));
        }

        let cards = cards_from_completion(&body, topic)?;
        if cards.is_empty() {
            warn!("Response for \"{topic}\" contained no flashcards");
        }

        Ok(cards)
    }
}

fn cards_from_completion(body: &str, topic: &str) -> Result<Vec<Flashcard>, GenerationError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;

    let text = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no choices returned".to_owned()))?
        .message
        .content
        .unwrap_or_default();

    Ok(parse_flashcards(&text, Some(topic)))
}

pub type GenerationResult = Result<Vec<Flashcard>, GenerationError>;

///Runs a [FlashcardSource] on a worker thread so the caller's loop keeps
///running. Only one request may be in flight at a time.
pub struct FlashcardGenerator<S> {
    source: Arc<S>,
    pending: Option<Receiver<GenerationResult>>,
}

impl<S: FlashcardSource + 'static> FlashcardGenerator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request(&mut self, topic: &str, count: usize) -> Result<(), GenerationError> {
        if self.is_pending() {
            return Err(GenerationError::AlreadyPending);
        }

        let (sender, receiver) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let topic = topic.to_owned();

        std::thread::Builder::new()
            .name("flashcard-generator".to_owned())
            .spawn(move || {
                let result = source.generate(&topic, count);
                //NOTE: The receiver may already be gone if the user quit
                let _ = sender.send(result);
            })
            .map_err(GenerationError::Spawn)?;

        self.pending = Some(receiver);

        Ok(())
    }

    ///Waits up to `timeout` for the outstanding request. Returns `None` while
    ///it is still running, or when nothing was requested.
    pub fn poll(&mut self, timeout: Duration) -> Option<GenerationResult> {
        let receiver = self.pending.as_ref()?;

        let result = match receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(GenerationError::WorkerDisconnected),
        };

        self.pending = None;
        Some(result)
    }
}
