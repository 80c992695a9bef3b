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

use std::path::PathBuf;

use clap::Parser;

use crate::Mode;

#[derive(Parser, Debug)]
#[command(name = "quizdeck", version = env!("CARGO_PKG_VERSION"))]
pub struct QuizdeckCli {
    #[arg(short = 'n', long = "name", default_value = "Player", value_name = "NAME", help = "Your name, shown while playing")]
    pub name: String,
    #[arg(short = 'm', long = "mode", default_value_t = Mode::Quiz, value_name = "MODE", help = "Program mode", long_help = MODE_HELP)]
    pub mode: Mode,
    #[arg(short = 'c', long = "count", value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..), help = "Number of questions or cards.", long_help = COUNT_HELP)]
    pub count: Option<u32>,
    #[arg(short = 't', long = "topic", value_name = "TOPIC", help = "Only use questions from this topic.", long_help = TOPIC_HELP)]
    pub topic: Option<String>,
    #[arg(long = "questions", value_name = "PATH", help = "Quiz question JSON file to use instead of the built-in pool")]
    pub questions: Option<PathBuf>,
    #[arg(long = "flashcards", value_name = "PATH", help = "Flashcard JSON file to use instead of the built-in pool")]
    pub flashcards: Option<PathBuf>,
    #[arg(long = "score-file", value_name = "PATH", help = "Where the best score is kept", long_help = SCORE_FILE_HELP)]
    pub score_file: Option<PathBuf>,
    #[arg(long = "log-file", value_name = "PATH", help = "Where logs are written", long_help = LOG_FILE_HELP)]
    pub log_file: Option<PathBuf>,
}

const MODE_HELP: &str = r#"Program mode. Possible values:
    quiz    - Multiple choice questions with a running score
    flash   - Premade flashcards
    ai      - Flashcards generated for --topic (requires OPENAI_API_KEY)"#;
const COUNT_HELP: &str = r#"Number of questions or cards.
quiz: length of the quiz. If omitted, questions keep coming until you quit, and no best score is recorded.
flash: number of cards to study, defaults to 20.
ai: number of cards to generate, defaults to 10."#;
const TOPIC_HELP: &str = r#"Only use questions from this topic. In ai mode this is the subject sent to the generator and is required.
Example Usage: quizdeck -m flash -t "data structures""#;
const SCORE_FILE_HELP: &str = r#"Where the best score is kept. Defaults to ~/.config/quizdeck/best_score.json"#;
const LOG_FILE_HELP: &str = r#"Where logs are written. Defaults to ~/.config/quizdeck/quizdeck.log. Filter with RUST_LOG."#;
