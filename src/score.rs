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

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{user_config_path, BestScore};

const BEST_SCORE_FILE_NAME: &str = "best_score.json";

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Unable to find user home directory")]
    NoHomeDir,
    #[error("IoError: {1}, path: {path}", path = .0.to_str().unwrap_or("unknown"))]
    Io(PathBuf, #[source] std::io::Error),
    #[error("SerdeError: {1}, path: {path}", path = .0.to_str().unwrap_or("unknown"))]
    Serde(PathBuf, #[source] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

///Persists the single best quiz score.
#[derive(Clone, Debug)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_user_home() -> Result<Self, ScoreError> {
        user_config_path(BEST_SCORE_FILE_NAME)
            .map(Self::at)
            .ok_or(ScoreError::NoHomeDir)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    ///The stored best score. A missing, unreadable or corrupt record counts
    ///as no record at all.
    pub fn load(&self) -> u32 {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(err) => {
                warn!("Unable to read best score from {:?}: {err}", self.path);
                return 0;
            }
        };

        match serde_json::from_str::<BestScoreRecord>(&json) {
            Ok(record) => record.best_score,
            Err(err) => {
                warn!("Ignoring corrupt best score record {:?}: {err}", self.path);
                0
            }
        }
    }

    ///Overwrites the stored best score, whatever it was.
    pub fn save(&self, score: u32) -> Result<(), ScoreError> {
        let path = &self.path;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| ScoreError::Io(path.clone(), err))?;
            }
        }

        std::fs::write(
            path,
            serde_json::to_string_pretty(&BestScoreRecord { best_score: score })
                .map_err(|err| ScoreError::Serde(path.clone(), err))?,
        )
        .map_err(|err| ScoreError::Io(path.clone(), err))?;

        Ok(())
    }

    ///Saves `score` only if it beats the stored one. Returns the best score
    ///after recording.
    pub fn record(&self, score: u32) -> Result<BestScore, ScoreError> {
        let best = self.load();

        if score > best {
            self.save(score)?;
            info!("New best score {score} (was {best})");
            Ok(BestScore {
                score,
                new_best: true,
            })
        } else {
            Ok(BestScore {
                score: best,
                new_best: false,
            })
        }
    }
}
