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

use std::{fs::OpenOptions, path::PathBuf};

use env_logger::{Builder, Env, Target, WriteStyle};
use thiserror::Error;

use crate::user_config_path;

const LOG_FILE_NAME: &str = "quizdeck.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unable to find user home directory")]
    NoHomeDir,
    #[error("IoError: {1}, path: {path}", path = .0.to_str().unwrap_or("unknown"))]
    Io(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

///Sends log output to a file. The terminal belongs to the UI while a mode
///runs, so nothing may be written to stdout/stderr.
pub(crate) fn init(path: Option<PathBuf>) -> Result<PathBuf, LoggingError> {
    let path = path
        .or_else(|| user_config_path(LOG_FILE_NAME))
        .ok_or(LoggingError::NoHomeDir)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|err| LoggingError::Io(path.clone(), err))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| LoggingError::Io(path.clone(), err))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .try_init()?;

    Ok(path)
}
