// chat-widget - A floating chat widget for the terminal
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Configuration file could not be read: {}", .0.display())]
    ConfigUnreadable(PathBuf),
    #[error("Configuration file is invalid: {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },
    #[error("Terminal is not available")]
    TerminalUnavailable,
}

impl AppError {
    pub const CONFIG_NOT_FOUND_EXIT_CODE: i32 = 20;
    pub const CONFIG_UNREADABLE_EXIT_CODE: i32 = 21;
    pub const CONFIG_INVALID_EXIT_CODE: i32 = 22;
    pub const TERMINAL_UNAVAILABLE_EXIT_CODE: i32 = 23;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound(_) => Self::CONFIG_NOT_FOUND_EXIT_CODE,
            Self::ConfigUnreadable(_) => Self::CONFIG_UNREADABLE_EXIT_CODE,
            Self::ConfigInvalid { .. } => Self::CONFIG_INVALID_EXIT_CODE,
            Self::TerminalUnavailable => Self::TERMINAL_UNAVAILABLE_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigNotFound(path) => {
                format!("No configuration file at {}. Check the --config path.", path.display())
            }
            Self::ConfigUnreadable(path) => {
                format!("Could not read {}. Check file permissions.", path.display())
            }
            Self::ConfigInvalid { path, reason } => {
                format!("{} is not a valid widget configuration: {reason}", path.display())
            }
            Self::TerminalUnavailable => {
                "This widget needs an interactive terminal (stdin and stdout must be a TTY)."
                    .to_owned()
            }
        }
    }
}
