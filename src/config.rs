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

//! Widget configuration.
//!
//! One `WidgetConfig` captures every variation of the widget (title, entry
//! animation, suggestion lists, seed messages, feature toggles) plus the
//! embedding options a host passes at initialization. It is read from a JSON
//! file and then overridden by command-line flags.

use crate::Cli;
use crate::app::{MessageRole, ToolInvocation};
use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_DIR_NAME: &str = "chat-widget";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// How a freshly appended bubble enters the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntryAnimation {
    None,
    Slide,
    #[default]
    Scale,
    Fade,
}

/// Identity of the person using the widget, as provided by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserIdentity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Options a host page hands to the embedding entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    /// Base URL of the chat backend. Kept for hosts that pass it; the
    /// simulated responder never contacts it.
    pub api_base_url: Option<String>,
    pub chatbot_url: Option<String>,
    pub user: UserIdentity,
}

/// A message the transcript starts with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub tool_invocations: Option<Vec<ToolInvocation>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub title: String,
    pub placeholder: String,
    pub animation: EntryAnimation,
    pub reply_delay_ms: u64,
    /// Attached to every simulated reply.
    pub follow_up_suggestions: Vec<String>,
    /// Offered while the transcript is empty.
    pub prompt_suggestions: Vec<String>,
    pub initial_messages: Vec<SeedMessage>,
    pub allow_attachments: bool,
    pub enable_interrupt: bool,
    pub submit_on_enter: bool,
    pub show_timestamps: bool,
    pub start_open: bool,
    /// Upper bound for the composer height, in rows.
    pub max_input_height: u16,
    /// Distance from the bottom (rows) under which scrolling re-attaches.
    pub scroll_activation_rows: usize,
    pub embed: EmbedOptions,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Chat Support".to_owned(),
            placeholder: "Ask AI...".to_owned(),
            animation: EntryAnimation::default(),
            reply_delay_ms: 1000,
            follow_up_suggestions: vec![
                "Tell me more.".to_owned(),
                "Can you summarize?".to_owned(),
                "Give me an example.".to_owned(),
            ],
            prompt_suggestions: vec![
                "What can you help me with?".to_owned(),
                "Show me a code example.".to_owned(),
                "How do attachments work?".to_owned(),
            ],
            initial_messages: default_seed_messages(),
            allow_attachments: true,
            enable_interrupt: true,
            submit_on_enter: true,
            show_timestamps: true,
            start_open: false,
            max_input_height: 10,
            scroll_activation_rows: 2,
            embed: EmbedOptions::default(),
        }
    }
}

fn default_seed_messages() -> Vec<SeedMessage> {
    vec![
        SeedMessage {
            role: MessageRole::Assistant,
            content: "Hello! How can I assist you today?".to_owned(),
            tool_invocations: None,
        },
        SeedMessage {
            role: MessageRole::Assistant,
            content: "```tsx\nconsole.log(\"Hello World\")\n```".to_owned(),
            tool_invocations: None,
        },
    ]
}

impl WidgetConfig {
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Parse a configuration document. Missing fields take their defaults.
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|e| AppError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the configuration for `cli`.
    ///
    /// An explicit `--config` path must exist. Without one, the default path
    /// under the user's config directory is tried and silently skipped when
    /// absent.
    pub fn load(cli: &Cli) -> Result<Self, AppError> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::read(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::read(&path)?,
                _ => {
                    tracing::debug!("no configuration file, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_cli(cli);
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ConfigNotFound(path.to_path_buf())
            } else {
                AppError::ConfigUnreadable(path.to_path_buf())
            }
        })?;
        let config = Self::from_json(path, &raw)?;
        tracing::info!(path = %path.display(), "loaded widget configuration");
        Ok(config)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(title) = &cli.title {
            self.title.clone_from(title);
        }
        if let Some(animation) = cli.animation {
            self.animation = animation;
        }
        if let Some(delay) = cli.reply_delay_ms {
            self.reply_delay_ms = delay;
        }
        if cli.no_attachments {
            self.allow_attachments = false;
        }
        if cli.no_interrupt {
            self.enable_interrupt = false;
        }
        if cli.open {
            self.start_open = true;
        }
    }
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
