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

pub mod app;
pub mod config;
pub mod embed;
pub mod error;
pub mod ui;

use clap::Parser;
use config::EntryAnimation;

#[derive(Parser, Debug)]
#[command(name = "chat-widget", about = "A floating chat widget for the terminal")]
pub struct Cli {
    /// Widget configuration file (JSON). Defaults to <config dir>/chat-widget/config.json
    #[arg(long, short = 'c')]
    pub config: Option<std::path::PathBuf>,

    /// Override the panel title
    #[arg(long)]
    pub title: Option<String>,

    /// Entry animation for new messages
    #[arg(long, value_enum)]
    pub animation: Option<EntryAnimation>,

    /// Delay before the simulated reply arrives (milliseconds)
    #[arg(long)]
    pub reply_delay_ms: Option<u64>,

    /// Disable file attachments (drop, paste-to-file, picker)
    #[arg(long)]
    pub no_attachments: bool,

    /// Disable the "press Enter again to interrupt" prompt
    #[arg(long)]
    pub no_interrupt: bool,

    /// Start with the chat panel open
    #[arg(long)]
    pub open: bool,

    /// Write tracing diagnostics to a file (disabled by default)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// Tracing filter directives (example: `info,chat_widget::app=debug`)
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it on startup
    #[arg(long)]
    pub log_append: bool,
}
