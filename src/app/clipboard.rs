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

use super::{App, MessageRole, ToastLevel};
use crate::ui::markdown::{Segment, split_fenced};
use std::time::Instant;

pub const COPIED_RESPONSE_MESSAGE: &str = "Copied response to clipboard!";
pub const COPIED_CODE_MESSAGE: &str = "Copied code to clipboard";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy to clipboard.";

/// Where copied text goes. The system clipboard in the binary, a recorder
/// in tests.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text.to_owned()).map_err(|e| e.to_string())
    }
}

/// Copy `text` and report the outcome with a toast. Failures are reported
/// once and not retried.
pub(super) fn copy_with_feedback(app: &mut App, text: &str, success_message: &str) -> bool {
    match app.clipboard.write_text(text) {
        Ok(()) => {
            app.copied_at = Some(Instant::now());
            app.show_toast(ToastLevel::Success, success_message);
            true
        }
        Err(e) => {
            tracing::warn!("clipboard write failed: {e}");
            app.show_toast(ToastLevel::Error, COPY_FAILED_MESSAGE);
            false
        }
    }
}

/// Copy the latest assistant reply.
pub fn copy_last_response(app: &mut App) -> bool {
    let Some(content) = app.store.last_of_role(MessageRole::Assistant).map(|m| m.content.clone())
    else {
        return false;
    };
    copy_with_feedback(app, &content, COPIED_RESPONSE_MESSAGE)
}

/// Copy the last fenced code block of the latest assistant reply.
pub fn copy_last_code_block(app: &mut App) -> bool {
    let code = app
        .store
        .last_of_role(MessageRole::Assistant)
        .and_then(|m| last_code_block(&m.content));
    let Some(code) = code else {
        return false;
    };
    copy_with_feedback(app, &code, COPIED_CODE_MESSAGE)
}

fn last_code_block(content: &str) -> Option<String> {
    split_fenced(content).into_iter().rev().find_map(|segment| match segment {
        Segment::Code { code, .. } => Some(code),
        Segment::Prose(_) => None,
    })
}
