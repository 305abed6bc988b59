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

use super::attachment::{self, Attachment, AttachmentSource};
use super::{App, MessageRole, NewMessage};

impl App {
    /// Submit the draft. Whitespace-only text is ignored.
    ///
    /// Appends the user message, then schedules the simulated reply so the
    /// reply always lands after it.
    pub fn submit(&mut self) {
        let Some(submission) = self.composer.take_submission() else {
            return;
        };
        let mut message = NewMessage::user(submission.text.clone());
        if let Some(attachments) = submission.attachments {
            message = message.with_attachments(attachments);
        }
        self.send_user_message(message);
    }

    /// Submit the `index`-th suggestion on offer: the follow-ups of the
    /// latest reply, or the prompt suggestions while the transcript is empty.
    /// Like the send button, does nothing while a reply is pending.
    pub fn submit_suggestion(&mut self, index: usize) {
        if self.is_generating() {
            return;
        }
        let Some(text) = self.offered_suggestions().get(index).cloned() else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        self.send_user_message(NewMessage::user(text));
    }

    #[must_use]
    pub fn offered_suggestions(&self) -> Vec<String> {
        match self.store.last() {
            None => self.config.prompt_suggestions.clone(),
            Some(last) if last.role == MessageRole::Assistant => {
                last.suggestions.clone().unwrap_or_default()
            }
            Some(_) => Vec::new(),
        }
    }

    fn send_user_message(&mut self, message: NewMessage) {
        let prompt = message.content.clone();
        self.append_message(message);
        self.responder.schedule(&prompt, &self.event_tx);
        self.scroll.dependencies_changed();
    }

    /// Stop generating: cancel every reply in flight.
    pub fn stop_generation(&mut self) {
        if !self.is_generating() {
            return;
        }
        tracing::debug!(pending = self.responder.pending_count(), "generation stopped");
        self.responder.stop();
        self.composer.generation_finished();
    }

    /// Register freshly attached files: inline previews are built right
    /// away, file previews are read in the background.
    pub fn track_attachments(&mut self, added: Vec<Attachment>) {
        for att in added {
            match &att.source {
                AttachmentSource::Inline(bytes) => {
                    let preview = attachment::preview_from_bytes(att.kind, &att.mime, bytes);
                    self.previews.insert(att.id, preview);
                }
                AttachmentSource::Path(_) => {
                    attachment::spawn_preview_load(
                        att,
                        self.event_tx.clone(),
                        self.session.child_token(),
                    );
                }
            }
        }
    }
}
