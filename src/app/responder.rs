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

//! Simulated assistant replies.
//!
//! Every submission schedules one reply that lands after a fixed delay. Each
//! reply owns a child of the session token, so `stop()` cancels the replies
//! in flight and `shutdown()` cancels everything the session started. A reply
//! event is only honoured while its id is still pending.

use super::WidgetEvent;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyId(u64);

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A reply that fired and is waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticReply {
    pub id: ReplyId,
    pub content: String,
    pub suggestions: Vec<String>,
}

struct PendingReply {
    id: ReplyId,
    token: CancellationToken,
}

pub struct ReplyScheduler {
    session: CancellationToken,
    pending: Vec<PendingReply>,
    next_id: u64,
    delay: Duration,
    suggestions: Vec<String>,
}

/// The canned echo used in place of a backend call.
#[must_use]
pub fn canned_reply(prompt: &str) -> String {
    format!("You asked: \"{prompt}\". Here's some info!")
}

impl ReplyScheduler {
    pub fn new(session: CancellationToken, delay: Duration, suggestions: Vec<String>) -> Self {
        Self { session, pending: Vec::new(), next_id: 0, delay, suggestions }
    }

    /// Start the timer for a reply to `prompt`. The reply arrives on `tx` as
    /// [`WidgetEvent::Reply`] unless it is cancelled first.
    pub fn schedule(&mut self, prompt: &str, tx: &mpsc::UnboundedSender<WidgetEvent>) -> ReplyId {
        self.next_id += 1;
        let id = ReplyId(self.next_id);
        let token = self.session.child_token();
        self.pending.push(PendingReply { id, token: token.clone() });

        let reply =
            SyntheticReply { id, content: canned_reply(prompt), suggestions: self.suggestions.clone() };
        let delay = self.delay;
        let tx = tx.clone();
        tracing::debug!(%id, ?delay, "scheduled simulated reply");
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(id = %reply.id, "simulated reply cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    let _ = tx.send(WidgetEvent::Reply(reply));
                }
            }
        });
        id
    }

    /// Claim a fired reply. Returns `false` when it was cancelled or the
    /// session is over, in which case the reply must be dropped.
    pub fn complete(&mut self, id: ReplyId) -> bool {
        if self.session.is_cancelled() {
            return false;
        }
        let Some(idx) = self.pending.iter().position(|p| p.id == id) else {
            return false;
        };
        self.pending.remove(idx);
        true
    }

    /// Cancel every reply still in flight.
    pub fn stop(&mut self) {
        for pending in self.pending.drain(..) {
            pending.token.cancel();
        }
    }

    /// End the session. No reply is delivered afterwards.
    pub fn shutdown(&mut self) {
        self.stop();
        self.session.cancel();
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
