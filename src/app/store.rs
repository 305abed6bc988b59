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

use super::attachment::Attachment;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolInvocationState {
    PartialCall,
    Call,
    Result,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolInvocation {
    pub state: ToolInvocationState,
    pub tool_name: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: Option<DateTime<Local>>,
    pub attachments: Option<Vec<Attachment>>,
    pub tool_invocations: Option<Vec<ToolInvocation>>,
    /// Follow-up prompts offered under an assistant reply.
    pub suggestions: Option<Vec<String>>,
}

impl Message {
    /// Tool invocations replace the normal bubble when there is at least one.
    #[must_use]
    pub fn has_tool_invocations(&self) -> bool {
        self.tool_invocations.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Everything about a message except its id, which the store assigns.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub role: MessageRole,
    pub content: String,
    pub created_at: Option<DateTime<Local>>,
    pub attachments: Option<Vec<Attachment>>,
    pub tool_invocations: Option<Vec<ToolInvocation>>,
    pub suggestions: Option<Vec<String>>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: None,
            attachments: None,
            tool_invocations: None,
            suggestions: None,
        }
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    #[must_use]
    pub fn with_tool_invocations(mut self, invocations: Option<Vec<ToolInvocation>>) -> Self {
        self.tool_invocations = invocations;
        self
    }
}

/// Append-only transcript for one widget session.
///
/// Ids come from a counter and are never reused. `revision` changes on every
/// append so observers (auto-scroll) can detect content changes cheaply.
#[derive(Debug)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self { messages: Vec::new(), next_id: 1, revision: 0 }
    }

    pub fn append(&mut self, new: NewMessage) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.revision += 1;
        tracing::debug!(%id, role = ?new.role, "append message");
        self.messages.push(Message {
            id,
            role: new.role,
            content: new.content,
            created_at: Some(new.created_at.unwrap_or_else(Local::now)),
            attachments: new.attachments,
            tool_invocations: new.tool_invocations,
            suggestions: new.suggestions,
        });
        &self.messages[self.messages.len() - 1]
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        // Ids are assigned in push order, so the vector is sorted by id.
        self.messages.binary_search_by_key(&id, |m| m.id).ok().map(|idx| &self.messages[idx])
    }

    #[must_use]
    pub fn last_of_role(&self, role: MessageRole) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == role)
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
