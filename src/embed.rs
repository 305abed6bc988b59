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

//! Host-facing surface: a registry that mounts the widget at most once and a
//! cloneable handle to open, close or toggle it.

use crate::config::EmbedOptions;
use tokio::sync::mpsc;

/// Message a host posts to flip the widget's visibility.
pub const TOGGLE_MESSAGE: &str = "TOGGLE_CHATBOT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Open,
    Close,
    Toggle,
}

impl HostCommand {
    /// Translate a posted host message. Unknown messages are ignored.
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        (message == TOGGLE_MESSAGE).then_some(Self::Toggle)
    }
}

/// Control surface handed to the host. Methods return `false` once the
/// widget is gone.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tx: mpsc::UnboundedSender<HostCommand>,
}

impl WidgetHandle {
    pub fn open(&self) -> bool {
        self.send(HostCommand::Open)
    }

    pub fn close(&self) -> bool {
        self.send(HostCommand::Close)
    }

    pub fn toggle(&self) -> bool {
        self.send(HostCommand::Toggle)
    }

    pub fn post_message(&self, message: &str) -> bool {
        match HostCommand::from_message(message) {
            Some(cmd) => self.send(cmd),
            None => {
                tracing::debug!(message, "ignoring unknown host message");
                false
            }
        }
    }

    fn send(&self, cmd: HostCommand) -> bool {
        self.tx.send(cmd).is_ok()
    }
}

struct Injected {
    handle: WidgetHandle,
    receiver: Option<mpsc::UnboundedReceiver<HostCommand>>,
    options: EmbedOptions,
}

/// Owned by the host's initialization routine.
#[derive(Default)]
pub struct WidgetRegistry {
    injected: Option<Injected>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the widget if it is not mounted yet and return its handle.
    /// Repeated calls return the same widget; later options are ignored.
    pub fn ensure_injected(&mut self, options: &EmbedOptions) -> WidgetHandle {
        if let Some(existing) = &self.injected {
            tracing::debug!("widget already injected; reusing handle");
            return existing.handle.clone();
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = WidgetHandle { tx };
        tracing::info!(
            api_base_url = options.api_base_url.as_deref().unwrap_or("-"),
            chatbot_url = options.chatbot_url.as_deref().unwrap_or("-"),
            user = options.user.id.as_deref().unwrap_or("-"),
            "widget injected"
        );
        self.injected =
            Some(Injected { handle: handle.clone(), receiver: Some(rx), options: options.clone() });
        handle
    }

    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.injected.is_some()
    }

    #[must_use]
    pub fn handle(&self) -> Option<WidgetHandle> {
        self.injected.as_ref().map(|i| i.handle.clone())
    }

    #[must_use]
    pub fn options(&self) -> Option<&EmbedOptions> {
        self.injected.as_ref().map(|i| &i.options)
    }

    /// The command stream, taken once by the mounted widget.
    pub fn take_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<HostCommand>> {
        self.injected.as_mut().and_then(|i| i.receiver.take())
    }
}
