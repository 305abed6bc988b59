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

use super::attachment::{AttachmentId, FilePreview};
use super::clipboard::{ClipboardSink, SystemClipboard};
use super::composer::{Composer, ComposerOptions};
use super::input::InputState;
use super::paste_burst::PasteBurst;
use super::resize::{AutoResize, MeasuredElement};
use super::responder::{ReplyScheduler, SyntheticReply};
use super::scroll::AutoScroll;
use super::store::{MessageId, MessageStore, NewMessage};
use crate::config::WidgetConfig;
use crate::embed::HostCommand;
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// How long the "copied" check mark stays after a successful copy.
pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_secs(2);

/// Results of background work, delivered to the event loop.
#[derive(Debug)]
pub enum WidgetEvent {
    Reply(SyntheticReply),
    PreviewReady { id: AttachmentId, preview: FilePreview },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    ThumbsUp,
    ThumbsDown,
}

/// The composer's text box as seen by the auto-resize controller.
///
/// `content_rows` is refreshed from the draft before each layout pass;
/// `height` is the explicit height the controller applied, in content rows
/// (the box border is drawn outside it).
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposerBox {
    pub content_rows: u16,
    pub height: Option<u16>,
}

impl ComposerBox {
    #[must_use]
    pub fn rows(&self) -> u16 {
        self.height.unwrap_or(self.content_rows).max(1)
    }
}

impl MeasuredElement for ComposerBox {
    fn scroll_height(&self) -> u16 {
        self.content_rows
    }

    fn clear_height(&mut self) {
        self.height = None;
    }

    fn set_height(&mut self, height: u16) {
        self.height = Some(height);
    }
}

pub struct App {
    pub config: WidgetConfig,
    pub store: MessageStore,
    pub composer: Composer,
    pub scroll: AutoScroll,
    pub resize: AutoResize,
    pub composer_box: ComposerBox,
    pub responder: ReplyScheduler,
    /// Loaded attachment previews, shared by the draft and the transcript.
    pub previews: HashMap<AttachmentId, FilePreview>,
    /// When each message first appeared, for entry animations.
    pub appeared_at: HashMap<MessageId, Instant>,
    pub ratings: HashMap<MessageId, Rating>,
    pub toast: Option<Toast>,
    pub copied_at: Option<Instant>,
    /// Path prompt of the file picker, when open.
    pub picker: Option<InputState>,
    pub paste_burst: PasteBurst,
    pub is_open: bool,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub event_tx: mpsc::UnboundedSender<WidgetEvent>,
    pub event_rx: mpsc::UnboundedReceiver<WidgetEvent>,
    pub host_rx: Option<mpsc::UnboundedReceiver<HostCommand>>,
    /// Scopes every background task started by this widget.
    pub session: CancellationToken,
    pub clipboard: Box<dyn ClipboardSink>,
    /// Last rendered transcript area (mouse hit-testing).
    pub rendered_chat_area: Rect,
    pub toggle_button_area: Rect,
    pub jump_button_area: Option<Rect>,
}

impl App {
    pub fn new(config: WidgetConfig) -> Self {
        Self::with_clipboard(config, Box::new(SystemClipboard))
    }

    pub fn with_clipboard(config: WidgetConfig, clipboard: Box<dyn ClipboardSink>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = CancellationToken::new();
        let responder = ReplyScheduler::new(
            session.child_token(),
            config.reply_delay(),
            config.follow_up_suggestions.clone(),
        );
        let composer = Composer::new(ComposerOptions {
            allow_attachments: config.allow_attachments,
            enable_interrupt: config.enable_interrupt,
            submit_on_enter: config.submit_on_enter,
        });

        let mut app = Self {
            store: MessageStore::new(),
            composer,
            scroll: AutoScroll::new(config.scroll_activation_rows),
            resize: AutoResize::new(config.max_input_height, 0),
            composer_box: ComposerBox::default(),
            responder,
            previews: HashMap::new(),
            appeared_at: HashMap::new(),
            ratings: HashMap::new(),
            toast: None,
            copied_at: None,
            picker: None,
            paste_burst: PasteBurst::new(),
            is_open: config.start_open,
            should_quit: false,
            spinner_frame: 0,
            event_tx,
            event_rx,
            host_rx: None,
            session,
            clipboard,
            rendered_chat_area: Rect::default(),
            toggle_button_area: Rect::default(),
            jump_button_area: None,
            config,
        };

        for seed in app.config.initial_messages.clone() {
            let new = NewMessage {
                role: seed.role,
                content: seed.content,
                created_at: None,
                attachments: None,
                tool_invocations: seed.tool_invocations,
                suggestions: None,
            };
            app.append_message(new);
        }
        app
    }

    /// Connect the host's command stream.
    pub fn attach_host(&mut self, rx: mpsc::UnboundedReceiver<HostCommand>) {
        self.host_rx = Some(rx);
    }

    pub fn append_message(&mut self, new: NewMessage) -> MessageId {
        let id = self.store.append(new).id;
        self.appeared_at.insert(id, Instant::now());
        id
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.responder.is_generating()
    }

    pub fn open(&mut self) {
        if !self.is_open {
            tracing::debug!("widget opened");
            self.is_open = true;
        }
    }

    pub fn close(&mut self) {
        if self.is_open {
            tracing::debug!("widget closed");
            self.is_open = false;
            self.picker = None;
            self.composer.drag_leave();
        }
    }

    pub fn toggle(&mut self) {
        if self.is_open { self.close() } else { self.open() }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), level, shown_at: Instant::now() });
    }

    /// Record a rating for the latest assistant reply.
    pub fn rate_last_response(&mut self, rating: Rating) {
        let Some(msg) = self.store.last_of_role(super::MessageRole::Assistant) else {
            return;
        };
        let id = msg.id;
        tracing::info!(message_id = %id, ?rating, "response rated");
        self.ratings.insert(id, rating);
    }

    /// Expire transient UI state. Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_DURATION) {
            self.toast = None;
        }
        if self.copied_at.is_some_and(|t| now.duration_since(t) >= COPIED_INDICATOR_DURATION) {
            self.copied_at = None;
        }
        if !self.is_generating() {
            self.composer.generation_finished();
        }
    }

    /// Re-measure the composer box for a frame of `area`. The box only
    /// changes when the draft, the file strip or the width changed.
    pub fn sync_composer_height(&mut self, area: Rect) {
        let outer = crate::ui::layout::panel(area).width.saturating_sub(2);
        let width = usize::from(crate::ui::composer_content_width(outer));
        let rows = self.composer.input.visual_line_count(width);
        self.composer_box.content_rows = u16::try_from(rows).unwrap_or(u16::MAX);

        let mut hasher = DefaultHasher::new();
        (self.composer.input.text(), self.composer.shows_file_list(), width).hash(&mut hasher);
        self.resize
            .update(Some(&mut self.composer_box as &mut dyn MeasuredElement), hasher.finish());
    }

    /// Tear the session down: pending replies and preview loads are dropped.
    pub fn shutdown(&mut self) {
        tracing::info!("widget session ending");
        self.responder.shutdown();
        self.session.cancel();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
