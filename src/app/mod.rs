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

pub mod attachment;
mod clipboard;
pub mod composer;
mod events;
mod input;
mod input_submit;
pub mod paste_burst;
pub mod resize;
pub mod responder;
pub mod scroll;
mod state;
pub mod store;

pub use clipboard::{
    COPIED_CODE_MESSAGE, COPIED_RESPONSE_MESSAGE, COPY_FAILED_MESSAGE, ClipboardSink,
    SystemClipboard, copy_last_code_block, copy_last_response,
};
pub use events::{handle_host_command, handle_terminal_event, handle_widget_event};
pub use input::{InputState, wrap_draft_line};
pub use scroll::{AutoScroll, ScrollMode, Viewport};
pub use state::{
    App, COPIED_INDICATOR_DURATION, ComposerBox, Rating, TOAST_DURATION, Toast, ToastLevel,
    WidgetEvent,
};
pub use store::{
    Message, MessageId, MessageRole, MessageStore, NewMessage, ToolInvocation, ToolInvocationState,
};

use crate::embed::HostCommand;
use crossterm::event::{
    EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Enable bracketed paste and mouse capture (ignore error on unsupported terminals)
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::EnableBracketedPaste,
        crossterm::event::EnableMouseCapture,
        // Enhanced keyboard protocol for reliable modifier detection (e.g. Shift+Enter)
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    );

    let mut events = EventStream::new();
    let tick_duration = Duration::from_millis(16);
    let mut last_render = Instant::now();
    let mut result = Ok(());

    loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                handle_terminal_event(app, event);
            }
            Some(event) = app.event_rx.recv() => {
                handle_widget_event(app, event);
            }
            Some(cmd) = next_host_command(&mut app.host_rx) => {
                handle_host_command(app, cmd);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        loop {
            // Terminal events first (keeps typing responsive)
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                handle_terminal_event(app, event);
                continue;
            }
            if let Ok(event) = app.event_rx.try_recv() {
                handle_widget_event(app, event);
                continue;
            }
            if let Some(Ok(cmd)) = app.host_rx.as_mut().map(mpsc::UnboundedReceiver::try_recv) {
                handle_host_command(app, cmd);
                continue;
            }
            break;
        }

        if app.should_quit {
            break;
        }

        // Phase 3: render once
        app.flush_quiet_input();
        let now = Instant::now();
        app.tick(now);
        app.spinner_frame = app.spinner_frame.wrapping_add(1);
        if let Err(e) = terminal.draw(|f| {
            app.sync_composer_height(f.area());
            crate::ui::render(f, app);
        }) {
            result = Err(e.into());
            break;
        }
        last_render = now;
    }

    // --- Graceful shutdown ---
    app.shutdown();

    // Restore terminal
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::event::DisableMouseCapture,
        PopKeyboardEnhancementFlags
    );
    ratatui::restore();

    result
}

/// Next host command; never resolves when no host is attached.
async fn next_host_command(
    rx: &mut Option<mpsc::UnboundedReceiver<HostCommand>>,
) -> Option<HostCommand> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
pub(crate) fn test_app(config: crate::config::WidgetConfig) -> App {
    struct NullClipboard;
    impl ClipboardSink for NullClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), String> {
            Ok(())
        }
    }
    App::with_clipboard(config, Box::new(NullClipboard))
}
