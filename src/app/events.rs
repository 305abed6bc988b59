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

use super::clipboard::{copy_last_code_block, copy_last_response};
use super::composer::{EnterAction, PasteOutcome};
use super::paste_burst::BurstFlush;
use super::{App, InputState, NewMessage, Rating, ToastLevel, WidgetEvent};
use crate::app::attachment::expand_home;
use crate::embed::HostCommand;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

const MOUSE_SCROLL_LINES: isize = 3;

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if !app.is_open {
                handle_closed_key(app, key);
            } else if app.picker.is_some() {
                handle_picker_key(app, key);
            } else {
                handle_normal_key(app, key);
            }
        }
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Paste(text) => handle_paste(app, &text),
        // Resize is handled automatically by ratatui
        _ => {}
    }
}

/// Results of background work.
pub fn handle_widget_event(app: &mut App, event: WidgetEvent) {
    match event {
        WidgetEvent::Reply(reply) => {
            if !app.responder.complete(reply.id) {
                tracing::debug!(id = ?reply.id, "dropping stale reply");
                return;
            }
            app.append_message(NewMessage::assistant(reply.content).with_suggestions(reply.suggestions));
            if !app.is_generating() {
                app.composer.generation_finished();
            }
        }
        WidgetEvent::PreviewReady { id, preview } => {
            app.previews.insert(id, preview);
        }
    }
}

pub fn handle_host_command(app: &mut App, cmd: HostCommand) {
    tracing::debug!(?cmd, "host command");
    match cmd {
        HostCommand::Open => app.open(),
        HostCommand::Close => app.close(),
        HostCommand::Toggle => app.toggle(),
    }
}

fn is_toggle(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::F(2))
        || (key.code == KeyCode::Char(' ') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_closed_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        _ if is_toggle(&key) => app.open(),
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Enter, _) => app.open(),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    // Plain characters are buffered to tell typing from a paste
    if let KeyCode::Char(c) = key.code
        && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        app.paste_burst.push_char(c);
        if app.paste_burst.is_receiving() {
            app.composer.drag_enter();
        }
        return;
    }
    if key.code == KeyCode::Enter && app.paste_burst.absorb_enter() {
        return;
    }
    app.flush_input();

    match (key.code, key.modifiers) {
        _ if is_toggle(&key) => app.close(),
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (KeyCode::Esc, _) => {
            if app.composer.interrupt_prompt_visible() {
                app.composer.dismiss_interrupt_prompt();
            } else if app.is_generating() {
                app.stop_generation();
            } else {
                app.close();
            }
        }
        (KeyCode::Enter, m) => {
            let shift = m.contains(KeyModifiers::SHIFT);
            match app.composer.on_enter(shift, app.is_generating(), true) {
                EnterAction::Submit => app.submit(),
                EnterAction::InterruptAndSubmit => {
                    app.stop_generation();
                    app.submit();
                }
                EnterAction::ShowInterruptPrompt => {}
                EnterAction::InsertNewline => app.composer.input.insert_newline(),
            }
        }
        // Send button: disabled while a reply is pending
        (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
            if !app.is_generating() {
                app.submit();
            }
        }
        (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
            if app.composer.options().allow_attachments {
                app.picker = Some(InputState::new());
            }
        }
        (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
            if let Some(removed) = app.composer.remove_last_file() {
                app.previews.remove(&removed.id);
            }
        }
        (KeyCode::Char('y'), m) if m.contains(KeyModifiers::CONTROL) => {
            copy_last_response(app);
        }
        (KeyCode::Char('k'), m) if m.contains(KeyModifiers::CONTROL) => {
            copy_last_code_block(app);
        }
        (KeyCode::Char(c @ '1'..='9'), m) if m.contains(KeyModifiers::ALT) => {
            app.submit_suggestion(c as usize - '1' as usize);
        }
        (KeyCode::Char('+'), m) if m.contains(KeyModifiers::ALT) => {
            app.rate_last_response(Rating::ThumbsUp);
        }
        (KeyCode::Char('-'), m) if m.contains(KeyModifiers::ALT) => {
            app.rate_last_response(Rating::ThumbsDown);
        }
        // Transcript scrolling
        (KeyCode::PageUp, _) => app.scroll.scroll_by(-page(app)),
        (KeyCode::PageDown, _) => app.scroll.scroll_by(page(app)),
        (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => app.scroll.scroll_by(-1),
        (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => app.scroll.scroll_by(1),
        (KeyCode::End, m) if m.contains(KeyModifiers::CONTROL) => app.scroll.scroll_to_bottom(),
        // Navigation
        (KeyCode::Left, _) => app.composer.input.move_left(),
        (KeyCode::Right, _) => app.composer.input.move_right(),
        (KeyCode::Up, _) => app.composer.input.move_up(),
        (KeyCode::Down, _) => app.composer.input.move_down(),
        (KeyCode::Home, _) => app.composer.input.move_home(),
        (KeyCode::End, _) => app.composer.input.move_end(),
        // Editing
        (KeyCode::Backspace, _) => app.composer.input.delete_char_before(),
        (KeyCode::Delete, _) => app.composer.input.delete_char_after(),
        _ => {}
    }
}

#[allow(clippy::cast_possible_wrap)]
fn page(app: &App) -> isize {
    (app.scroll.viewport().client_height.max(2) - 1) as isize
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.picker = None,
        KeyCode::Enter => {
            let raw = picker.text();
            app.picker = None;
            attach_from_picker(app, raw.trim());
        }
        KeyCode::Char(c) => picker.insert_char(c),
        KeyCode::Backspace => picker.delete_char_before(),
        KeyCode::Delete => picker.delete_char_after(),
        KeyCode::Left => picker.move_left(),
        KeyCode::Right => picker.move_right(),
        KeyCode::Home => picker.move_home(),
        KeyCode::End => picker.move_end(),
        _ => {}
    }
}

fn attach_from_picker(app: &mut App, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let path = expand_home(raw);
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "picker: not a file");
        app.show_toast(ToastLevel::Error, format!("File not found: {raw}"));
        return;
    }
    let added = app.composer.attach_paths(&[path]);
    if added.is_empty() {
        app.show_toast(ToastLevel::Error, format!("Could not attach {raw}"));
    }
    app.track_attachments(added);
}

fn handle_paste(app: &mut App, text: &str) {
    if !app.is_open {
        return;
    }
    if let Some(picker) = app.picker.as_mut() {
        picker.insert_str(text.lines().next().unwrap_or_default());
        return;
    }
    app.flush_input();
    paste_into_composer(app, text);
}

fn paste_into_composer(app: &mut App, text: &str) {
    if let PasteOutcome::Attached(added) = app.composer.on_paste(text) {
        app.track_attachments(added);
    }
}

impl App {
    /// Hand buffered keystrokes to the composer. Runs every frame once the
    /// burst has gone quiet, and right before any non-character key.
    pub fn flush_input(&mut self) {
        if let Some(flushed) = self.paste_burst.flush_now() {
            self.apply_burst(flushed);
        }
    }

    pub(super) fn flush_quiet_input(&mut self) {
        if let Some(flushed) = self.paste_burst.flush() {
            self.apply_burst(flushed);
        }
    }

    fn apply_burst(&mut self, flushed: BurstFlush) {
        match flushed {
            BurstFlush::Typed(text) => self.composer.input.insert_str(&text),
            BurstFlush::Paste(text) => {
                tracing::debug!(chars = text.chars().count(), "key burst treated as paste");
                paste_into_composer(self, &text);
                self.composer.drag_leave();
            }
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(app.toggle_button_area, column, row) {
                app.toggle();
            } else if app.jump_button_area.is_some_and(|a| contains(a, column, row)) {
                app.scroll.scroll_to_bottom();
            } else if app.is_open && contains(app.rendered_chat_area, column, row) {
                app.scroll.handle_touch_start();
            }
        }
        MouseEventKind::ScrollUp if app.is_open => app.scroll.scroll_by(-MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown if app.is_open => app.scroll.scroll_by(MOUSE_SCROLL_LINES),
        _ => {}
    }
}
