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

use crate::app::{App, MessageRole, ScrollMode};
use crate::ui::message::{self, Entry, MessageView};
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Instant;

const JUMP_LABEL: &str = " ↓ ";

/// Build the transcript lines at `width`.
pub fn transcript_lines(app: &App, width: u16, now: Instant) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let messages = app.store.messages();

    if messages.is_empty() {
        lines.extend(empty_state(app, width));
    }

    let last_assistant = app.store.last_of_role(MessageRole::Assistant).map(|m| m.id);
    let last_id = app.store.last().map(|m| m.id);
    let copied = app.copied_at.is_some();

    for msg in messages {
        let entry = app.appeared_at.get(&msg.id).map_or(Entry::SETTLED, |at| {
            Entry::at(app.config.animation, now.saturating_duration_since(*at))
        });
        let is_last_assistant = Some(msg.id) == last_assistant;
        let view = MessageView {
            message: msg,
            previews: &app.previews,
            entry,
            spinner_frame: app.spinner_frame,
            show_timestamp: app.config.show_timestamps,
            rating: app.ratings.get(&msg.id).copied(),
            copied: copied && is_last_assistant,
            show_suggestions: Some(msg.id) == last_id && msg.role == MessageRole::Assistant,
        };
        message::render_message(&view, width, &mut lines);
    }

    if app.is_generating() {
        lines.push(message::typing_indicator(app.spinner_frame));
    }
    lines
}

fn empty_state(app: &App, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "How can I help you today?",
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    if !app.config.prompt_suggestions.is_empty() {
        lines.push(Line::from(Span::styled(
            "Try one of these (Alt+number):",
            Style::default().fg(theme::DIM),
        )));
        lines.extend(message::suggestion_chips(&app.config.prompt_suggestions, usize::from(width)));
        lines.push(Line::default());
    }
    lines
}

fn fingerprint(revision: u64, rows: usize, generating: bool) -> u64 {
    let mut hasher = DefaultHasher::new();
    (revision, rows, generating).hash(&mut hasher);
    hasher.finish()
}

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let lines = transcript_lines(app, area.width, Instant::now());
    let content_height = lines.len();
    let viewport_height = usize::from(area.height);

    app.scroll.set_geometry(content_height, viewport_height);
    app.scroll.observe_revision(fingerprint(
        app.store.revision(),
        content_height,
        app.is_generating(),
    ));

    let paragraph = Paragraph::new(Text::from(lines));
    if content_height <= viewport_height {
        // Short content sits at the bottom, right above the composer
        let offset = (viewport_height - content_height) as u16;
        let render_area = Rect {
            x: area.x,
            y: area.y + offset,
            width: area.width,
            height: content_height as u16,
        };
        app.rendered_chat_area = area;
        frame.render_widget(paragraph, render_area);
    } else {
        let top = app.scroll.scroll_top().min(usize::from(u16::MAX)) as u16;
        app.rendered_chat_area = area;
        frame.render_widget(paragraph.scroll((top, 0)), area);
    }

    app.jump_button_area = None;
    let viewport = app.scroll.viewport();
    if app.scroll.mode() == ScrollMode::Detached && viewport.distance_from_bottom() > 0 {
        let width = JUMP_LABEL.chars().count() as u16;
        if area.width > width && area.height > 0 {
            let rect = Rect { x: area.right() - width - 1, y: area.bottom() - 1, width, height: 1 };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    JUMP_LABEL,
                    Style::default().fg(theme::CHIP_FG).bg(theme::ACCENT),
                )),
                rect,
            );
            app.jump_button_area = Some(rect);
        }
    }
}
