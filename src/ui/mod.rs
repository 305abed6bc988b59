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

mod attachments;
mod chat;
mod header;
mod highlight;
mod input;
pub mod layout;
pub mod markdown;
mod message;
pub mod theme;

pub use chat::transcript_lines;
pub use input::content_width as composer_content_width;

use crate::app::{App, ToastLevel};
use layout::PanelRows;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    render_button(frame, area, app);

    if app.is_open {
        let rows = PanelRows {
            composer: app.composer_box.rows(),
            notice: app.composer.interrupt_prompt_visible() || app.composer.is_dragging(),
            picker: app.picker.is_some(),
            files: app.composer.shows_file_list(),
        };
        let areas = layout::compute(area, rows);
        frame.render_widget(Clear, areas.panel);
        frame.render_widget(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme::BORDER))
                .style(Style::default().bg(theme::PANEL_BG)),
            areas.panel,
        );
        header::render(frame, areas.header, app);
        render_separator(frame, areas.header_sep);
        chat::render(frame, areas.body, app);
        input::render_notice(frame, areas.notice, app);
        input::render_picker(frame, areas.picker, app);
        if areas.files.height > 0 {
            input::render_files(frame, areas.files, app);
        }
        input::render(frame, areas.input, app);
        header::render_hints(frame, areas.hints, app);
        render_toast(frame, areas.header, app);
    } else {
        app.rendered_chat_area = Rect::default();
        app.jump_button_area = None;
        let above_button = Rect {
            y: app.toggle_button_area.y.saturating_sub(1),
            height: 1,
            ..area
        };
        render_toast(frame, above_button, app);
    }
}

fn render_button(frame: &mut Frame, area: Rect, app: &mut App) {
    let rect = layout::button(area);
    app.toggle_button_area = rect;
    let icon = if app.is_open { theme::ICON_CLOSE } else { theme::ICON_CHAT };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ACCENT));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Span::styled(
            icon,
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(block),
        rect,
    );
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let line = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    frame.render_widget(Paragraph::new(Span::styled(line, Style::default().fg(theme::DIM))), area);
}

/// Toast overlay, right-aligned on `row`.
fn render_toast(frame: &mut Frame, row: Rect, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };
    let color = match toast.level {
        ToastLevel::Success => theme::TOAST_SUCCESS,
        ToastLevel::Error => theme::TOAST_ERROR,
    };
    let text = format!(" {} ", toast.message);
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(row.width);
    let rect = Rect { x: row.right().saturating_sub(width), y: row.y, width, height: 1 };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(theme::PANEL_BG).bg(color).add_modifier(Modifier::BOLD),
        ))),
        rect,
    );
}
