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

use crate::app::{App, InputState, wrap_draft_line};
use crate::ui::{attachments, theme};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

/// Prompt prefix width: "❯ " = 2 columns
pub const PROMPT_WIDTH: u16 = 2;
const PICKER_LABEL: &str = "Attach file: ";

/// Columns available to draft text inside a composer box of `outer_width`.
pub fn content_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(2).saturating_sub(PROMPT_WIDTH)
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.composer.is_dragging() { theme::DROP_ZONE } else { theme::BORDER };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let prompt = Span::styled(format!("{} ", theme::PROMPT_CHAR), Style::default().fg(theme::ACCENT));
    let width = usize::from(inner.width.saturating_sub(PROMPT_WIDTH));

    if app.composer.input.is_empty() {
        let line = Line::from(vec![
            prompt,
            Span::styled(app.config.placeholder.clone(), Style::default().fg(theme::DIM)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        if app.picker.is_none() {
            frame.set_cursor_position((inner.x + PROMPT_WIDTH, inner.y));
        }
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for text in &app.composer.input.lines {
        for chunk in wrap_draft_line(text, width) {
            let prefix = if lines.is_empty() { prompt.clone() } else { Span::raw("  ") };
            lines.push(Line::from(vec![prefix, Span::raw(chunk)]));
        }
    }

    // Keep the cursor row visible when the draft outgrows the box
    let (cursor_row, cursor_col) = app.composer.input.visual_cursor(width);
    let visible = usize::from(inner.height);
    let scroll = cursor_row.saturating_sub(visible.saturating_sub(1));
    #[allow(clippy::cast_possible_truncation)]
    let paragraph = Paragraph::new(lines).scroll((scroll.min(usize::from(u16::MAX)) as u16, 0));
    frame.render_widget(paragraph, inner);

    if app.picker.is_some() {
        return;
    }
    #[allow(clippy::cast_possible_truncation)]
    let (x, y) = (
        inner.x + PROMPT_WIDTH + cursor_col as u16,
        inner.y + (cursor_row - scroll) as u16,
    );
    if x < inner.right() && y < inner.bottom() {
        frame.set_cursor_position((x, y));
    }
}

/// The draft's attachments as a single strip of chips.
pub fn render_files(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!("{} file(s) ", app.composer.files().len()),
        Style::default().fg(theme::DIM),
    )];
    for chip in attachments::chips(app.composer.files(), &app.previews) {
        spans.extend(chip.spans);
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The file picker's path prompt.
pub fn render_picker(frame: &mut Frame, area: Rect, app: &App) {
    let Some(picker) = &app.picker else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(PICKER_LABEL, Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw(picker.text()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
    let x = area.x.saturating_add(picker_cursor_offset(picker));
    if x < area.right() {
        frame.set_cursor_position((x, area.y));
    }
}

/// Display columns from the start of the picker row to its cursor.
fn picker_cursor_offset(picker: &InputState) -> u16 {
    let before: String =
        picker.lines[picker.cursor_row].chars().take(picker.cursor_col).collect();
    let cols = PICKER_LABEL.width().saturating_add(before.width());
    u16::try_from(cols).unwrap_or(u16::MAX)
}

/// Interrupt prompt or drop hint, above the composer.
pub fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.composer.interrupt_prompt_visible() {
        Line::from(Span::styled(
            "Press Enter again to interrupt and send your message",
            Style::default().fg(theme::ACCENT),
        ))
    } else if app.composer.is_dragging() {
        Line::from(Span::styled(
            "Drop files here to add them to the message",
            Style::default().fg(theme::DROP_ZONE),
        ))
    } else {
        return;
    };
    frame.render_widget(Paragraph::new(line), area);
}
