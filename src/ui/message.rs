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

use crate::app::attachment::{AttachmentId, FilePreview};
use crate::app::{Message, MessageRole, Rating, ToolInvocation, ToolInvocationState};
use crate::config::EntryAnimation;
use crate::ui::{attachments, markdown, theme};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

/// Bubbles take at most this share of the transcript width.
const BUBBLE_MAX_PERCENT: usize = 70;
const BUBBLE_MIN_WIDTH: usize = 12;
/// Horizontal padding inside a bubble, per side.
const BUBBLE_PAD: usize = 1;
/// Distance a sliding bubble travels, in columns.
const SLIDE_COLUMNS: f32 = 8.0;
/// Scale animation starts at this share of the final width.
const SCALE_FROM: f32 = 0.75;

pub const SLIDE_DURATION: Duration = Duration::from_millis(300);
pub const SCALE_DURATION: Duration = Duration::from_millis(300);
pub const FADE_DURATION: Duration = Duration::from_millis(500);

/// Animation state of one bubble at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub animation: EntryAnimation,
    /// 0.0 when the message appeared, 1.0 once the animation is over.
    pub progress: f32,
}

impl Entry {
    pub const SETTLED: Self = Self { animation: EntryAnimation::None, progress: 1.0 };

    pub fn at(animation: EntryAnimation, elapsed: Duration) -> Self {
        let duration = match animation {
            EntryAnimation::None => return Self::SETTLED,
            EntryAnimation::Slide => SLIDE_DURATION,
            EntryAnimation::Scale => SCALE_DURATION,
            EntryAnimation::Fade => FADE_DURATION,
        };
        let progress = (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0);
        Self { animation, progress }
    }

    pub fn is_settled(&self) -> bool {
        self.animation == EntryAnimation::None || self.progress >= 1.0
    }

    fn width_factor(&self) -> f32 {
        match self.animation {
            EntryAnimation::Scale => SCALE_FROM + (1.0 - SCALE_FROM) * self.progress,
            _ => 1.0,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn slide_offset(&self) -> usize {
        match self.animation {
            EntryAnimation::Slide => ((1.0 - self.progress) * SLIDE_COLUMNS).round() as usize,
            _ => 0,
        }
    }

    fn dims(&self) -> bool {
        self.animation == EntryAnimation::Fade && self.progress < 1.0
    }
}

/// Everything the renderer needs to draw one message.
pub struct MessageView<'a> {
    pub message: &'a Message,
    pub previews: &'a HashMap<AttachmentId, FilePreview>,
    pub entry: Entry,
    pub spinner_frame: usize,
    pub show_timestamp: bool,
    pub rating: Option<Rating>,
    pub copied: bool,
    /// Show the follow-up suggestion chips under this bubble.
    pub show_suggestions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn side_of(role: MessageRole) -> Side {
    match role {
        MessageRole::User => Side::Right,
        MessageRole::Assistant => Side::Left,
    }
}

fn bubble_bg(role: MessageRole) -> Color {
    match role {
        MessageRole::User => theme::USER_BUBBLE_BG,
        MessageRole::Assistant => theme::ASSISTANT_BUBBLE_BG,
    }
}

pub fn render_message(view: &MessageView<'_>, width: u16, out: &mut Vec<Line<'static>>) {
    let width = usize::from(width);
    if width == 0 {
        return;
    }
    let msg = view.message;
    let side = side_of(msg.role);
    let offset = view.entry.slide_offset();
    let start = out.len();

    if let Some(atts) = msg.attachments.as_deref().filter(|a| !a.is_empty()) {
        for chip in attachments::chips(atts, view.previews) {
            out.push(place(chip.spans, width, side, offset));
        }
    }

    for row in bubble_rows(view, width) {
        out.push(place(row, width, side, offset));
    }

    if let Some(meta) = meta_line(view) {
        out.push(place(meta.spans, width, side, offset));
    }

    if view.show_suggestions
        && let Some(suggestions) = msg.suggestions.as_deref()
    {
        for line in suggestion_chips(suggestions, width) {
            out.push(line);
        }
    }

    if view.entry.dims() {
        for line in &mut out[start..] {
            for span in &mut line.spans {
                span.style = span.style.add_modifier(Modifier::DIM);
            }
        }
    }
    out.push(Line::default());
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bubble_rows(view: &MessageView<'_>, width: usize) -> Vec<Vec<Span<'static>>> {
    let msg = view.message;
    let bg = bubble_bg(msg.role);
    let max_bubble = (width * BUBBLE_MAX_PERCENT / 100).max(BUBBLE_MIN_WIDTH).min(width);
    let scaled = ((max_bubble as f32) * view.entry.width_factor()).round() as usize;
    let inner = scaled.saturating_sub(BUBBLE_PAD * 2).max(1);

    let body = match msg.tool_invocations.as_deref() {
        Some(invocations) if !invocations.is_empty() => {
            tool_lines(invocations, view.spinner_frame, bg)
        }
        _ => body_lines(msg, bg),
    };

    let wrapped: Vec<Line<'static>> =
        body.into_iter().flat_map(|line| wrap_line(line, inner)).collect();
    let content_width = wrapped.iter().map(line_width).max().unwrap_or(0).max(1);
    let fill = Style::default().bg(bg);

    wrapped
        .into_iter()
        .map(|line| {
            let used = line_width(&line);
            let mut row = Vec::with_capacity(line.spans.len() + 3);
            row.push(Span::styled(" ".repeat(BUBBLE_PAD), fill));
            row.extend(line.spans);
            row.push(Span::styled(" ".repeat(content_width - used + BUBBLE_PAD), fill));
            row
        })
        .collect()
}

fn body_lines(msg: &Message, bg: Color) -> Vec<Line<'static>> {
    let mut lines = markdown::render_content(&msg.content, Some(bg));
    if msg.role == MessageRole::User {
        for line in &mut lines {
            for span in &mut line.spans {
                if span.style.fg.is_none() {
                    span.style = span.style.fg(theme::USER_BUBBLE_FG);
                }
            }
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(String::new(), Style::default().bg(bg))));
    }
    lines
}

fn tool_lines(invocations: &[ToolInvocation], spinner_frame: usize, bg: Color) -> Vec<Line<'static>> {
    let base = Style::default().bg(bg);
    let mut lines = Vec::new();
    for inv in invocations {
        match inv.state {
            ToolInvocationState::PartialCall | ToolInvocationState::Call => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", theme::spinner(spinner_frame)),
                        base.fg(theme::TOOL_PENDING),
                    ),
                    Span::styled(format!("Calling {}...", inv.tool_name), base.fg(theme::TOOL_PENDING)),
                ]));
            }
            ToolInvocationState::Result => {
                lines.push(Line::from(Span::styled(
                    format!("Result from {}", inv.tool_name),
                    base.fg(theme::TOOL_RESULT).add_modifier(Modifier::BOLD),
                )));
                if let Some(result) = &inv.result {
                    let pretty = serde_json::to_string_pretty(result)
                        .unwrap_or_else(|_| result.to_string());
                    lines.extend(
                        pretty
                            .lines()
                            .map(|l| Line::from(Span::styled(l.to_owned(), base.fg(theme::CODE_FG)))),
                    );
                }
            }
        }
    }
    lines
}

fn meta_line(view: &MessageView<'_>) -> Option<Line<'static>> {
    let dim = Style::default().fg(theme::DIM);
    let mut spans = Vec::new();
    if view.show_timestamp
        && let Some(at) = view.message.created_at
    {
        spans.push(Span::styled(at.format("%H:%M").to_string(), dim));
    }
    if let Some(rating) = view.rating {
        let icon = match rating {
            Rating::ThumbsUp => theme::ICON_THUMBS_UP,
            Rating::ThumbsDown => theme::ICON_THUMBS_DOWN,
        };
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(icon.to_owned(), Style::default().fg(theme::ACCENT)));
    }
    if view.copied {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("{} Copied", theme::ICON_COPIED),
            Style::default().fg(theme::TOAST_SUCCESS),
        ));
    }
    (!spans.is_empty()).then(|| Line::from(spans))
}

/// Follow-up or prompt suggestions as numbered chips (`Alt+N` picks one).
pub fn suggestion_chips(suggestions: &[String], width: usize) -> Vec<Line<'static>> {
    let style = Style::default().fg(theme::CHIP_FG).bg(theme::CHIP_BG);
    suggestions
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, text)| {
            let spans = vec![
                Span::styled(format!(" {} ", i + 1), style.fg(theme::ACCENT)),
                Span::styled(format!("{text} "), style),
            ];
            Line::from(clip(spans, 0, width))
        })
        .collect()
}

/// Typing indicator shown while a reply is pending.
pub fn typing_indicator(spinner_frame: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} typing...", theme::spinner(spinner_frame)),
        Style::default().fg(theme::DIM),
    ))
}

/// Put a row on its side of the transcript, shifted by the slide offset
/// (away from the center) and clipped to `width`.
fn place(row: Vec<Span<'static>>, width: usize, side: Side, slide: usize) -> Line<'static> {
    let row_width: usize = row.iter().map(|s| str_width(&s.content)).sum();
    match side {
        Side::Left => Line::from(clip(row, slide, width)),
        Side::Right => {
            let indent = width.saturating_sub(row_width) + slide;
            let visible = width.saturating_sub(indent);
            let mut spans = Vec::with_capacity(row.len() + 1);
            spans.push(Span::raw(" ".repeat(indent.min(width))));
            spans.extend(clip(row, 0, visible));
            Line::from(spans)
        }
    }
}

fn str_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|s| str_width(&s.content)).sum()
}

/// Keep the columns `skip..skip + take` of a row of spans.
fn clip(spans: Vec<Span<'static>>, skip: usize, take: usize) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len());
    let mut col = 0usize;
    let end = skip.saturating_add(take);
    for span in spans {
        let mut kept = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if col >= skip && col + w <= end {
                kept.push(c);
            }
            col += w;
        }
        if !kept.is_empty() {
            out.push(Span::styled(kept, span.style));
        }
        if col >= end {
            break;
        }
    }
    out
}

/// Wrap a styled line at `width` columns, breaking between characters.
/// The line's own style is folded into its spans.
pub(super) fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let line_style = line.style;
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut col = 0usize;

    for span in line.spans {
        let style = line_style.patch(span.style);
        let mut chunk = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if col + w > width && col > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                rows.push(Line::from(std::mem::take(&mut current)));
                col = 0;
            }
            chunk.push(c);
            col += w;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
    rows.push(Line::from(current));
    rows
}
