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

use super::{highlight, theme};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::panic::{self, AssertUnwindSafe};

/// A piece of message content: Markdown prose, or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose(String),
    /// Fenced code. `code` keeps its trailing newline.
    Code { lang: Option<String>, code: String },
}

/// Split `content` at fenced code blocks. Indented code stays in the prose;
/// blank prose between blocks is dropped.
pub fn split_fenced(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut prose_start = 0usize;
    let mut open: Option<(usize, Option<String>, String)> = None;

    for (event, range) in Parser::new_ext(content, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().map(str::to_owned);
                open = Some((range.start, lang, String::new()));
            }
            Event::Text(text) => {
                if let Some((_, _, code)) = open.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some((start, lang, code)) = open.take() else {
                    continue;
                };
                let prose = &content[prose_start..start];
                if !prose.trim().is_empty() {
                    segments.push(Segment::Prose(prose.to_owned()));
                }
                segments.push(Segment::Code { lang, code });
                prose_start = range.end;
            }
            _ => {}
        }
    }

    let rest = &content[prose_start..];
    if !rest.trim().is_empty() {
        segments.push(Segment::Prose(rest.to_owned()));
    }
    segments
}

/// Render message content: Markdown for prose, syntax highlighting for
/// fenced code. The lines are unwrapped; the caller wraps them.
pub fn render_content(content: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let mut out: Vec<Line<'static>> = Vec::new();
    for segment in split_fenced(content) {
        match segment {
            Segment::Prose(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                out.extend(render_markdown_safe(&text, bg));
            }
            Segment::Code { lang, code } => {
                if !out.is_empty() {
                    out.push(Line::default());
                }
                out.push(code_label(lang.as_deref(), bg));
                out.extend(highlight::highlight_code(&code, lang.as_deref(), bg));
                out.push(Line::default());
            }
        }
    }
    while out.last().is_some_and(|l| l.spans.iter().all(|s| s.content.trim().is_empty())) {
        out.pop();
    }
    out
}

fn code_label(lang: Option<&str>, bg: Option<Color>) -> Line<'static> {
    let style = Style::default().fg(theme::DIM);
    let style = if let Some(bg_color) = bg { style.bg(bg_color) } else { style };
    Line::from(Span::styled(format!("{} {}", theme::CODE_LABEL_CHAR, lang.unwrap_or("code")), style))
}

pub(super) fn render_markdown_safe(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    render_markdown_safe_with(text, bg, render_with_tui_markdown)
}

fn render_markdown_safe_with<F>(text: &str, bg: Option<Color>, renderer: F) -> Vec<Line<'static>>
where
    F: FnOnce(&str, Option<Color>) -> Vec<Line<'static>>,
{
    if let Ok(lines) = panic::catch_unwind(AssertUnwindSafe(|| renderer(text, bg))) {
        lines
    } else {
        tracing::warn!("tui-markdown panic; falling back to plain text");
        plain_text_fallback(text, bg)
    }
}

fn render_with_tui_markdown(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| {
                    let style =
                        if let Some(bg_color) = bg { span.style.bg(bg_color) } else { span.style };
                    Span::styled(span.content.into_owned(), style)
                })
                .collect();
            let line_style =
                if let Some(bg_color) = bg { line.style.bg(bg_color) } else { line.style };
            Line::from(spans).style(line_style)
        })
        .collect()
}

fn plain_text_fallback(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let style =
        if let Some(bg_color) = bg { Style::default().bg(bg_color) } else { Style::default() };
    text.split('\n').map(|line| Line::from(Span::styled(line.to_owned(), style))).collect()
}
