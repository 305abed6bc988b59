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

use super::theme;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const THEME_NAME: &str = "base16-eighties.dark";

struct Assets {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

fn assets() -> &'static Assets {
    static ASSETS: OnceLock<Assets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(THEME_NAME)
            .or_else(|| theme_set.themes.into_values().next());
        Assets { syntax_set, theme }
    })
}

fn find_syntax<'a>(set: &'a SyntaxSet, lang: &str) -> Option<&'a SyntaxReference> {
    set.find_syntax_by_token(lang).or_else(|| set.find_syntax_by_extension(lang))
}

/// Highlight a code block. Unknown or missing languages render as plain
/// monospace text in the code color.
pub fn highlight_code(code: &str, lang: Option<&str>, bg: Option<Color>) -> Vec<Line<'static>> {
    let assets = assets();
    let highlighted = lang
        .filter(|l| !l.is_empty())
        .and_then(|l| find_syntax(&assets.syntax_set, l))
        .zip(assets.theme.as_ref())
        .and_then(|(syntax, theme)| highlight_with(code, syntax, theme, &assets.syntax_set, bg));
    highlighted.unwrap_or_else(|| plain_code(code, bg))
}

fn highlight_with(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
    set: &SyntaxSet,
    bg: Option<Color>,
) -> Option<Vec<Line<'static>>> {
    let mut h = HighlightLines::new(syntax, theme);
    let mut out = Vec::new();
    for line in syntect::util::LinesWithEndings::from(code) {
        let ranges = match h.highlight_line(line, set) {
            Ok(ranges) => ranges,
            Err(e) => {
                tracing::debug!("syntax highlighting failed: {e}");
                return None;
            }
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                let mut s = with_bg(Style::default(), bg).fg(Color::Rgb(
                    style.foreground.r,
                    style.foreground.g,
                    style.foreground.b,
                ));
                if style.font_style.contains(FontStyle::BOLD) {
                    s = s.add_modifier(Modifier::BOLD);
                }
                if style.font_style.contains(FontStyle::ITALIC) {
                    s = s.add_modifier(Modifier::ITALIC);
                }
                Span::styled(text.trim_end_matches(['\n', '\r']).to_owned(), s)
            })
            .collect();
        out.push(Line::from(spans));
    }
    Some(out)
}

fn plain_code(code: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let style = with_bg(Style::default().fg(theme::CODE_FG), bg);
    code.lines().map(|line| Line::from(Span::styled(line.to_owned(), style))).collect()
}

fn with_bg(style: Style, bg: Option<Color>) -> Style {
    if let Some(bg_color) = bg { style.bg(bg_color) } else { style }
}
