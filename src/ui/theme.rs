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

use ratatui::style::Color;

// Accent
pub const ACCENT: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const BORDER: Color = Color::Gray;
pub const PANEL_BG: Color = Color::Rgb(24, 26, 31);
pub const PROMPT_CHAR: &str = "❯";
pub const SEPARATOR_CHAR: &str = "─";
pub const CODE_LABEL_CHAR: &str = "▍";

// Bubbles
pub const USER_BUBBLE_BG: Color = Color::Rgb(40, 44, 52);
pub const USER_BUBBLE_FG: Color = Color::White;
pub const ASSISTANT_BUBBLE_BG: Color = Color::Rgb(30, 32, 38);
pub const CODE_FG: Color = Color::Rgb(200, 200, 180);

// Tool invocation
pub const TOOL_PENDING: Color = Color::Cyan;
pub const TOOL_RESULT: Color = Color::Green;

// Chips and buttons
pub const CHIP_FG: Color = Color::White;
pub const CHIP_BG: Color = Color::Rgb(55, 60, 70);
pub const DROP_ZONE: Color = Color::Cyan;

// Toasts
pub const TOAST_SUCCESS: Color = Color::Green;
pub const TOAST_ERROR: Color = Color::Red;

pub const ICON_COPIED: &str = "✓";
pub const ICON_THUMBS_UP: &str = "▲";
pub const ICON_THUMBS_DOWN: &str = "▼";
pub const ICON_FILE: &str = "▤";
pub const ICON_IMAGE: &str = "▨";
pub const ICON_CHAT: &str = "◉";
pub const ICON_CLOSE: &str = "✕";

pub const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Spinner glyph for animation frame `frame`.
pub fn spinner(frame: usize) -> char {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}
