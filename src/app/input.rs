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

use unicode_width::UnicodeWidthChar;

/// Multi-line text buffer behind the composer and the file-picker prompt.
#[derive(Debug, Clone)]
pub struct InputState {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self { lines: vec![String::new()], cursor_row: 0, cursor_col: 0 }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.insert_str(text);
    }

    pub fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        line.insert(byte_idx, c);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = line.split_off(byte_idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
    }

    /// Insert text at the cursor. `\r\n` and lone `\r` count as one newline.
    pub fn insert_str(&mut self, s: &str) {
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    self.insert_newline();
                }
                '\n' => self.insert_newline(),
                _ => self.insert_char(c),
            }
        }
    }

    pub fn delete_char_before(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            self.cursor_col -= 1;
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.remove(byte_idx);
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&removed);
        }
    }

    pub fn delete_char_after(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.remove(byte_idx);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
        }
    }

    pub fn move_right(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.lines[self.cursor_row].chars().count());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.lines[self.cursor_row].chars().count());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.lines[self.cursor_row].chars().count();
    }

    /// Rows the buffer occupies when wrapped at `width` columns.
    #[must_use]
    pub fn visual_line_count(&self, width: usize) -> usize {
        if width == 0 {
            return self.lines.len();
        }
        self.lines.iter().map(|line| wrapped_rows(line, width)).sum()
    }

    /// Cursor position (row, col) after wrapping at `width` columns.
    #[must_use]
    pub fn visual_cursor(&self, width: usize) -> (usize, usize) {
        if width == 0 {
            return (self.cursor_row, self.cursor_col);
        }
        let rows_before: usize =
            self.lines[..self.cursor_row].iter().map(|line| wrapped_rows(line, width)).sum();
        let (row, col) =
            layout_end(self.lines[self.cursor_row].chars().take(self.cursor_col), width);
        (rows_before + row, col)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Split one draft line into rows of `width` columns. A character that does
/// not fit starts the next row; a full last row is followed by an empty one,
/// where the cursor goes.
#[must_use]
pub fn wrap_draft_line(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_owned()];
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut col = 0usize;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            rows.push(std::mem::take(&mut current));
            col = 0;
        }
        current.push(c);
        col += w;
    }
    rows.push(current);
    if col >= width {
        rows.push(String::new());
    }
    rows
}

/// Row and column reached after laying `chars` out like [`wrap_draft_line`].
fn layout_end(chars: impl Iterator<Item = char>, width: usize) -> (usize, usize) {
    let (mut row, mut col) = (0usize, 0usize);
    for c in chars {
        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            row += 1;
            col = 0;
        }
        col += w;
    }
    if col >= width { (row + 1, 0) } else { (row, col) }
}

/// Rows a single logical line takes at `width`; an empty line still takes one.
fn wrapped_rows(line: &str, width: usize) -> usize {
    layout_end(line.chars(), width).0 + 1
}

/// Convert a character index to a byte index within a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
