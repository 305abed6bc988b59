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

use ratatui::layout::{Constraint, Layout, Rect};

/// Toggle button size.
pub const BUTTON_WIDTH: u16 = 7;
pub const BUTTON_HEIGHT: u16 = 3;
/// Gap between the button and the screen edge.
const EDGE_MARGIN: u16 = 1;
pub const PANEL_MAX_WIDTH: u16 = 60;
pub const PANEL_MAX_HEIGHT: u16 = 30;

/// Rows of the panel interior that are not the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelRows {
    /// Rows of composer content (the box border adds two).
    pub composer: u16,
    pub notice: bool,
    pub picker: bool,
    pub files: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    /// Outer panel including its border.
    pub panel: Rect,
    pub header: Rect,
    pub header_sep: Rect,
    pub body: Rect,
    pub notice: Rect,
    pub picker: Rect,
    pub files: Rect,
    pub input: Rect,
    pub hints: Rect,
}

/// The floating button, anchored to the bottom-right corner.
pub fn button(area: Rect) -> Rect {
    let width = BUTTON_WIDTH.min(area.width);
    let height = BUTTON_HEIGHT.min(area.height);
    let x = area.right().saturating_sub(width + EDGE_MARGIN).max(area.x);
    let y = area.bottom().saturating_sub(height).max(area.y);
    Rect::new(x, y, width, height)
}

/// The panel floats above the button, right-aligned with it.
pub fn panel(area: Rect) -> Rect {
    let button = button(area);
    let width = PANEL_MAX_WIDTH.min(area.width.saturating_sub(EDGE_MARGIN * 2));
    let height = PANEL_MAX_HEIGHT.min(button.y.saturating_sub(area.y));
    let x = button.right().saturating_sub(width).max(area.x);
    let y = button.y.saturating_sub(height);
    Rect::new(x, y, width, height)
}

pub fn compute(area: Rect, rows: PanelRows) -> PanelLayout {
    let panel = panel(area);
    let inner = Rect {
        x: panel.x.saturating_add(1),
        y: panel.y.saturating_add(1),
        width: panel.width.saturating_sub(2),
        height: panel.height.saturating_sub(2),
    };
    let [header, header_sep, body, notice, picker, files, input, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(u16::from(rows.notice)),
        Constraint::Length(u16::from(rows.picker)),
        Constraint::Length(u16::from(rows.files)),
        Constraint::Length(rows.composer.max(1) + 2),
        Constraint::Length(1),
    ])
    .areas(inner);
    PanelLayout { panel, header, header_sep, body, notice, picker, files, input, hints }
}
