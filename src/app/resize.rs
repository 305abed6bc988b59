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

//! Grow-with-content sizing for the composer.

/// An element whose height follows its content.
pub trait MeasuredElement {
    /// Height the content needs with no explicit height applied.
    fn scroll_height(&self) -> u16;
    fn clear_height(&mut self);
    fn set_height(&mut self, height: u16);
}

/// Recomputes an element's height whenever its dependencies change.
///
/// The first measurement (minus border compensation) becomes the floor; the
/// height never shrinks below it and never grows past `max_height`.
#[derive(Debug)]
pub struct AutoResize {
    max_height: u16,
    border_width: u16,
    floor: Option<u16>,
    last_dependencies: Option<u64>,
}

impl AutoResize {
    pub fn new(max_height: u16, border_width: u16) -> Self {
        Self { max_height, border_width, floor: None, last_dependencies: None }
    }

    #[must_use]
    pub fn floor(&self) -> Option<u16> {
        self.floor
    }

    fn border_adjustment(&self) -> u16 {
        self.border_width.saturating_mul(2)
    }

    /// Recompute when `dependencies` differs from the previous call.
    /// A missing element is skipped and does not consume the change.
    pub fn update(&mut self, element: Option<&mut dyn MeasuredElement>, dependencies: u64) {
        let Some(element) = element else {
            return;
        };
        if self.last_dependencies == Some(dependencies) {
            return;
        }
        self.last_dependencies = Some(dependencies);
        self.resize(element);
    }

    fn resize(&mut self, element: &mut dyn MeasuredElement) {
        let adjustment = self.border_adjustment();
        let floor =
            *self.floor.get_or_insert_with(|| element.scroll_height().saturating_sub(adjustment));

        element.clear_height();
        let content = element.scroll_height();
        let clamped = content.min(self.max_height).max(floor);
        element.set_height(clamped.saturating_add(adjustment));
    }
}
