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

//! Stick-to-bottom scrolling for the transcript.
//!
//! `AutoScroll` is a two-state machine. While `Following`, every change of
//! the transcript content pins the viewport to the bottom. A scroll that moves
//! up, or a touch (mouse press) on the transcript, switches to `Detached`.
//! Scrolling back down to within the activation threshold of the bottom
//! resumes following.

/// Activation threshold in container units (pixels for a DOM-like container).
pub const DEFAULT_ACTIVATION_THRESHOLD: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Following,
    Detached,
}

/// Scroll geometry of the transcript container, DOM style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_top: usize,
    /// Total content height.
    pub scroll_height: usize,
    /// Visible height.
    pub client_height: usize,
}

impl Viewport {
    #[must_use]
    pub fn max_scroll_top(&self) -> usize {
        self.scroll_height.saturating_sub(self.client_height)
    }

    #[must_use]
    pub fn distance_from_bottom(&self) -> usize {
        self.scroll_height.saturating_sub(self.scroll_top).saturating_sub(self.client_height)
    }

    /// Assign `scroll_top`, clamped the way a browser clamps it.
    pub fn set_scroll_top(&mut self, top: usize) {
        self.scroll_top = top.min(self.max_scroll_top());
    }
}

#[derive(Debug)]
pub struct AutoScroll {
    mode: ScrollMode,
    /// Offset seen by the previous scroll event. `None` counts as "not
    /// scrolling up".
    previous_scroll_top: Option<usize>,
    threshold: usize,
    viewport: Viewport,
    /// Content revision the viewport was last pinned for.
    seen_revision: Option<u64>,
}

impl AutoScroll {
    /// A threshold of 0 is raised to 1; reaching the bottom must re-attach.
    pub fn new(threshold: usize) -> Self {
        Self {
            mode: ScrollMode::Following,
            previous_scroll_top: None,
            threshold: threshold.max(1),
            viewport: Viewport::default(),
            seen_revision: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    #[must_use]
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::Following
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn scroll_top(&self) -> usize {
        self.viewport.scroll_top
    }

    /// Record the measured content and visible heights (layout pass).
    /// This is not a scroll event; the offset is only clamped.
    pub fn set_geometry(&mut self, scroll_height: usize, client_height: usize) {
        self.viewport.scroll_height = scroll_height;
        self.viewport.client_height = client_height;
        let top = self.viewport.scroll_top;
        self.viewport.set_scroll_top(top);
    }

    /// A scroll event reporting the container's current geometry.
    pub fn handle_scroll(&mut self) {
        let scroll_top = self.viewport.scroll_top;
        let scrolling_up = self.previous_scroll_top.is_some_and(|prev| scroll_top < prev);

        if scrolling_up {
            if self.mode == ScrollMode::Following {
                tracing::debug!(scroll_top, "auto-scroll detached: scrolled up");
            }
            self.mode = ScrollMode::Detached;
        } else if self.viewport.distance_from_bottom() < self.threshold
            && self.mode == ScrollMode::Detached
        {
            tracing::debug!(scroll_top, "auto-scroll re-attached near bottom");
            self.mode = ScrollMode::Following;
        }

        self.previous_scroll_top = Some(scroll_top);
    }

    /// User scrolled by `delta` units (negative is up).
    pub fn scroll_by(&mut self, delta: isize) {
        let top = self.viewport.scroll_top.saturating_add_signed(delta);
        self.viewport.set_scroll_top(top);
        self.handle_scroll();
    }

    /// Touch intent on the transcript suspends following right away.
    pub fn handle_touch_start(&mut self) {
        if self.mode == ScrollMode::Following {
            tracing::debug!("auto-scroll detached: touch");
        }
        self.mode = ScrollMode::Detached;
    }

    /// Explicit "jump to bottom". The resulting scroll event re-attaches.
    pub fn scroll_to_bottom(&mut self) {
        let bottom = self.viewport.scroll_height;
        self.viewport.set_scroll_top(bottom);
        self.handle_scroll();
    }

    /// The observed content changed. Pins to the bottom while following.
    pub fn dependencies_changed(&mut self) {
        if self.mode == ScrollMode::Following {
            let bottom = self.viewport.scroll_height;
            self.viewport.set_scroll_top(bottom);
            self.previous_scroll_top = Some(self.viewport.scroll_top);
        }
    }

    /// Run [`Self::dependencies_changed`] when `revision` differs from the
    /// one seen last time. Returns whether it ran.
    pub fn observe_revision(&mut self, revision: u64) -> bool {
        if self.seen_revision == Some(revision) {
            return false;
        }
        self.seen_revision = Some(revision);
        self.dependencies_changed();
        true
    }
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_THRESHOLD)
    }
}
