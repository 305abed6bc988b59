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

//! Timing-based paste detection for terminals without bracketed paste.
//!
//! Character keys are buffered briefly. Keys arriving faster than a human can
//! type form a burst; once the burst goes quiet, the buffered text is handed
//! over as one paste (or a file drop) instead of being typed character by
//! character. Humans type at ~200ms between keystrokes; 30ms is a safe upper
//! bound on Windows, where terminals add ~10-15ms latency per pasted character.

use std::time::{Duration, Instant};

/// Maximum interval between consecutive key events inside one burst.
#[cfg(not(windows))]
const BURST_INTERVAL: Duration = Duration::from_millis(8);

#[cfg(windows)]
const BURST_INTERVAL: Duration = Duration::from_millis(30);

/// Minimum number of key events in a burst to classify it as a paste.
/// A burst of 2-3 keys could be a fast typist or key repeat.
const MIN_BURST_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurstFlush {
    /// Ordinary typing; insert as-is.
    Typed(String),
    /// A paste burst; route through paste handling.
    Paste(String),
}

#[derive(Debug, Default)]
pub struct PasteBurst {
    last_key_time: Option<Instant>,
    burst_len: usize,
    buffer: String,
}

impl PasteBurst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_char(&mut self, c: char) {
        self.push_at(c, Instant::now());
    }

    fn push_at(&mut self, c: char, now: Instant) {
        self.record(now);
        self.buffer.push(c);
    }

    fn record(&mut self, now: Instant) {
        match self.last_key_time {
            Some(last) if now.duration_since(last) <= BURST_INTERVAL => self.burst_len += 1,
            _ => self.burst_len = 1,
        }
        self.last_key_time = Some(now);
    }

    /// An Enter that lands inside a paste burst is a pasted newline.
    /// Returns `true` when it was absorbed into the buffer.
    pub fn absorb_enter(&mut self) -> bool {
        self.absorb_enter_at(Instant::now())
    }

    fn absorb_enter_at(&mut self, now: Instant) -> bool {
        if self.is_paste() && self.is_active_at(now) {
            self.record(now);
            self.buffer.push('\n');
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_paste(&self) -> bool {
        self.burst_len >= MIN_BURST_LEN
    }

    /// A paste burst is currently being buffered.
    #[must_use]
    pub fn is_receiving(&self) -> bool {
        self.is_paste() && !self.buffer.is_empty()
    }

    fn is_active_at(&self, now: Instant) -> bool {
        self.last_key_time.is_some_and(|last| now.duration_since(last) <= BURST_INTERVAL)
    }

    /// Hand over the buffer once key events stopped arriving.
    pub fn flush(&mut self) -> Option<BurstFlush> {
        self.flush_at(Instant::now())
    }

    fn flush_at(&mut self, now: Instant) -> Option<BurstFlush> {
        if self.buffer.is_empty() || self.is_active_at(now) {
            return None;
        }
        Some(self.take())
    }

    /// Hand over the buffer right away, e.g. before a navigation key.
    pub fn flush_now(&mut self) -> Option<BurstFlush> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.take())
    }

    fn take(&mut self) -> BurstFlush {
        let text = std::mem::take(&mut self.buffer);
        let paste = self.is_paste();
        self.last_key_time = None;
        self.burst_len = 0;
        if paste { BurstFlush::Paste(text) } else { BurstFlush::Typed(text) }
    }
}
