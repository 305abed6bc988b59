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

//! Draft state and the gestures that feed it.

use super::attachment::{Attachment, AttachmentFactory, PASTED_TEXT_NAME, paths_from_paste};
use super::input::InputState;
use std::path::PathBuf;

/// Pastes longer than this many characters become an attachment.
pub const PASTE_TO_FILE_THRESHOLD: usize = 500;

/// What an Enter key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    Submit,
    /// Stop the reply in flight, then submit.
    InterruptAndSubmit,
    /// First Enter while generating: the prompt is now visible.
    ShowInterruptPrompt,
    InsertNewline,
}

#[derive(Debug, Clone)]
pub enum PasteOutcome {
    /// Attachments were added; nothing was inserted inline.
    Attached(Vec<Attachment>),
    Inserted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerOptions {
    pub allow_attachments: bool,
    pub enable_interrupt: bool,
    pub submit_on_enter: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self { allow_attachments: true, enable_interrupt: true, submit_on_enter: true }
    }
}

/// A draft ready to become a user message.
#[derive(Debug, Clone)]
pub struct Submission {
    pub text: String,
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug)]
pub struct Composer {
    pub input: InputState,
    files: Option<Vec<Attachment>>,
    dragging: bool,
    interrupt_prompt: bool,
    options: ComposerOptions,
    factory: AttachmentFactory,
}

impl Composer {
    pub fn new(options: ComposerOptions) -> Self {
        Self {
            input: InputState::new(),
            files: None,
            dragging: false,
            interrupt_prompt: false,
            options,
            factory: AttachmentFactory::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> ComposerOptions {
        self.options
    }

    #[must_use]
    pub fn files(&self) -> &[Attachment] {
        self.files.as_deref().unwrap_or_default()
    }

    /// The file strip is shown only when attachments are enabled and present.
    #[must_use]
    pub fn shows_file_list(&self) -> bool {
        self.options.allow_attachments && !self.files().is_empty()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn interrupt_prompt_visible(&self) -> bool {
        self.interrupt_prompt
    }

    fn has_content(&self) -> bool {
        !self.input.is_empty() || (self.options.allow_attachments && !self.files().is_empty())
    }

    /// Decide what Enter does. `can_stop` is whether a stop action exists.
    pub fn on_enter(&mut self, shift: bool, is_generating: bool, can_stop: bool) -> EnterAction {
        if !self.options.submit_on_enter || shift {
            return EnterAction::InsertNewline;
        }
        if is_generating && can_stop && self.options.enable_interrupt {
            if self.interrupt_prompt {
                self.interrupt_prompt = false;
                return EnterAction::InterruptAndSubmit;
            }
            if self.has_content() {
                self.interrupt_prompt = true;
                return EnterAction::ShowInterruptPrompt;
            }
        }
        EnterAction::Submit
    }

    /// Generation ended; the interrupt prompt has nothing left to interrupt.
    pub fn generation_finished(&mut self) {
        self.interrupt_prompt = false;
    }

    pub fn dismiss_interrupt_prompt(&mut self) {
        self.interrupt_prompt = false;
    }

    /// Append to the draft's file list. Returns what was added, which is
    /// nothing when attachments are disabled.
    pub fn add_files(&mut self, files: Vec<Attachment>) -> Vec<Attachment> {
        if !self.options.allow_attachments || files.is_empty() {
            return Vec::new();
        }
        let added = files.clone();
        match &mut self.files {
            Some(current) => current.extend(files),
            None => self.files = Some(files),
        }
        added
    }

    /// Attach files by path. Unreadable paths are skipped.
    pub fn attach_paths(&mut self, paths: &[PathBuf]) -> Vec<Attachment> {
        if !self.options.allow_attachments {
            return Vec::new();
        }
        let mut attachments = Vec::with_capacity(paths.len());
        for path in paths {
            match self.factory.from_path(path) {
                Ok(att) => attachments.push(att),
                Err(e) => tracing::warn!(path = %path.display(), "cannot attach: {e}"),
            }
        }
        self.add_files(attachments)
    }

    pub fn drag_enter(&mut self) {
        if self.options.allow_attachments {
            self.dragging = true;
        }
    }

    pub fn drag_leave(&mut self) {
        if self.options.allow_attachments {
            self.dragging = false;
        }
    }

    pub fn drop_paths(&mut self, paths: &[PathBuf]) -> Vec<Attachment> {
        self.dragging = false;
        self.attach_paths(paths)
    }

    /// Paste handling: long text becomes a `Pasted text` attachment, pasted
    /// file paths become attachments, anything else is inserted inline.
    pub fn on_paste(&mut self, text: &str) -> PasteOutcome {
        if self.options.allow_attachments && text.chars().count() > PASTE_TO_FILE_THRESHOLD {
            let attachment = self.factory.from_text(PASTED_TEXT_NAME, text);
            tracing::debug!(chars = text.chars().count(), "long paste converted to attachment");
            return PasteOutcome::Attached(self.add_files(vec![attachment]));
        }
        if self.options.allow_attachments
            && let Some(paths) = paths_from_paste(text)
        {
            self.drag_enter();
            let added = self.drop_paths(&paths);
            if !added.is_empty() {
                return PasteOutcome::Attached(added);
            }
        }
        self.input.insert_str(text);
        PasteOutcome::Inserted
    }

    /// Remove the most recently attached file.
    pub fn remove_last_file(&mut self) -> Option<Attachment> {
        let files = self.files.as_mut()?;
        let removed = files.pop();
        if files.is_empty() {
            self.files = None;
        }
        removed
    }

    /// Take the draft for submission. Whitespace-only text yields nothing and
    /// leaves the draft untouched; otherwise the text is cleared and the files
    /// are handed over when there are any.
    pub fn take_submission(&mut self) -> Option<Submission> {
        let text = self.input.text();
        if text.trim().is_empty() {
            return None;
        }
        self.input.clear();
        let attachments = if self.options.allow_attachments { self.files.take() } else { None };
        Some(Submission { text, attachments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::attachment::PreviewKind;
    use pretty_assertions::assert_eq;

    fn composer() -> Composer {
        Composer::new(ComposerOptions::default())
    }

    #[test]
    fn paste_of_501_chars_becomes_one_attachment() {
        let mut c = composer();
        let text = "a".repeat(501);
        let PasteOutcome::Attached(added) = c.on_paste(&text) else {
            panic!("expected attachment");
        };
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].name, PASTED_TEXT_NAME);
        assert_eq!(added[0].kind, PreviewKind::Text);
        assert_eq!(c.files().len(), 1);
        assert!(c.input.is_empty());
    }

    #[test]
    fn paste_of_500_chars_is_inserted() {
        let mut c = composer();
        let text = "a".repeat(500);
        assert!(matches!(c.on_paste(&text), PasteOutcome::Inserted));
        assert_eq!(c.input.text(), text);
        assert!(c.files().is_empty());
    }

    #[test]
    fn long_paste_is_inserted_when_attachments_disabled() {
        let mut c = Composer::new(ComposerOptions { allow_attachments: false, ..Default::default() });
        let text = "b".repeat(800);
        assert!(matches!(c.on_paste(&text), PasteOutcome::Inserted));
        assert_eq!(c.input.text().len(), 800);
    }

    #[test]
    fn pasted_paths_attach_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hi").unwrap();
        let mut c = composer();
        let PasteOutcome::Attached(added) = c.on_paste(&path.display().to_string()) else {
            panic!("expected attachment");
        };
        assert_eq!(added[0].name, "notes.txt");
        assert!(!c.is_dragging());
        assert!(c.input.is_empty());
    }

    #[test]
    fn pasted_relative_file_name_is_typed() {
        assert!(std::path::Path::new("Cargo.toml").is_file());
        let mut c = composer();
        assert!(matches!(c.on_paste("Cargo.toml"), PasteOutcome::Inserted));
        assert_eq!(c.input.text(), "Cargo.toml");
        assert!(c.files().is_empty());
        assert!(!c.is_dragging());
    }

    #[test]
    fn enter_submits_when_idle() {
        let mut c = composer();
        c.input.insert_str("hi");
        assert_eq!(c.on_enter(false, false, true), EnterAction::Submit);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut c = composer();
        assert_eq!(c.on_enter(true, false, true), EnterAction::InsertNewline);
    }

    #[test]
    fn enter_twice_while_generating_interrupts() {
        let mut c = composer();
        c.input.insert_str("next question");
        assert_eq!(c.on_enter(false, true, true), EnterAction::ShowInterruptPrompt);
        assert!(c.interrupt_prompt_visible());
        assert_eq!(c.on_enter(false, true, true), EnterAction::InterruptAndSubmit);
        assert!(!c.interrupt_prompt_visible());
    }

    #[test]
    fn empty_draft_while_generating_skips_prompt() {
        let mut c = composer();
        assert_eq!(c.on_enter(false, true, true), EnterAction::Submit);
        assert!(!c.interrupt_prompt_visible());
    }

    #[test]
    fn interrupt_disabled_submits_directly() {
        let mut c = Composer::new(ComposerOptions { enable_interrupt: false, ..Default::default() });
        c.input.insert_str("x");
        assert_eq!(c.on_enter(false, true, true), EnterAction::Submit);
    }

    #[test]
    fn generation_finished_hides_prompt() {
        let mut c = composer();
        c.input.insert_str("x");
        c.on_enter(false, true, true);
        c.generation_finished();
        assert!(!c.interrupt_prompt_visible());
        assert_eq!(c.on_enter(false, false, true), EnterAction::Submit);
    }

    #[test]
    fn drag_flag_requires_attachments() {
        let mut c = composer();
        c.drag_enter();
        assert!(c.is_dragging());
        c.drag_leave();
        assert!(!c.is_dragging());

        let mut off = Composer::new(ComposerOptions { allow_attachments: false, ..Default::default() });
        off.drag_enter();
        assert!(!off.is_dragging());
    }

    #[test]
    fn submission_clears_text_and_takes_files() {
        let mut c = composer();
        c.on_paste(&"z".repeat(600));
        c.input.insert_str("see attached");
        let sub = c.take_submission().unwrap();
        assert_eq!(sub.text, "see attached");
        assert_eq!(sub.attachments.map(|a| a.len()), Some(1));
        assert!(c.input.is_empty());
        assert!(c.files().is_empty());
    }

    #[test]
    fn whitespace_submission_keeps_draft() {
        let mut c = composer();
        c.on_paste(&"z".repeat(600));
        c.input.insert_str("   \n  ");
        assert!(c.take_submission().is_none());
        assert_eq!(c.files().len(), 1);
        assert_eq!(c.input.text(), "   \n  ");
    }

    #[test]
    fn remove_last_file_empties_list() {
        let mut c = composer();
        c.on_paste(&"z".repeat(600));
        assert!(c.remove_last_file().is_some());
        assert!(!c.shows_file_list());
        assert!(c.remove_last_file().is_none());
    }
}
