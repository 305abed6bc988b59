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

use crate::app::attachment::{Attachment, AttachmentId, FilePreview, PreviewKind, human_size};
use crate::ui::theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

const LOADING: &str = "Loading...";

fn chip_style() -> Style {
    Style::default().fg(theme::CHIP_FG).bg(theme::CHIP_BG)
}

/// One attachment as a single-line chip. The presentation is picked by the
/// attachment's kind; the preview fills in once it has loaded.
pub fn chip(att: &Attachment, preview: Option<&FilePreview>) -> Line<'static> {
    let name = Span::styled(format!(" {} ", att.name), chip_style().add_modifier(Modifier::BOLD));
    let detail = match att.kind {
        PreviewKind::Image => image_detail(att, preview),
        PreviewKind::Text => text_detail(preview),
        PreviewKind::Generic => human_size(att.size),
    };
    let icon = match att.kind {
        PreviewKind::Image => theme::ICON_IMAGE,
        PreviewKind::Text | PreviewKind::Generic => theme::ICON_FILE,
    };
    Line::from(vec![
        Span::styled(format!(" {icon}"), chip_style()),
        name,
        Span::styled(format!("{detail} "), chip_style().fg(theme::DIM)),
    ])
}

fn image_detail(att: &Attachment, preview: Option<&FilePreview>) -> String {
    match preview {
        Some(FilePreview::Image { data_url }) if !data_url.is_empty() => {
            format!("{} {}", att.mime, human_size(att.size))
        }
        // Too large or unreadable: metadata alone
        Some(FilePreview::Generic) => format!("{} {}", att.mime, human_size(att.size)),
        _ => LOADING.to_owned(),
    }
}

fn text_detail(preview: Option<&FilePreview>) -> String {
    match preview {
        Some(FilePreview::Text { snippet }) => {
            let flat: String =
                snippet.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
            format!("\"{flat}\"")
        }
        _ => LOADING.to_owned(),
    }
}

/// Chips for a list of attachments, one per line.
pub fn chips(
    attachments: &[Attachment],
    previews: &HashMap<AttachmentId, FilePreview>,
) -> Vec<Line<'static>> {
    attachments.iter().map(|att| chip(att, previews.get(&att.id))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::attachment::AttachmentFactory;
    use pretty_assertions::assert_eq;

    fn text_attachment() -> Attachment {
        AttachmentFactory::new().from_text("Pasted text", &"x".repeat(80))
    }

    #[test]
    fn text_chip_shows_loading_until_preview() {
        let att = text_attachment();
        let line = chip(&att, None).to_string();
        assert!(line.contains("Pasted text"));
        assert!(line.contains("Loading..."));
    }

    #[test]
    fn text_chip_shows_snippet() {
        let att = text_attachment();
        let preview = FilePreview::Text { snippet: "first line\nsecond...".to_owned() };
        let line = chip(&att, Some(&preview)).to_string();
        assert!(line.contains("\"first line second...\""), "{line}");
    }

    #[test]
    fn generic_chip_shows_size() {
        let mut att = text_attachment();
        att.kind = PreviewKind::Generic;
        att.size = 2048;
        let line = chip(&att, Some(&FilePreview::Generic)).to_string();
        assert!(line.contains("2.0 KB"), "{line}");
    }

    #[test]
    fn image_chip_waits_for_data_url() {
        let mut att = text_attachment();
        att.kind = PreviewKind::Image;
        att.mime = "image/png".to_owned();
        assert!(chip(&att, None).to_string().contains("Loading..."));
        let preview = FilePreview::Image { data_url: "data:image/png;base64,AA==".to_owned() };
        assert!(chip(&att, Some(&preview)).to_string().contains("image/png"));
    }

    #[test]
    fn image_without_data_url_shows_metadata() {
        let mut att = text_attachment();
        att.kind = PreviewKind::Image;
        att.mime = "image/png".to_owned();
        att.size = 3 * 1024 * 1024;
        let line = chip(&att, Some(&FilePreview::Generic)).to_string();
        assert!(line.contains("image/png 3.0 MB"), "{line}");
        assert!(!line.contains("Loading..."));
    }

    #[test]
    fn chips_follow_attachment_order() {
        let mut factory = AttachmentFactory::new();
        let a = factory.from_text("a.txt", "a");
        let b = factory.from_text("b.txt", "b");
        let lines = chips(&[a, b], &HashMap::new());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].to_string().contains("a.txt"));
    }
}
