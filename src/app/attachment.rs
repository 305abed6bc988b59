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

//! Draft and message attachments.
//!
//! The preview presentation is a closed choice between image, text snippet
//! and generic file, decided once by [`classify`] when the attachment is
//! created. Preview content (data URL, snippet) is loaded off the event loop
//! and delivered back as a [`WidgetEvent::PreviewReady`].

use super::WidgetEvent;
use base64::Engine as _;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt as _;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Characters shown in a text preview before the ellipsis.
pub const TEXT_PREVIEW_CHARS: usize = 50;

/// Name given to long pastes converted into an attachment.
pub const PASTED_TEXT_NAME: &str = "Pasted text";

/// Bytes read from a text file to build its snippet. Generous enough for
/// 50 characters of any UTF-8 text.
const TEXT_PREVIEW_READ_BYTES: u64 = 1024;

/// Images larger than this get no data URL, only the name, type and size.
pub const IMAGE_PREVIEW_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Text,
    Generic,
}

#[derive(Debug, Clone)]
pub enum AttachmentSource {
    Path(PathBuf),
    Inline(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub source: AttachmentSource,
    pub kind: PreviewKind,
}

/// Loaded preview content for one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePreview {
    Image { data_url: String },
    Text { snippet: String },
    Generic,
}

/// Pick the preview presentation from the file name and MIME type.
#[must_use]
pub fn classify(name: &str, mime: &str) -> PreviewKind {
    if mime.starts_with("image/") {
        PreviewKind::Image
    } else if mime.starts_with("text/")
        || name.ends_with(".txt")
        || name.ends_with(".md")
    {
        PreviewKind::Text
    } else {
        PreviewKind::Generic
    }
}

/// First [`TEXT_PREVIEW_CHARS`] characters, with `...` when truncated.
#[must_use]
pub fn text_snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TEXT_PREVIEW_CHARS).collect();
    if chars.next().is_some() { format!("{head}...") } else { head }
}

#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

#[must_use]
pub fn preview_from_bytes(kind: PreviewKind, mime: &str, bytes: &[u8]) -> FilePreview {
    match kind {
        PreviewKind::Image => FilePreview::Image { data_url: data_url(mime, bytes) },
        PreviewKind::Text => FilePreview::Text { snippet: text_snippet(&String::from_utf8_lossy(bytes)) },
        PreviewKind::Generic => FilePreview::Generic,
    }
}

/// Hands out attachment ids for one session.
#[derive(Debug, Default)]
pub struct AttachmentFactory {
    next_id: u64,
}

impl AttachmentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> AttachmentId {
        self.next_id += 1;
        AttachmentId(self.next_id)
    }

    /// Describe a file on disk. Only metadata is read here.
    pub fn from_path(&mut self, path: &Path) -> std::io::Result<Attachment> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_owned();
        let kind = classify(&name, &mime);
        Ok(Attachment {
            id: self.next_id(),
            name,
            mime,
            size: metadata.len(),
            source: AttachmentSource::Path(path.to_path_buf()),
            kind,
        })
    }

    /// Wrap text (a long paste) as a `text/plain` attachment.
    pub fn from_text(&mut self, name: &str, text: &str) -> Attachment {
        let bytes: Arc<[u8]> = Arc::from(text.as_bytes());
        let mime = "text/plain".to_owned();
        Attachment {
            id: self.next_id(),
            name: name.to_owned(),
            kind: classify(name, &mime),
            mime,
            size: bytes.len() as u64,
            source: AttachmentSource::Inline(bytes),
        }
    }
}

/// Build the preview for an attachment, reading from disk when needed.
///
/// Read failures and images larger than [`IMAGE_PREVIEW_MAX_BYTES`] degrade
/// to [`FilePreview::Generic`].
pub async fn load_preview(attachment: &Attachment) -> FilePreview {
    load_preview_capped(attachment, IMAGE_PREVIEW_MAX_BYTES).await
}

async fn load_preview_capped(attachment: &Attachment, max_image_bytes: u64) -> FilePreview {
    if attachment.kind == PreviewKind::Generic {
        return FilePreview::Generic;
    }
    let bytes = match &attachment.source {
        AttachmentSource::Inline(bytes) => bytes.to_vec(),
        AttachmentSource::Path(path) => {
            match read_for_preview(path, attachment.kind, max_image_bytes).await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => {
                    tracing::debug!(path = %path.display(), "image too large to preview");
                    return FilePreview::Generic;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "attachment preview read failed: {e}");
                    return FilePreview::Generic;
                }
            }
        }
    };
    preview_from_bytes(attachment.kind, &attachment.mime, &bytes)
}

/// Text reads are bounded; images are read whole or not at all, since a
/// truncated image makes a broken data URL. `None` means over the cap.
async fn read_for_preview(
    path: &Path,
    kind: PreviewKind,
    max_image_bytes: u64,
) -> std::io::Result<Option<Vec<u8>>> {
    if kind == PreviewKind::Text {
        let file = tokio::fs::File::open(path).await?;
        let mut buf = Vec::new();
        file.take(TEXT_PREVIEW_READ_BYTES).read_to_end(&mut buf).await?;
        return Ok(Some(buf));
    }
    if tokio::fs::metadata(path).await?.len() > max_image_bytes {
        return Ok(None);
    }
    tokio::fs::read(path).await.map(Some)
}

/// Load the preview in the background and report it on `tx`.
/// Nothing is reported once `session` is cancelled.
pub fn spawn_preview_load(
    attachment: Attachment,
    tx: mpsc::UnboundedSender<WidgetEvent>,
    session: CancellationToken,
) {
    tokio::spawn(async move {
        tokio::select! {
            () = session.cancelled() => {
                tracing::debug!(id = %attachment.id, "preview load dropped: session ended");
            }
            preview = load_preview(&attachment) => {
                let _ = tx.send(WidgetEvent::PreviewReady { id: attachment.id, preview });
            }
        }
    });
}

/// Interpret pasted text as dropped files.
///
/// Terminals deliver a drag-and-drop as pasted path text: absolute paths,
/// `~/` paths or `file://` URIs. Every non-empty line has to be one of those
/// and name an existing regular file, otherwise the paste is text. A bare
/// relative name such as `main.rs` is always text.
#[must_use]
pub fn paths_from_paste(text: &str) -> Option<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let path = normalize_dropped_path(line)?;
        if !path.is_file() {
            return None;
        }
        paths.push(path);
    }
    if paths.is_empty() { None } else { Some(paths) }
}

fn normalize_dropped_path(raw: &str) -> Option<PathBuf> {
    let unquoted = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(raw);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let path = expand_home(&without_scheme.replace("\\ ", " "));
    path.is_absolute().then_some(path)
}

/// Expand a leading `~/` to the home directory.
#[must_use]
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

#[must_use]
pub fn human_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", value / 1024.0)
    } else {
        format!("{:.1} MB", value / (1024.0 * 1024.0))
    }
}
