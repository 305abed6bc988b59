// Draft attachments: long pastes, dropped paths and their previews.

use chat_widget::app::attachment::{FilePreview, PASTED_TEXT_NAME, PreviewKind};
use chat_widget::app::{MessageRole, handle_terminal_event};
use chat_widget::config::WidgetConfig;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use crate::helpers::{empty_config, pump_one, test_app_with};

fn paste(text: impl Into<String>) -> Event {
    Event::Paste(text.into())
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

#[tokio::test(start_paused = true)]
async fn paste_at_threshold_stays_inline() {
    let mut app = test_app_with(empty_config());
    let text = "x".repeat(500);
    handle_terminal_event(&mut app, paste(text.clone()));
    assert_eq!(app.composer.input.text(), text);
    assert!(app.composer.files().is_empty());
}

#[tokio::test(start_paused = true)]
async fn long_paste_becomes_text_attachment_with_preview() {
    let mut app = test_app_with(empty_config());
    let text = "y".repeat(501);
    handle_terminal_event(&mut app, paste(text));
    assert!(app.composer.input.is_empty());

    let files = app.composer.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, PASTED_TEXT_NAME);
    assert_eq!(files[0].mime, "text/plain");
    assert_eq!(files[0].size, 501);
    assert_eq!(files[0].kind, PreviewKind::Text);

    // Inline attachments get their preview without a round trip
    let expected = FilePreview::Text { snippet: format!("{}...", "y".repeat(50)) };
    assert_eq!(app.previews.get(&files[0].id), Some(&expected));
}

#[tokio::test(start_paused = true)]
async fn dropped_text_file_previews_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "short note").unwrap();

    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste(path.display().to_string()));
    assert!(app.composer.input.is_empty());
    assert!(!app.composer.is_dragging());
    let id = app.composer.files()[0].id;
    assert_eq!(app.composer.files()[0].name, "notes.txt");
    assert!(app.previews.get(&id).is_none());

    pump_one(&mut app).await;
    assert_eq!(app.previews.get(&id), Some(&FilePreview::Text { snippet: "short note".to_owned() }));
}

#[tokio::test(start_paused = true)]
async fn dropped_image_gets_data_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pic.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste(format!("'{}'", path.display())));
    let att = app.composer.files()[0].clone();
    assert_eq!(att.kind, PreviewKind::Image);
    assert_eq!(att.mime, "image/png");

    pump_one(&mut app).await;
    match app.previews.get(&att.id) {
        Some(FilePreview::Image { data_url }) => {
            assert_eq!(data_url, "data:image/png;base64,iVBORw==");
        }
        other => panic!("expected image preview, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn several_dropped_paths_attach_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.md");
    std::fs::write(&a, [0u8; 2048]).unwrap();
    std::fs::write(&b, "# title").unwrap();

    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste(format!("{}\n{}\n", a.display(), b.display())));
    let names: Vec<&str> = app.composer.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.bin", "b.md"]);
    let kinds: Vec<PreviewKind> = app.composer.files().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![PreviewKind::Generic, PreviewKind::Text]);
}

#[tokio::test(start_paused = true)]
async fn missing_path_is_pasted_as_text() {
    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste("/definitely/not/here.txt"));
    assert!(app.composer.files().is_empty());
    assert_eq!(app.composer.input.text(), "/definitely/not/here.txt");
}

#[tokio::test(start_paused = true)]
async fn submission_carries_files_and_clears_them() {
    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste("z".repeat(700)));
    app.composer.input.set_text("see attached");
    app.submit();

    let sent = app.store.last().unwrap();
    assert_eq!(sent.role, MessageRole::User);
    assert_eq!(sent.content, "see attached");
    let attached = sent.attachments.as_ref().unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].name, PASTED_TEXT_NAME);
    assert!(app.composer.files().is_empty());
    assert!(!app.composer.shows_file_list());
}

#[tokio::test(start_paused = true)]
async fn files_alone_do_not_submit() {
    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste("z".repeat(700)));
    app.submit();
    assert!(app.store.is_empty());
    assert_eq!(app.composer.files().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn ctrl_r_removes_last_file_and_preview() {
    let mut app = test_app_with(empty_config());
    handle_terminal_event(&mut app, paste("a".repeat(600)));
    handle_terminal_event(&mut app, paste("b".repeat(600)));
    let ids: Vec<_> = app.composer.files().iter().map(|f| f.id).collect();
    assert_eq!(ids.len(), 2);

    handle_terminal_event(&mut app, ctrl('r'));
    assert_eq!(app.composer.files().len(), 1);
    assert_eq!(app.composer.files()[0].id, ids[0]);
    assert!(!app.previews.contains_key(&ids[1]));

    handle_terminal_event(&mut app, ctrl('r'));
    assert!(!app.composer.shows_file_list());
}

#[tokio::test(start_paused = true)]
async fn disabled_attachments_keep_everything_inline() {
    let config = WidgetConfig { allow_attachments: false, ..empty_config() };
    let mut app = test_app_with(config);
    let long = "q".repeat(900);
    handle_terminal_event(&mut app, paste(long.clone()));
    assert_eq!(app.composer.input.text(), long);
    assert!(app.composer.files().is_empty());

    handle_terminal_event(&mut app, ctrl('a'));
    assert!(app.picker.is_none());
}
