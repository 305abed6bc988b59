// Copy-to-clipboard feedback and response ratings.

use chat_widget::app::{
    App, COPIED_CODE_MESSAGE, COPIED_INDICATOR_DURATION, COPIED_RESPONSE_MESSAGE,
    COPY_FAILED_MESSAGE, MessageRole, Rating, TOAST_DURATION, ToastLevel, handle_terminal_event,
};
use chat_widget::config::WidgetConfig;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use std::time::Instant;

use crate::helpers::{FailingClipboard, RecordingClipboard, empty_config, pump_one};

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn alt(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT))
}

fn recording_app(config: WidgetConfig) -> (App, RecordingClipboard) {
    let clipboard = RecordingClipboard::default();
    let mut app = App::with_clipboard(config, Box::new(clipboard.clone()));
    app.open();
    (app, clipboard)
}

fn copied(clipboard: &RecordingClipboard) -> Vec<String> {
    clipboard.copied.lock().unwrap().clone()
}

#[tokio::test(start_paused = true)]
async fn copy_response_reports_success() {
    let (mut app, clipboard) = recording_app(empty_config());
    app.composer.input.set_text("Hi");
    app.submit();
    pump_one(&mut app).await;

    handle_terminal_event(&mut app, ctrl('y'));
    assert_eq!(copied(&clipboard), vec!["You asked: \"Hi\". Here's some info!".to_owned()]);
    let toast = app.toast.as_ref().unwrap();
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.message, COPIED_RESPONSE_MESSAGE);
    assert!(app.copied_at.is_some());
}

#[tokio::test]
async fn copy_code_takes_the_fenced_block() {
    let (mut app, clipboard) = recording_app(WidgetConfig::default());
    handle_terminal_event(&mut app, ctrl('k'));
    assert_eq!(copied(&clipboard), vec!["console.log(\"Hello World\")\n".to_owned()]);
    assert_eq!(app.toast.as_ref().unwrap().message, COPIED_CODE_MESSAGE);
}

#[tokio::test]
async fn nothing_to_copy_is_silent() {
    let (mut app, clipboard) = recording_app(empty_config());
    handle_terminal_event(&mut app, ctrl('y'));
    handle_terminal_event(&mut app, ctrl('k'));
    assert!(copied(&clipboard).is_empty());
    assert!(app.toast.is_none());
}

#[tokio::test]
async fn clipboard_failure_shows_error_toast_once() {
    let mut app = App::with_clipboard(WidgetConfig::default(), Box::new(FailingClipboard));
    app.open();
    handle_terminal_event(&mut app, ctrl('y'));
    let toast = app.toast.clone().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, COPY_FAILED_MESSAGE);
    assert!(app.copied_at.is_none());
}

#[tokio::test]
async fn toast_and_copied_mark_expire() {
    let (mut app, _clipboard) = recording_app(WidgetConfig::default());
    handle_terminal_event(&mut app, ctrl('y'));
    let start = Instant::now();

    app.tick(start + COPIED_INDICATOR_DURATION);
    assert!(app.copied_at.is_none());
    assert!(app.toast.is_some());

    app.tick(start + TOAST_DURATION);
    assert!(app.toast.is_none());
}

#[tokio::test(start_paused = true)]
async fn rating_applies_to_latest_reply() {
    let (mut app, _clipboard) = recording_app(empty_config());
    handle_terminal_event(&mut app, alt('+'));
    assert!(app.ratings.is_empty());

    app.composer.input.set_text("first");
    app.submit();
    pump_one(&mut app).await;
    handle_terminal_event(&mut app, alt('+'));

    app.composer.input.set_text("second");
    app.submit();
    pump_one(&mut app).await;
    handle_terminal_event(&mut app, alt('-'));
    handle_terminal_event(&mut app, alt('-'));

    let replies: Vec<_> = app
        .store
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .map(|m| app.ratings.get(&m.id).copied())
        .collect();
    assert_eq!(replies, vec![Some(Rating::ThumbsUp), Some(Rating::ThumbsDown)]);
}
