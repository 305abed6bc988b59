use chat_widget::app::{App, ClipboardSink, WidgetEvent, handle_widget_event};
use chat_widget::config::WidgetConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Clipboard that records what was copied.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub copied: Arc<Mutex<Vec<String>>>,
}

impl ClipboardSink for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        self.copied.lock().map_err(|e| e.to_string())?.push(text.to_owned());
        Ok(())
    }
}

/// Clipboard that always refuses, like a headless session without a display.
pub struct FailingClipboard;

impl ClipboardSink for FailingClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), String> {
        Err("no clipboard available".to_owned())
    }
}

/// Build an `App` with the default configuration and a recording clipboard.
/// No terminal, just state.
pub fn test_app() -> App {
    test_app_with(WidgetConfig::default())
}

pub fn test_app_with(config: WidgetConfig) -> App {
    let mut app = App::with_clipboard(config, Box::new(RecordingClipboard::default()));
    app.open();
    app
}

/// Configuration without seed messages.
pub fn empty_config() -> WidgetConfig {
    WidgetConfig { initial_messages: Vec::new(), ..WidgetConfig::default() }
}

/// Wait for the next background event and feed it to the app.
pub async fn pump_one(app: &mut App) {
    let event = app.event_rx.recv().await.expect("event channel closed");
    handle_widget_event(app, event);
}

/// Whether a background event arrives within `within`.
pub async fn event_within(app: &mut App, within: Duration) -> Option<WidgetEvent> {
    tokio::time::timeout(within, app.event_rx.recv()).await.ok().flatten()
}
