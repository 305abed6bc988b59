// Host embedding: single mount, handle commands and posted messages.

use chat_widget::Cli;
use chat_widget::app::{App, handle_host_command};
use chat_widget::config::{EmbedOptions, EntryAnimation, UserIdentity, WidgetConfig};
use chat_widget::embed::{TOGGLE_MESSAGE, WidgetRegistry};
use clap::Parser;
use pretty_assertions::assert_eq;

use crate::helpers::{empty_config, pump_one, test_app_with};

/// Apply every queued host command, as the event loop's drain phase does.
fn drain_host(app: &mut App) -> usize {
    let mut applied = 0;
    while let Some(cmd) = app.host_rx.as_mut().and_then(|rx| rx.try_recv().ok()) {
        handle_host_command(app, cmd);
        applied += 1;
    }
    applied
}

fn mounted() -> (App, chat_widget::embed::WidgetHandle) {
    let mut registry = WidgetRegistry::new();
    let handle = registry.ensure_injected(&EmbedOptions::default());
    let mut app = test_app_with(empty_config());
    app.close();
    app.attach_host(registry.take_receiver().unwrap());
    (app, handle)
}

#[tokio::test]
async fn handle_commands_drive_visibility() {
    let (mut app, handle) = mounted();
    assert!(handle.open());
    drain_host(&mut app);
    assert!(app.is_open);

    assert!(handle.toggle());
    drain_host(&mut app);
    assert!(!app.is_open);

    // Close on a closed widget stays closed
    assert!(handle.close());
    drain_host(&mut app);
    assert!(!app.is_open);
}

#[tokio::test]
async fn posted_toggle_message_flips_widget() {
    let (mut app, handle) = mounted();
    assert!(handle.post_message(TOGGLE_MESSAGE));
    assert!(handle.post_message(TOGGLE_MESSAGE));
    assert!(handle.post_message(TOGGLE_MESSAGE));
    assert!(!handle.post_message("SOMETHING_ELSE"));
    assert_eq!(drain_host(&mut app), 3);
    assert!(app.is_open);
}

#[tokio::test]
async fn second_injection_reuses_the_mounted_widget() {
    let mut registry = WidgetRegistry::new();
    let options = EmbedOptions {
        api_base_url: Some("https://api.example.test".to_owned()),
        user: UserIdentity { name: Some("Ada".to_owned()), ..Default::default() },
        ..Default::default()
    };
    let first = registry.ensure_injected(&options);
    let second = registry.ensure_injected(&EmbedOptions::default());
    assert!(registry.is_injected());
    assert_eq!(registry.options(), Some(&options));

    let mut app = test_app_with(empty_config());
    app.attach_host(registry.take_receiver().unwrap());
    assert!(first.close());
    assert!(second.open());
    assert_eq!(drain_host(&mut app), 2);
    assert!(app.is_open);
}

#[tokio::test]
async fn dropped_widget_makes_handle_inert() {
    let (app, handle) = mounted();
    drop(app);
    assert!(!handle.toggle());
    assert!(!handle.post_message(TOGGLE_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn closed_widget_keeps_conversation() {
    let (mut app, handle) = mounted();
    handle.open();
    drain_host(&mut app);
    app.composer.input.set_text("still there?");
    app.submit();

    handle.toggle();
    drain_host(&mut app);
    pump_one(&mut app).await;
    handle.toggle();
    drain_host(&mut app);

    assert!(app.is_open);
    assert_eq!(app.store.len(), 2);
    assert!(app.composer.input.is_empty());
}

#[test]
fn command_line_overrides_file_settings() {
    let cli = Cli::try_parse_from([
        "chat-widget",
        "--title",
        "Help Desk",
        "--animation",
        "fade",
        "--reply-delay-ms",
        "250",
        "--no-attachments",
        "--open",
    ])
    .unwrap();
    let mut config = WidgetConfig::default();
    config.apply_cli(&cli);
    assert_eq!(config.title, "Help Desk");
    assert_eq!(config.animation, EntryAnimation::Fade);
    assert_eq!(config.reply_delay_ms, 250);
    assert!(!config.allow_attachments);
    assert!(config.enable_interrupt);
    assert!(config.start_open);
}
