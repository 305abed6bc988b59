// Conversation flow: submission, simulated replies, interrupt and teardown.

use chat_widget::app::{MessageRole, handle_terminal_event};
use chat_widget::config::WidgetConfig;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use std::time::Duration;

use crate::helpers::{empty_config, event_within, pump_one, test_app, test_app_with};

fn enter() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

#[tokio::test(start_paused = true)]
async fn submitted_question_gets_delayed_echo_reply() {
    let mut app = test_app();
    assert_eq!(app.store.len(), 2);

    app.composer.input.set_text("Hi");
    app.submit();
    assert_eq!(app.store.len(), 3);
    let question = app.store.last().unwrap();
    assert_eq!(question.role, MessageRole::User);
    assert_eq!(question.content, "Hi");
    assert!(question.attachments.is_none());
    assert!(app.is_generating());
    assert!(app.composer.input.is_empty());

    // Nothing before the configured delay
    assert!(event_within(&mut app, Duration::from_millis(999)).await.is_none());
    assert_eq!(app.store.len(), 3);

    pump_one(&mut app).await;
    assert_eq!(app.store.len(), 4);
    let reply = app.store.last().unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "You asked: \"Hi\". Here's some info!");
    assert_eq!(reply.suggestions.as_ref().map(Vec::len), Some(3));
    assert!(!app.is_generating());
}

#[tokio::test(start_paused = true)]
async fn message_ids_increase_in_append_order() {
    let mut app = test_app();
    for text in ["one", "two"] {
        app.composer.input.set_text(text);
        app.submit();
        pump_one(&mut app).await;
    }
    let ids: Vec<u64> = app.store.messages().iter().map(|m| m.id.get()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    let roles: Vec<MessageRole> = app.store.messages()[2..].iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![MessageRole::User, MessageRole::Assistant, MessageRole::User, MessageRole::Assistant]
    );
}

#[tokio::test(start_paused = true)]
async fn whitespace_submission_is_ignored() {
    let mut app = test_app_with(empty_config());
    app.composer.input.set_text("   \n\t ");
    app.submit();
    assert!(app.store.is_empty());
    assert!(!app.is_generating());
    assert_eq!(app.composer.input.text(), "   \n\t ");

    app.composer.input.clear();
    app.submit();
    assert!(app.store.is_empty());
    assert!(event_within(&mut app, Duration::from_secs(5)).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn second_enter_interrupts_and_submits() {
    let mut app = test_app_with(empty_config());
    app.composer.input.set_text("first");
    handle_terminal_event(&mut app, enter());
    assert_eq!(app.store.len(), 1);
    assert!(app.is_generating());

    app.composer.input.set_text("second");
    handle_terminal_event(&mut app, enter());
    assert!(app.composer.interrupt_prompt_visible());
    assert_eq!(app.store.len(), 1);
    assert_eq!(app.composer.input.text(), "second");

    handle_terminal_event(&mut app, enter());
    assert!(!app.composer.interrupt_prompt_visible());
    assert_eq!(app.store.len(), 2);
    assert_eq!(app.store.last().unwrap().content, "second");

    // Only the reply to the second question arrives
    pump_one(&mut app).await;
    assert_eq!(app.store.len(), 3);
    assert_eq!(app.store.last().unwrap().content, "You asked: \"second\". Here's some info!");
    assert!(event_within(&mut app, Duration::from_secs(5)).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn without_interrupt_enter_submits_while_generating() {
    let mut app = test_app_with(WidgetConfig { enable_interrupt: false, ..empty_config() });
    app.composer.input.set_text("a");
    handle_terminal_event(&mut app, enter());
    app.composer.input.set_text("b");
    handle_terminal_event(&mut app, enter());
    assert!(!app.composer.interrupt_prompt_visible());
    assert_eq!(app.store.len(), 2);

    pump_one(&mut app).await;
    pump_one(&mut app).await;
    let contents: Vec<&str> = app.store.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "a",
            "b",
            "You asked: \"a\". Here's some info!",
            "You asked: \"b\". Here's some info!",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn shift_enter_inserts_newline() {
    let mut app = test_app_with(empty_config());
    app.composer.input.set_text("line");
    handle_terminal_event(&mut app, Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT)));
    assert!(app.store.is_empty());
    assert_eq!(app.composer.input.text(), "line\n");
}

#[tokio::test(start_paused = true)]
async fn no_reply_after_shutdown() {
    let mut app = test_app_with(empty_config());
    app.composer.input.set_text("Hi");
    app.submit();
    app.shutdown();
    assert!(event_within(&mut app, Duration::from_secs(5)).await.is_none());
    assert_eq!(app.store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn closing_panel_keeps_pending_reply() {
    let mut app = test_app_with(empty_config());
    app.composer.input.set_text("Hi");
    app.submit();
    app.close();
    pump_one(&mut app).await;
    assert!(!app.is_open);
    assert_eq!(app.store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn suggestion_chip_submits_its_text() {
    let mut app = test_app_with(empty_config());
    let first_prompt = app.config.prompt_suggestions[0].clone();
    app.submit_suggestion(0);
    assert_eq!(app.store.last().unwrap().content, first_prompt);

    pump_one(&mut app).await;
    let follow_up = app.config.follow_up_suggestions[1].clone();
    app.submit_suggestion(1);
    assert_eq!(app.store.last().unwrap().content, follow_up);

    // Out of range does nothing
    let len = app.store.len();
    app.submit_suggestion(8);
    assert_eq!(app.store.len(), len);
}
