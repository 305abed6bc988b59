// Stick-to-bottom transcript scrolling and composer auto-resize.

use chat_widget::app::{App, AutoScroll, NewMessage, ScrollMode, handle_terminal_event};
use chat_widget::config::{EntryAnimation, WidgetConfig};
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::helpers::{empty_config, test_app_with};

fn still_config() -> WidgetConfig {
    WidgetConfig { animation: EntryAnimation::None, show_timestamps: false, ..empty_config() }
}

fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>) {
    terminal
        .draw(|f| {
            app.sync_composer_height(f.area());
            chat_widget::ui::render(f, app);
        })
        .unwrap();
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn long_transcript(app: &mut App, count: usize) {
    for i in 0..count {
        app.append_message(NewMessage::assistant(format!("Reply number {i}")));
    }
}

#[test]
fn scroll_up_detaches_and_near_bottom_reattaches() {
    let mut scroll = AutoScroll::new(50);
    scroll.set_geometry(1000, 400);
    scroll.dependencies_changed();
    assert_eq!(scroll.scroll_top(), 600);
    assert!(scroll.is_following());

    scroll.scroll_by(-100);
    assert_eq!(scroll.mode(), ScrollMode::Detached);

    // New content while detached leaves the offset alone
    scroll.set_geometry(1200, 400);
    scroll.dependencies_changed();
    assert_eq!(scroll.scroll_top(), 500);

    // 1200 - 790 - 400 = 10 units from the bottom
    scroll.scroll_by(290);
    assert!(scroll.is_following());

    scroll.set_geometry(1300, 400);
    scroll.dependencies_changed();
    assert_eq!(scroll.scroll_top(), 900);
}

#[test]
fn scrolling_down_far_from_bottom_stays_detached() {
    let mut scroll = AutoScroll::new(50);
    scroll.set_geometry(1000, 400);
    scroll.dependencies_changed();
    scroll.scroll_by(-400);
    scroll.scroll_by(100);
    assert_eq!(scroll.mode(), ScrollMode::Detached);
    assert_eq!(scroll.viewport().distance_from_bottom(), 300);
}

#[test]
fn touch_detaches_until_bottom_is_reached() {
    let mut scroll = AutoScroll::new(50);
    scroll.set_geometry(1000, 400);
    scroll.dependencies_changed();
    scroll.handle_touch_start();
    assert_eq!(scroll.mode(), ScrollMode::Detached);

    scroll.set_geometry(1100, 400);
    scroll.dependencies_changed();
    assert_eq!(scroll.scroll_top(), 600);

    scroll.scroll_to_bottom();
    assert!(scroll.is_following());
    assert_eq!(scroll.scroll_top(), 700);
}

#[tokio::test]
async fn rendered_transcript_follows_new_messages() {
    let mut app = test_app_with(still_config());
    long_transcript(&mut app, 40);
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    draw(&mut app, &mut terminal);
    let viewport = app.scroll.viewport();
    assert!(viewport.scroll_height > viewport.client_height);
    assert_eq!(viewport.distance_from_bottom(), 0);
    assert!(app.jump_button_area.is_none());

    app.append_message(NewMessage::user("one more"));
    draw(&mut app, &mut terminal);
    assert_eq!(app.scroll.viewport().distance_from_bottom(), 0);
}

#[tokio::test]
async fn detached_transcript_shows_jump_button() {
    let mut app = test_app_with(still_config());
    long_transcript(&mut app, 40);
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    draw(&mut app, &mut terminal);

    let scroll_up = Event::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollUp,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    handle_terminal_event(&mut app, scroll_up);
    assert_eq!(app.scroll.mode(), ScrollMode::Detached);
    let pinned_top = app.scroll.scroll_top();

    app.append_message(NewMessage::assistant("arrived while reading"));
    draw(&mut app, &mut terminal);
    assert_eq!(app.scroll.scroll_top(), pinned_top);
    let jump: Rect = app.jump_button_area.unwrap();

    handle_terminal_event(&mut app, click(jump.x, jump.y));
    assert!(app.scroll.is_following());
    draw(&mut app, &mut terminal);
    assert_eq!(app.scroll.viewport().distance_from_bottom(), 0);
    assert!(app.jump_button_area.is_none());
}

#[tokio::test]
async fn click_in_transcript_detaches() {
    let mut app = test_app_with(still_config());
    long_transcript(&mut app, 40);
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    draw(&mut app, &mut terminal);

    let chat = app.rendered_chat_area;
    handle_terminal_event(&mut app, click(chat.x + 1, chat.y + 1));
    assert_eq!(app.scroll.mode(), ScrollMode::Detached);
}

#[tokio::test]
async fn composer_grows_with_draft_and_never_shrinks_below_floor() {
    let mut app = test_app_with(WidgetConfig { max_input_height: 4, ..still_config() });
    let area = Rect::new(0, 0, 100, 40);

    app.sync_composer_height(area);
    assert_eq!(app.resize.floor(), Some(1));
    assert_eq!(app.composer_box.rows(), 1);

    app.composer.input.set_text("a\nb\nc");
    app.sync_composer_height(area);
    assert_eq!(app.composer_box.rows(), 3);

    app.composer.input.set_text("1\n2\n3\n4\n5\n6\n7");
    app.sync_composer_height(area);
    assert_eq!(app.composer_box.rows(), 4);

    app.composer.input.clear();
    app.sync_composer_height(area);
    assert_eq!(app.composer_box.rows(), 1);
}
