use std::path::Path;

use crossbeam_channel::unbounded;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use super::render::flatten_lines_to_plain;
use super::ui::{format_tokens, shorten_path, top_bar_lines};
use super::*;
use crate::transcript::{MessageKind, ModelInfo};

fn test_config() -> Config {
    Config {
        model_name: "deepseek-r1".to_string(),
        context_max: 128_000,
        backend_command: None,
        theme: default_theme(),
        queue_capacity: 16,
        work_dir: "/home/dev/project".to_string(),
        repo_label: "git@example.com:dev/project.git".to_string(),
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_line(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn screen_text(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    let areas = ui::layout(
        ratatui::layout::Rect::new(0, 0, width, height),
        ui::suggestion_rows(app),
    );
    app.sync_view(areas.chat.width, areas.chat.height);
    terminal.draw(|f| ui::draw(f, app)).expect("draw");
    let buffer = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn enter_echoes_user_message_and_forwards_line() {
    let (tx, rx) = unbounded();
    let mut app = App::new(&test_config(), Some(tx));
    type_line(&mut app, "run the eval");
    app.handle_key(key(KeyCode::Enter));

    let messages = app.state().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageKind::User);
    assert_eq!(messages[0].content, "run the eval");
    assert_eq!(rx.try_recv().expect("forwarded"), "run the eval");
    assert!(app.input().is_empty());
}

#[test]
fn demo_mode_echoes_without_forwarding() {
    let mut app = App::new(&test_config(), None);
    type_line(&mut app, "hello");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.state().messages().len(), 1);
    assert!(!app.should_quit());
}

#[test]
fn ctrl_c_quits() {
    let mut app = App::new(&test_config(), None);
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}

#[test]
fn stream_closed_stops_applying_events() {
    let mut app = App::new(&test_config(), None);
    assert!(app.apply_event(&Event::reply("one")));
    assert!(!app.apply_event(&Event::StreamClosed));
    assert!(app.should_quit());
    assert!(!app.apply_event(&Event::reply("late")));
    assert_eq!(app.state().messages().len(), 1);
}

#[test]
fn spinner_only_ticks_while_thinking() {
    let mut app = App::new(&test_config(), None);
    assert!(!app.tick_spinner());
    app.apply_event(&Event::AgentThinking);
    assert!(app.tick_spinner());
    app.apply_event(&Event::reply("done"));
    assert!(!app.tick_spinner());
}

#[test]
fn sync_view_follows_new_output_until_user_scrolls() {
    let mut app = App::new(&test_config(), None);
    for i in 0..30 {
        app.apply_event(&Event::reply(format!("line {i}")));
    }
    app.sync_view(40, 10);
    assert!(app.window().at_bottom());

    app.handle_key(key(KeyCode::PageUp));
    let parked = app.window().offset();
    assert!(!app.window().at_bottom());

    app.apply_event(&Event::reply("more"));
    app.sync_view(40, 10);
    assert_eq!(app.window().offset(), parked);

    app.handle_key(key(KeyCode::End));
    assert!(app.window().at_bottom());
}

#[test]
fn home_key_edits_input_when_text_present() {
    let mut app = App::new(&test_config(), None);
    for i in 0..30 {
        app.apply_event(&Event::reply(format!("line {i}")));
    }
    app.sync_view(40, 10);
    type_line(&mut app, "abc");
    app.handle_key(key(KeyCode::Home));
    assert!(app.window().at_bottom());
    assert_eq!(app.input().cursor_column(), 0);
}

#[test]
fn mouse_wheel_scrolls_the_transcript() {
    let mut app = App::new(&test_config(), None);
    for i in 0..30 {
        app.apply_event(&Event::reply(format!("line {i}")));
    }
    app.sync_view(40, 10);
    let bottom = app.window().offset();
    app.scroll_wheel(-1);
    assert_eq!(app.window().offset(), bottom - WHEEL_STEP);
    app.scroll_wheel(1);
    assert!(app.window().at_bottom());
}

#[test]
fn pasted_text_lands_in_input() {
    let mut app = App::new(&test_config(), None);
    app.handle_paste("multi\nline");
    assert_eq!(app.input().value(), "multi line");
}

#[test]
fn token_counts_use_k_and_m_suffixes() {
    assert_eq!(format_tokens(999), "999");
    assert_eq!(format_tokens(1_000), "1.0k");
    assert_eq!(format_tokens(128_000), "128.0k");
    assert_eq!(format_tokens(2_450_000), "2.5M");
}

#[test]
fn cwd_under_home_is_shortened() {
    let home = Path::new("/home/dev");
    assert_eq!(shorten_path("/home/dev/project", Some(home)), "~/project");
    assert_eq!(shorten_path("/home/dev", Some(home)), "~");
    assert_eq!(shorten_path("/home/devops", Some(home)), "/home/devops");
    assert_eq!(shorten_path("/srv", None), "/srv");
}

#[test]
fn top_bar_shows_model_usage_and_location() {
    let model = ModelInfo {
        name: "deepseek-r1".to_string(),
        context_used: 24_000,
        context_max: 128_000,
        tokens_used: 12_400,
    };
    let lines = top_bar_lines(
        &model,
        "/home/dev/project",
        "github.com/dev/project",
        Some(Path::new("/home/dev")),
        100,
        default_theme().palette(),
    );
    let plain = flatten_lines_to_plain(&lines);
    assert!(plain[0].starts_with(&format!(" {APP_VERSION}")));
    assert!(plain[0]
        .ends_with("model: deepseek-r1 \u{2502} ctx: 24.0k/128.0k \u{2502} tokens: 12.4k"));
    assert!(plain[1].starts_with(" cwd: ~/project"));
    assert!(plain[1].ends_with("github.com/dev/project"));
    assert_eq!(plain[2].chars().count(), 100);
}

#[test]
fn full_frame_renders_transcript_and_hint_bar() {
    let mut app = App::new(&test_config(), None);
    app.apply_event(&Event::UserSubmitted {
        message: "check accuracy".to_string(),
    });
    app.apply_event(&Event::CommandStarted {
        message: "python eval.py".to_string(),
    });
    app.apply_event(&Event::output_line("accuracy: 0.847"));
    app.apply_event(&Event::TokenUsageUpdate {
        context_used: 2_400,
        tokens_used: 1_200,
    });

    let screen = screen_text(&mut app, 80, 20);
    assert!(screen.contains("> check accuracy"));
    assert!(screen.contains("\u{25B8} Shell"));
    assert!(screen.contains("$ python eval.py"));
    assert!(screen.contains("accuracy: 0.847"));
    assert!(screen.contains("ctx: 2.4k/128.0k"));
    assert!(screen.contains("ctrl+c quit"));
}

#[test]
fn slash_prefix_shows_command_suggestions() {
    let mut app = App::new(&test_config(), None);
    type_line(&mut app, "/we");
    let screen = screen_text(&mut app, 60, 16);
    assert!(screen.contains("/weekly status"));
    assert!(!screen.contains("/roadmap status"));
}
