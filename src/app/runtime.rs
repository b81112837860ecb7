use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as TermEvent, KeyEventKind, MouseEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use super::{ui, worker, App};
use crate::backend::{Backend, ProcessBackend};
use crate::config::Config;
use crate::demo;
use crate::orchestrator::Dispatcher;
use crate::queue::{EventQueue, Received};

const QUEUE_WAIT_MS: u64 = 33;
const SPINNER_TICK_MS: u64 = 120;
const MAX_EVENTS_PER_FRAME: u16 = 64;

/// Run the shell until the user quits or the event stream closes.
pub(crate) fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    demo_mode: bool,
) -> Result<()> {
    let queue = EventQueue::new(config.queue_capacity);

    let submissions = if demo_mode {
        demo::spawn(queue.clone());
        None
    } else {
        let backend = config
            .backend_command
            .as_deref()
            .and_then(ProcessBackend::from_command_line)
            .map(|b| Box::new(b) as Box<dyn Backend>);
        if backend.is_none() {
            tracing::info!("no backend configured; tasks will report an error");
        }
        let (tx, _worker) = worker::spawn_dispatcher(Dispatcher::new(queue.clone(), backend));
        Some(tx)
    };

    tracing::info!(
        demo = demo_mode,
        model = %config.model_name,
        theme = config.theme.as_str(),
        "session started"
    );
    let mut app = App::new(config, submissions);
    let result = event_loop(terminal, &mut app, &queue);

    // Producers blocked on a full queue wake up and give up. An in-flight
    // backend call cannot be cancelled; its worker exits once it returns.
    queue.close();
    tracing::info!("session ended");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    queue: &EventQueue,
) -> Result<()> {
    let mut last_spinner_tick = Instant::now();
    let mut needs_draw = true;

    loop {
        if needs_draw {
            let size = terminal.size().context("terminal size")?;
            let areas = ui::layout(
                Rect::new(0, 0, size.width, size.height),
                ui::suggestion_rows(app),
            );
            app.sync_view(areas.chat.width, areas.chat.height);
            terminal.draw(|f| ui::draw(f, app)).context("draw frame")?;
            needs_draw = false;
        }

        if app.should_quit() {
            return Ok(());
        }

        match queue.recv_timeout(Duration::from_millis(QUEUE_WAIT_MS)) {
            Received::Event(first) => {
                needs_draw = true;
                if !app.apply_event(&first) {
                    continue;
                }
                let mut drained = 1u16;
                while drained < MAX_EVENTS_PER_FRAME {
                    let Received::Event(next) = queue.recv_timeout(Duration::ZERO) else {
                        break;
                    };
                    drained += 1;
                    if !app.apply_event(&next) {
                        break;
                    }
                }
            }
            Received::Timeout => {}
            Received::Finished => return Ok(()),
        }

        if last_spinner_tick.elapsed() >= Duration::from_millis(SPINNER_TICK_MS) {
            last_spinner_tick = Instant::now();
            if app.tick_spinner() {
                needs_draw = true;
            }
        }

        if drain_terminal_events(app)? {
            needs_draw = true;
        }
    }
}

/// Handle every pending key, mouse and resize event without blocking.
fn drain_terminal_events(app: &mut App) -> Result<bool> {
    let mut changed = false;
    let mut wheel_delta: i32 = 0;
    let mut drained: u16 = 0;

    while drained < MAX_EVENTS_PER_FRAME && event::poll(Duration::ZERO).context("event poll")? {
        drained += 1;
        match event::read().context("event read")? {
            TermEvent::Key(key) => {
                if !matches!(key.kind, KeyEventKind::Release) {
                    app.handle_key(key);
                    changed = true;
                }
            }
            TermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => wheel_delta -= 1,
                MouseEventKind::ScrollDown => wheel_delta += 1,
                _ => {}
            },
            TermEvent::Paste(text) => {
                app.handle_paste(&text);
                changed = true;
            }
            TermEvent::Resize(_, _) => changed = true,
            _ => {}
        }
    }

    if wheel_delta != 0 {
        app.scroll_wheel(wheel_delta);
        changed = true;
    }
    Ok(changed)
}
