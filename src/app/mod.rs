use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::event::Event;
use crate::orchestrator::COMMANDS;
use crate::transcript::{Transition, TranscriptState};

pub(crate) mod dispatch;
mod input;
mod render;
mod runtime;
mod scroll;
mod spinner;
#[cfg(test)]
mod tests;
pub(crate) mod text;
mod types;
mod ui;
mod worker;

use input::{InputEffect, InputLine};
use render::render_messages;
pub(crate) use runtime::run_app;
use scroll::ScrollWindow;
use spinner::Spinner;
pub(crate) use types::{default_theme, ThemePalette, ThemePreset};

pub(crate) const APP_VERSION: &str = concat!("agentshell v", env!("CARGO_PKG_VERSION"));

const WHEEL_STEP: u16 = 3;

/// Widget contract shared by the spinner and the input line: feed it one
/// input, get back whatever it asks the host to do, render it as text.
pub(crate) trait Component {
    type Input;
    type Effect;

    fn update(&mut self, input: Self::Input) -> Self::Effect;
    fn view(&self) -> String;
}

/// Tracks which transcript generation and spinner frame the scroll window
/// currently holds, so unchanged frames skip re-rendering.
struct RenderCache {
    generation: u64,
    frame: &'static str,
    width: u16,
}

impl RenderCache {
    fn new() -> Self {
        Self {
            generation: u64::MAX,
            frame: "",
            width: 0,
        }
    }
}

pub(crate) struct App {
    state: TranscriptState,
    input: InputLine,
    spinner: Spinner,
    window: ScrollWindow,
    theme: ThemePreset,
    /// Where submitted lines go; `None` in demo playback.
    submissions: Option<Sender<String>>,
    should_quit: bool,
    stream_closed: bool,

    render_generation: u64,
    render_cache: RenderCache,
}

impl App {
    pub(crate) fn new(config: &Config, submissions: Option<Sender<String>>) -> Self {
        Self {
            state: TranscriptState::new(
                config.model_info(),
                config.work_dir.clone(),
                config.repo_label.clone(),
            ),
            input: InputLine::new(COMMANDS.iter().map(|c| c.to_string()).collect()),
            spinner: Spinner::default(),
            window: ScrollWindow::new(80, 20),
            theme: config.theme,
            submissions,
            should_quit: false,
            stream_closed: false,
            render_generation: 0,
            render_cache: RenderCache::new(),
        }
    }

    pub(super) fn state(&self) -> &TranscriptState {
        &self.state
    }

    pub(super) fn input(&self) -> &InputLine {
        &self.input
    }

    pub(super) fn window(&self) -> &ScrollWindow {
        &self.window
    }

    pub(super) fn theme_palette(&self) -> ThemePalette {
        self.theme.palette()
    }

    pub(super) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(super) fn is_thinking(&self) -> bool {
        self.state.thinking_count() > 0
    }

    /// Fold one event into the transcript. Returns `false` once the stream
    /// has closed.
    pub(super) fn apply_event(&mut self, event: &Event) -> bool {
        if self.stream_closed {
            return false;
        }
        tracing::debug!(event = event.tag(), "apply");
        match std::mem::take(&mut self.state).apply(event) {
            Transition::Continue(next) => {
                self.state = next;
                self.invalidate_render_cache();
                true
            }
            Transition::Stop(last) => {
                self.state = last;
                tracing::info!("event stream closed");
                self.stream_closed = true;
                self.should_quit = true;
                false
            }
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_scroll_key(key) {
            return;
        }
        match self.input.update(key) {
            InputEffect::None => {}
            InputEffect::Quit => self.should_quit = true,
            InputEffect::Submit(line) => self.submit(line),
        }
    }

    pub(super) fn handle_paste(&mut self, text: &str) {
        self.input.insert_str(text);
    }

    pub(super) fn tick_spinner(&mut self) -> bool {
        if !self.is_thinking() {
            return false;
        }
        self.spinner.update(());
        true
    }

    pub(super) fn scroll_wheel(&mut self, delta: i32) {
        let steps = delta.unsigned_abs().min(64) as u16 * WHEEL_STEP;
        if delta < 0 {
            self.window.scroll_up(steps);
        } else if delta > 0 {
            self.window.scroll_down(steps);
        }
    }

    fn handle_scroll_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::PageUp => self.window.page_up(),
            KeyCode::PageDown => self.window.page_down(),
            KeyCode::Home if self.input.is_empty() => self.window.goto_top(),
            KeyCode::End if self.input.is_empty() => self.window.goto_bottom(),
            _ => return false,
        }
        true
    }

    /// Echo the line into the transcript and hand it to the worker.
    fn submit(&mut self, line: String) {
        self.apply_event(&Event::UserSubmitted {
            message: line.clone(),
        });
        self.window.goto_bottom();
        let Some(tx) = &self.submissions else {
            tracing::debug!("demo playback: submission not dispatched");
            return;
        };
        if tx.send(line).is_err() {
            tracing::warn!("submission worker is gone; stopping");
            self.should_quit = true;
        }
    }

    fn invalidate_render_cache(&mut self) {
        self.render_generation = self.render_generation.wrapping_add(1);
    }

    /// Bring the scroll window in line with the transcript and chat area.
    pub(super) fn sync_view(&mut self, width: u16, height: u16) {
        self.window.set_size(width, height);
        let frame = self.spinner.frame();
        let frame_changed = self.is_thinking() && self.render_cache.frame != frame;
        if self.render_cache.generation == self.render_generation
            && self.render_cache.width == width
            && !frame_changed
        {
            return;
        }
        let lines = render_messages(
            self.state.messages(),
            frame,
            self.theme_palette(),
            width,
        );
        self.window.set_content(lines);
        self.render_cache = RenderCache {
            generation: self.render_generation,
            frame,
            width,
        };
    }
}
