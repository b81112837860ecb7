use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Component;

const CHAR_LIMIT: usize = 2000;
const MAX_HINTS: usize = 6;

/// What the input line asks the host to do after a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputEffect {
    None,
    Submit(String),
    Quit,
}

/// Single-line prompt editor with submission history and slash-command hints.
#[derive(Clone, Debug)]
pub(crate) struct InputLine {
    input: String,
    cursor: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
    commands: Vec<String>,
    hint_idx: usize,
}

impl InputLine {
    pub(crate) fn new(commands: Vec<String>) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_pos: None,
            commands,
            hint_idx: 0,
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.input
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Cursor position in display columns, not bytes.
    pub(crate) fn cursor_column(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(&self.input[..self.cursor])
    }

    pub(crate) fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.hint_idx = 0;
        self.history_pos = None;
    }

    pub(crate) fn hints(&self) -> Vec<String> {
        if !self.input.starts_with('/') {
            return Vec::new();
        }
        let query = self.input.trim_end();
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(query) && cmd.as_str() != query)
            .take(MAX_HINTS)
            .cloned()
            .collect()
    }

    pub(crate) fn selected_hint(&self) -> usize {
        self.hint_idx.min(self.hints().len().saturating_sub(1))
    }

    pub(crate) fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            self.insert_char(c);
        }
        self.sync_hint_idx();
    }

    fn insert_char(&mut self, c: char) {
        if self.input.chars().count() >= CHAR_LIMIT || c.is_control() {
            return;
        }
        if self.cursor >= self.input.len() {
            self.input.push(c);
        } else {
            self.input.insert(self.cursor, c);
        }
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 || self.input.is_empty() {
            return;
        }
        if let Some(prev_idx) = self.input[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
        {
            self.input.drain(prev_idx..self.cursor);
            self.cursor = prev_idx;
        }
    }

    fn backspace_word(&mut self) {
        while self.cursor > 0 && self.input[..self.cursor].ends_with(' ') {
            self.backspace();
        }
        while self.cursor > 0 && !self.input[..self.cursor].ends_with(' ') {
            self.backspace();
        }
    }

    fn delete(&mut self) {
        let Some(ch) = self.input[self.cursor..].chars().next() else {
            return;
        };
        let end = self.cursor + ch.len_utf8();
        self.input.drain(self.cursor..end);
    }

    fn move_left(&mut self) {
        if let Some(prev_idx) = self.input[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
        {
            self.cursor = prev_idx;
        }
    }

    fn move_right(&mut self) {
        if let Some(ch) = self.input[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_pos {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_pos = Some(next);
        self.input = self.history[next].clone();
        self.cursor = self.input.len();
    }

    fn history_next(&mut self) {
        let Some(i) = self.history_pos else {
            return;
        };
        if i + 1 >= self.history.len() {
            self.history_pos = None;
            self.input.clear();
            self.cursor = 0;
            return;
        }
        self.history_pos = Some(i + 1);
        self.input = self.history[i + 1].clone();
        self.cursor = self.input.len();
    }

    fn sync_hint_idx(&mut self) {
        let len = self.hints().len();
        if len == 0 || self.hint_idx >= len {
            self.hint_idx = 0;
        }
    }

    fn apply_selected_hint(&mut self) -> bool {
        let hints = self.hints();
        let Some(selected) = hints.get(self.selected_hint()).cloned() else {
            return false;
        };
        self.input = selected;
        self.cursor = self.input.len();
        self.hint_idx = 0;
        true
    }

    fn submit(&mut self) -> InputEffect {
        let line = self.input.trim().to_string();
        if line.is_empty() {
            return InputEffect::None;
        }
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        self.reset();
        InputEffect::Submit(line)
    }
}

impl Component for InputLine {
    type Input = KeyEvent;
    type Effect = InputEffect;

    fn update(&mut self, key: KeyEvent) -> InputEffect {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => return InputEffect::Quit,
                KeyCode::Char('a') => self.cursor = 0,
                KeyCode::Char('e') => self.cursor = self.input.len(),
                KeyCode::Char('l') | KeyCode::Char('u') => self.reset(),
                KeyCode::Char('w') => self.backspace_word(),
                KeyCode::Char('p') => self.history_prev(),
                KeyCode::Char('n') => self.history_next(),
                _ => {}
            }
            return InputEffect::None;
        }

        if key.modifiers.contains(KeyModifiers::ALT) && matches!(key.code, KeyCode::Backspace) {
            self.backspace_word();
            return InputEffect::None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab => {
                self.apply_selected_hint();
            }
            KeyCode::Up => {
                let len = self.hints().len();
                if len > 0 {
                    self.hint_idx = (self.selected_hint() + len - 1) % len;
                } else {
                    self.history_prev();
                }
            }
            KeyCode::Down => {
                let len = self.hints().len();
                if len > 0 {
                    self.hint_idx = (self.selected_hint() + 1) % len;
                } else {
                    self.history_next();
                }
            }
            KeyCode::Backspace => {
                self.backspace();
                self.sync_hint_idx();
            }
            KeyCode::Delete => {
                self.delete();
                self.sync_hint_idx();
            }
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.len(),
            KeyCode::Char(c) => {
                self.insert_char(c);
                self.sync_hint_idx();
            }
            _ => {}
        }
        InputEffect::None
    }

    fn view(&self) -> String {
        format!("> {}", self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut InputLine, text: &str) {
        for c in text.chars() {
            input.update(key(KeyCode::Char(c)));
        }
    }

    fn commands() -> Vec<String> {
        vec!["/roadmap status".to_string(), "/weekly status".to_string()]
    }

    #[test]
    fn enter_submits_trimmed_line_and_clears() {
        let mut input = InputLine::new(commands());
        type_str(&mut input, "  fix the build ");
        assert_eq!(
            input.update(key(KeyCode::Enter)),
            InputEffect::Submit("fix the build".to_string())
        );
        assert!(input.is_empty());
        assert_eq!(input.view(), "> ");
    }

    #[test]
    fn enter_on_blank_line_does_nothing() {
        let mut input = InputLine::new(commands());
        type_str(&mut input, "   ");
        assert_eq!(input.update(key(KeyCode::Enter)), InputEffect::None);
    }

    #[test]
    fn ctrl_c_requests_quit() {
        let mut input = InputLine::new(commands());
        let effect = input.update(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(effect, InputEffect::Quit);
    }

    #[test]
    fn editing_moves_by_characters_not_bytes() {
        let mut input = InputLine::new(commands());
        type_str(&mut input, "héllo");
        input.update(key(KeyCode::Left));
        input.update(key(KeyCode::Left));
        input.update(key(KeyCode::Left));
        input.update(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hllo");
        assert_eq!(input.cursor_column(), 1);
    }

    #[test]
    fn history_recalls_previous_submissions() {
        let mut input = InputLine::new(commands());
        type_str(&mut input, "one");
        input.update(key(KeyCode::Enter));
        type_str(&mut input, "two");
        input.update(key(KeyCode::Enter));

        input.update(key(KeyCode::Up));
        assert_eq!(input.value(), "two");
        input.update(key(KeyCode::Up));
        assert_eq!(input.value(), "one");
        input.update(key(KeyCode::Down));
        assert_eq!(input.value(), "two");
        input.update(key(KeyCode::Down));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn slash_prefix_offers_command_hints_and_tab_completes() {
        let mut input = InputLine::new(commands());
        type_str(&mut input, "/");
        assert_eq!(input.hints(), commands());
        input.update(key(KeyCode::Down));
        input.update(key(KeyCode::Tab));
        assert_eq!(input.value(), "/weekly status");
        assert!(input.hints().is_empty());
    }

    #[test]
    fn pasted_newlines_become_spaces() {
        let mut input = InputLine::new(commands());
        input.insert_str("a\nb");
        assert_eq!(input.value(), "a b");
    }
}
