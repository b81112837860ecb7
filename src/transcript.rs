//! Transcript state and the reducer that folds one [`Event`] into it.
//!
//! [`TranscriptState::apply`] consumes the state and returns the next one.
//! The message list sits behind an `Arc` and is copied only when another
//! clone of the state is still alive, so a single owner appends in place and
//! older snapshots never observe the change.

use std::sync::Arc;

use crate::event::Event;

pub(crate) const SHELL_TOOL: &str = "Shell";
pub(crate) const DEFAULT_MODEL_NAME: &str = "deepseek-r1";
pub(crate) const DEFAULT_CONTEXT_MAX: u64 = 128_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MessageKind {
    User,
    Agent,
    Thinking,
    Tool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DisplayMode {
    /// Full multi-line body.
    Expanded,
    /// One line plus optional summary.
    Collapsed,
    /// Full body in alarm styling.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ToolCall {
    pub(crate) name: String,
    pub(crate) display: DisplayMode,
    pub(crate) summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Message {
    pub(crate) kind: MessageKind,
    pub(crate) content: String,
    /// Present only for `MessageKind::Tool`.
    pub(crate) tool: Option<ToolCall>,
}

impl Message {
    pub(crate) fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
            tool: None,
        }
    }

    pub(crate) fn agent(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Agent,
            content: content.into(),
            tool: None,
        }
    }

    pub(crate) fn thinking() -> Self {
        Self {
            kind: MessageKind::Thinking,
            content: String::new(),
            tool: None,
        }
    }

    pub(crate) fn tool(
        name: impl Into<String>,
        display: DisplayMode,
        content: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Tool,
            content: content.into(),
            tool: Some(ToolCall {
                name: name.into(),
                display,
                summary: summary.into(),
            }),
        }
    }

    pub(crate) fn tool_name(&self) -> &str {
        self.tool.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }

    pub(crate) fn display(&self) -> Option<DisplayMode> {
        self.tool.as_ref().map(|t| t.display)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ModelInfo {
    pub(crate) name: String,
    pub(crate) context_used: u64,
    pub(crate) context_max: u64,
    pub(crate) tokens_used: u64,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            context_used: 0,
            context_max: DEFAULT_CONTEXT_MAX,
            tokens_used: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TranscriptState {
    messages: Arc<Vec<Message>>,
    thinking_at: Option<usize>,
    pub(crate) model: ModelInfo,
    pub(crate) work_dir: String,
    pub(crate) repo_label: String,
}

/// Result of folding one event.
#[derive(Debug)]
pub(crate) enum Transition {
    Continue(TranscriptState),
    /// `StreamClosed` was consumed; the dispatch loop must stop. Carries the
    /// state unchanged.
    Stop(TranscriptState),
}

impl TranscriptState {
    pub(crate) fn new(model: ModelInfo, work_dir: String, repo_label: String) -> Self {
        Self {
            messages: Arc::new(Vec::new()),
            thinking_at: None,
            model,
            work_dir,
            repo_label,
        }
    }

    pub(crate) fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub(crate) fn thinking_count(&self) -> usize {
        usize::from(self.thinking_at.is_some())
    }

    pub(crate) fn apply(self, event: &Event) -> Transition {
        let mut next = self;
        match event {
            Event::UserSubmitted { message } => next.push(Message::user(message.as_str())),
            Event::AgentThinking => {
                next.remove_thinking();
                next.push(Message::thinking());
            }
            Event::AgentReply { message } | Event::AnalysisReady { message } => {
                next.remove_thinking();
                next.push(Message::agent(message.as_str()));
            }
            Event::CommandStarted { message } => next.push(Message::tool(
                SHELL_TOOL,
                DisplayMode::Expanded,
                format!("$ {message}"),
                "",
            )),
            Event::CommandOutputLine { message } => next.append_to_last_tool(message),
            Event::CommandFinished => {}
            Event::ToolRead { message, summary } => next.push(Message::tool(
                "Read",
                DisplayMode::Collapsed,
                message.as_str(),
                summary.as_str(),
            )),
            Event::ToolGrep { message, summary } => next.push(Message::tool(
                "Grep",
                DisplayMode::Collapsed,
                message.as_str(),
                summary.as_str(),
            )),
            Event::ToolGlob { message, summary } => next.push(Message::tool(
                "Glob",
                DisplayMode::Collapsed,
                message.as_str(),
                summary.as_str(),
            )),
            Event::ToolEdit { message } => {
                next.push(Message::tool("Edit", DisplayMode::Expanded, message.as_str(), ""))
            }
            Event::ToolWrite { message } => {
                next.push(Message::tool("Write", DisplayMode::Expanded, message.as_str(), ""))
            }
            Event::ToolError { tool_name, message } => next.push(Message::tool(
                tool_name.as_str(),
                DisplayMode::Error,
                message.as_str(),
                "",
            )),
            Event::TokenUsageUpdate {
                context_used,
                tokens_used,
            } => {
                next.model.context_used = *context_used;
                next.model.tokens_used = *tokens_used;
            }
            Event::TaskListChanged => {}
            Event::StreamClosed => return Transition::Stop(next),
        }
        Transition::Continue(next)
    }

    fn push(&mut self, message: Message) {
        if message.kind == MessageKind::Thinking {
            self.thinking_at = Some(self.messages.len());
        }
        Arc::make_mut(&mut self.messages).push(message);
    }

    fn remove_thinking(&mut self) {
        let Some(idx) = self.thinking_at.take() else {
            return;
        };
        let messages = Arc::make_mut(&mut self.messages);
        if messages
            .get(idx)
            .is_some_and(|m| m.kind == MessageKind::Thinking)
        {
            messages.remove(idx);
        }
    }

    fn append_to_last_tool(&mut self, line: &str) {
        let Some(idx) = self
            .messages
            .iter()
            .rposition(|m| m.kind == MessageKind::Tool)
        else {
            tracing::warn!("dropping command output line with no open tool block");
            return;
        };
        let target = &mut Arc::make_mut(&mut self.messages)[idx];
        target.content.push('\n');
        target.content.push_str(line);
    }
}

#[cfg(test)]
pub(crate) fn fold(state: &TranscriptState, events: &[Event]) -> TranscriptState {
    let mut current = state.clone();
    for event in events {
        match current.apply(event) {
            Transition::Continue(next) => current = next,
            Transition::Stop(last) => return last,
        }
    }
    current
}
