use serde::{Deserialize, Serialize};

/// One progress notification flowing from a producer (backend bridge, demo
/// script, slash command) to the transcript. Produced once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub(crate) enum Event {
    UserSubmitted {
        message: String,
    },
    AgentThinking,
    AgentReply {
        message: String,
    },
    AnalysisReady {
        message: String,
    },
    CommandStarted {
        message: String,
    },
    CommandOutputLine {
        message: String,
    },
    CommandFinished,
    ToolRead {
        message: String,
        #[serde(default)]
        summary: String,
    },
    ToolGrep {
        message: String,
        #[serde(default)]
        summary: String,
    },
    ToolGlob {
        message: String,
        #[serde(default)]
        summary: String,
    },
    ToolEdit {
        message: String,
    },
    ToolWrite {
        message: String,
    },
    ToolError {
        tool_name: String,
        message: String,
    },
    TokenUsageUpdate {
        context_used: u64,
        tokens_used: u64,
    },
    /// Reserved for multi-task support; carries nothing yet.
    TaskListChanged,
    StreamClosed,
}

impl Event {
    pub(crate) fn reply(message: impl Into<String>) -> Self {
        Event::AgentReply {
            message: message.into(),
        }
    }

    pub(crate) fn tool_error(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Event::ToolError {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn output_line(message: impl Into<String>) -> Self {
        Event::CommandOutputLine {
            message: message.into(),
        }
    }

    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Event::UserSubmitted { .. } => "UserSubmitted",
            Event::AgentThinking => "AgentThinking",
            Event::AgentReply { .. } => "AgentReply",
            Event::AnalysisReady { .. } => "AnalysisReady",
            Event::CommandStarted { .. } => "CommandStarted",
            Event::CommandOutputLine { .. } => "CommandOutputLine",
            Event::CommandFinished => "CommandFinished",
            Event::ToolRead { .. } => "ToolRead",
            Event::ToolGrep { .. } => "ToolGrep",
            Event::ToolGlob { .. } => "ToolGlob",
            Event::ToolEdit { .. } => "ToolEdit",
            Event::ToolWrite { .. } => "ToolWrite",
            Event::ToolError { .. } => "ToolError",
            Event::TokenUsageUpdate { .. } => "TokenUsageUpdate",
            Event::TaskListChanged => "TaskListChanged",
            Event::StreamClosed => "StreamClosed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_uses_type_tag_and_optional_summary() {
        let raw = r#"{"type":"ToolRead","message":"src/main.rs"}"#;
        let event: Event = serde_json::from_str(raw).expect("parse event");
        assert_eq!(
            event,
            Event::ToolRead {
                message: "src/main.rs".to_string(),
                summary: String::new(),
            }
        );
        assert_eq!(event.tag(), "ToolRead");
    }

    #[test]
    fn unit_variants_serialize_with_tag_only() {
        let json = serde_json::to_string(&Event::CommandFinished).expect("serialize");
        assert_eq!(json, r#"{"type":"CommandFinished"}"#);
    }
}
