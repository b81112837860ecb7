//! Task backends. A backend takes one task description and returns the final
//! result text; it never streams partial output through this interface.

use std::process::{Command, Stdio};

use serde_json::Value;
use thiserror::Error;

pub(crate) const DEFAULT_BACKEND_NAME: &str = "Engine";

#[derive(Debug, Error)]
pub(crate) enum BackendError {
    #[error("{program} spawn failed: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed ({status}): {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("{0} returned no output")]
    NoOutput(String),
}

pub(crate) trait Backend: Send {
    /// Label used as the tool name when a run fails.
    fn name(&self) -> &str;

    /// Run one task to completion.
    fn run(&mut self, task: &str) -> Result<String, BackendError>;
}

/// Runs an external agent CLI once per task, passing the task as the final
/// argument and taking its stdout as the result.
#[derive(Clone, Debug)]
pub(crate) struct ProcessBackend {
    name: String,
    program: String,
    args: Vec<String>,
}

impl ProcessBackend {
    /// `command_line` is split on whitespace; no shell quoting is applied.
    pub(crate) fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            name: DEFAULT_BACKEND_NAME.to_string(),
            program,
            args: parts.collect(),
        })
    }
}

impl Backend for ProcessBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, task: &str) -> Result<String, BackendError> {
        tracing::info!(program = %self.program, "running backend task");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(task)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = extract_result_text(&stdout);
        if text.is_empty() {
            return Err(BackendError::NoOutput(self.program.clone()));
        }
        Ok(text)
    }
}

/// Agent CLIs in stream-json mode print one JSON object per line; prefer the
/// last `result`/`assistant` text over the raw dump.
fn extract_result_text(stdout: &str) -> String {
    stdout
        .lines()
        .rev()
        .filter(|line| !line.trim().is_empty())
        .find_map(json_result_text)
        .unwrap_or_else(|| stdout.trim().to_string())
}

fn json_result_text(line: &str) -> Option<String> {
    let value: Value = serde_json::from_str(line).ok()?;
    match value.get("type")?.as_str()? {
        "result" => value
            .get("result")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string()),
        "assistant" => value
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_array)
            .and_then(|items| {
                items.iter().find_map(|item| {
                    if item.get("type").and_then(Value::as_str) == Some("text") {
                        item.get("text")
                            .and_then(Value::as_str)
                            .map(|s| s.trim().to_string())
                    } else {
                        None
                    }
                })
            }),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Scripted backend for dispatcher tests.
    pub(crate) struct StubBackend {
        pub(crate) name: String,
        pub(crate) reply: Result<String, String>,
        pub(crate) calls: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl StubBackend {
        pub(crate) fn ok(name: &str, reply: &str) -> Self {
            Self {
                name: name.to_string(),
                reply: Ok(reply.to_string()),
                calls: Default::default(),
            }
        }

        pub(crate) fn failing(name: &str, message: &str) -> Self {
            Self {
                name: name.to_string(),
                reply: Err(message.to_string()),
                calls: Default::default(),
            }
        }
    }

    impl Backend for StubBackend {
        fn name(&self) -> &str {
            &self.name
        }

        fn run(&mut self, task: &str) -> Result<String, BackendError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(task.to_string());
            }
            self.reply.clone().map_err(BackendError::NoOutput)
        }
    }
}
