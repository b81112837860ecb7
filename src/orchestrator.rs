//! Bridge from submitted lines to events: slash commands go to the project
//! loaders, everything else to the injected backend.

use chrono::Utc;
use serde::Serialize;

use crate::app::dispatch::{parse_submission, Submission};
use crate::app::text::sanitize_runtime_text;
use crate::backend::{Backend, DEFAULT_BACKEND_NAME};
use crate::event::Event;
use crate::project::{roadmap, weekly, ProjectError};
use crate::queue::{EventQueue, QueueError};

pub(crate) const COMMANDS: [&str; 2] = ["/roadmap status", "/weekly status"];

pub(crate) struct Dispatcher {
    queue: EventQueue,
    backend: Option<Box<dyn Backend>>,
}

impl Dispatcher {
    pub(crate) fn new(queue: EventQueue, backend: Option<Box<dyn Backend>>) -> Self {
        Self { queue, backend }
    }

    /// Swap the task backend. `None` leaves the current one in place.
    pub(crate) fn replace_backend(&mut self, backend: Option<Box<dyn Backend>>) {
        match backend {
            Some(backend) => {
                tracing::info!(backend = backend.name(), "backend replaced");
                self.backend = Some(backend);
            }
            None => tracing::debug!("ignoring empty backend replacement"),
        }
    }

    pub(crate) fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Handle one submitted line to completion. Fails only when the queue has
    /// been closed underneath us.
    pub(crate) fn process(&mut self, line: &str) -> Result<(), QueueError> {
        match parse_submission(line) {
            Submission::Empty => Ok(()),
            Submission::Command { name, args } => self.run_command(&name, &args),
            Submission::Task(task) => self.run_task(&task),
        }
    }

    fn run_command(&mut self, name: &str, args: &[String]) -> Result<(), QueueError> {
        match name {
            "/roadmap" => self.run_status(
                "roadmap",
                args,
                roadmap::DEFAULT_ROADMAP_PATH,
                |path| {
                    roadmap::status(path, Utc::now()).inspect(|report| {
                        tracing::info!(
                            pct = report.overall.pct,
                            complete = report.is_complete(),
                            "roadmap status"
                        )
                    })
                },
            ),
            "/weekly" => {
                self.run_status("weekly", args, weekly::DEFAULT_WEEKLY_PATH, weekly::load)
            }
            _ => self.emit(Event::reply(format!("Unknown command: {name}"))),
        }
    }

    fn run_status<T, F>(
        &mut self,
        tool: &'static str,
        args: &[String],
        default_path: &str,
        load: F,
    ) -> Result<(), QueueError>
    where
        T: Serialize,
        F: FnOnce(&str) -> Result<T, ProjectError>,
    {
        if args.first().map(String::as_str) != Some("status") {
            return self.emit(Event::reply(format!(
                "Usage: /{tool} status [path] (default: {default_path})"
            )));
        }
        let path = args.get(1).map(String::as_str).unwrap_or(default_path);

        self.emit(Event::AgentThinking)?;
        match load(path) {
            Ok(report) => match serde_json::to_string_pretty(&report) {
                Ok(text) => self.emit(Event::reply(text)),
                Err(err) => self.emit(Event::tool_error(tool, err.to_string())),
            },
            Err(err) => {
                tracing::warn!(tool, path, error = %err, "status command failed");
                self.emit(Event::tool_error(tool, err.to_string()))
            }
        }
    }

    fn run_task(&mut self, task: &str) -> Result<(), QueueError> {
        if self.backend.is_none() {
            return self.emit(Event::tool_error(
                DEFAULT_BACKEND_NAME,
                "no backend configured; set AGENTSHELL_BACKEND to an agent command",
            ));
        }

        self.emit(Event::AgentThinking)?;
        let backend = self.backend.as_mut().expect("backend checked above");
        let result = backend.run(task);
        let name = backend.name().to_string();
        match result {
            Ok(text) => self.emit(Event::reply(sanitize_runtime_text(&text))),
            Err(err) => {
                tracing::warn!(backend = %name, error = %err, "backend task failed");
                self.emit(Event::tool_error(name, sanitize_runtime_text(&err.to_string())))
            }
        }
    }

    fn emit(&self, event: Event) -> Result<(), QueueError> {
        tracing::debug!(event = event.tag(), "emit");
        self.queue.send(event)
    }
}
