use std::process::{Command, Stdio};

use crate::app::ThemePreset;
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use crate::transcript::{ModelInfo, DEFAULT_CONTEXT_MAX, DEFAULT_MODEL_NAME};

/// Session settings, read once at startup.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) model_name: String,
    pub(crate) context_max: u64,
    /// External agent command line; `None` runs without a backend.
    pub(crate) backend_command: Option<String>,
    pub(crate) theme: ThemePreset,
    pub(crate) queue_capacity: usize,
    pub(crate) work_dir: String,
    pub(crate) repo_label: String,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.work_dir = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".to_string());
        config.repo_label = detect_repo_label();
        config
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let theme = match var("AGENTSHELL_THEME") {
            Some(raw) => ThemePreset::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(theme = %raw, "unknown theme, using default");
                crate::app::default_theme()
            }),
            None => crate::app::default_theme(),
        };

        Self {
            model_name: var("AGENTSHELL_MODEL").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            context_max: var("AGENTSHELL_CONTEXT_MAX")
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(DEFAULT_CONTEXT_MAX),
            backend_command: var("AGENTSHELL_BACKEND"),
            theme,
            queue_capacity: var("AGENTSHELL_QUEUE_CAPACITY")
                .and_then(|raw| raw.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            work_dir: ".".to_string(),
            repo_label: String::new(),
        }
    }

    pub(crate) fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model_name.clone(),
            context_max: self.context_max,
            ..ModelInfo::default()
        }
    }
}

fn detect_repo_label() -> String {
    Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_default()
}
