use serde::{Deserialize, Serialize};

use super::{read_document, ProjectError, Result};

pub(crate) const DEFAULT_WEEKLY_PATH: &str = "weekly.md";

const DELIMITER: &str = "---";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct WeeklyUpdate {
    pub(crate) week: String,
    pub(crate) date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) highlights: Vec<String>,
    pub(crate) metrics: WeeklyMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) blockers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) next_week: Vec<String>,
    /// Markdown after the front matter; never read from the header itself.
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub(crate) body: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct WeeklyMetrics {
    pub(crate) milestones_done: i64,
    pub(crate) milestones_total: i64,
    pub(crate) progress_pct: i64,
}

pub(crate) fn load(path: &str) -> Result<WeeklyUpdate> {
    let (path, data) = read_document("weekly update", path)?;
    let (front_matter, body) =
        split_front_matter(&data).map_err(|reason| ProjectError::FrontMatter {
            path: path.clone(),
            reason,
        })?;

    let mut update: WeeklyUpdate = if front_matter.trim().is_empty() {
        WeeklyUpdate::default()
    } else {
        serde_yaml::from_str(&front_matter).map_err(|source| ProjectError::Parse {
            what: "weekly update front matter",
            path,
            source,
        })?
    };
    update.body = body.trim().to_string();
    validate(&update)?;
    Ok(update)
}

fn validate(update: &WeeklyUpdate) -> Result<()> {
    if update.week.trim().is_empty() {
        return Err(ProjectError::Invalid(
            "weekly update week is required".to_string(),
        ));
    }
    if update.date.trim().is_empty() {
        return Err(ProjectError::Invalid(
            "weekly update date is required".to_string(),
        ));
    }
    let m = update.metrics;
    if m.milestones_done < 0 || m.milestones_total < 0 || m.progress_pct < 0 {
        return Err(ProjectError::Invalid(
            "weekly update metrics must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn split_front_matter(content: &str) -> std::result::Result<(String, String), &'static str> {
    let normalized = content.replace("\r\n", "\n");
    let normalized = normalized.strip_prefix('\u{feff}').unwrap_or(&normalized);
    let lines: Vec<&str> = normalized.split('\n').collect();
    if lines.len() < 3 || lines[0].trim() != DELIMITER {
        return Err("missing starting front matter delimiter '---'");
    }
    let Some(end) = lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == DELIMITER)
        .map(|i| i + 1)
    else {
        return Err("missing ending front matter delimiter '---'");
    };
    let front_matter = lines[1..end].join("\n");
    let body = lines[end + 1..].join("\n");
    Ok((front_matter, body))
}
