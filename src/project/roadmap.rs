use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{read_document, ProjectError, Result};

pub(crate) const DEFAULT_ROADMAP_PATH: &str = "roadmap.yaml";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Roadmap {
    pub(crate) version: i64,
    pub(crate) target_date: String,
    pub(crate) phases: Vec<Phase>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Phase {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) milestones: Vec<Milestone>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Milestone {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) status: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MilestoneStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
    Unknown,
}

impl MilestoneStatus {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "todo" => MilestoneStatus::Todo,
            "in_progress" => MilestoneStatus::InProgress,
            "done" => MilestoneStatus::Done,
            "blocked" => MilestoneStatus::Blocked,
            _ => MilestoneStatus::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Progress {
    pub(crate) done: usize,
    pub(crate) total: usize,
    pub(crate) pct: usize,
}

impl Progress {
    fn of(done: usize, total: usize) -> Self {
        let pct = if total == 0 { 0 } else { done * 100 / total };
        Self { done, total, pct }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct PhaseStatus {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) window: String,
    pub(crate) progress: Progress,
    pub(crate) items: usize,
    pub(crate) done: usize,
    pub(crate) in_progress: usize,
    pub(crate) todo: usize,
    pub(crate) blocked: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RoadmapStatus {
    pub(crate) target_date: String,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) overall: Progress,
    pub(crate) phases: Vec<PhaseStatus>,
}

impl RoadmapStatus {
    pub(crate) fn is_complete(&self) -> bool {
        self.overall.pct == 100
    }
}

pub(crate) fn load(path: &str) -> Result<Roadmap> {
    let (path, data) = read_document("roadmap", path)?;
    let roadmap: Roadmap = if data.trim().is_empty() {
        Roadmap::default()
    } else {
        serde_yaml::from_str(&data).map_err(|source| ProjectError::Parse {
            what: "roadmap yaml",
            path,
            source,
        })?
    };
    validate(&roadmap)?;
    Ok(roadmap)
}

/// Load, validate and summarise a roadmap in one call.
pub(crate) fn status(path: &str, now: DateTime<Utc>) -> Result<RoadmapStatus> {
    let roadmap = load(path)?;
    compute_status(&roadmap, now)
}

pub(crate) fn compute_status(roadmap: &Roadmap, now: DateTime<Utc>) -> Result<RoadmapStatus> {
    validate(roadmap)?;
    let phases: Vec<PhaseStatus> = roadmap.phases.iter().map(phase_status).collect();
    let done = phases.iter().map(|p| p.done).sum();
    let total = phases.iter().map(|p| p.items).sum();
    Ok(RoadmapStatus {
        target_date: roadmap.target_date.clone(),
        generated_at: now,
        overall: Progress::of(done, total),
        phases,
    })
}

fn validate(roadmap: &Roadmap) -> Result<()> {
    if roadmap.version <= 0 {
        return Err(ProjectError::Invalid(format!(
            "invalid roadmap version: {}",
            roadmap.version
        )));
    }
    if roadmap.target_date.trim().is_empty() {
        return Err(ProjectError::Invalid(
            "roadmap target_date is required".to_string(),
        ));
    }
    for (pi, phase) in roadmap.phases.iter().enumerate() {
        if phase.id.trim().is_empty() {
            return Err(ProjectError::Invalid(format!("phase[{pi}] id is required")));
        }
        if phase.name.trim().is_empty() {
            return Err(ProjectError::Invalid(format!("phase[{pi}] name is required")));
        }
        for (mi, milestone) in phase.milestones.iter().enumerate() {
            if milestone.id.trim().is_empty() {
                return Err(ProjectError::Invalid(format!(
                    "phase[{pi}] milestone[{mi}] id is required"
                )));
            }
            if milestone.title.trim().is_empty() {
                return Err(ProjectError::Invalid(format!(
                    "phase[{pi}] milestone[{mi}] title is required"
                )));
            }
        }
    }
    Ok(())
}

fn phase_status(phase: &Phase) -> PhaseStatus {
    let mut status = PhaseStatus {
        id: phase.id.clone(),
        name: phase.name.clone(),
        window: phase_window(&phase.start, &phase.end),
        progress: Progress::default(),
        items: 0,
        done: 0,
        in_progress: 0,
        todo: 0,
        blocked: 0,
    };
    for milestone in &phase.milestones {
        status.items += 1;
        match MilestoneStatus::parse(&milestone.status) {
            MilestoneStatus::Done => status.done += 1,
            MilestoneStatus::InProgress => status.in_progress += 1,
            MilestoneStatus::Todo => status.todo += 1,
            MilestoneStatus::Blocked => status.blocked += 1,
            // Counted in `items` only.
            MilestoneStatus::Unknown => {}
        }
    }
    status.progress = Progress::of(status.done, status.items);
    status
}

fn phase_window(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        ("", e) => e.to_string(),
        (s, "") => s.to_string(),
        (s, e) => format!("{s} -> {e}"),
    }
}
