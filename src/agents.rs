//! Agent prompt enumeration, goal lookup, and artifact creation.
//!
//! Thin read-mostly helpers over the per-phase `agents/`, `templates/`, and
//! `artifacts/` directories. Listing operations degrade to empty results for
//! missing directories so status displays stay usable on partially
//! initialized projects; targeted lookups fail with descriptive errors.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::phase::{PHASE_COUNT, PHASE_DIRS};
use crate::project::factory_dir;

static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

/// Which phase each agent type belongs to.
const AGENT_PHASES: [(&str, usize); 9] = [
    ("business-analyst", 0),
    ("product-manager", 0),
    ("architect", 1),
    ("primary-planner", 2),
    ("sub-planner", 2),
    ("worker", 3),
    ("judge", 3),
    ("qa-engineer", 4),
    ("retrospective-analyst", 5),
];

/// One agent prompt file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentSummary {
    pub filename: String,
    /// First top-level heading of the prompt, or "Untitled".
    pub title: String,
}

fn agents_dir(project_dir: &Path, phase: usize) -> PathBuf {
    factory_dir(project_dir)
        .join("phases")
        .join(PHASE_DIRS[phase])
        .join("agents")
}

fn first_heading(content: &str) -> Option<String> {
    HEADING_REGEX
        .captures(content)
        .map(|cap| cap[1].trim().to_string())
}

/// List agent prompt files for one phase. A missing agents directory yields
/// an empty list.
pub fn phase_agents(project_dir: &Path, phase: usize) -> Result<Vec<AgentSummary>> {
    if phase >= PHASE_COUNT {
        bail!("Phase index {phase} is out of range (expected 0-5)");
    }

    let dir = agents_dir(project_dir, phase);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(Vec::new()),
    };

    let mut agents = Vec::new();
    for entry in entries.flatten() {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(".md") {
            continue;
        }
        let content = fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read agent prompt: {}", entry.path().display()))?;
        agents.push(AgentSummary {
            filename: name,
            title: first_heading(&content).unwrap_or_else(|| "Untitled".to_string()),
        });
    }
    Ok(agents)
}

/// List agents across all phases (or one, when `phase` is given), keyed by
/// phase index. Phases without agents are omitted.
pub fn list_agents(
    project_dir: &Path,
    phase: Option<usize>,
) -> Result<Vec<(usize, Vec<AgentSummary>)>> {
    let indices: Vec<usize> = match phase {
        Some(i) => vec![i],
        None => (0..PHASE_COUNT).collect(),
    };

    let mut listing = Vec::new();
    for index in indices {
        let agents = phase_agents(project_dir, index)?;
        if !agents.is_empty() {
            listing.push((index, agents));
        }
    }
    Ok(listing)
}

/// Full prompt text for an agent type (e.g. "worker", "architect").
pub fn agent_prompt(project_dir: &Path, agent_type: &str) -> Result<String> {
    let Some(&(_, phase)) = AGENT_PHASES.iter().find(|(name, _)| *name == agent_type) else {
        let known: Vec<&str> = AGENT_PHASES.iter().map(|(name, _)| *name).collect();
        bail!(
            "Unknown agent type: {agent_type}. Known types: {}",
            known.join(", ")
        );
    };

    let path = agents_dir(project_dir, phase).join(format!("{agent_type}.md"));
    fs::read_to_string(&path)
        .with_context(|| format!("Agent prompt file not found: {}", path.display()))
}

/// Content of the project's GOAL.md.
pub fn read_goal(project_dir: &Path) -> Result<String> {
    let path = factory_dir(project_dir).join("GOAL.md");
    fs::read_to_string(&path).with_context(|| format!("GOAL.md not found: {}", path.display()))
}

/// Instantiate a phase template into that phase's artifacts directory.
/// Returns the created artifact's path.
pub fn create_artifact(
    project_dir: &Path,
    phase: usize,
    template: &str,
    name: &str,
) -> Result<PathBuf> {
    if phase >= PHASE_COUNT {
        bail!("Phase index {phase} is out of range (expected 0-5)");
    }

    let phase_dir = factory_dir(project_dir).join("phases").join(PHASE_DIRS[phase]);
    let src = phase_dir.join("templates").join(template);
    let dst = phase_dir.join("artifacts").join(name);

    fs::copy(&src, &dst).with_context(|| {
        format!(
            "Failed to create artifact {} from template {}",
            dst.display(),
            src.display()
        )
    })?;
    Ok(dst)
}
