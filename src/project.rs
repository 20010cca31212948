//! Project root resolution and `.agent-factory/` scaffolding.
//!
//! The state tree a scaffolded project carries:
//!
//! ```text
//! .agent-factory/
//! ├── GOAL.md                      # Project goal (placeholder until edited)
//! ├── phases/
//! │   ├── phase.config.md          # Phase record (all phases inactive)
//! │   └── <i>-<name>/              # One directory per phase
//! │       ├── agents/              # Agent prompt files
//! │       ├── artifacts/           # Produced artifacts
//! │       └── templates/           # Artifact templates
//! └── queue/
//!     └── {backlog,todo,in-progress,review,done}/
//! ```

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::phase::{PHASE_DIRS, PhaseBoard, PhaseRecord};
use crate::queue::QueueName;

/// The name of the coordination state directory.
pub const FACTORY_DIR: &str = ".agent-factory";

/// Path of the state directory within a project.
pub fn factory_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(FACTORY_DIR)
}

/// Result of initializing a project.
#[derive(Debug)]
pub struct InitResult {
    /// Path to the state directory.
    pub factory_dir: PathBuf,
    /// Whether the directory was newly created (false if it already existed).
    pub created: bool,
}

/// Resolve the project root.
///
/// An explicit path wins. Otherwise walk upward from the current directory
/// until a `.agent-factory/` entry is found.
pub fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    let mut dir = std::env::current_dir().context("Failed to get current directory")?;
    loop {
        if factory_dir(&dir).exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            bail!(
                "Could not find a {FACTORY_DIR}/ directory. \
                 Use --project-dir or run from inside an initialized project."
            );
        }
    }
}

/// Initialize a project: scaffold the queue and phase directories and write
/// the default state files. Idempotent — an existing tree is completed in
/// place and existing files are left alone.
pub fn init_project(project_dir: &Path) -> Result<InitResult> {
    let factory_dir = factory_dir(project_dir);
    let created = !factory_dir.exists();

    for queue in QueueName::ALL {
        let dir = factory_dir.join("queue").join(queue.as_str());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create queue directory: {}", dir.display()))?;
    }

    for phase_dir in PHASE_DIRS {
        for sub in ["agents", "artifacts", "templates"] {
            let dir = factory_dir.join("phases").join(phase_dir).join(sub);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create phase directory: {}", dir.display()))?;
        }
    }

    let record_path = PhaseBoard::record_path(project_dir);
    if !record_path.exists() {
        std::fs::write(&record_path, PhaseRecord::default().render()).with_context(|| {
            format!("Failed to write phase record: {}", record_path.display())
        })?;
    }

    let goal_path = factory_dir.join("GOAL.md");
    if !goal_path.exists() {
        std::fs::write(&goal_path, "# Project Goal\n\nDescribe the project goal here.\n")
            .with_context(|| format!("Failed to write goal file: {}", goal_path.display()))?;
    }

    Ok(InitResult {
        factory_dir,
        created,
    })
}
