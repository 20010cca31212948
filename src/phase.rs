//! Phase record grammar and the phase state machine.
//!
//! A project moves through six fixed, ordered workflow phases. Which phases
//! are active, which is current, and when work started are persisted in a
//! single markdown record:
//!
//! ```text
//! # Phase Configuration
//!
//! ## Active Phases
//! - [x] Phase 0: Discovery
//! - [ ] Phase 1: Design
//! ...
//!
//! ## Current Phase: 0
//! ## Started: 2026-08-23
//! ```
//!
//! Parsing is tolerant: absent or malformed lines fall back to built-in
//! names, inactive flags, index 0, and an empty date. Every mutation loads
//! the full record, changes it in memory, and persists the whole record back
//! under the `"phase-config"` lock resource, so concurrent mutations cannot
//! lose each other's updates.

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use crate::errors::PhaseError;
use crate::lock::{DirLockProvider, LockProvider, with_lock};
use crate::project::FACTORY_DIR;

/// Number of workflow phases; indices are stable 0-5 and ordinally meaningful.
pub const PHASE_COUNT: usize = 6;

/// Default phase names, used when a checkbox line is absent or malformed.
pub const PHASE_NAMES: [&str; PHASE_COUNT] = [
    "Discovery",
    "Design",
    "Planning",
    "Build",
    "Validate",
    "Retrospective",
];

/// On-disk directory name for each phase under `.agent-factory/phases/`.
pub const PHASE_DIRS: [&str; PHASE_COUNT] = [
    "0-discovery",
    "1-design",
    "2-planning",
    "3-build",
    "4-validate",
    "5-retrospective",
];

/// Lock resource guarding the phase record's read-modify-write cycle.
const PHASE_RECORD_RESOURCE: &str = "phase-config";

static CHECKBOX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- \[([ x])\] Phase (\d): (\w+)").unwrap());

static CURRENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Current Phase: (\d+)").unwrap());

static STARTED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"## Started: (.+)").unwrap());

/// One workflow phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub index: usize,
    pub name: String,
    pub active: bool,
}

/// The full workflow progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phases: Vec<PhaseState>,
    pub current_phase: usize,
    pub started: String,
}

impl Default for PhaseRecord {
    fn default() -> Self {
        Self::parse("")
    }
}

impl PhaseRecord {
    /// Parse the markdown grammar. Never fails; each field independently
    /// degrades to its default when its line is absent or malformed.
    pub fn parse(content: &str) -> Self {
        let mut phases: Vec<PhaseState> = (0..PHASE_COUNT)
            .map(|i| PhaseState {
                index: i,
                name: PHASE_NAMES[i].to_string(),
                active: false,
            })
            .collect();

        let mut seen = [false; PHASE_COUNT];
        for cap in CHECKBOX_REGEX.captures_iter(content) {
            let index: usize = match cap[2].parse() {
                Ok(i) if i < PHASE_COUNT => i,
                _ => continue,
            };
            // First checkbox line per index wins.
            if seen[index] {
                continue;
            }
            seen[index] = true;
            phases[index].name = cap[3].to_string();
            phases[index].active = &cap[1] == "x";
        }

        let current_phase = CURRENT_REGEX
            .captures(content)
            .and_then(|cap| cap[1].parse().ok())
            .unwrap_or(0);

        let started = STARTED_REGEX
            .captures(content)
            .map(|cap| cap[1].trim().to_string())
            .unwrap_or_default();

        Self {
            phases,
            current_phase,
            started,
        }
    }

    /// Render the canonical markdown form of the record.
    pub fn render(&self) -> String {
        let mut lines = vec![
            "# Phase Configuration".to_string(),
            String::new(),
            "## Active Phases".to_string(),
        ];

        for phase in &self.phases {
            let check = if phase.active { "x" } else { " " };
            lines.push(format!("- [{}] Phase {}: {}", check, phase.index, phase.name));
        }

        lines.push(String::new());
        lines.push(format!("## Current Phase: {}", self.current_phase));
        lines.push(format!("## Started: {}", self.started));
        lines.push(String::new());

        lines.join("\n")
    }

    /// Index of the next active phase strictly after `after`, scanning
    /// forward without wrapping.
    pub fn next_active_after(&self, after: usize) -> Option<usize> {
        (after + 1..PHASE_COUNT).find(|&i| self.phases[i].active)
    }
}

/// Per-phase summary returned by [`PhaseBoard::status`].
#[derive(Debug, Serialize)]
pub struct PhaseStatus {
    pub record: PhaseRecord,
    /// Count of `.md` artifacts per phase (missing directories count 0).
    pub artifact_counts: Vec<usize>,
}

/// Engine over the on-disk phase record.
pub struct PhaseBoard {
    record_path: PathBuf,
    phases_dir: PathBuf,
    locks: Arc<dyn LockProvider>,
}

impl PhaseBoard {
    /// Board over `<project>/.agent-factory/phases/` using the shared
    /// machine-wide lock namespace.
    pub fn open(project_dir: &Path) -> Self {
        Self::with_locks(project_dir, Arc::new(DirLockProvider::shared()))
    }

    pub fn with_locks(project_dir: &Path, locks: Arc<dyn LockProvider>) -> Self {
        let phases_dir = project_dir.join(FACTORY_DIR).join("phases");
        Self {
            record_path: phases_dir.join("phase.config.md"),
            phases_dir,
            locks,
        }
    }

    /// Path of the phase record within a project.
    pub fn record_path(project_dir: &Path) -> PathBuf {
        project_dir
            .join(FACTORY_DIR)
            .join("phases")
            .join("phase.config.md")
    }

    /// Load the current record from disk.
    pub fn load(&self) -> Result<PhaseRecord, PhaseError> {
        let content =
            fs::read_to_string(&self.record_path).map_err(|source| PhaseError::MissingRecord {
                path: self.record_path.clone(),
                source,
            })?;
        Ok(PhaseRecord::parse(&content))
    }

    fn store(&self, record: &PhaseRecord) -> Result<(), PhaseError> {
        fs::write(&self.record_path, record.render()).map_err(|source| PhaseError::WriteFailed {
            path: self.record_path.clone(),
            source,
        })
    }

    /// Current record plus per-phase artifact counts.
    pub fn status(&self) -> Result<PhaseStatus, PhaseError> {
        let record = self.load()?;
        let artifact_counts = (0..PHASE_COUNT)
            .map(|i| self.artifact_count(i))
            .collect();
        Ok(PhaseStatus {
            record,
            artifact_counts,
        })
    }

    fn artifact_count(&self, phase: usize) -> usize {
        let dir = self.phases_dir.join(PHASE_DIRS[phase]).join("artifacts");
        let Ok(entries) = fs::read_dir(dir) else {
            return 0;
        };
        entries
            .flatten()
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.ends_with(".md") && name != ".gitkeep"
            })
            .count()
    }

    /// Activate a phase, make it current, and stamp the started date.
    pub fn start(&self, phase: usize) -> Result<PhaseRecord, PhaseError> {
        self.mutate(phase, |record| {
            record.phases[phase].active = true;
            record.current_phase = phase;
            record.started = Utc::now().format("%Y-%m-%d").to_string();
        })
    }

    /// Mark a phase complete (deactivate it) and auto-advance the current
    /// pointer to the next active phase.
    pub fn complete(&self, phase: usize) -> Result<PhaseRecord, PhaseError> {
        self.deactivate(phase)
    }

    /// Skip a phase; same transition as [`complete`](Self::complete).
    pub fn skip(&self, phase: usize) -> Result<PhaseRecord, PhaseError> {
        self.deactivate(phase)
    }

    fn deactivate(&self, phase: usize) -> Result<PhaseRecord, PhaseError> {
        self.mutate(phase, |record| {
            record.phases[phase].active = false;
            if record.current_phase == phase {
                // No active phase after this one leaves the pointer where it
                // is, now referencing an inactive phase. Intentional: callers
                // can still show the last worked phase.
                if let Some(next) = record.next_active_after(phase) {
                    record.current_phase = next;
                }
            }
        })
    }

    /// Re-activate a previously completed or skipped phase. Does not touch
    /// the current pointer.
    pub fn reset(&self, phase: usize) -> Result<PhaseRecord, PhaseError> {
        self.mutate(phase, |record| {
            record.phases[phase].active = true;
        })
    }

    fn mutate<F>(&self, phase: usize, apply: F) -> Result<PhaseRecord, PhaseError>
    where
        F: FnOnce(&mut PhaseRecord),
    {
        if phase >= PHASE_COUNT {
            return Err(PhaseError::OutOfRange(phase));
        }
        with_lock(self.locks.as_ref(), PHASE_RECORD_RESOURCE, || {
            let mut record = self.load()?;
            apply(&mut record);
            self.store(&record)?;
            Ok(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::MemoryLockProvider;
    use tempfile::{TempDir, tempdir};

    fn make_board() -> (PhaseBoard, TempDir) {
        let dir = tempdir().unwrap();
        let phases_dir = dir.path().join(FACTORY_DIR).join("phases");
        fs::create_dir_all(&phases_dir).unwrap();
        let board = PhaseBoard::with_locks(dir.path(), Arc::new(MemoryLockProvider::new()));
        board.store(&PhaseRecord::default()).unwrap();
        (board, dir)
    }

    #[test]
    fn test_parse_empty_yields_defaults() {
        let record = PhaseRecord::parse("");
        assert_eq!(record.phases.len(), PHASE_COUNT);
        assert_eq!(record.phases[0].name, "Discovery");
        assert_eq!(record.phases[5].name, "Retrospective");
        assert!(record.phases.iter().all(|p| !p.active));
        assert_eq!(record.current_phase, 0);
        assert_eq!(record.started, "");
    }

    #[test]
    fn test_render_parse_round_trip() {
        // Any combination of flags, current index, and arbitrary date string.
        for current in 0..PHASE_COUNT {
            let mut record = PhaseRecord::default();
            record.current_phase = current;
            record.started = "sometime in Q3".to_string();
            for i in 0..PHASE_COUNT {
                record.phases[i].active = (i + current) % 2 == 0;
            }
            let reparsed = PhaseRecord::parse(&record.render());
            assert_eq!(reparsed, record);
        }
    }

    #[test]
    fn test_parse_ignores_malformed_lines() {
        let content = "\
# Phase Configuration

- [x] Phase 0: Discovery
- [?] Phase 1: Design
- [x] Phase 9: Bogus

## Current Phase: not-a-number
";
        let record = PhaseRecord::parse(content);
        assert!(record.phases[0].active);
        assert!(!record.phases[1].active);
        assert_eq!(record.current_phase, 0);
    }

    #[test]
    fn test_next_active_after_scans_forward_without_wrap() {
        let mut record = PhaseRecord::default();
        record.phases[1].active = true;
        record.phases[4].active = true;
        assert_eq!(record.next_active_after(0), Some(1));
        assert_eq!(record.next_active_after(1), Some(4));
        assert_eq!(record.next_active_after(4), None);
        // No wrap back to phase 1.
        assert_eq!(record.next_active_after(5), None);
    }

    #[test]
    fn test_start_activates_and_sets_current() {
        let (board, _dir) = make_board();
        let record = board.start(1).unwrap();
        assert!(record.phases[1].active);
        assert_eq!(record.current_phase, 1);
        assert!(!record.started.is_empty());

        // Persisted, not just in memory.
        let reloaded = board.load().unwrap();
        assert_eq!(reloaded, record);
    }

    #[test]
    fn test_complete_advances_to_next_active() {
        let (board, _dir) = make_board();
        board.start(1).unwrap();
        board.reset(3).unwrap();

        let record = board.complete(1).unwrap();
        assert!(!record.phases[1].active);
        assert_eq!(record.current_phase, 3);
    }

    #[test]
    fn test_complete_last_active_leaves_current_stale() {
        let (board, _dir) = make_board();
        board.start(1).unwrap();

        // No other phase is active: the pointer stays on the now-inactive
        // phase 1. Literal documented behavior.
        let record = board.complete(1).unwrap();
        assert!(!record.phases[1].active);
        assert_eq!(record.current_phase, 1);
    }

    #[test]
    fn test_skip_behaves_like_complete() {
        let (board, _dir) = make_board();
        board.start(0).unwrap();
        board.reset(2).unwrap();

        let record = board.skip(0).unwrap();
        assert!(!record.phases[0].active);
        assert_eq!(record.current_phase, 2);
    }

    #[test]
    fn test_deactivate_non_current_keeps_pointer() {
        let (board, _dir) = make_board();
        board.start(0).unwrap();
        board.reset(3).unwrap();

        let record = board.complete(3).unwrap();
        assert_eq!(record.current_phase, 0);
    }

    #[test]
    fn test_reset_reactivates_without_touching_current() {
        let (board, _dir) = make_board();
        board.start(2).unwrap();
        board.complete(2).unwrap();

        let record = board.reset(2).unwrap();
        assert!(record.phases[2].active);
        assert_eq!(record.current_phase, 2);
    }

    #[test]
    fn test_out_of_range_phase_is_rejected() {
        let (board, _dir) = make_board();
        assert!(matches!(board.start(6), Err(PhaseError::OutOfRange(6))));
        assert!(matches!(board.reset(99), Err(PhaseError::OutOfRange(99))));
    }

    #[test]
    fn test_load_missing_record_is_typed_error() {
        let dir = tempdir().unwrap();
        let board = PhaseBoard::with_locks(dir.path(), Arc::new(MemoryLockProvider::new()));
        assert!(matches!(board.load(), Err(PhaseError::MissingRecord { .. })));
    }

    #[test]
    fn test_mutation_fails_while_record_locked() {
        let (board, _dir) = make_board();
        board.locks.try_acquire(PHASE_RECORD_RESOURCE).unwrap();
        assert!(matches!(
            board.start(0),
            Err(PhaseError::Lock(crate::errors::LockError::Held(_)))
        ));
        board.locks.release(PHASE_RECORD_RESOURCE);
        board.start(0).unwrap();
    }

    #[test]
    fn test_status_counts_artifacts() {
        let (board, dir) = make_board();
        let artifacts = dir
            .path()
            .join(FACTORY_DIR)
            .join("phases")
            .join(PHASE_DIRS[2])
            .join("artifacts");
        fs::create_dir_all(&artifacts).unwrap();
        fs::write(artifacts.join("plan.md"), "# Plan").unwrap();
        fs::write(artifacts.join("notes.md"), "# Notes").unwrap();
        fs::write(artifacts.join(".gitkeep"), "").unwrap();
        fs::write(artifacts.join("scratch.txt"), "").unwrap();

        let status = board.status().unwrap();
        assert_eq!(status.artifact_counts[2], 2);
        // Missing artifact directories count zero, never error.
        assert_eq!(status.artifact_counts[0], 0);
    }
}
