//! Phase status and transition commands.

use anyhow::Result;
use std::path::Path;

use agent_factory::phase::PhaseBoard;

pub fn cmd_status(project_dir: &Path, json: bool) -> Result<()> {
    let board = PhaseBoard::open(project_dir);
    let status = board.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("{}", console::style("Phase Status").bold());
    println!();
    for phase in &status.record.phases {
        let marker = if phase.index == status.record.current_phase {
            ">"
        } else {
            " "
        };
        let check = if phase.active { "x" } else { " " };
        let artifacts = status.artifact_counts[phase.index];
        println!(
            "{marker} [{check}] Phase {}: {} {}",
            phase.index,
            phase.name,
            console::style(format!("({artifacts} artifacts)")).dim()
        );
    }
    println!();
    println!("Current phase: {}", status.record.current_phase);
    println!("Started: {}", status.record.started);
    println!();
    Ok(())
}

pub fn cmd_phase_start(project_dir: &Path, phase: usize) -> Result<()> {
    let record = PhaseBoard::open(project_dir).start(phase)?;
    println!(
        "Phase {} ({}) started and set as current.",
        phase, record.phases[phase].name
    );
    Ok(())
}

pub fn cmd_phase_complete(project_dir: &Path, phase: usize) -> Result<()> {
    let record = PhaseBoard::open(project_dir).complete(phase)?;
    println!(
        "Phase {} ({}) completed. Current phase: {}.",
        phase, record.phases[phase].name, record.current_phase
    );
    Ok(())
}

pub fn cmd_phase_skip(project_dir: &Path, phase: usize) -> Result<()> {
    let record = PhaseBoard::open(project_dir).skip(phase)?;
    println!(
        "Phase {} ({}) skipped. Current phase: {}.",
        phase, record.phases[phase].name, record.current_phase
    );
    Ok(())
}

pub fn cmd_phase_reset(project_dir: &Path, phase: usize) -> Result<()> {
    let record = PhaseBoard::open(project_dir).reset(phase)?;
    println!(
        "Phase {} ({}) re-activated.",
        phase, record.phases[phase].name
    );
    Ok(())
}
