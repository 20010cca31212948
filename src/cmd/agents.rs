//! Agent prompt, goal, and artifact commands.

use anyhow::Result;
use std::path::Path;

use agent_factory::agents;
use agent_factory::phase::PHASE_DIRS;

pub fn cmd_agents_list(project_dir: &Path, phase: Option<usize>) -> Result<()> {
    let listing = agents::list_agents(project_dir, phase)?;

    println!();
    println!("{}", console::style("Agents").bold());
    if listing.is_empty() {
        println!();
        println!("No agent files found.");
        println!();
        return Ok(());
    }

    for (index, phase_agents) in &listing {
        println!();
        println!("Phase {index}: {}", PHASE_DIRS[*index]);
        for agent in phase_agents {
            println!(
                "- {}: {}",
                agent.filename.trim_end_matches(".md"),
                agent.title
            );
        }
    }
    println!();
    Ok(())
}

pub fn cmd_agent_prompt(project_dir: &Path, agent_type: &str) -> Result<()> {
    let prompt = agents::agent_prompt(project_dir, agent_type)?;
    println!("{prompt}");
    Ok(())
}

pub fn cmd_goal(project_dir: &Path) -> Result<()> {
    let goal = agents::read_goal(project_dir)?;
    println!("{goal}");
    Ok(())
}

pub fn cmd_artifact_new(project_dir: &Path, phase: usize, template: &str, name: &str) -> Result<()> {
    agents::create_artifact(project_dir, phase, template, name)?;
    println!(
        "Artifact created: {}/artifacts/{name} (from template {template})",
        PHASE_DIRS[phase]
    );
    Ok(())
}
