//! Project initialization command.

use anyhow::Result;
use std::path::Path;

use agent_factory::project::init_project;

pub fn cmd_init(project_dir: &Path) -> Result<()> {
    let result = init_project(project_dir)?;
    if result.created {
        println!(
            "Initialized agent-factory project at {}",
            result.factory_dir.display()
        );
    } else {
        println!(
            "Project already initialized at {} (structure verified)",
            result.factory_dir.display()
        );
    }
    Ok(())
}
