use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use agent_factory::project::resolve_project_dir;
use agent_factory::queue::QueueName;

mod cmd;

#[derive(Parser)]
#[command(name = "agent-factory")]
#[command(version, about = "File-backed coordination for multi-agent workflows")]
pub struct Cli {
    /// Project root. If not provided, searches upward for .agent-factory/
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the .agent-factory state tree in the project
    Init,
    /// Show phase status: active flags, current phase, artifact counts
    Status {
        /// Emit the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Phase transitions
    Phase {
        #[command(subcommand)]
        command: PhaseCommands,
    },
    /// Queue inspection
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Task transitions on the five-queue board
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Agent prompt listing and lookup
    Agents {
        #[command(subcommand)]
        command: AgentsCommands,
    },
    /// Print the project GOAL.md
    Goal,
    /// Artifact management
    Artifact {
        #[command(subcommand)]
        command: ArtifactCommands,
    },
}

#[derive(Subcommand)]
pub enum PhaseCommands {
    /// Activate a phase, set it as current, record the started date
    Start { phase: usize },
    /// Mark a phase complete and auto-advance to the next active phase
    Complete { phase: usize },
    /// Skip a phase (deactivate), advancing if it was current
    Skip { phase: usize },
    /// Re-activate a previously completed or skipped phase
    Reset { phase: usize },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Task counts per queue plus in-progress and review details
    Status {
        #[arg(long)]
        json: bool,
    },
    /// List all tasks in one queue
    List {
        queue: QueueName,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Claim a todo task and move it to in-progress
    Claim {
        filename: String,
        /// Worker identifier to record (defaults to worker-<pid>)
        #[arg(long)]
        worker: Option<String>,
    },
    /// Submit an in-progress task for review
    Submit { filename: String },
    /// Reject a task in review and send it back to todo
    Reject {
        filename: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Approve a task in review and mark it done
    Done { filename: String },
    /// Return an in-progress task to todo
    Return { filename: String },
}

#[derive(Subcommand)]
pub enum AgentsCommands {
    /// List agents across all phases or one phase
    List {
        #[arg(long)]
        phase: Option<usize>,
    },
    /// Print the full prompt for an agent type (e.g. 'worker')
    Prompt { agent_type: String },
}

#[derive(Subcommand)]
pub enum ArtifactCommands {
    /// Instantiate a phase template into the phase's artifacts directory
    New {
        phase: usize,
        template: String,
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init works on the explicit or current directory; everything else
    // requires an already-initialized project root.
    if let Commands::Init = cli.command {
        let project_dir = match cli.project_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        return cmd::cmd_init(&project_dir);
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Status { json } => cmd::cmd_status(&project_dir, json),
        Commands::Phase { command } => match command {
            PhaseCommands::Start { phase } => cmd::cmd_phase_start(&project_dir, phase),
            PhaseCommands::Complete { phase } => cmd::cmd_phase_complete(&project_dir, phase),
            PhaseCommands::Skip { phase } => cmd::cmd_phase_skip(&project_dir, phase),
            PhaseCommands::Reset { phase } => cmd::cmd_phase_reset(&project_dir, phase),
        },
        Commands::Queue { command } => match command {
            QueueCommands::Status { json } => cmd::cmd_queue_status(&project_dir, json),
            QueueCommands::List { queue, json } => cmd::cmd_queue_list(&project_dir, queue, json),
        },
        Commands::Task { command } => match command {
            TaskCommands::Claim { filename, worker } => {
                cmd::cmd_task_claim(&project_dir, &filename, worker.as_deref())
            }
            TaskCommands::Submit { filename } => cmd::cmd_task_submit(&project_dir, &filename),
            TaskCommands::Reject { filename, reason } => {
                cmd::cmd_task_reject(&project_dir, &filename, reason.as_deref())
            }
            TaskCommands::Done { filename } => cmd::cmd_task_done(&project_dir, &filename),
            TaskCommands::Return { filename } => cmd::cmd_task_return(&project_dir, &filename),
        },
        Commands::Agents { command } => match command {
            AgentsCommands::List { phase } => cmd::cmd_agents_list(&project_dir, phase),
            AgentsCommands::Prompt { agent_type } => {
                cmd::cmd_agent_prompt(&project_dir, &agent_type)
            }
        },
        Commands::Goal => cmd::cmd_goal(&project_dir),
        Commands::Artifact { command } => match command {
            ArtifactCommands::New {
                phase,
                template,
                name,
            } => cmd::cmd_artifact_new(&project_dir, phase, &template, &name),
        },
    }
}
