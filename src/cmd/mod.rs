//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                      |
//! |-----------|---------------------------------------|
//! | `project` | `Init`                                |
//! | `phase`   | `Status`, `Phase`                     |
//! | `queue`   | `Queue`, `Task`                       |
//! | `agents`  | `Agents`, `Goal`, `Artifact`          |

pub mod agents;
pub mod phase;
pub mod project;
pub mod queue;

pub use agents::{cmd_agent_prompt, cmd_agents_list, cmd_artifact_new, cmd_goal};
pub use phase::{cmd_phase_complete, cmd_phase_reset, cmd_phase_skip, cmd_phase_start, cmd_status};
pub use project::cmd_init;
pub use queue::{
    cmd_queue_list, cmd_queue_status, cmd_task_claim, cmd_task_done, cmd_task_reject,
    cmd_task_return, cmd_task_submit,
};
