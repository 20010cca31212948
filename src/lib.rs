pub mod agents;
pub mod errors;
pub mod lock;
pub mod phase;
pub mod project;
pub mod queue;
pub mod task;
