pub mod classify;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use events::*;
pub use orchestrator::Orchestrator;
pub use state::*;
