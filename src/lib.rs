pub mod client;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod server;
pub mod utils;

// Re-export common items
pub use runner::{Orchestrator, Outcome, OutcomeStatus, SessionState};
pub use scenario::{Scenario, Verification};
pub use utils::config::Config;
