use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::runner::state::{Outcome, RunSummary};

/// Outcome records of one run, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub base_url: String,
    pub outcomes: Vec<Outcome>,
    pub summary: RunSummary,
    pub generated_at: String,
}

impl TestResults {
    pub fn new(base_url: &str, outcomes: Vec<Outcome>) -> Self {
        let summary = RunSummary::from_outcomes(&outcomes);
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            base_url: base_url.to_string(),
            outcomes,
            summary,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
