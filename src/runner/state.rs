use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::{self, Credentials, Transport};
use crate::scenario::Scenario;

/// Outcome status of one scenario invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Passed => "PASSED",
            OutcomeStatus::Failed => "FAILED",
            OutcomeStatus::Error => "ERROR",
        }
    }
}

/// Uniform result of one scenario invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub test_name: String,
    pub status: OutcomeStatus,
    pub message: String,
    /// Observed status code, 0 if the call never completed
    pub status_code: u16,
    pub response_body: Option<String>,
    /// Elapsed time of the call in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl Outcome {
    pub fn passed(
        scenario: Scenario,
        message: String,
        status_code: u16,
        body: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self::build(scenario, OutcomeStatus::Passed, message, status_code, body, elapsed)
    }

    pub fn failed(
        scenario: Scenario,
        message: String,
        status_code: u16,
        body: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self::build(scenario, OutcomeStatus::Failed, message, status_code, body, elapsed)
    }

    pub fn error(scenario: Scenario, message: String, elapsed: Duration) -> Self {
        Self::build(scenario, OutcomeStatus::Error, message, 0, None, elapsed)
    }

    fn build(
        scenario: Scenario,
        status: OutcomeStatus,
        message: String,
        status_code: u16,
        response_body: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            test_name: scenario.display_name().to_string(),
            status,
            message,
            status_code,
            response_body,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

/// Credential and tracked booking shared by all scenarios.
///
/// Owned by the orchestrator behind a single mutex; nothing else mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    credential: Option<String>,
    booking_id: Option<i64>,
}

impl SessionState {
    pub fn new(credential: Option<String>) -> Self {
        Self {
            credential,
            booking_id: None,
        }
    }

    /// Log in once and keep whatever credential came back.
    ///
    /// A failed login is logged and leaves the credential absent; mutating
    /// scenarios then run unauthorized and record what the API answers.
    pub async fn initialize(transport: &dyn Transport, credentials: &Credentials) -> Self {
        match client::login(transport, credentials).await {
            Ok(token) => {
                info!("Authenticated against {} as {}", transport.base_url(), credentials.username);
                Self::new(Some(token))
            }
            Err(e) => {
                warn!("Failed to get auth token: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn booking_id(&self) -> Option<i64> {
        self.booking_id
    }

    pub fn set_booking_id(&mut self, id: i64) {
        self.booking_id = Some(id);
    }

    pub fn clear_booking_id(&mut self) {
        self.booking_id = None;
    }
}

/// Counts over a set of outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub errors: u32,
    pub total_duration_ms: u64,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            summary.total_duration_ms += outcome.duration_ms;
            match outcome.status {
                OutcomeStatus::Passed => summary.passed += 1,
                OutcomeStatus::Failed => summary.failed += 1,
                OutcomeStatus::Error => summary.errors += 1,
            }
            summary
        })
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
