//! Turning a transport result into an [`Outcome`].
//!
//! All scenarios share one rule set:
//! - transport fault before a status code -> ERROR
//! - status code other than the expected one -> FAILED
//! - expected code, body accepted -> PASSED
//! - expected code, body rejected -> FAILED (observed code kept)

use std::time::Duration;

use super::state::Outcome;
use crate::client::ApiResponse;
use crate::error::TransportError;
use crate::scenario::Scenario;

/// What a scenario reports once it accepted a response
#[derive(Debug, Clone)]
pub struct Accepted {
    pub message: String,
    /// Replaces the verbatim body in the outcome record
    pub body: Option<String>,
}

impl Accepted {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Classify one call.
///
/// `accept` only runs when the expected status code was observed; it
/// returns the success message or the reason the body was rejected.
pub fn classify<F>(
    scenario: Scenario,
    result: Result<ApiResponse, TransportError>,
    elapsed: Duration,
    accept: F,
) -> Outcome
where
    F: FnOnce(&ApiResponse) -> Result<Accepted, String>,
{
    let response = match result {
        Ok(response) => response,
        Err(e) => return Outcome::error(scenario, format!("Transport error: {}", e), elapsed),
    };

    if response.status != scenario.expected_status() {
        return Outcome::failed(
            scenario,
            format!("Unexpected status code: {}", response.status),
            response.status,
            Some(response.body),
            elapsed,
        );
    }

    match accept(&response) {
        Ok(accepted) => Outcome::passed(
            scenario,
            accepted.message,
            response.status,
            Some(accepted.body.unwrap_or(response.body)),
            elapsed,
        ),
        Err(reason) => Outcome::failed(
            scenario,
            reason,
            response.status,
            Some(response.body),
            elapsed,
        ),
    }
}
