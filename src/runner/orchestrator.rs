//! Scenario orchestration against the remote booking API.
//!
//! The orchestrator owns the session (credential and tracked booking id)
//! behind one async mutex. Every invocation holds the guard from the
//! implicit create through the final request, so concurrent callers are
//! serialized and never race on creating or deleting the tracked booking.

use log::{debug, info, warn};
use serde_json::Value;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};

use super::classify::{classify, Accepted};
use super::events::{EventEmitter, ProbeEvent};
use super::state::{Outcome, SessionState};
use crate::client::{ApiRequest, ApiResponse, HttpTransport, Transport};
use crate::error::TransportError;
use crate::scenario::payloads::{self, FILTER_FIRSTNAME, FILTER_LASTNAME, MISSING_BOOKING_ID};
use crate::scenario::{verify, Scenario, Verification};
use crate::utils::config::Config;

pub struct Orchestrator {
    transport: Box<dyn Transport>,
    verification: Verification,
    session: Mutex<SessionState>,
    events: EventEmitter,
}

impl Orchestrator {
    /// Build the HTTP transport for `config.base_url` and log in.
    pub async fn connect(config: &Config) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout())?;
        Ok(Self::with_transport(config, Box::new(transport)).await)
    }

    pub async fn with_transport(config: &Config, transport: Box<dyn Transport>) -> Self {
        Self::with_events(config, transport, EventEmitter::default()).await
    }

    /// Like [`Orchestrator::with_transport`], reporting progress (including
    /// the login) on `events`.
    pub async fn with_events(
        config: &Config,
        transport: Box<dyn Transport>,
        events: EventEmitter,
    ) -> Self {
        let session = SessionState::initialize(transport.as_ref(), &config.credentials).await;
        match session.credential() {
            Some(_) => events.emit(ProbeEvent::Authenticated {
                base_url: transport.base_url().to_string(),
            }),
            None => events.emit(ProbeEvent::AuthFailed {
                reason: "no token obtained from /auth".to_string(),
            }),
        }

        Self {
            transport,
            verification: config.verification,
            session: Mutex::new(session),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProbeEvent> {
        self.events.subscribe()
    }

    /// Copy of the current session state
    pub async fn session_snapshot(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    /// Run one scenario. Never fails: every path ends in an outcome record.
    pub async fn run(&self, scenario: Scenario) -> Outcome {
        self.events.emit(ProbeEvent::ScenarioStarted { scenario });

        let outcome = {
            let mut session = self.session.lock().await;
            self.dispatch(scenario, &mut session).await
        };

        if outcome.is_passed() {
            info!("{} passed: {}", outcome.test_name, outcome.message);
        } else {
            warn!(
                "{} {}: {}",
                outcome.test_name,
                outcome.status.as_str(),
                outcome.message
            );
        }

        self.events.emit(ProbeEvent::ScenarioFinished {
            scenario,
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Run every scenario sequentially in suite order
    pub async fn run_all(&self) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(Scenario::ALL.len());
        for scenario in Scenario::ALL {
            outcomes.push(self.run(scenario).await);
        }
        outcomes
    }

    pub async fn health_check(&self) -> Outcome {
        self.run(Scenario::HealthCheck).await
    }

    pub async fn create_booking(&self) -> Outcome {
        self.run(Scenario::CreateBooking).await
    }

    pub async fn get_booking(&self) -> Outcome {
        self.run(Scenario::GetBooking).await
    }

    pub async fn get_all_bookings(&self) -> Outcome {
        self.run(Scenario::GetAllBookings).await
    }

    pub async fn get_bookings_by_name(&self) -> Outcome {
        self.run(Scenario::GetBookingsByName).await
    }

    pub async fn update_booking(&self) -> Outcome {
        self.run(Scenario::UpdateBooking).await
    }

    pub async fn partial_update(&self) -> Outcome {
        self.run(Scenario::PartialUpdate).await
    }

    pub async fn delete_booking(&self) -> Outcome {
        self.run(Scenario::DeleteBooking).await
    }

    pub async fn invalid_data(&self) -> Outcome {
        self.run(Scenario::InvalidData).await
    }

    pub async fn non_existent(&self) -> Outcome {
        self.run(Scenario::NonExistent).await
    }

    async fn dispatch(&self, scenario: Scenario, session: &mut SessionState) -> Outcome {
        let started = Instant::now();

        if scenario == Scenario::CreateBooking {
            return self.create(session, started).await;
        }

        let booking_id = if scenario.needs_booking() {
            match self.ensure_booking(scenario, session).await {
                Ok(id) => Some(id),
                Err(reason) => return Outcome::error(scenario, reason, started.elapsed()),
            }
        } else {
            None
        };

        match (scenario, booking_id) {
            (Scenario::HealthCheck, _) => self.health(started).await,
            (Scenario::GetAllBookings, _) => self.list_all(started).await,
            (Scenario::GetBookingsByName, _) => self.list_by_name(started).await,
            (Scenario::InvalidData, _) => self.invalid(started).await,
            (Scenario::NonExistent, _) => self.missing(started).await,
            (Scenario::GetBooking, Some(id)) => self.fetch(id, started).await,
            (Scenario::UpdateBooking, Some(id)) => self.replace(id, session, started).await,
            (Scenario::PartialUpdate, Some(id)) => self.patch(id, session, started).await,
            (Scenario::DeleteBooking, Some(id)) => self.remove(id, session, started).await,
            (other, _) => Outcome::error(
                other,
                format!("No booking tracked for {}", other),
                started.elapsed(),
            ),
        }
    }

    /// Return the tracked booking id, creating a booking first if none is
    /// tracked. Idempotent while an id is tracked.
    ///
    /// A failed implicit create is reported as an error instead of letting
    /// the caller act on an undefined id.
    async fn ensure_booking(
        &self,
        scenario: Scenario,
        session: &mut SessionState,
    ) -> Result<i64, String> {
        if let Some(id) = session.booking_id() {
            return Ok(id);
        }

        debug!("{} needs a booking, creating one", scenario);
        let created = self.create(session, Instant::now()).await;
        let booking_id = session.booking_id();
        self.events.emit(ProbeEvent::BookingCreatedImplicitly {
            scenario,
            booking_id,
        });

        booking_id.ok_or_else(|| {
            format!(
                "No booking available: implicit create {} ({})",
                created.status.as_str(),
                created.message
            )
        })
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!("-> {}", request.describe());
        self.transport.execute(request).await
    }

    fn strict(&self) -> bool {
        self.verification == Verification::Strict
    }

    async fn health(&self, started: Instant) -> Outcome {
        let result = self.send(ApiRequest::get("/ping")).await;
        classify(Scenario::HealthCheck, result, started.elapsed(), |_| {
            Ok(Accepted::new("API is healthy and responding"))
        })
    }

    async fn create(&self, session: &mut SessionState, started: Instant) -> Outcome {
        let body = payloads::to_json(&payloads::new_booking());
        let result = self.send(ApiRequest::post("/booking").json(body)).await;
        let strict = self.strict();

        let mut created = None;
        let outcome = classify(Scenario::CreateBooking, result, started.elapsed(), |response| {
            let json = parse_json(response)?;
            let id = json
                .get("bookingid")
                .and_then(Value::as_i64)
                .ok_or("Response carried no bookingid")?;
            // Track the booking even if strict checks reject the echo
            created = Some(id);
            if strict {
                verify::created_booking(&json)?;
            }
            Ok(Accepted::new(format!(
                "Booking created successfully with ID: {}",
                id
            )))
        });

        if let Some(id) = created {
            session.set_booking_id(id);
        }
        outcome
    }

    async fn fetch(&self, id: i64, started: Instant) -> Outcome {
        let result = self.send(ApiRequest::get(booking_path(id))).await;
        let strict = self.strict();
        classify(Scenario::GetBooking, result, started.elapsed(), |response| {
            if strict {
                verify::fetched_booking(&parse_json(response)?)?;
            }
            Ok(Accepted::new(format!(
                "Successfully retrieved booking ID: {}",
                id
            )))
        })
    }

    async fn list_all(&self, started: Instant) -> Outcome {
        let result = self.send(ApiRequest::get("/booking")).await;
        let strict = self.strict();
        classify(Scenario::GetAllBookings, result, started.elapsed(), |response| {
            let items = parse_list(response)?;
            if strict {
                verify::full_listing(&items)?;
            }
            Ok(Accepted::new(format!("Retrieved {} bookings", items.len()))
                .with_body(format!("Total bookings: {}", items.len())))
        })
    }

    async fn list_by_name(&self, started: Instant) -> Outcome {
        let request = ApiRequest::get("/booking")
            .query("firstname", FILTER_FIRSTNAME)
            .query("lastname", FILTER_LASTNAME);
        let result = self.send(request).await;
        classify(Scenario::GetBookingsByName, result, started.elapsed(), |response| {
            let count = parse_list(response)?.len();
            Ok(Accepted::new(format!(
                "Found {} bookings matching {} {}",
                count, FILTER_FIRSTNAME, FILTER_LASTNAME
            ))
            .with_body(format!("Matching bookings: {}", count)))
        })
    }

    async fn replace(&self, id: i64, session: &SessionState, started: Instant) -> Outcome {
        let request = ApiRequest::put(booking_path(id))
            .token_cookie(session.credential())
            .json(payloads::to_json(&payloads::replacement_booking()));
        let result = self.send(request).await;
        let strict = self.strict();
        classify(Scenario::UpdateBooking, result, started.elapsed(), |response| {
            if strict {
                verify::replaced_booking(&parse_json(response)?)?;
            }
            Ok(Accepted::new("Booking updated successfully to Jane Smith"))
        })
    }

    async fn patch(&self, id: i64, session: &SessionState, started: Instant) -> Outcome {
        let request = ApiRequest::patch(booking_path(id))
            .token_cookie(session.credential())
            .json(payloads::to_json(&payloads::name_change()));
        let result = self.send(request).await;
        let strict = self.strict();
        classify(Scenario::PartialUpdate, result, started.elapsed(), |response| {
            if strict {
                verify::patched_booking(&parse_json(response)?)?;
            }
            Ok(Accepted::new(
                "Partial update successful - name changed to Michael Johnson",
            ))
        })
    }

    async fn remove(&self, id: i64, session: &mut SessionState, started: Instant) -> Outcome {
        let request = ApiRequest::delete(booking_path(id)).token_cookie(session.credential());
        let result = self.send(request).await;
        let mut outcome = classify(Scenario::DeleteBooking, result, started.elapsed(), |_| {
            Ok(Accepted::new(format!("Booking {} deleted successfully", id)))
        });

        // A 2xx DELETE means the booking is gone remotely unless the
        // follow-up lookup still finds it
        let mut deleted = outcome.is_passed();
        if deleted && self.strict() {
            match self.still_retrievable(id).await {
                Ok(None) => {}
                Ok(Some(status)) => {
                    deleted = false;
                    outcome = Outcome::failed(
                        Scenario::DeleteBooking,
                        format!(
                            "Booking {} still retrievable after delete (status {})",
                            id, status
                        ),
                        outcome.status_code,
                        outcome.response_body.take(),
                        started.elapsed(),
                    );
                }
                Err(e) => {
                    outcome = Outcome::error(
                        Scenario::DeleteBooking,
                        format!("Transport error: {}", e),
                        started.elapsed(),
                    );
                }
            }
        }

        if deleted {
            session.clear_booking_id();
        }
        outcome
    }

    /// Status of the follow-up lookup when the booking is still there
    async fn still_retrievable(&self, id: i64) -> Result<Option<u16>, TransportError> {
        let response = self.send(ApiRequest::get(booking_path(id))).await?;
        Ok((response.status != 404).then_some(response.status))
    }

    async fn invalid(&self, started: Instant) -> Outcome {
        let request = ApiRequest::post("/booking").json(payloads::invalid_booking());
        let result = self.send(request).await;
        classify(Scenario::InvalidData, result, started.elapsed(), |_| {
            Ok(Accepted::new(
                "API correctly rejected invalid data with 500 error",
            ))
        })
    }

    async fn missing(&self, started: Instant) -> Outcome {
        let result = self.send(ApiRequest::get(booking_path(MISSING_BOOKING_ID))).await;
        classify(Scenario::NonExistent, result, started.elapsed(), |_| {
            Ok(Accepted::new(
                "API correctly returned 404 for non-existent booking",
            ))
        })
    }
}

fn booking_path(id: i64) -> String {
    format!("/booking/{}", id)
}

fn parse_json(response: &ApiResponse) -> Result<Value, String> {
    response
        .json()
        .ok_or_else(|| "Response body is not JSON".to_string())
}

fn parse_list(response: &ApiResponse) -> Result<Vec<Value>, String> {
    match parse_json(response)? {
        Value::Array(items) => Ok(items),
        _ => Err("Response body is not a booking list".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::OutcomeStatus;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// Answers from a fixed script and records every request it saw
    struct ScriptedTransport {
        replies: StdMutex<Vec<Result<ApiResponse, TransportError>>>,
        seen: std::sync::Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        fn base_url(&self) -> &str {
            "http://scripted"
        }

        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.seen.lock().unwrap().push(request.describe());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(TransportError::Connect("script exhausted".to_string()));
            }
            replies.remove(0)
        }
    }

    async fn scripted(
        replies: Vec<Result<ApiResponse, TransportError>>,
    ) -> (Orchestrator, std::sync::Arc<StdMutex<Vec<String>>>) {
        let seen = std::sync::Arc::new(StdMutex::new(Vec::new()));
        let transport = ScriptedTransport {
            replies: StdMutex::new(replies),
            seen: seen.clone(),
        };
        let orchestrator = Orchestrator::with_transport(&Config::default(), Box::new(transport)).await;
        (orchestrator, seen)
    }

    fn auth_ok() -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse::new(200, r#"{"token":"abc123"}"#))
    }

    #[tokio::test]
    async fn test_failed_implicit_create_short_circuits() {
        let (orchestrator, seen) = scripted(vec![
            auth_ok(),
            Ok(ApiResponse::new(500, "Internal Server Error")),
        ])
        .await;

        let outcome = orchestrator.update_booking().await;
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.status_code, 0);
        assert!(outcome.message.contains("implicit create FAILED"));

        // auth + create only, no PUT against an undefined id
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec!["POST /auth", "POST /booking"]);
    }

    #[tokio::test]
    async fn test_create_without_bookingid_fails_and_tracks_nothing() {
        let (orchestrator, _) = scripted(vec![
            auth_ok(),
            Ok(ApiResponse::new(200, r#"{"booking":{}}"#)),
        ])
        .await;

        let outcome = orchestrator.create_booking().await;
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.status_code, 200);
        assert_eq!(orchestrator.session_snapshot().await.booking_id(), None);
    }

    #[tokio::test]
    async fn test_listing_non_array_body_fails() {
        let (orchestrator, _) = scripted(vec![
            auth_ok(),
            Ok(ApiResponse::new(200, r#"{"not":"a list"}"#)),
        ])
        .await;

        let outcome = orchestrator.get_all_bookings().await;
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.message, "Response body is not a booking list");
    }

    #[tokio::test]
    async fn test_strict_delete_keeps_id_when_booking_survives() {
        let seen = std::sync::Arc::new(StdMutex::new(Vec::new()));
        let transport = ScriptedTransport {
            replies: StdMutex::new(vec![
                auth_ok(),
                Ok(ApiResponse::new(200, r#"{"bookingid":5,"booking":{"firstname":"John","lastname":"Doe","totalprice":150,"depositpaid":true}}"#)),
                Ok(ApiResponse::new(201, "Created")),
                Ok(ApiResponse::new(200, "{}")),
            ]),
            seen: seen.clone(),
        };
        let config = Config {
            verification: Verification::Strict,
            ..Config::default()
        };
        let orchestrator = Orchestrator::with_transport(&config, Box::new(transport)).await;

        assert!(orchestrator.create_booking().await.is_passed());
        let outcome = orchestrator.delete_booking().await;
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert!(outcome.message.contains("still retrievable"));
        assert_eq!(orchestrator.session_snapshot().await.booking_id(), Some(5));
        assert_eq!(seen.lock().unwrap().last().unwrap(), "GET /booking/5");
    }

    #[tokio::test]
    async fn test_strict_delete_lookup_fault_is_error_and_clears_id() {
        let transport = ScriptedTransport {
            replies: StdMutex::new(vec![
                auth_ok(),
                Ok(ApiResponse::new(200, r#"{"bookingid":5,"booking":{"firstname":"John","lastname":"Doe","totalprice":150,"depositpaid":true}}"#)),
                Ok(ApiResponse::new(201, "Created")),
                Err(TransportError::Timeout("deadline elapsed".to_string())),
            ]),
            seen: std::sync::Arc::new(StdMutex::new(Vec::new())),
        };
        let config = Config {
            verification: Verification::Strict,
            ..Config::default()
        };
        let orchestrator = Orchestrator::with_transport(&config, Box::new(transport)).await;

        assert!(orchestrator.create_booking().await.is_passed());
        let outcome = orchestrator.delete_booking().await;
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.status_code, 0);
        assert!(outcome.message.starts_with("Transport error:"));
        // The DELETE itself succeeded, so the id is no longer tracked
        assert_eq!(orchestrator.session_snapshot().await.booking_id(), None);
    }
}
