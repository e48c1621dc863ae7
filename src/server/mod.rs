//! Test endpoint server
//!
//! Exposes each scenario as `GET /api/tests/{slug}` returning its outcome
//! record as JSON. Requests are served concurrently; the orchestrator
//! serializes access to the shared session.

pub mod api;

pub use api::{api_router, ProbeServer, ServerConfig};
