//! Remote API client
//!
//! Request/response types, the [`Transport`] seam and its reqwest-backed
//! implementation, and the login call used to seed the session.

pub mod auth;
pub mod request;
pub mod transport;

pub use auth::{login, Credentials};
pub use request::{ApiRequest, ApiResponse};
pub use transport::{HttpTransport, Transport};
