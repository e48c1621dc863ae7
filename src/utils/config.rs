use std::time::Duration;

use crate::client::Credentials;
use crate::scenario::Verification;

/// Default target of the probe
pub const DEFAULT_BASE_URL: &str = "https://restful-booker.herokuapp.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the remote API, fixed for the life of the process
    pub base_url: String,

    /// Per-request timeout (ms); expiry surfaces as an ERROR outcome
    pub timeout_ms: u64,

    /// Admin account used for the startup login
    pub credentials: Credentials,

    /// How much of each response body is checked
    pub verification: Verification,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 30_000,
            credentials: Credentials::default(),
            verification: Verification::Lenient,
        }
    }
}
