use serde::Deserialize;
use serde_json::json;

use super::request::ApiRequest;
use super::transport::Transport;
use crate::error::AuthError;

/// Login credentials sent to `POST /auth`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password123".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
    reason: Option<String>,
}

/// Exchange credentials for a session token.
///
/// The remote API answers bad credentials with 200 and a `reason` field
/// instead of a token, so a missing token is an error even on success.
pub async fn login(transport: &dyn Transport, credentials: &Credentials) -> Result<String, AuthError> {
    let body = json!({
        "username": credentials.username,
        "password": credentials.password,
    });
    let response = transport
        .execute(ApiRequest::post("/auth").json(body))
        .await?;

    if response.status != 200 {
        return Err(AuthError::Rejected(response.status));
    }

    let parsed: AuthResponse = serde_json::from_str(&response.body)
        .map_err(|e| AuthError::MissingToken(format!("unparseable body: {e}")))?;

    match parsed.token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken(
            parsed.reason.unwrap_or_else(|| "no reason given".to_string()),
        )),
    }
}
