//! HTTP transport for the remote booking API.
//!
//! Every scenario goes through [`Transport::execute`], which either yields a
//! response with a status code or a [`TransportError`]. Classification is
//! left to the runner.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use std::time::Duration;

use super::request::{ApiRequest, ApiResponse};
use crate::error::TransportError;

/// Sends one request and returns what came back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base address all request paths are resolved against.
    fn base_url(&self) -> &str;

    /// Execute the request. A returned response always carries the
    /// observed status code, whatever it is.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport backed by `reqwest` with a bounded request timeout.
pub struct HttpTransport {
    /// Base URL (e.g., "https://restful-booker.herokuapp.com")
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<reqwest::Url, TransportError> {
        let raw = format!("{}{}", self.base_url, request.path);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Request(format!("invalid header `{name}`: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Request(format!("invalid header value: {e}")))?;
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(ApiResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
