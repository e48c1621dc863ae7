use reqwest::Method;
use serde_json::Value;

/// A single request against the remote API, relative to the base address.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach the session credential as `Cookie: token=...`.
    ///
    /// An absent credential still sends the cookie with an empty token so
    /// the remote API answers the way it does for unauthorized mutation.
    pub fn token_cookie(self, credential: Option<&str>) -> Self {
        let cookie = format!("token={}", credential.unwrap_or_default());
        self.header("Cookie", &cookie)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Short `METHOD /path` form used in log lines.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// What came back once a status code was obtained.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON, `None` if it is not valid JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_cookie_with_credential() {
        let req = ApiRequest::put("/booking/1").token_cookie(Some("abc123"));
        assert_eq!(
            req.headers,
            vec![("Cookie".to_string(), "token=abc123".to_string())]
        );
    }

    #[test]
    fn test_token_cookie_without_credential() {
        let req = ApiRequest::delete("/booking/1").token_cookie(None);
        assert_eq!(req.headers[0].1, "token=");
    }

    #[test]
    fn test_builder_collects_query_and_body() {
        let req = ApiRequest::get("/booking")
            .query("firstname", "John")
            .query("lastname", "Doe");
        assert_eq!(req.query.len(), 2);
        assert_eq!(req.describe(), "GET /booking");

        let req = ApiRequest::post("/booking").json(json!({"firstname": "Test"}));
        assert_eq!(req.body, Some(json!({"firstname": "Test"})));
    }

    #[test]
    fn test_response_json_parse() {
        assert!(ApiResponse::new(201, "Created").json().is_none());
        let parsed = ApiResponse::new(200, r#"{"bookingid": 7}"#).json().unwrap();
        assert_eq!(parsed["bookingid"], 7);
    }
}
