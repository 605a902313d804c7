//! Replayable request descriptors

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use uuid::Uuid;

/// Which pass over a logical request this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Original send
    First,
    /// Replay after a credential refresh; never refreshed again
    Retry,
}

/// A single outbound request, kept as a value so it can be replayed
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Value>,
    attempt: Attempt,
    request_id: String,
}

impl RequestContext {
    /// First attempt at `method url`, with a fresh correlation id
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            attempt: Attempt::First,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header, replacing earlier values
    #[must_use]
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Authorization: Bearer <token>`; invalid header text leaves it unset
    #[must_use]
    pub fn with_bearer(mut self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                self.headers.remove(AUTHORIZATION);
            }
        }
        self
    }

    /// The same request as a post-refresh replay
    #[must_use]
    pub fn into_retry(self) -> Self {
        Self {
            attempt: Attempt::Retry,
            ..self
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    #[must_use]
    pub fn is_retry(&self) -> bool {
        self.attempt == Attempt::Retry
    }

    /// Correlation id, shared by the original send and its replay
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Token currently in the `Authorization` header
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}
