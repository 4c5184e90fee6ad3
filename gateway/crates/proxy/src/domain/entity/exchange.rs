//! Backend Exchange Entities
//!
//! One upstream call and the envelope that comes back.

use http::{Method, StatusCode};
use serde_json::Value;

/// Request body relayed to the backend.
#[derive(Debug, Clone)]
pub enum ProxyBody {
    Empty,
    /// JSON-serializable payload sent as `application/json`
    Json(Value),
    /// Byte-for-byte passthrough keeping the inbound content type.
    /// Multipart form data travels this way so its boundary survives.
    Raw { content_type: String, bytes: Vec<u8> },
}

impl ProxyBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, ProxyBody::Empty)
    }
}

/// One call to the backend.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// Backend-relative path including any query string
    pub path: String,
    pub method: Method,
    /// Bearer token for the Authorization header, if the session has one
    pub bearer: Option<String>,
    pub body: ProxyBody,
}

impl BackendRequest {
    pub fn new(method: Method, path: impl Into<String>, body: ProxyBody) -> Self {
        Self {
            path: path.into(),
            method,
            bearer: None,
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, ProxyBody::Empty)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, ProxyBody::Json(body))
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Backend response envelope.
///
/// `body` is present only when the upstream response declared
/// `application/json` and the status was not 204 No Content.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn json(status: StatusCode, body: Value) -> Self {
        Self::new(status, Some(body))
    }

    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, None)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Top-level string field of the JSON body, if any
    pub fn string_field(&self, key: &str) -> Option<String> {
        self.body
            .as_ref()?
            .get(key)?
            .as_str()
            .map(|s| s.to_string())
    }
}
