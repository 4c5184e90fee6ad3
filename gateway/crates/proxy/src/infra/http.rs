//! Reqwest Backend Implementation
//!
//! Request-scoped HTTP client for the upstream REST backend. No interceptors
//! and no shared mutable state: credentials are attached explicitly per call.

use axum::http::{StatusCode, header};

use crate::application::config::ProxyConfig;
use crate::domain::entity::exchange::{BackendRequest, ProxyBody, UpstreamResponse};
use crate::domain::gateway::BackendGateway;
use crate::error::{ProxyError, ProxyResult};

/// Reqwest-backed gateway to the marketplace backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client with the configured fixed upstream timeout
    pub fn new(config: &ProxyConfig) -> ProxyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl BackendGateway for HttpBackend {
    async fn send(&self, request: &BackendRequest) -> ProxyResult<UpstreamResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(request.method.clone(), &url);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            ProxyBody::Empty => builder,
            ProxyBody::Json(value) => builder.json(value),
            // Raw bodies keep their inbound content type so a multipart
            // boundary survives untouched.
            ProxyBody::Raw {
                content_type,
                bytes,
            } => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(bytes.clone()),
        };

        let response = builder.send().await?;

        let status = response.status();

        // 204 never carries a body, whatever the declared content type
        if status == StatusCode::NO_CONTENT {
            return Ok(UpstreamResponse::empty(status));
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            return Ok(UpstreamResponse::empty(status));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(UpstreamResponse::empty(status));
        }

        let body = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, status = %status, "Upstream declared JSON but body did not parse");
            ProxyError::InvalidUpstreamBody
        })?;

        Ok(UpstreamResponse::new(status, Some(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ProxyConfig;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ProxyConfig {
            backend_base_url: "http://localhost:8000/".to_string(),
            ..ProxyConfig::development()
        };

        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }
}
