//! Token Refresh Use Case
//!
//! Exchanges the refresh token for a fresh access token. Cookie side effects
//! are declared in the outcome and applied by the caller: `Rotated` rewrites
//! both credential cookies, `Rejected` clears both. There is no third state.

use std::sync::Arc;

use serde_json::json;

use crate::application::config::REFRESH_PATH;
use crate::domain::entity::credentials::TokenPair;
use crate::domain::entity::exchange::BackendRequest;
use crate::domain::gateway::BackendGateway;
use crate::error::ProxyResult;

/// Result of one refresh attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Backend accepted the refresh token; persist this pair to both cookies
    Rotated(TokenPair),
    /// Backend rejected the refresh token; the session is over, clear both
    Rejected,
}

/// Token refresh use case
pub struct RefreshUseCase<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> RefreshUseCase<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Exchange the refresh token once
    ///
    /// Transport failures propagate as errors (503 path); every HTTP answer
    /// resolves to `Rotated` or `Rejected`.
    pub async fn execute(&self, refresh_token: &str) -> ProxyResult<RefreshOutcome> {
        let request =
            BackendRequest::post_json(REFRESH_PATH, json!({ "refresh": refresh_token }));

        let response = self.gateway.send(&request).await?;

        if !response.is_success() {
            tracing::info!(status = %response.status, "Token refresh rejected by backend");
            return Ok(RefreshOutcome::Rejected);
        }

        let Some(access) = response.string_field("access") else {
            // A 2xx without an access token would poison the cookie jar;
            // treat it the same as a rejection.
            tracing::warn!("Refresh response missing access token");
            return Ok(RefreshOutcome::Rejected);
        };

        // The backend may rotate the refresh token; if it does not, the
        // prior one stays valid and is kept.
        let refresh = response
            .string_field("refresh")
            .unwrap_or_else(|| refresh_token.to_string());

        tracing::debug!("Access token refreshed");

        Ok(RefreshOutcome::Rotated(TokenPair::new(access, refresh)))
    }
}
