//! Authenticated Forward Use Case
//!
//! Relays one inbound request to the backend with the session's bearer
//! token, refreshing the token at most once on 401.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::application::refresh::{RefreshOutcome, RefreshUseCase};
use crate::domain::entity::credentials::{CookieUpdate, SessionCredentials, TokenPair};
use crate::domain::entity::exchange::{BackendRequest, ProxyBody, UpstreamResponse};
use crate::domain::gateway::BackendGateway;
use crate::error::ProxyResult;

/// One inbound request to relay
#[derive(Debug, Clone)]
pub struct ForwardInput {
    /// Backend-relative path including the query string
    pub path: String,
    pub method: Method,
    pub body: ProxyBody,
}

/// What the HTTP layer must emit: the upstream envelope plus the cookie
/// side effect of any refresh that happened along the way.
#[derive(Debug, Clone)]
pub struct ForwardOutput {
    pub response: UpstreamResponse,
    pub cookies: CookieUpdate,
}

impl ForwardOutput {
    fn relay(response: UpstreamResponse, cookies: CookieUpdate) -> Self {
        Self { response, cookies }
    }

    /// Terminal 401: the session could not be refreshed
    fn unauthorized(cookies: CookieUpdate) -> Self {
        Self {
            response: UpstreamResponse::json(
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "Unauthorized" }),
            ),
            cookies,
        }
    }
}

/// Progress of the refresh-and-retry sequence for one inbound call.
///
/// Transitions only move forward (`Initial` → `Refreshing` →
/// `Retried`/`Failed`), and both `Retried` and `Failed` return
/// unconditionally, so a second refresh is unrepresentable.
enum ForwardState {
    /// First attempt with whatever access token the cookies held
    Initial,
    /// First attempt returned 401; perform the single allowed refresh
    Refreshing,
    /// Refresh succeeded; the retried call's result is final
    Retried(TokenPair),
    /// Refresh impossible or rejected; terminal 401 with this cookie effect
    Failed(CookieUpdate),
}

/// Authenticated forward use case
pub struct ForwardUseCase<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> ForwardUseCase<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        input: ForwardInput,
        credentials: SessionCredentials,
    ) -> ProxyResult<ForwardOutput> {
        let request = BackendRequest::new(input.method, input.path, input.body)
            .with_bearer(credentials.access.clone());

        let mut state = ForwardState::Initial;

        loop {
            state = match state {
                ForwardState::Initial => {
                    let response = self.gateway.send(&request).await?;

                    if response.status != StatusCode::UNAUTHORIZED {
                        return Ok(ForwardOutput::relay(response, CookieUpdate::None));
                    }

                    tracing::debug!(path = %request.path, "Access token rejected, attempting refresh");
                    ForwardState::Refreshing
                }

                ForwardState::Refreshing => match &credentials.refresh {
                    // Nothing to refresh with; no cookies worth clearing either.
                    None => ForwardState::Failed(CookieUpdate::None),

                    Some(refresh_token) => {
                        let refresh = RefreshUseCase::new(self.gateway.clone());
                        match refresh.execute(refresh_token).await? {
                            RefreshOutcome::Rejected => {
                                ForwardState::Failed(CookieUpdate::Clear)
                            }
                            RefreshOutcome::Rotated(pair) => ForwardState::Retried(pair),
                        }
                    }
                },

                ForwardState::Retried(pair) => {
                    let retried = request.clone().with_bearer(Some(pair.access.clone()));
                    let response = self.gateway.send(&retried).await?;

                    // Final, 401 included: the retry is never itself retried.
                    return Ok(ForwardOutput::relay(response, CookieUpdate::Set(pair)));
                }

                ForwardState::Failed(cookies) => {
                    tracing::info!(path = %request.path, "Session could not be refreshed");
                    return Ok(ForwardOutput::unauthorized(cookies));
                }
            };
        }
    }
}
