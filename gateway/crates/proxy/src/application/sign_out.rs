//! Sign Out Use Case
//!
//! Best-effort backend invalidation of the refresh token. Local logout must
//! never be blocked by the backend, so this use case cannot fail.

use std::sync::Arc;

use serde_json::json;

use crate::application::config::LOGOUT_PATH;
use crate::domain::entity::credentials::SessionCredentials;
use crate::domain::entity::exchange::BackendRequest;
use crate::domain::gateway::BackendGateway;

/// Sign out use case
pub struct SignOutUseCase<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> SignOutUseCase<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Notify the backend if possible; swallow every error
    pub async fn execute(&self, credentials: SessionCredentials) {
        let Some(refresh) = credentials.refresh else {
            tracing::debug!("Sign out without refresh token, nothing to invalidate");
            return;
        };

        let request = BackendRequest::post_json(LOGOUT_PATH, json!({ "refresh": refresh }))
            .with_bearer(credentials.access);

        // Cookie は必ず削除されるので、ここでの失敗は握りつぶす
        match self.gateway.send(&request).await {
            Ok(response) if response.is_success() => {
                tracing::info!("User signed out");
            }
            Ok(response) => {
                tracing::debug!(status = %response.status, "Backend logout rejected, clearing cookies anyway");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Backend logout failed, clearing cookies anyway");
            }
        }
    }
}
