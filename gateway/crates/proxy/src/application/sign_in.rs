//! Sign In Use Case
//!
//! Exchanges email/password for the credential cookie pair.

use std::sync::Arc;

use serde_json::json;

use crate::application::config::LOGIN_PATH;
use crate::domain::entity::credentials::TokenPair;
use crate::domain::entity::exchange::BackendRequest;
use crate::domain::gateway::BackendGateway;
use crate::error::{ProxyError, ProxyResult};

/// Sign in input
#[derive(Debug, Clone)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
///
/// The tokens go straight into HTTP-only cookies; they are never echoed in
/// the response body.
pub struct SignInOutput {
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> SignInUseCase<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, input: SignInInput) -> ProxyResult<SignInOutput> {
        // Validate locally before any backend call
        if input.email.is_empty() || input.password.is_empty() {
            return Err(ProxyError::MissingCredentials);
        }

        let request = BackendRequest::post_json(
            LOGIN_PATH,
            json!({ "email": input.email, "password": input.password }),
        );

        let response = self.gateway.send(&request).await?;

        if !response.is_success() {
            let detail = response
                .string_field("detail")
                .unwrap_or_else(|| "Login failed.".to_string());

            tracing::warn!(status = %response.status, "Login rejected by backend");

            return Err(ProxyError::Upstream {
                status: response.status,
                detail,
            });
        }

        // Both tokens are required; a partial pair is a backend contract
        // violation, not something to store.
        let (Some(access), Some(refresh)) = (
            response.string_field("access"),
            response.string_field("refresh"),
        ) else {
            tracing::error!("Login response missing token fields");
            return Err(ProxyError::InvalidAuthResponse);
        };

        tracing::info!("User signed in");

        Ok(SignInOutput {
            tokens: TokenPair::new(access, refresh),
        })
    }
}
