//! Public Forward Use Case
//!
//! Relays one inbound request to the backend with no credentials: no bearer
//! token, no refresh, no retry. Transport failures and relay rules match the
//! authenticated path.

use std::sync::Arc;

use crate::application::forward::ForwardInput;
use crate::domain::entity::exchange::{BackendRequest, UpstreamResponse};
use crate::domain::gateway::BackendGateway;
use crate::error::ProxyResult;

/// Public forward use case
pub struct PublicForwardUseCase<G>
where
    G: BackendGateway,
{
    gateway: Arc<G>,
}

impl<G> PublicForwardUseCase<G>
where
    G: BackendGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, input: ForwardInput) -> ProxyResult<UpstreamResponse> {
        let request = BackendRequest::new(input.method, input.path, input.body);
        self.gateway.send(&request).await
    }
}
