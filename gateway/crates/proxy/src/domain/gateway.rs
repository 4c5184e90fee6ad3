//! Backend Gateway Trait
//!
//! Interface to the upstream REST backend. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::exchange::{BackendRequest, UpstreamResponse};
use crate::error::ProxyResult;

/// Upstream backend seam
///
/// Any HTTP status from the backend, 401 included, is a successful `send`;
/// only transport-level failures (connect refused, timeout) surface as
/// errors.
#[trait_variant::make(BackendGateway: Send)]
pub trait LocalBackendGateway {
    /// Issue one call to the backend and decode the response envelope
    async fn send(&self, request: &BackendRequest) -> ProxyResult<UpstreamResponse>;
}
