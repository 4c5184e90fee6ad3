//! Proxy Router

use axum::{
    Router,
    routing::{any, post},
};
use std::sync::Arc;

use platform::rate_limit::MemoryRateLimitStore;

use crate::application::config::ProxyConfig;
use crate::domain::gateway::BackendGateway;
use crate::infra::http::HttpBackend;
use crate::presentation::handlers::{self, ProxyAppState};

/// Create the proxy router with the reqwest backend
pub fn proxy_router(gateway: HttpBackend, config: ProxyConfig) -> Router {
    proxy_router_generic(gateway, config)
}

/// Create a generic proxy router for any gateway implementation
///
/// Auth exchanges and the public surface get explicit routes; every other
/// path under the mount point is relayed through the authenticated
/// forwarder.
pub fn proxy_router_generic<G>(gateway: G, config: ProxyConfig) -> Router
where
    G: BackendGateway + Clone + Send + Sync + 'static,
{
    let state = ProxyAppState {
        gateway: Arc::new(gateway),
        config: Arc::new(config),
        login_limiter: Arc::new(MemoryRateLimitStore::new()),
    };

    Router::new()
        .route("/auth/login", post(handlers::sign_in::<G>))
        .route("/auth/logout", post(handlers::sign_out::<G>))
        .route("/register", post(handlers::forward_public::<G>))
        .route("/public/{*path}", any(handlers::forward_public::<G>))
        .fallback(handlers::forward_authenticated::<G>)
        .with_state(state)
}
