//! Proxy (Authenticated Backend Relay) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities and the backend gateway trait
//! - `application/` - Use cases (forward, refresh, sign in/out)
//! - `infra/` - Reqwest backend implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Authenticated relay with transparent single-refresh-on-401
//! - Public relay without credentials
//! - Login/logout cookie exchange for the access/refresh pair
//! - Fixed upstream timeout, 503 on transport failure
//!
//! ## Security Model
//! - Tokens live only in HTTP-only, SameSite=Lax cookies
//! - Both credential cookies are always written or cleared together
//! - A 401 triggers at most one refresh-and-retry cycle, never a loop
//! - Login attempts are rate limited per client IP

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use infra::http::HttpBackend;
pub use presentation::router::proxy_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::credentials::*;
    pub use crate::domain::entity::exchange::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
