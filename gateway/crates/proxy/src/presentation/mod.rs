//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ProxyAppState;
pub use router::{proxy_router, proxy_router_generic};
