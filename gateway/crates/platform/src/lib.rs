//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie management
//! - Client identification
//! - Rate limiting infrastructure

pub mod client;
pub mod cookie;
pub mod rate_limit;
