//! Application Configuration
//!
//! Configuration for the proxy application layer.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

/// Backend auth endpoints (Django URL convention, trailing slashes)
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const REFRESH_PATH: &str = "/api/auth/refresh/";
pub const LOGOUT_PATH: &str = "/api/auth/logout/";

/// Proxy application configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Base URL of the upstream REST backend
    pub backend_base_url: String,
    /// Access-token cookie name
    pub access_cookie_name: String,
    /// Refresh-token cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure on credential cookies
    pub cookie_secure: bool,
    /// SameSite policy for credential cookies
    pub cookie_same_site: SameSite,
    /// Fixed timeout applied to every upstream call
    pub upstream_timeout: Duration,
    /// Largest inbound body the proxy will buffer for relay
    pub max_body_bytes: usize,
    /// Fixed-window rate limit applied to the login route per client IP
    pub login_rate_limit: RateLimitConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000".to_string(),
            access_cookie_name: "pm_access_token".to_string(),
            refresh_cookie_name: "pm_refresh_token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            upstream_timeout: Duration::from_secs(10),
            max_body_bytes: 10 * 1024 * 1024, // 10 MiB, product images included
            login_rate_limit: RateLimitConfig::new(10, 60),
        }
    }
}

impl ProxyConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Cookie policy for the access token
    pub fn access_cookie(&self) -> CookieConfig {
        self.credential_cookie(&self.access_cookie_name)
    }

    /// Cookie policy for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        self.credential_cookie(&self.refresh_cookie_name)
    }

    fn credential_cookie(&self, name: &str) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}
