//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions and an in-memory fixed-window store.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter
    /// Returns (allowed, remaining_requests)
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory fixed-window rate limit store
///
/// Suitable for a single-process deployment; counters reset when the
/// process restarts.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, WindowState>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    started_at: Instant,
    count: u32,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let state = windows
            .entry(key.to_string())
            .or_insert(WindowState {
                started_at: now,
                count: 0,
            });

        // Fixed window: reset the counter once the window has elapsed
        if now.duration_since(state.started_at) >= config.window {
            state.started_at = now;
            state.count = 0;
        }

        let allowed = state.count < config.max_requests;
        if allowed {
            state.count += 1;
        }

        let remaining = config.max_requests.saturating_sub(state.count);
        let window_remaining = config
            .window
            .saturating_sub(now.duration_since(state.started_at));
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;

        Ok(RateLimitResult {
            allowed,
            remaining,
            reset_at_ms: now_ms + window_remaining.as_millis() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_max_requests() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(3, 60);

        for i in 0..3 {
            let result = RateLimitStore::check_and_increment(&store,"ip:1.2.3.4", &config).await.unwrap();
            assert!(result.allowed, "request {} should be allowed", i);
        }

        let result = RateLimitStore::check_and_increment(&store,"ip:1.2.3.4", &config).await.unwrap();
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, 60);

        let first = RateLimitStore::check_and_increment(&store,"ip:1.1.1.1", &config).await.unwrap();
        let second = RateLimitStore::check_and_increment(&store,"ip:2.2.2.2", &config).await.unwrap();

        assert!(first.allowed);
        assert!(second.allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(10),
        };

        let first = RateLimitStore::check_and_increment(&store,"k", &config).await.unwrap();
        assert!(first.allowed);
        let blocked = RateLimitStore::check_and_increment(&store,"k", &config).await.unwrap();
        assert!(!blocked.allowed);

        tokio::time::sleep(Duration::from_millis(20)).await;

        let after_reset = RateLimitStore::check_and_increment(&store,"k", &config).await.unwrap();
        assert!(after_reset.allowed);
    }

    #[test]
    fn test_config_window_ms() {
        let config = RateLimitConfig::new(10, 60);
        assert_eq!(config.window_ms(), 60_000);
    }
}
