//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions plus the in-memory fixed-window store.

use std::time::Duration;

use dashmap::DashMap;

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
    ///
    /// The increment and the limit comparison are atomic with respect to
    /// concurrent callers on the same key.
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Counter state for one key's current window
#[derive(Debug, Clone)]
struct WindowCounter {
    /// Start of the current fixed window (unix ms)
    window_start_ms: i64,
    /// Attempts observed since the window opened
    count: u32,
}

/// In-memory fixed-window rate limit store
///
/// Counters live in a sharded concurrent map; the entry API holds the key's
/// shard lock across the read-modify-write, so no two callers can both claim
/// the last remaining slot. Windows are aligned to wall-clock boundaries
/// (`window_start = now - now % window`), matching what a shared external
/// counter store would compute.
///
/// State is process-wide and never persisted; a multi-process deployment
/// swaps in a different [`RateLimitStore`] implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitStore {
    counters: DashMap<String, WindowCounter>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop counters whose window started more than `retention` ago
    ///
    /// Callers pass a retention at least as long as their largest window.
    pub fn sweep(&self, retention: Duration) {
        let cutoff_ms = now_ms() - retention.as_millis() as i64;
        self.counters
            .retain(|_, counter| counter.window_start_ms >= cutoff_ms);
    }

    /// Number of live counters (for tests and introspection)
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = now_ms();
        let window_ms = config.window_ms();
        let window_start = (now_ms / window_ms) * window_ms;

        let count = {
            let mut entry = self
                .counters
                .entry(key.to_string())
                .or_insert(WindowCounter {
                    window_start_ms: window_start,
                    count: 0,
                });

            // Window rolled over: reset the counter
            if entry.window_start_ms != window_start {
                entry.window_start_ms = window_start;
                entry.count = 0;
            }

            entry.count += 1;
            entry.count
        };

        Ok(RateLimitResult {
            allowed: count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start + window_ms,
        })
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Tests
// ============================================================================
