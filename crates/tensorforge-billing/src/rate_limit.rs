//! Fixed-window request admission.
//!
//! One counter per key; the counter resets when its window expires. The
//! limiter is an injected, explicitly-owned component — handlers receive an
//! instance rather than reaching for a global, so tests can build independent
//! limiters and a shared backend can replace the in-memory table behind the
//! same interface.
//!
//! This is a best-effort, single-process limiter. Horizontally-scaled
//! deployments each count independently; that is a documented limitation of
//! the design, not something this module papers over.

use std::time::{Duration, Instant};

use dashmap::DashMap;

const CLEANUP_THRESHOLD: usize = 1000;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// When the current window resets. Set only on rejection.
    pub reset_at: Option<Instant>,
    /// Seconds until the reset, rounded up. Set only on rejection.
    pub retry_after_secs: Option<u64>,
}

struct FixedWindow {
    count: u32,
    reset_at: Instant,
}

/// Process-wide fixed-window rate limiter keyed by caller identity.
#[derive(Default)]
pub struct RateLimiter {
    windows: DashMap<String, FixedWindow>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self { windows: DashMap::new() }
    }

    /// Admit or reject one request for `key`.
    ///
    /// `max_requests` and `window` come from the endpoint's policy, so the
    /// same limiter instance serves endpoint classes with different budgets
    /// (callers namespace their keys per class).
    pub fn admit(&self, key: &str, max_requests: u32, window: Duration) -> RateLimitDecision {
        self.cleanup_if_needed();

        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| FixedWindow { count: 0, reset_at: now + window });

        if now > entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
        }

        if entry.count >= max_requests {
            let retry_after = seconds_until(entry.reset_at, now);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: Some(entry.reset_at),
                retry_after_secs: Some(retry_after),
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: max_requests - entry.count,
            reset_at: None,
            retry_after_secs: None,
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    fn cleanup_if_needed(&self) {
        if self.windows.len() > CLEANUP_THRESHOLD {
            let now = Instant::now();
            self.windows.retain(|_, w| now <= w.reset_at);
        }
    }
}

/// Ceiling of the remaining window in whole seconds, at least 1.
fn seconds_until(reset_at: Instant, now: Instant) -> u64 {
    let remaining = reset_at.saturating_duration_since(now);
    let millis = remaining.as_millis() as u64;
    (millis.div_ceil(1000)).max(1)
}
