//! Fixed-window rate limiting for sensitive endpoints.
//!
//! Requests are counted per client key in non-overlapping windows: the
//! counter resets at each window boundary. A burst straddling a boundary
//! can therefore admit up to twice the nominal limit in a short span;
//! that is the intended behavior of this scheme, not a bug.
//!
//! Counters live in process memory only: they reset on restart and are
//! not shared between server instances.

use crate::config::RateLimitRule;
use crate::error::AppError;
use axum::{body::Body, http::Request};
use std::{
    collections::HashMap,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

/// Per-key counter for the current window
#[derive(Debug, Clone, Copy)]
struct Window {
    /// Epoch second at which the counter resets
    resets_at: u64,
    count: u64,
}

/// Shared fixed-window counters, keyed by endpoint + client address.
///
/// The whole read-increment-compare runs under one lock, so two
/// concurrent requests from the same client can never both slip past the
/// limit on a stale count.
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check and record a request. `Err(RateLimited)` when the window is
    /// already at its limit.
    pub fn check(&self, key: &str, rule: &RateLimitRule) -> Result<(), AppError> {
        self.check_at(key, rule, now_epoch_secs())
    }

    fn check_at(&self, key: &str, rule: &RateLimitRule, now: u64) -> Result<(), AppError> {
        let mut windows = self.windows.lock().unwrap();

        let window = windows.entry(key.to_string()).or_insert(Window {
            resets_at: now + rule.window_secs,
            count: 0,
        });

        if now >= window.resets_at {
            window.resets_at = now + rule.window_secs;
            window.count = 0;
        }

        if window.count >= rule.max_requests {
            let retry_after_secs = window.resets_at.saturating_sub(now).max(1);
            return Err(AppError::RateLimited {
                message: rule.message.clone(),
                retry_after_secs,
            });
        }
        window.count += 1;

        // Cap total entries to avoid unbounded growth
        if windows.len() > 10_000 {
            windows.retain(|_, w| now < w.resets_at);
        }

        Ok(())
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Client address for rate-limit keying: first `x-forwarded-for` hop,
/// then `x-real-ip`, then "unknown".
pub fn extract_client_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
