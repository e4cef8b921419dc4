use dashmap::DashMap;
use std::time::{Duration, Instant};

// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admitted,
    Blocked { retry_after_secs: u64 },
}

// Rate limit entry - tracks requests per caller key
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
    pub blocked: bool,
    pub blocked_at: Instant,
}

/// Fixed-window request counter with a block state, keyed by caller identity.
///
/// The window resets lazily on the next access, so a caller can burst across
/// a window boundary without being blocked. That matches the deployed
/// behavior and is kept on purpose; don't swap in a sliding window silently.
///
/// Entries are created lazily and never swept. Fine for a small IP set.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    window: Duration,
    block_duration: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration, block_duration: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
            block_duration,
        }
    }

    /// Count one request for `caller` and decide whether to admit it.
    ///
    /// The whole read-check-increment runs under the map's entry guard, so
    /// concurrent checks for the same caller serialize; two requests can
    /// never both slip past the threshold.
    pub fn admit(&self, caller: &str, max_requests: u32) -> Decision {
        let now = Instant::now();

        let mut entry = self
            .entries
            .entry(caller.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
                blocked: false,
                blocked_at: now,
            });

        if entry.blocked {
            if now.duration_since(entry.blocked_at) > self.block_duration {
                // block expired - fall through into a fresh counting window
                entry.count = 0;
                entry.window_start = now;
                entry.blocked = false;
            } else {
                // always advertise the full block window, not the remainder
                return Decision::Blocked {
                    retry_after_secs: self.block_duration.as_secs(),
                };
            }
        }

        // window expired..? reset it
        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;

        if entry.count > max_requests {
            entry.blocked = true;
            entry.blocked_at = now;
            return Decision::Blocked {
                retry_after_secs: self.block_duration.as_secs(),
            };
        }

        Decision::Admitted
    }
}
