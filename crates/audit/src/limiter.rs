//! RateLimiter - Fixed-window message counting per bucket key

use dashmap::DashMap;
use shared::RateSpec;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Scope prefix for handler-derived bucket keys
pub const DEFAULT_KEY_PREFIX: &str = "antiflood";

/// Source of monotonic time for window accounting
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Clock backed by the OS monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Identifies one counting bucket: a scope plus a subject inside it
///
/// Handlers sharing a subject share a window. The rendered form is
/// `{scope}_{subject}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    scope: String,
    subject: String,
}

impl ThrottleKey {
    /// Bucket for a handler under the default anti-flood scope
    pub fn for_handler(subject: impl Into<String>) -> Self {
        Self {
            scope: DEFAULT_KEY_PREFIX.to_string(),
            subject: subject.into(),
        }
    }

    /// Bucket with an explicit scope
    pub fn custom(scope: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            subject: subject.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl std::fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.scope, self.subject)
    }
}

/// Outcome of counting one message against a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Within the window allowance
    Allowed,

    /// Over the allowance until the window rolls over
    Throttled {
        /// How many messages in a row have exceeded this window, this one
        /// included
        exceeded_count: u32,

        /// Time left until the window expires
        retry_after: Duration,
    },
}

impl ThrottleDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ThrottleDecision::Allowed)
    }

    pub fn is_throttled(&self) -> bool {
        !self.is_allowed()
    }
}

/// Non-mutating view of a bucket's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleStatus {
    /// Messages counted in the current window
    pub count: u32,

    /// Consecutive exceedances in the current window
    pub exceeded_count: u32,
}

#[derive(Debug)]
struct ThrottleState {
    window_start: Instant,
    count: u32,
    exceeded_count: u32,
}

impl ThrottleState {
    fn fresh(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
            exceeded_count: 0,
        }
    }
}

/// Fixed-window rate limiter over an arbitrary set of bucket keys
///
/// All state lives in memory; counters vanish on restart. A window starts
/// at the first message counted against its key and never slides.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<ThrottleKey, ThrottleState>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a limiter reading time from the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
        }
    }

    /// Count one message against the key's window and decide its fate
    ///
    /// Every call mutates the bucket: a throttled message still advances
    /// `count` and `exceeded_count`. Use [`status`](Self::status) to observe
    /// a bucket without counting against it.
    pub fn check(&self, key: &ThrottleKey, spec: &RateSpec) -> ThrottleDecision {
        let now = self.clock.now();
        let window = spec.window();

        let mut entry = self
            .windows
            .entry(key.clone())
            .or_insert_with(|| ThrottleState::fresh(now));
        let state = entry.value_mut();

        let elapsed = now.duration_since(state.window_start);
        if elapsed >= window {
            state.window_start = now;
            state.count = 1;
            state.exceeded_count = 0;
            return ThrottleDecision::Allowed;
        }

        state.count = state.count.saturating_add(1);
        if state.count <= spec.max_messages() {
            return ThrottleDecision::Allowed;
        }

        state.exceeded_count = state.exceeded_count.saturating_add(1);
        ThrottleDecision::Throttled {
            exceeded_count: state.exceeded_count,
            retry_after: window - elapsed,
        }
    }

    /// Peek at a bucket's counters without counting a message
    pub fn status(&self, key: &ThrottleKey) -> Option<ThrottleStatus> {
        self.windows.get(key).map(|state| ThrottleStatus {
            count: state.count,
            exceeded_count: state.exceeded_count,
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
