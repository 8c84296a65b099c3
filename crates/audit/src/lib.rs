//! # Breakwater Audit
//!
//! Audit logging and rate limiting for Breakwater.
//!
//! Every processed message ends as exactly one [`AuditRecord`], delivered
//! through the queued [`AuditSink`] to an [`AuditStore`]. The
//! [`RateLimiter`] counts messages against fixed windows keyed by
//! [`ThrottleKey`].

mod limiter;
mod record;
mod sink;
mod store;

pub use limiter::{
    Clock, RateLimiter, SystemClock, ThrottleDecision, ThrottleKey, ThrottleStatus,
    DEFAULT_KEY_PREFIX,
};
pub use record::{
    escape, AuditRecord, AuditRow, Outcome, THROTTLED_RESPONSE, TIMESTAMP_FORMAT,
    UNAUTHORIZED_RESPONSE,
};
pub use sink::{AuditSink, DEFAULT_DRAIN_TIMEOUT, DEFAULT_QUEUE_DEPTH};
pub use store::{AuditStore, MemoryStore, StoreStats};
