//! # Breakwater Pipeline
//!
//! The fixed interceptor chain in front of the application handler.
//!
//! ## Components
//!
//! - [`Pipeline`]: walks the gates and audits the handler's outcome
//! - [`AuthGate`]: allow-list membership check
//! - [`ThrottleGate`]: fixed-window flood control with unlock notices
//! - [`MessageHandler`] / [`EchoHandler`]: the application seam

mod auth_gate;
mod handler;
mod pipeline;
mod stage;
mod throttle_gate;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_gate::{AuthGate, UNAUTHORIZED_REPLY};
pub use handler::{EchoHandler, MessageHandler};
pub use pipeline::Pipeline;
pub use stage::{Decision, Stage, StageContext};
pub use throttle_gate::{ThrottleGate, MAX_NOTICE_EXCEEDANCES, THROTTLED_REPLY, UNLOCKED_REPLY};
