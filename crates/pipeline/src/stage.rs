//! Stage - One interceptor slot in the fixed chain

use async_trait::async_trait;
use shared::InboundMessage;

/// What a stage decided about the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Hand the message to the next stage, or the handler
    Allowed,

    /// Stop: the sender is not authorized
    Rejected,

    /// Stop: the sender's bucket is over its rate limit
    Throttled,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Whether processing stops at this stage
    pub fn is_terminal(&self) -> bool {
        !self.is_allowed()
    }
}

/// Everything a stage may consult when evaluating a message
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub message: &'a InboundMessage,

    /// Name of the handler the message is routed to
    pub handler_name: &'a str,
}

/// One gate in the interceptor chain
///
/// A stage owns the side effects of its own verdict: replies and audit
/// records for a terminal decision are produced inside `evaluate`. The
/// pipeline only sequences stages and stops at the first terminal decision.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, ctx: &StageContext<'_>) -> Decision;
}
