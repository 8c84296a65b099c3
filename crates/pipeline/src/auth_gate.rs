//! AuthGate - Allow-list check at the front of the chain

use crate::{Decision, Stage, StageContext};
use allowlist::AllowList;
use async_trait::async_trait;
use audit::{AuditRecord, AuditSink};
use shared::Transport;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reply sent to actors the allow-list does not contain
pub const UNAUTHORIZED_REPLY: &str = "You are not authorized to use this bot.";

/// First gate: only allow-listed actors pass
///
/// Authorization is decided per message against the list's current active
/// set. An empty list rejects everyone.
pub struct AuthGate {
    allow_list: Arc<AllowList>,
    sink: AuditSink,
    transport: Arc<dyn Transport>,
}

impl AuthGate {
    pub fn new(allow_list: Arc<AllowList>, sink: AuditSink, transport: Arc<dyn Transport>) -> Self {
        Self {
            allow_list,
            sink,
            transport,
        }
    }

    /// Membership check only, no side effects
    pub fn authorize(&self, actor_id: &str) -> bool {
        self.allow_list.contains(actor_id)
    }
}

#[async_trait]
impl Stage for AuthGate {
    fn name(&self) -> &'static str {
        "auth_gate"
    }

    async fn evaluate(&self, ctx: &StageContext<'_>) -> Decision {
        let message = ctx.message;
        if self.authorize(&message.actor.id) {
            return Decision::Allowed;
        }

        debug!(actor_id = %message.actor.id, "unauthorized actor rejected");
        if let Err(e) = self.transport.reply(&message.actor, UNAUTHORIZED_REPLY).await {
            // A failed reply must not skip the audit record
            warn!(error = %e, "failed to deliver rejection reply");
        }
        self.sink.record(AuditRecord::unauthorized(message));

        Decision::Rejected
    }
}
