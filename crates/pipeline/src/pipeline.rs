//! Pipeline - Fixed interceptor chain in front of the handler

use crate::{AuthGate, Decision, MessageHandler, Stage, StageContext, ThrottleGate};
use audit::{AuditRecord, AuditSink};
use shared::{InboundMessage, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The message gateway: authorization, flood control, then the handler
///
/// Stage order is fixed at construction and every message walks it from the
/// front. Whatever the outcome, exactly one audit record is queued per
/// message; the gates write their own terminal records, the pipeline writes
/// the handled one.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    handler: Arc<dyn MessageHandler>,
    transport: Arc<dyn Transport>,
    sink: AuditSink,
}

impl Pipeline {
    pub fn new(
        auth: AuthGate,
        throttle: ThrottleGate,
        handler: Arc<dyn MessageHandler>,
        transport: Arc<dyn Transport>,
        sink: AuditSink,
    ) -> Self {
        Self {
            stages: vec![Arc::new(auth), Arc::new(throttle)],
            handler,
            transport,
            sink,
        }
    }

    /// Run one message through every gate, then the handler
    pub async fn process(&self, message: &InboundMessage) -> Decision {
        let ctx = StageContext {
            message,
            handler_name: self.handler.name(),
        };

        for stage in &self.stages {
            let decision = stage.evaluate(&ctx).await;
            if decision.is_terminal() {
                debug!(
                    stage = stage.name(),
                    ?decision,
                    actor_id = %message.actor.id,
                    "message stopped"
                );
                return decision;
            }
        }

        let response = self.handler.handle(message).await;
        if let Some(text) = &response {
            if let Err(e) = self.transport.reply(&message.actor, text).await {
                warn!(error = %e, "failed to deliver handler reply");
            }
        }
        self.sink.record(AuditRecord::allowed(message, response));

        Decision::Allowed
    }

    /// Spawn one task per message, isolating slow cooldowns from each other
    pub fn dispatch(self: Arc<Self>, message: InboundMessage) -> JoinHandle<Decision> {
        tokio::spawn(async move { self.process(&message).await })
    }
}
