//! ThrottleGate - Fixed-window flood control with unlock notices

use crate::{Decision, Stage, StageContext};
use async_trait::async_trait;
use audit::{AuditRecord, AuditSink, RateLimiter, ThrottleDecision, ThrottleKey};
use shared::{RateSpec, ThrottleConfig, Transport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reply sent for the first exceedances of a window
pub const THROTTLED_REPLY: &str = "Too many requests!";

/// Notice sent when the cooldown ends undisturbed
pub const UNLOCKED_REPLY: &str = "Unlocked.";

/// How many consecutive exceedances still get a throttle reply
pub const MAX_NOTICE_EXCEEDANCES: u32 = 2;

/// Second gate: counts messages per bucket and silences floods
///
/// Buckets default to one per handler; an override can point several
/// handlers at a shared bucket or tighten their limit.
pub struct ThrottleGate {
    limiter: Arc<RateLimiter>,
    config: ThrottleConfig,
    sink: AuditSink,
    transport: Arc<dyn Transport>,
}

impl ThrottleGate {
    pub fn new(
        limiter: Arc<RateLimiter>,
        config: ThrottleConfig,
        sink: AuditSink,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            limiter,
            config,
            sink,
            transport,
        }
    }

    /// Resolve the bucket key and limit in effect for a handler
    fn plan(&self, handler_name: &str) -> (ThrottleKey, RateSpec) {
        let subject = self
            .config
            .override_for(handler_name)
            .and_then(|ov| ov.key.as_deref())
            .unwrap_or(handler_name);

        (
            ThrottleKey::for_handler(subject),
            self.config.limit_for(handler_name),
        )
    }

    /// Throttled-path protocol: notify the actor and sleep out the cooldown
    ///
    /// Only the first [`MAX_NOTICE_EXCEEDANCES`] exceedances get a throttle
    /// reply; a longer flood is silenced. Every throttled message then
    /// sleeps out `retry_after` and peeks at the bucket again. The unlock
    /// notice goes out only when no further exceedance landed during the
    /// cooldown, so one flood produces exactly one notice.
    async fn wait_for_unlock(
        &self,
        ctx: &StageContext<'_>,
        key: &ThrottleKey,
        exceeded_count: u32,
        retry_after: Duration,
    ) {
        let actor = &ctx.message.actor;

        if exceeded_count <= MAX_NOTICE_EXCEEDANCES {
            if let Err(e) = self.transport.reply(actor, THROTTLED_REPLY).await {
                warn!(error = %e, "failed to deliver throttle notice");
            }
        }

        tokio::time::sleep(retry_after).await;

        let settled = self
            .limiter
            .status(key)
            .is_some_and(|status| status.exceeded_count == exceeded_count);
        if settled {
            if let Err(e) = self.transport.reply(actor, UNLOCKED_REPLY).await {
                warn!(error = %e, "failed to deliver unlock notice");
            }
        }
    }
}

#[async_trait]
impl Stage for ThrottleGate {
    fn name(&self) -> &'static str {
        "throttle_gate"
    }

    async fn evaluate(&self, ctx: &StageContext<'_>) -> Decision {
        let (key, spec) = self.plan(ctx.handler_name);

        match self.limiter.check(&key, &spec) {
            ThrottleDecision::Allowed => Decision::Allowed,
            ThrottleDecision::Throttled {
                exceeded_count,
                retry_after,
            } => {
                debug!(key = %key, exceeded_count, ?retry_after, "message throttled");
                self.wait_for_unlock(ctx, &key, exceeded_count, retry_after)
                    .await;
                self.sink.record(AuditRecord::throttled(ctx.message));
                Decision::Throttled
            }
        }
    }
}
