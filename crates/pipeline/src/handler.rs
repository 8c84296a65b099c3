//! MessageHandler - Application logic behind the gates

use async_trait::async_trait;
use shared::InboundMessage;

/// Application handler invoked once a message clears every gate
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Name used for audit rows and throttle bucketing
    fn name(&self) -> &str;

    /// Process the message; `Some` is sent back to the actor
    async fn handle(&self, message: &InboundMessage) -> Option<String>;
}

/// Handler that echoes the message text back to the sender
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl MessageHandler for EchoHandler {
    fn name(&self) -> &str {
        "echo_message"
    }

    async fn handle(&self, message: &InboundMessage) -> Option<String> {
        Some(message.text.clone())
    }
}
