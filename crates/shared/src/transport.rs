//! Transport seam for user-visible replies

use crate::{Actor, SendError};
use async_trait::async_trait;

/// Outbound side of the chat transport, injected into the pipeline
///
/// The transport owns delivery; the gateway only hands it text. A failed
/// send is reported but never aborts the caller's remaining bookkeeping.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn reply(&self, actor: &Actor, text: &str) -> Result<(), SendError>;
}

/// No-op transport for testing
#[derive(Debug, Clone, Default)]
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn reply(&self, _actor: &Actor, _text: &str) -> Result<(), SendError> {
        Ok(())
    }
}
