//! Shared fixtures for pipeline tests

use crate::MessageHandler;
use allowlist::{AllowList, StaticSource};
use async_trait::async_trait;
use shared::{Actor, InboundMessage, SendError, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport that records every reply it was asked to deliver
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts delivered to one actor, in send order
    pub fn texts_to(&self, actor_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| id == actor_id)
            .map(|(_, text)| text)
            .collect()
    }

    /// How many replies carried exactly this text
    pub fn count_of(&self, text: &str) -> usize {
        self.sent().iter().filter(|(_, t)| t == text).count()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn reply(&self, actor: &Actor, text: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((actor.id.clone(), text.to_string()));
        Ok(())
    }
}

/// Transport whose every send fails
#[derive(Debug, Default)]
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn reply(&self, actor: &Actor, _text: &str) -> Result<(), SendError> {
        Err(SendError::new(actor.id.clone(), "wire unplugged"))
    }
}

/// Handler that counts invocations and stays silent
#[derive(Debug, Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageHandler for CountingHandler {
    fn name(&self) -> &str {
        "counting_handler"
    }

    async fn handle(&self, _message: &InboundMessage) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

/// Allow-list preloaded with the given actor ids
pub fn allow_list_of(ids: &[&str]) -> Arc<AllowList> {
    let list = AllowList::new(Arc::new(StaticSource::new(ids.join(","))));
    list.reload().expect("static source never fails");
    Arc::new(list)
}

pub fn message(actor_id: &str, text: &str) -> InboundMessage {
    InboundMessage::new(Actor::new(actor_id, format!("Actor {actor_id}")), text)
}
