//! Actor and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The sender of a message, as reported by the transport
///
/// Sourced fresh for every message; never cached across pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Stable unique identifier (string-typed to tolerate numeric-looking IDs)
    pub id: String,

    /// Human-readable name
    pub display_name: String,

    /// Transport handle (e.g. @username)
    pub handle: Option<String>,

    /// Family name, when the transport supplies one
    pub surname: Option<String>,

    /// BCP-47-ish locale code (e.g. 'en', 'ru')
    pub locale_code: Option<String>,
}

impl Actor {
    /// Create a new actor with minimal attributes
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            handle: None,
            surname: None,
            locale_code: None,
        }
    }

    /// Builder: set the transport handle
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Builder: set the surname
    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    /// Builder: set the locale code
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale_code = Some(locale.into());
        self
    }
}

/// One unit of pipeline work, created at the transport boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// Message sender
    pub actor: Actor,

    /// Raw message text
    pub text: String,

    /// When the transport handed the message over
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Create a message stamped with the current time
    pub fn new(actor: Actor, text: impl Into<String>) -> Self {
        Self {
            actor,
            text: text.into(),
            received_at: Utc::now(),
        }
    }

    /// Builder: override the receive timestamp
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }
}
