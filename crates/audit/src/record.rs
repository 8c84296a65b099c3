//! AuditRecord - One durable row per processed message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::InboundMessage;

/// Response text written for rows describing an unauthorized actor
pub const UNAUTHORIZED_RESPONSE: &str = "Unauthorized access | Blocked";

/// Response text written for rows describing a throttled message
pub const THROTTLED_RESPONSE: &str = "Throttling | Blocked";

/// Timestamp rendering expected by the audit store
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Terminal outcome of one message's pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Allowed,
    Unauthorized,
    Throttled,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Allowed => "allowed",
            Outcome::Unauthorized => "unauthorized",
            Outcome::Throttled => "throttled",
        }
    }

    /// Whether the message was stopped before reaching the handler
    pub fn is_blocked(&self) -> bool {
        !matches!(self, Outcome::Allowed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit row: the full actor identity plus the request and the response
///
/// Every inbound message produces exactly one terminal record, regardless of
/// the stage it stopped at. All nine data fields are always present;
/// optional fields are explicit nils, never dropped columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub actor_id: String,
    pub display_name: String,
    pub handle: Option<String>,
    pub surname: Option<String>,
    pub locale_code: Option<String>,

    /// The message text that triggered this record
    pub action: String,

    /// Raw request payload; nil for throttled rows
    pub request: Option<String>,

    /// Handler response or the fixed blocked-response constant
    pub response: Option<String>,

    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
}

impl AuditRecord {
    fn base(message: &InboundMessage, outcome: Outcome) -> Self {
        Self {
            actor_id: message.actor.id.clone(),
            display_name: message.actor.display_name.clone(),
            handle: message.actor.handle.clone(),
            surname: message.actor.surname.clone(),
            locale_code: message.actor.locale_code.clone(),
            action: message.text.clone(),
            request: Some(message.text.clone()),
            response: None,
            timestamp: Utc::now(),
            outcome,
        }
    }

    /// Record for a message stopped by the authorization gate
    pub fn unauthorized(message: &InboundMessage) -> Self {
        let mut record = Self::base(message, Outcome::Unauthorized);
        record.response = Some(UNAUTHORIZED_RESPONSE.to_string());
        record
    }

    /// Record for a message stopped by the rate limiter
    pub fn throttled(message: &InboundMessage) -> Self {
        let mut record = Self::base(message, Outcome::Throttled);
        record.request = None;
        record.response = Some(THROTTLED_RESPONSE.to_string());
        record
    }

    /// Record for a message the handler processed
    pub fn allowed(message: &InboundMessage, response: Option<String>) -> Self {
        let mut record = Self::base(message, Outcome::Allowed);
        record.response = response;
        record
    }

    /// Timestamp rendered the way the store column expects it
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Flatten into the escaped nine-column insert row
    pub fn to_row(&self) -> AuditRow {
        AuditRow {
            user_id: escape(&self.actor_id),
            first_name: escape(&self.display_name),
            username: self.handle.as_deref().map(escape),
            last_name: self.surname.as_deref().map(escape),
            language_code: self.locale_code.as_deref().map(escape),
            action: escape(&self.action),
            request: self.request.as_deref().map(escape),
            response: self.response.as_deref().map(escape),
            timestamp: self.timestamp_string(),
        }
    }
}

/// The nine-column row shape of the audit store's insert contract
///
/// Column names match the store table. String values arrive here already
/// escaped; a store adapter must bind them as parameters or single-quoted
/// literals, never splice raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub user_id: String,
    pub first_name: String,
    pub username: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub action: String,
    pub request: Option<String>,
    pub response: Option<String>,
    pub timestamp: String,
}

impl AuditRow {
    /// Insert column order
    pub const COLUMNS: [&'static str; 9] = [
        "user_id",
        "first_name",
        "username",
        "last_name",
        "language_code",
        "action",
        "request",
        "response",
        "timestamp",
    ];

    /// Values in column order; `None` encodes SQL NULL
    pub fn values(&self) -> [Option<&str>; 9] {
        [
            Some(&self.user_id),
            Some(&self.first_name),
            self.username.as_deref(),
            self.last_name.as_deref(),
            self.language_code.as_deref(),
            Some(&self.action),
            self.request.as_deref(),
            self.response.as_deref(),
            Some(&self.timestamp),
        ]
    }
}

/// Backslash-escape a value for use inside a single-quoted store literal
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Actor;

    fn ping_from(actor: Actor) -> InboundMessage {
        InboundMessage::new(actor, "ping")
    }

    fn full_actor() -> Actor {
        Actor::new("42", "Alice")
            .with_handle("alice")
            .with_surname("Smith")
            .with_locale("en")
    }

    // ============== Constructor Tests ==============

    #[test]
    fn test_unauthorized_record() {
        let record = AuditRecord::unauthorized(&ping_from(full_actor()));

        assert_eq!(record.outcome, Outcome::Unauthorized);
        assert_eq!(record.actor_id, "42");
        assert_eq!(record.action, "ping");
        assert_eq!(record.request.as_deref(), Some("ping"));
        assert_eq!(record.response.as_deref(), Some(UNAUTHORIZED_RESPONSE));
    }

    #[test]
    fn test_throttled_record_has_nil_request() {
        let record = AuditRecord::throttled(&ping_from(full_actor()));

        assert_eq!(record.outcome, Outcome::Throttled);
        assert!(record.request.is_none());
        assert_eq!(record.response.as_deref(), Some(THROTTLED_RESPONSE));
        // The row is still complete: action carries the text
        assert_eq!(record.action, "ping");
    }

    #[test]
    fn test_allowed_record_carries_handler_response() {
        let record = AuditRecord::allowed(&ping_from(full_actor()), Some("pong".to_string()));

        assert_eq!(record.outcome, Outcome::Allowed);
        assert_eq!(record.request.as_deref(), Some("ping"));
        assert_eq!(record.response.as_deref(), Some("pong"));
    }

    #[test]
    fn test_allowed_record_with_silent_handler() {
        let record = AuditRecord::allowed(&ping_from(full_actor()), None);

        assert_eq!(record.outcome, Outcome::Allowed);
        assert!(record.response.is_none());
    }

    #[test]
    fn test_record_copies_full_actor_identity() {
        let record = AuditRecord::allowed(&ping_from(full_actor()), None);

        assert_eq!(record.display_name, "Alice");
        assert_eq!(record.handle.as_deref(), Some("alice"));
        assert_eq!(record.surname.as_deref(), Some("Smith"));
        assert_eq!(record.locale_code.as_deref(), Some("en"));
    }

    // ============== Timestamp Tests ==============

    #[test]
    fn test_timestamp_format() {
        let mut record = AuditRecord::allowed(&ping_from(full_actor()), None);
        record.timestamp = "2024-05-01T10:30:05Z".parse().unwrap();

        assert_eq!(record.timestamp_string(), "2024-05-01 10:30:05");
    }

    // ============== Row Encoding Tests ==============

    #[test]
    fn test_row_columns() {
        assert_eq!(AuditRow::COLUMNS.len(), 9);
        assert_eq!(AuditRow::COLUMNS[0], "user_id");
        assert_eq!(AuditRow::COLUMNS[8], "timestamp");
    }

    #[test]
    fn test_row_values_in_column_order() {
        let record = AuditRecord::unauthorized(&ping_from(full_actor()));
        let row = record.to_row();
        let values = row.values();

        assert_eq!(values[0], Some("42"));
        assert_eq!(values[1], Some("Alice"));
        assert_eq!(values[2], Some("alice"));
        assert_eq!(values[5], Some("ping"));
        assert_eq!(values[7], Some(UNAUTHORIZED_RESPONSE));
    }

    #[test]
    fn test_row_nil_fields_stay_nil() {
        let record = AuditRecord::throttled(&ping_from(Actor::new("7", "Bob")));
        let row = record.to_row();

        assert!(row.username.is_none());
        assert!(row.last_name.is_none());
        assert!(row.language_code.is_none());
        assert!(row.request.is_none());
    }

    // ============== Escaping Tests ==============

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r"it's"), r"it\'s");
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape(r"\'"), r"\\\'");
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape("a\nb"), r"a\nb");
        assert_eq!(escape("a\tb"), r"a\tb");
        assert_eq!(escape("a\rb"), r"a\rb");
        assert_eq!(escape("a\0b"), r"a\0b");
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape("hello world 123"), "hello world 123");
        assert_eq!(escape("日本語"), "日本語");
    }

    mod red_team {
        use super::*;

        #[test]
        fn test_injection_attempt_in_message_text() {
            let actor = Actor::new("666", "Eve");
            let message = InboundMessage::new(actor, "'); DROP TABLE bot_logs; --");

            let row = AuditRecord::unauthorized(&message).to_row();

            // The closing quote is neutralized in every column that carries it
            assert_eq!(row.action, r"\'); DROP TABLE bot_logs; --");
            assert_eq!(row.request.as_deref(), Some(r"\'); DROP TABLE bot_logs; --"));
        }

        #[test]
        fn test_injection_attempt_in_actor_identity() {
            let actor = Actor::new("1' OR '1'='1", "Robert'); --")
                .with_handle("x\0admin")
                .with_surname("a\\'b");
            let message = InboundMessage::new(actor, "hi");

            let row = AuditRecord::allowed(&message, None).to_row();

            assert_eq!(row.user_id, r"1\' OR \'1\'=\'1");
            assert_eq!(row.first_name, r"Robert\'); --");
            assert_eq!(row.username.as_deref(), Some(r"x\0admin"));
            assert_eq!(row.last_name.as_deref(), Some(r"a\\\'b"));
        }

        #[test]
        fn test_newline_smuggling_in_display_name() {
            let actor = Actor::new("2", "line1\nline2");
            let row = AuditRecord::allowed(&InboundMessage::new(actor, "x"), None).to_row();

            assert!(!row.first_name.contains('\n'));
            assert_eq!(row.first_name, r"line1\nline2");
        }
    }
}
