//! Throttle configuration types

use crate::LimitConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A fixed-window rate limit: at most `maxMessages` per `windowMs`
///
/// Values are validated at setup time (`new`, `ThrottleConfig::validate`);
/// a zero message budget or zero window is a configuration error, never a
/// request-time decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSpec {
    max_messages: u32,
    window_ms: u64,
}

impl RateSpec {
    /// Create a validated rate spec
    pub fn new(max_messages: u32, window: Duration) -> Result<Self, LimitConfigError> {
        let spec = Self {
            max_messages,
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
        };
        spec.validate("rate spec")?;
        Ok(spec)
    }

    /// Maximum number of messages allowed inside one window
    pub fn max_messages(&self) -> u32 {
        self.max_messages
    }

    /// Window duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Reject unusable limits, naming the scope they were configured for
    pub fn validate(&self, scope: &str) -> Result<(), LimitConfigError> {
        if self.max_messages == 0 {
            return Err(LimitConfigError {
                scope: scope.to_string(),
                reason: "maxMessages must be at least 1".to_string(),
            });
        }
        if self.window_ms == 0 {
            return Err(LimitConfigError {
                scope: scope.to_string(),
                reason: "windowMs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RateSpec {
    /// Process-wide default applied when no configuration is provided
    fn default() -> Self {
        Self {
            max_messages: 5,
            window_ms: 3_000,
        }
    }
}

/// Per-handler throttle override: a custom bucket key, a custom limit, or both
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleOverride {
    /// Replaces the handler-derived bucket subject
    pub key: Option<String>,

    /// Replaces the default limit
    pub limit: Option<RateSpec>,
}

impl ThrottleOverride {
    /// Builder: set the custom bucket key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Builder: set the custom limit
    pub fn with_limit(mut self, limit: RateSpec) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Throttle configuration: one default limit plus per-handler overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleConfig {
    /// Limit applied to every handler without an override
    pub default_limit: RateSpec,

    /// Overrides keyed by handler name
    #[serde(default)]
    pub overrides: HashMap<String, ThrottleOverride>,
}

impl ThrottleConfig {
    /// Create a configuration with only a default limit
    pub fn new(default_limit: RateSpec) -> Self {
        Self {
            default_limit,
            overrides: HashMap::new(),
        }
    }

    /// Builder: register an override for a handler
    pub fn with_override(mut self, handler: impl Into<String>, ov: ThrottleOverride) -> Self {
        self.overrides.insert(handler.into(), ov);
        self
    }

    /// Load configuration from a JSON file, validating every limit
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the default limit and every override limit
    pub fn validate(&self) -> Result<(), LimitConfigError> {
        self.default_limit.validate("default")?;
        for (handler, ov) in &self.overrides {
            if let Some(limit) = &ov.limit {
                limit.validate(handler)?;
            }
        }
        Ok(())
    }

    /// Look up the override registered for a handler, if any
    pub fn override_for(&self, handler: &str) -> Option<&ThrottleOverride> {
        self.overrides.get(handler)
    }

    /// The limit in effect for a handler
    pub fn limit_for(&self, handler: &str) -> RateSpec {
        self.override_for(handler)
            .and_then(|ov| ov.limit)
            .unwrap_or(self.default_limit)
    }
}
