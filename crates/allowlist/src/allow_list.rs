//! AllowList - Reloadable set of authorized actor ids

use crate::AllowListSource;
use arc_swap::ArcSwap;
use shared::ListLoadError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// The set of actor ids permitted to use the bot
///
/// Reads go through an atomically swapped snapshot: a reload builds a fresh
/// set and publishes it in one step, so concurrent `contains` callers see
/// either the fully-old or fully-new set, never a partial one. A fresh list
/// is empty until the first successful reload, so unknown actors are
/// rejected rather than admitted while the list is unloaded.
pub struct AllowList {
    active: ArcSwap<HashSet<String>>,
    source: Arc<dyn AllowListSource>,
}

impl AllowList {
    /// Create an empty allow-list bound to its source
    pub fn new(source: Arc<dyn AllowListSource>) -> Self {
        Self {
            active: ArcSwap::from_pointee(HashSet::new()),
            source,
        }
    }

    /// Whether an actor id is currently authorized
    ///
    /// Never blocks and never fails; reloads happening concurrently are
    /// invisible beyond the old/new snapshot distinction.
    pub fn contains(&self, actor_id: &str) -> bool {
        self.active.load().contains(actor_id)
    }

    /// Number of authorized ids in the active set
    pub fn len(&self) -> usize {
        self.active.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.load().is_empty()
    }

    /// Re-read the source and atomically replace the active set
    ///
    /// Returns the freshly activated set. On a source error the previous set
    /// stays active and the error is returned to the caller only; concurrent
    /// readers are unaffected.
    pub fn reload(&self) -> Result<Arc<HashSet<String>>, ListLoadError> {
        let raw = self.source.fetch().map_err(|e| {
            let err = ListLoadError {
                source_name: self.source.name(),
                reason: e.to_string(),
            };
            warn!(source = %err.source_name, error = %err.reason, "allow-list reload failed");
            err
        })?;

        let members = Arc::new(parse_members(&raw));
        self.active.store(Arc::clone(&members));
        info!(source = %self.source.name(), count = members.len(), "allow-list reloaded");
        Ok(members)
    }
}

/// Split a list document into ids: commas and newlines separate entries,
/// surrounding whitespace is trimmed, empty entries are skipped
fn parse_members(raw: &str) -> HashSet<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
