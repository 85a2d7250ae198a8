//! Automation audit trail and the mocked email outbox.
//!
//! Keys: `automation_logs` → `[AutomationLogEntry]`, `outbox` → `[OutboxEmail]`

use std::sync::Arc;

use vfo_core::error::Result;
use vfo_core::records::{AutomationLogEntry, OutboxEmail};
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

/// Append-only records of what automations did.
pub struct ActivityLog {
    store: Arc<dyn KeyValueStore>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends an audit entry and returns it.
    pub fn log(&self, event: &str, detail: Option<String>) -> Result<AutomationLogEntry> {
        let entry = AutomationLogEntry::new(event, detail);
        tracing::debug!(
            "[Automation] {}: {}",
            entry.event,
            entry.detail.as_deref().unwrap_or("-")
        );
        let stored = entry.clone();
        self.store
            .update(keys::AUTOMATION_LOGS, |all: &mut Vec<AutomationLogEntry>| {
                all.push(stored)
            })?;
        Ok(entry)
    }

    pub fn logs(&self) -> Vec<AutomationLogEntry> {
        self.store.get_or_default(keys::AUTOMATION_LOGS)
    }

    /// Records a mocked send. Nothing is delivered.
    pub fn push_outbox(&self, email: OutboxEmail) -> Result<()> {
        tracing::info!(
            "[Automation] Queued email '{}' for booking {}",
            email.template_id,
            email.booking_id
        );
        self.store
            .update(keys::OUTBOX, |all: &mut Vec<OutboxEmail>| all.push(email))
    }

    pub fn outbox(&self) -> Vec<OutboxEmail> {
        self.store.get_or_default(keys::OUTBOX)
    }
}
