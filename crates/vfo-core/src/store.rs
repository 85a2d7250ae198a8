//! Key-value store contract.
//!
//! Every persisted collection (bookings, templates, rules, sequences, ...) is a
//! single JSON document stored under one string key. Implementations live in
//! `vfo-infrastructure`; this module only defines the contract and the typed
//! helpers layered on top of it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, VfoError};

/// Keys of the persisted collections. Stores prepend their namespace.
pub mod keys {
    pub const BOOKINGS: &str = "bookings";
    pub const SITE_CONFIG: &str = "siteConfig";
    pub const NURTURE: &str = "nurture";
    pub const EMAIL_TEMPLATES: &str = "email_templates";
    pub const AUTOMATION_RULES: &str = "automation_rules";
    pub const CATALOG: &str = "catalog";
    pub const WORKFLOWS: &str = "workflows";
    pub const AUTOMATION_LOGS: &str = "automation_logs";
    pub const OUTBOX: &str = "outbox";
    pub const DRAFTING_QUEUE: &str = "drafting_queue";
    pub const FUNDING_ITEMS: &str = "funding_items";
    pub const MAINTENANCE: &str = "maintenance";
    pub const ANNUAL_REVIEWS: &str = "annual_reviews";
    pub const DOC_VERSIONS: &str = "doc_versions";
}

/// Raw string-keyed persistent store.
///
/// There are no transactions across keys: last write wins. A single key can be
/// read-modify-written atomically through [`KeyValueStore::update_raw`], which
/// implementations run under their writer lock.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Lists all keys currently present.
    fn keys(&self) -> Result<Vec<String>>;

    /// Reads the current value, hands it to `f` and stores what `f` returns,
    /// without letting another writer interleave.
    fn update_raw(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()>;
}

/// Typed JSON helpers over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and deserializes `key`, returning `default` when the key is
    /// missing, unreadable or fails to parse.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key) {
            Ok(Some(raw)) => parse_or_warn(key, &raw).unwrap_or(default),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("[Store] Failed to read key '{}': {}", key, e);
                default
            }
        }
    }

    /// Like [`KeyValueStoreExt::get_or`] with `T::default()`.
    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get_or(key, T::default())
    }

    /// Serializes `value` as JSON and stores it under `key`.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    /// Atomically loads `key` (defaulting on absence or parse failure), applies
    /// `f` and writes the result back. Returns whatever `f` returned.
    fn update<T, R, F>(&self, key: &str, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let mut f = Some(f);
        let mut out = None;
        self.update_raw(key, &mut |raw| {
            let mut value: T = raw
                .as_deref()
                .and_then(|r| parse_or_warn(key, r))
                .unwrap_or_default();
            let apply = f
                .take()
                .ok_or_else(|| VfoError::internal("store update closure invoked twice"))?;
            out = Some(apply(&mut value));
            Ok(serde_json::to_string(&value)?)
        })?;
        out.ok_or_else(|| VfoError::internal("store update closure was never invoked"))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

fn parse_or_warn<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("[Store] Ignoring unparsable value under '{}': {}", key, e);
            None
        }
    }
}
