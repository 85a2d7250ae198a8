//! In-process key-value store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use vfo_core::error::{Result, VfoError};
use vfo_core::store::KeyValueStore;

/// A [`KeyValueStore`] backed by a map in memory. Nothing survives the
/// process; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> VfoError {
        VfoError::internal("memory store lock poisoned")
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.keys().cloned().collect())
    }

    fn update_raw(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let next = f(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfo_core::store::KeyValueStoreExt;

    #[test]
    fn test_failed_update_keeps_previous_value() {
        let store = MemoryStore::new();
        store.set_raw("k", "[1]").unwrap();
        let result = store.update_raw("k", &mut |_| Err(VfoError::internal("nope")));
        assert!(result.is_err());
        assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_typed_helpers() {
        let store = MemoryStore::new();
        store.set("names", &vec!["a", "b"]).unwrap();
        let names: Vec<String> = store.get_or_default("names");
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.keys().unwrap(), vec!["names".to_string()]);
    }
}
