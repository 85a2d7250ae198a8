//! Nurture sequence repository over a key-value store.
//!
//! Key: `nurture` → `[NurtureSequence]`. An absent key reads as the default
//! sequences, which are written back on that first read.

use std::sync::Arc;

use vfo_core::error::Result;
use vfo_core::nurture::{NurtureSequence, NurtureSequenceRepository, default_sequences};
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

pub struct KvNurtureSequenceRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvNurtureSequenceRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Runs `f` over the stored list, materialising the defaults first when
    /// the key has never been written.
    fn with_sequences<R>(&self, f: impl FnOnce(&mut Vec<NurtureSequence>) -> R) -> Result<R> {
        let seeded = self.store.get_raw(keys::NURTURE)?.is_some();
        self.store
            .update(keys::NURTURE, |all: &mut Vec<NurtureSequence>| {
                if !seeded && all.is_empty() {
                    *all = default_sequences();
                }
                f(all)
            })
    }
}

impl NurtureSequenceRepository for KvNurtureSequenceRepository {
    fn list(&self) -> Result<Vec<NurtureSequence>> {
        if self.store.get_raw(keys::NURTURE)?.is_none() {
            tracing::debug!("[Nurture] No stored sequences, persisting defaults");
            self.store.set(keys::NURTURE, &default_sequences())?;
        }
        Ok(self.store.get_or_default(keys::NURTURE))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<NurtureSequence>> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    fn upsert(&self, sequence: NurtureSequence) -> Result<()> {
        self.with_sequences(|all| match all.iter_mut().find(|s| s.id == sequence.id) {
            Some(existing) => *existing = sequence,
            None => all.push(sequence),
        })
    }

    fn insert_if_absent(&self, sequence: NurtureSequence) -> Result<bool> {
        self.with_sequences(|all| {
            if all.iter().any(|s| s.id == sequence.id) {
                false
            } else {
                all.push(sequence);
                true
            }
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.with_sequences(|all| all.retain(|s| s.id != id))
    }

    fn modify(
        &self,
        id: &str,
        f: &mut dyn FnMut(&mut NurtureSequence),
    ) -> Result<Option<NurtureSequence>> {
        self.with_sequences(|all| {
            all.iter_mut().find(|s| s.id == id).map(|s| {
                f(s);
                s.clone()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_first_read_persists_defaults() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = KvNurtureSequenceRepository::new(store.clone());

        let seqs = repo.list().unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].id, "lead-paid-consult");
        assert!(store.get_raw(keys::NURTURE).unwrap().is_some());
    }

    #[test]
    fn test_deleting_every_sequence_does_not_resurrect_defaults() {
        let repo = KvNurtureSequenceRepository::new(Arc::new(MemoryStore::new()));
        repo.delete("lead-paid-consult").unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_modify_saves_in_place() {
        let repo = KvNurtureSequenceRepository::new(Arc::new(MemoryStore::new()));
        let updated = repo
            .modify("lead-paid-consult", &mut |s| {
                s.toggle();
            })
            .unwrap()
            .unwrap();
        assert!(!updated.enabled);
        assert!(!repo.find_by_id("lead-paid-consult").unwrap().unwrap().enabled);
        assert!(repo.modify("missing", &mut |_| {}).unwrap().is_none());
    }
}
