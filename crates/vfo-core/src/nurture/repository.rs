//! Nurture sequence repository trait.

use super::model::NurtureSequence;
use crate::error::Result;

/// Persistence contract for nurture sequences, keyed by `id`.
pub trait NurtureSequenceRepository: Send + Sync {
    /// All sequences. An empty store yields the default sequences, which are
    /// persisted on that first read.
    fn list(&self) -> Result<Vec<NurtureSequence>>;

    fn find_by_id(&self, id: &str) -> Result<Option<NurtureSequence>>;

    /// Inserts or overwrites in place. Sequences are never versioned.
    fn upsert(&self, sequence: NurtureSequence) -> Result<()>;

    fn insert_if_absent(&self, sequence: NurtureSequence) -> Result<bool>;

    fn delete(&self, id: &str) -> Result<()>;

    /// Loads the sequence, applies `f` and saves it back in one write.
    /// Returns `Ok(None)` when the sequence does not exist.
    fn modify(
        &self,
        id: &str,
        f: &mut dyn FnMut(&mut NurtureSequence),
    ) -> Result<Option<NurtureSequence>>;
}
