//! Single-file JSON key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use vfo_core::error::Result;
use vfo_core::store::KeyValueStore;

use super::atomic_json::AtomicJsonFile;

type Document = BTreeMap<String, String>;

/// A [`KeyValueStore`] persisted as one JSON object mapping namespaced keys
/// to raw string values, mirroring a browser's local storage.
///
/// Every write rewrites the whole file under an exclusive lock, so two
/// processes sharing the file serialize their writes; the last write wins.
pub struct JsonFileStore {
    file: AtomicJsonFile<Document>,
    namespace: String,
}

impl JsonFileStore {
    /// Opens (lazily) the store at `path`. Keys are prefixed with
    /// `namespace`, e.g. `wyAPT_bookings`.
    pub fn new(path: PathBuf, namespace: impl Into<String>) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
            namespace: namespace.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn read_document(&self) -> Result<Document> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.remove(&self.full_key(key)))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let full_key = self.full_key(key);
        self.file.update(Document::new(), |doc| {
            doc.insert(full_key, value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let full_key = self.full_key(key);
        self.file.update(Document::new(), |doc| {
            doc.remove(&full_key);
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .read_document()?
            .keys()
            .filter_map(|k| k.strip_prefix(&self.namespace).map(str::to_string))
            .collect())
    }

    fn update_raw(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let full_key = self.full_key(key);
        self.file.update(Document::new(), |doc| {
            let next = f(doc.get(&full_key).cloned())?;
            doc.insert(full_key, next);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys_are_namespaced_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let store = JsonFileStore::new(path.clone(), "wyAPT_");

        store.set_raw("bookings", "[]").unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("wyAPT_bookings"));
        assert_eq!(store.keys().unwrap(), vec!["bookings".to_string()]);
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let a = JsonFileStore::new(path.clone(), "a_");
        let b = JsonFileStore::new(path, "b_");

        a.set_raw("k", "1").unwrap();
        b.set_raw("k", "2").unwrap();

        assert_eq!(a.get_raw("k").unwrap().as_deref(), Some("1"));
        assert_eq!(b.get_raw("k").unwrap().as_deref(), Some("2"));
        b.remove("k").unwrap();
        assert_eq!(a.get_raw("k").unwrap().as_deref(), Some("1"));
        assert!(b.get_raw("k").unwrap().is_none());
    }
}
