//! Atomic JSON file operations.
//!
//! Writes go to a sibling temp file which is fsynced and renamed over the
//! target, so readers never observe a half-written document.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use vfo_core::error::{Result, VfoError};

/// A handle to a JSON file with atomic replace and locked read-modify-write.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// - `Ok(None)`: file doesn't exist or is empty
    /// - `Err`: the file exists but could not be read or parsed
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves `data` via temp file + rename.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Loads (or starts from `default_value`), applies `f` and saves, all
    /// while holding an exclusive lock. Nothing is written if `f` fails.
    pub fn update<R, F>(&self, default_value: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let out = f(&mut data)?;
        self.save(&data)?;

        Ok(out)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| VfoError::io(format!("Path has no file name: {}", self.path.display())))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock guard on `<file>.lock`, released on drop.
///
/// The lock file itself is left in place: every writer must lock the same
/// inode, so it is never unlinked.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| VfoError::io(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;

        if let Err(e) = self.file.unlock() {
            tracing::warn!("[Store] Failed to release lock: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("missing.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_creates_parent_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        let count = file
            .update(Counter::default(), |c| {
                c.count += 1;
                Ok(c.count)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(path.exists());
        assert!(!path.with_file_name(".data.json.tmp").exists());
        assert!(path.with_extension("lock").exists());
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file = AtomicJsonFile::<Counter>::new(path);
                    for _ in 0..25 {
                        file.update(Counter::default(), |c| {
                            c.count += 1;
                            Ok(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let file = AtomicJsonFile::<Counter>::new(path);
        assert_eq!(file.load().unwrap().unwrap().count, 100);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("data.json"));
        file.save(&Counter {
            name: "a".to_string(),
            count: 5,
        })
        .unwrap();

        let result: Result<()> = file.update(Counter::default(), |c| {
            c.count = 99;
            Err(VfoError::internal("boom"))
        });
        assert!(result.is_err());
        assert_eq!(file.load().unwrap().unwrap().count, 5);
    }
}
