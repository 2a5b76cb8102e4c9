//! One storage unit: an in-memory copy of a JSON file behind a lock
//!
//! Writes go through `transaction`, which runs the caller's closure on a
//! working copy while holding the write lock. The copy is persisted and
//! published only if the closure returns `Ok`, so a read-modify-write such
//! as "toggle a task, then recompute its project's progress" is never
//! observed half-applied and never interleaves with another writer.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AimsError, AimsResult};

use super::file_io::{read_json, write_json_atomic};

pub struct StorageUnit<D> {
    name: &'static str,
    path: PathBuf,
    data: RwLock<D>,
}

impl<D> StorageUnit<D>
where
    D: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(name: &'static str, path: PathBuf) -> Self {
        Self {
            name,
            path,
            data: RwLock::new(D::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory copy with the file's contents
    pub fn load(&self) -> AimsResult<()> {
        let loaded: D = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            AimsError::Storage(format!("Failed to acquire write lock on {}: {}", self.name, e))
        })?;
        *data = loaded;

        log::debug!("Loaded storage unit {} from {}", self.name, self.path.display());
        Ok(())
    }

    /// Write the in-memory copy to disk
    pub fn save(&self) -> AimsResult<()> {
        let data = self.data.read().map_err(|e| {
            AimsError::Storage(format!("Failed to acquire read lock on {}: {}", self.name, e))
        })?;

        write_json_atomic(&self.path, &*data)
    }

    /// Run a read-only query against the current data
    pub fn read<R>(&self, f: impl FnOnce(&D) -> R) -> AimsResult<R> {
        let data = self.data.read().map_err(|e| {
            AimsError::Storage(format!("Failed to acquire read lock on {}: {}", self.name, e))
        })?;

        Ok(f(&data))
    }

    /// Apply a change atomically
    ///
    /// On `Err` from the closure (or from persisting) neither the file nor
    /// the in-memory copy changes.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut D) -> AimsResult<R>) -> AimsResult<R> {
        let mut data = self.data.write().map_err(|e| {
            AimsError::Storage(format!("Failed to acquire write lock on {}: {}", self.name, e))
        })?;

        let mut working = data.clone();
        let result = f(&mut working)?;

        write_json_atomic(&self.path, &working)?;
        *data = working;

        log::debug!("Committed transaction on {}", self.name);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Counter {
        value: i64,
        history: Vec<i64>,
    }

    fn create_unit() -> (StorageUnit<Counter>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let unit = StorageUnit::new("counter", temp_dir.path().join("counter.json"));
        (unit, temp_dir)
    }

    #[test]
    fn test_commit_persists() {
        let (unit, _temp) = create_unit();

        let value = unit
            .transaction(|c| {
                c.value += 5;
                c.history.push(5);
                Ok(c.value)
            })
            .unwrap();
        assert_eq!(value, 5);

        let reopened: StorageUnit<Counter> = StorageUnit::new("counter", unit.path().to_path_buf());
        reopened.load().unwrap();
        assert_eq!(reopened.read(|c| c.value).unwrap(), 5);
    }

    #[test]
    fn test_failed_transaction_changes_nothing() {
        let (unit, _temp) = create_unit();
        unit.transaction(|c| {
            c.value = 1;
            Ok(())
        })
        .unwrap();

        let err = unit
            .transaction(|c| -> AimsResult<()> {
                c.value = 100;
                c.history.push(100);
                Err(AimsError::Validation("rejected".into()))
            })
            .unwrap_err();
        assert!(err.is_validation());

        assert_eq!(unit.read(|c| c.value).unwrap(), 1);
        assert!(unit.read(|c| c.history.is_empty()).unwrap());

        let on_disk: Counter = read_json(unit.path()).unwrap();
        assert_eq!(on_disk.value, 1);
    }

    #[test]
    fn test_concurrent_read_modify_write_loses_nothing() {
        let (unit, _temp) = create_unit();
        let unit = Arc::new(unit);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let unit = Arc::clone(&unit);
                scope.spawn(move || {
                    for _ in 0..10 {
                        unit.transaction(|c| {
                            let seen = c.value;
                            c.value = seen + 1;
                            Ok(())
                        })
                        .unwrap();
                    }
                });
            }
        });

        assert_eq!(unit.read(|c| c.value).unwrap(), 40);
    }
}
