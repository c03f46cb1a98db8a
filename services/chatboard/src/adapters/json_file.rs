//! services/chatboard/src/adapters/json_file.rs
//!
//! A `KeyValueStorage` kept in a single JSON object file, the on-disk
//! counterpart of one browser storage profile.

use async_trait::async_trait;
use chatboard_core::ports::{KeyValueStorage, PortError, PortResult};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

type Items = BTreeMap<String, String>;

/// Every change is a read-modify-write of the whole file under an exclusive
/// lock on `<file>.lock`, so handles in other processes queue up behind it.
/// The new contents go to a fresh temp file in the same directory, are synced,
/// then renamed over the profile. Readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    dir: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStorage {
    /// Creates the parent directory if needed. The file itself appears on the
    /// first write.
    pub async fn open(path: impl AsRef<Path>) -> PortResult<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PortError::Unexpected(format!("creating {}: {}", parent.display(), e))
                })?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");

        debug!(path = %path.display(), "opened json storage");
        Ok(Self {
            path,
            dir,
            lock_path: PathBuf::from(lock_path),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> PortResult<Items> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Items::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            warn!(path = %self.path.display(), "storage file is not a JSON object of strings");
            PortError::Corrupted {
                key: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn write_items(&self, items: &Items) -> PortResult<()> {
        let raw = serde_json::to_string_pretty(items)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let io_err = |e: std::io::Error| {
            PortError::Unexpected(format!("writing {}: {}", self.path.display(), e))
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(raw.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn lock(&self) -> PortResult<File> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&self.lock_path)
            .and_then(|file| file.lock_exclusive().map(|_| file))
            .map_err(|e| {
                PortError::Unexpected(format!("locking {}: {}", self.lock_path.display(), e))
            })?;
        Ok(file)
    }

    /// Runs `op` on the blocking pool so file locks and syncs never stall the
    /// async workers.
    async fn blocking<R, F>(&self, op: F) -> PortResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&Self) -> PortResult<R> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || op(&this))
            .await
            .map_err(|e| PortError::Unexpected(format!("storage task failed: {}", e)))?
    }

    /// Locked read-modify-write. `fresh` skips reading the current contents.
    async fn update<F>(&self, fresh: bool, change: F) -> PortResult<()>
    where
        F: FnOnce(&mut Items) + Send + 'static,
    {
        self.blocking(move |this| {
            // Released when the handle drops.
            let _lock = this.lock()?;
            let mut items = if fresh { Items::new() } else { this.read_items()? };
            change(&mut items);
            this.write_items(&items)?;
            debug!(path = %this.path.display(), keys = items.len(), "wrote json storage");
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get_item(&self, key: &str) -> PortResult<Option<String>> {
        let key = key.to_string();
        self.blocking(move |this| Ok(this.read_items()?.remove(&key)))
            .await
    }

    async fn set_item(&self, key: &str, value: &str) -> PortResult<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.update(false, move |items| {
            items.insert(key, value);
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> PortResult<()> {
        let key = key.to_string();
        self.update(false, move |items| {
            items.remove(&key);
        })
        .await
    }

    async fn clear(&self) -> PortResult<()> {
        self.update(true, |_| {}).await
    }
}
