//! Local record cache.
//!
//! The in-memory list is the client's working copy; every change is mirrored
//! to a single durable slot so the list survives restarts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::models::{RecordId, VoteRecord};
use crate::{Error, Result};

/// A single named slot holding the serialized record list.
pub trait CacheSlot: Send + Sync {
    /// Read the raw slot contents, `None` when nothing was stored yet.
    fn read(&self) -> Result<Option<String>>;
    /// Overwrite the slot contents.
    fn write(&self, payload: &str) -> Result<()>;
}

/// File-backed cache slot.
#[derive(Debug, Clone)]
pub struct FileCacheSlot {
    path: PathBuf,
}

impl FileCacheSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheSlot for FileCacheSlot {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Unique sibling temp file, then rename: concurrent writers never share
        // a temp path and readers never see a half-written slot.
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(payload.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }
}

/// In-memory cache slot, shared between clones (primarily for tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheSlot {
    payload: Arc<Mutex<Option<String>>>,
}

impl MemoryCacheSlot {
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.payload.lock().ok().and_then(|slot| slot.clone())
    }
}

impl CacheSlot for MemoryCacheSlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.payload())
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut slot = self
            .payload
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("memory cache slot poisoned")))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}

/// Ordered record list mirrored to a [`CacheSlot`].
pub struct RecordStore {
    records: Vec<VoteRecord>,
    slot: Box<dyn CacheSlot>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RecordStore")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Open the store, seeding it with whatever the slot holds.
    ///
    /// A missing, unreadable or unparsable slot yields an empty store.
    pub fn load(slot: impl CacheSlot + 'static) -> Self {
        let records = match slot.read() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<VoteRecord>>(&raw) {
                Ok(records) => records,
                Err(error) => {
                    tracing::warn!("Ignoring unparsable local record cache: {}", error);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!("Failed to read local record cache: {}", error);
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} records from local cache", records.len());
        Self {
            records,
            slot: Box::new(slot),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&VoteRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Replace the whole list and persist it.
    ///
    /// The in-memory list is updated even when persisting fails.
    pub fn replace(&mut self, records: Vec<VoteRecord>) -> Result<()> {
        self.records = records;
        self.persist()
    }

    /// Insert a record at the front (most recent first) and persist.
    pub fn append(&mut self, record: VoteRecord) -> Result<()> {
        self.records.insert(0, record);
        self.persist()
    }

    /// Remove a record by id and persist. Returns whether anything was removed.
    pub fn remove(&mut self, id: &RecordId) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        if self.records.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.records)?;
        self.slot.write(&payload)
    }
}
