//! In-memory remote store used by the sync tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::models::VoteRecord;
use crate::remote::{RemoteResult, RemoteSnapshot, RemoteStore, SnapshotData, SyncUnavailable};

pub const ROOM: &str = "test-room";

pub fn record(id: &str, timestamp: i64) -> VoteRecord {
    VoteRecord {
        id: id.into(),
        actor_id: "guild".to_string(),
        voter_name: format!("Voter {id}"),
        id_number: "1020".to_string(),
        phone_number: "3100000000".to_string(),
        timestamp,
    }
}

#[derive(Default)]
pub struct FakeRemote {
    snapshot: Mutex<Option<RemoteSnapshot>>,
    failing: AtomicBool,
    failing_writes: AtomicBool,
    fetches: AtomicUsize,
    creates: AtomicUsize,
    replaces: AtomicUsize,
    gate: Option<Gate>,
}

struct Gate {
    entered: Notify,
    release: Notify,
}

impl FakeRemote {
    pub fn with_records(records: Vec<VoteRecord>) -> Self {
        let remote = Self::default();
        remote.set_records(records);
        remote
    }

    pub fn failing() -> Self {
        let remote = Self::default();
        remote.set_failing(true);
        remote
    }

    /// Every fetch parks until [`FakeRemote::release`] is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Notify::new(),
            }),
            ..Self::default()
        }
    }

    /// Fetches succeed but every create and replace is refused.
    pub fn read_only(records: Option<Vec<VoteRecord>>) -> Self {
        let remote = Self::default();
        if let Some(records) = records {
            remote.set_records(records);
        }
        remote.failing_writes.store(true, Ordering::SeqCst);
        remote
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Simulate another client overwriting the snapshot.
    pub fn set_records(&self, records: Vec<VoteRecord>) {
        let mut snapshot = self.snapshot.lock().unwrap();
        *snapshot = Some(RemoteSnapshot {
            id: "obj-1".to_string(),
            name: ROOM.to_string(),
            data: SnapshotData {
                records,
                last_update: 1,
            },
        });
    }

    pub fn records(&self) -> Option<Vec<VoteRecord>> {
        self.snapshot
            .lock()
            .unwrap()
            .as_ref()
            .map(|snapshot| snapshot.data.records.clone())
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn replace_count(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    pub async fn wait_for_fetch(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    fn check_available(&self) -> RemoteResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SyncUnavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_writable(&self) -> RemoteResult<()> {
        self.check_available()?;
        if self.failing_writes.load(Ordering::SeqCst) {
            Err(SyncUnavailable("HTTP 403: write refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn fetch_snapshot(&self, key: &str) -> RemoteResult<Option<RemoteSnapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.check_available()?;

        Ok(self
            .snapshot
            .lock()
            .unwrap()
            .clone()
            .filter(|snapshot| snapshot.name == key))
    }

    async fn create_snapshot(
        &self,
        key: &str,
        payload: &SnapshotData,
    ) -> RemoteResult<RemoteSnapshot> {
        self.check_writable()?;
        self.creates.fetch_add(1, Ordering::SeqCst);
        let created = RemoteSnapshot {
            id: "obj-1".to_string(),
            name: key.to_string(),
            data: payload.clone(),
        };
        *self.snapshot.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn replace_snapshot(
        &self,
        internal_id: &str,
        key: &str,
        payload: &SnapshotData,
    ) -> RemoteResult<RemoteSnapshot> {
        self.check_writable()?;
        self.replaces.fetch_add(1, Ordering::SeqCst);
        let replaced = RemoteSnapshot {
            id: internal_id.to_string(),
            name: key.to_string(),
            data: payload.clone(),
        };
        *self.snapshot.lock().unwrap() = Some(replaced.clone());
        Ok(replaced)
    }
}
