//! Remote snapshot storage.
//!
//! The shared record list lives in a generic JSON object store. Objects are
//! addressed by a store-assigned internal id and carry a queryable `name`,
//! which holds the deployment key.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::VoteRecord;

pub use http::HttpObjectStore;

/// The only failure the remote layer reports: the store could not be used.
///
/// Transport errors, non-2xx statuses and malformed bodies all collapse into
/// this; the message is for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Sync unavailable: {0}")]
pub struct SyncUnavailable(pub String);

pub type RemoteResult<T> = Result<T, SyncUnavailable>;

/// Payload stored in the snapshot object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default)]
    pub records: Vec<VoteRecord>,
    #[serde(default)]
    pub last_update: i64,
}

/// A snapshot object as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    /// Store-assigned internal id, used to address replacements
    pub id: String,
    /// Deployment key
    pub name: String,
    pub data: SnapshotData,
}

/// Snapshot storage operations.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Find the snapshot named `key`; `Ok(None)` when none exists yet.
    async fn fetch_snapshot(&self, key: &str) -> RemoteResult<Option<RemoteSnapshot>>;

    /// Create a new snapshot object named `key`.
    async fn create_snapshot(&self, key: &str, payload: &SnapshotData)
        -> RemoteResult<RemoteSnapshot>;

    /// Overwrite the snapshot at `internal_id`, keeping its name.
    async fn replace_snapshot(
        &self,
        internal_id: &str,
        key: &str,
        payload: &SnapshotData,
    ) -> RemoteResult<RemoteSnapshot>;
}
