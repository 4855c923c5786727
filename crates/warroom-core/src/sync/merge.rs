//! Merge engine: one fetch-union-conditional-write pass.

use std::collections::HashMap;

use crate::models::{RecordId, VoteRecord};
use crate::remote::{RemoteResult, RemoteStore, SnapshotData};
use crate::util::unix_millis_now;

/// Union of two record lists plus whether it differs from the remote one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Deduplicated by id, newest first
    pub records: Vec<VoteRecord>,
    /// `true` when `records` is not exactly the remote list
    pub remote_changed: bool,
}

/// How a merge pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// No snapshot existed; one was created from the local list.
    Created,
    /// The remote list was stale and has been overwritten.
    Rewritten,
    /// Remote already matched the merged list; nothing was written.
    Unchanged,
    /// The store could not be used; local records were kept as-is.
    Unavailable(String),
}

impl PassOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

/// Result of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPass {
    /// The list both replicas should converge on (or `local` on failure)
    pub records: Vec<VoteRecord>,
    pub outcome: PassOutcome,
}

/// Union `local` and `remote` by record id.
///
/// Remote entries are inserted first and local entries overwrite them, so the
/// local copy wins on an id collision. A key keeps the position of its first
/// appearance; the stable sort by descending timestamp then breaks ties by
/// that position.
#[must_use]
pub fn merge_records(local: &[VoteRecord], remote: &[VoteRecord]) -> MergeResult {
    let mut records: Vec<VoteRecord> = Vec::with_capacity(local.len() + remote.len());
    let mut positions: HashMap<RecordId, usize> = HashMap::new();

    for record in remote.iter().chain(local) {
        if let Some(&index) = positions.get(&record.id) {
            records[index] = record.clone();
        } else {
            positions.insert(record.id.clone(), records.len());
            records.push(record.clone());
        }
    }

    records.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

    let remote_changed = records.len() != remote.len() || records.as_slice() != remote;
    MergeResult {
        records,
        remote_changed,
    }
}

/// Run one merge pass against the snapshot named `key`.
///
/// Never fails: when the store is unavailable the local list comes back
/// untouched with [`PassOutcome::Unavailable`].
pub async fn reconcile(remote: &dyn RemoteStore, key: &str, local: &[VoteRecord]) -> SyncPass {
    match try_reconcile(remote, key, local).await {
        Ok(pass) => pass,
        Err(error) => {
            tracing::warn!("Sync pass for '{}' failed, keeping local records: {}", key, error);
            SyncPass {
                records: local.to_vec(),
                outcome: PassOutcome::Unavailable(error.0),
            }
        }
    }
}

async fn try_reconcile(
    remote: &dyn RemoteStore,
    key: &str,
    local: &[VoteRecord],
) -> RemoteResult<SyncPass> {
    let Some(snapshot) = remote.fetch_snapshot(key).await? else {
        let payload = SnapshotData {
            records: local.to_vec(),
            last_update: unix_millis_now(),
        };
        let created = remote.create_snapshot(key, &payload).await?;
        tracing::info!(
            "Created snapshot '{}' ({}) with {} records",
            key,
            created.id,
            local.len()
        );
        return Ok(SyncPass {
            records: local.to_vec(),
            outcome: PassOutcome::Created,
        });
    };

    let merged = merge_records(local, &snapshot.data.records);
    if !merged.remote_changed {
        tracing::debug!("Snapshot '{}' already up to date", key);
        return Ok(SyncPass {
            records: merged.records,
            outcome: PassOutcome::Unchanged,
        });
    }

    let payload = SnapshotData {
        records: merged.records,
        last_update: unix_millis_now(),
    };
    remote.replace_snapshot(&snapshot.id, key, &payload).await?;
    tracing::info!(
        "Rewrote snapshot '{}' with {} records (remote had {})",
        key,
        payload.records.len(),
        snapshot.data.records.len()
    );

    Ok(SyncPass {
        records: payload.records,
        outcome: PassOutcome::Rewritten,
    })
}
