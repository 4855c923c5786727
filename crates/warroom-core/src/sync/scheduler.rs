//! Sync scheduler: drives merge passes from a timer and from local mutations.
//!
//! At most one pass is in flight per process. A trigger that arrives while a
//! pass is running is dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::merge::{merge_records, reconcile};
use crate::config::SyncConfig;
use crate::models::{NewVoteRecord, RecordId, VoteRecord};
use crate::remote::RemoteStore;
use crate::state::{SyncPhase, SyncStatus, TriggerOutcome};
use crate::store::RecordStore;
use crate::util::unix_millis_now;
use crate::Result;

/// Owns the local record cell and replicates it to the shared snapshot.
#[derive(Clone)]
pub struct SyncScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Arc<dyn RemoteStore>,
    room_id: String,
    interval: Duration,
    store: Mutex<RecordStore>,
    in_flight: AtomicBool,
    published: watch::Sender<Vec<VoteRecord>>,
    status: watch::Sender<SyncStatus>,
}

/// Releases the in-flight flag when the pass ends, however it ends.
///
/// A pass dropped mid-flight also leaves the published phase at `Idle`.
struct InFlightGuard<'a>(&'a Inner);

impl<'a> InFlightGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(inner))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Status first: once the flag is clear another pass may publish `Syncing`.
        self.0.status.send_if_modified(|status| {
            let syncing = status.phase == SyncPhase::Syncing;
            if syncing {
                status.phase = SyncPhase::Idle;
            }
            syncing
        });
        self.0.in_flight.store(false, Ordering::Release);
    }
}

impl SyncScheduler {
    pub fn new(remote: Arc<dyn RemoteStore>, config: &SyncConfig, store: RecordStore) -> Self {
        let (published, _) = watch::channel(store.records().to_vec());
        let (status, _) = watch::channel(SyncStatus::default());

        Self {
            inner: Arc::new(Inner {
                remote,
                room_id: config.room_id.clone(),
                interval: config.interval,
                store: Mutex::new(store),
                in_flight: AtomicBool::new(false),
                published,
                status,
            }),
        }
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.inner.room_id
    }

    /// Current local record list.
    pub async fn records(&self) -> Vec<VoteRecord> {
        self.inner.store.lock().await.records().to_vec()
    }

    /// Receive the record list every time it visibly changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<VoteRecord>> {
        self.inner.published.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.inner.status.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        if self.inner.in_flight.load(Ordering::Acquire) {
            SyncPhase::Syncing
        } else {
            SyncPhase::Idle
        }
    }

    /// Run one merge pass now, unless one is already in flight.
    pub async fn sync_now(&self) -> TriggerOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.inner) else {
            tracing::debug!("Sync already in flight; dropping trigger");
            return TriggerOutcome::Dropped;
        };

        self.inner
            .status
            .send_modify(|status| status.phase = SyncPhase::Syncing);

        let local = self.records().await;
        let pass = reconcile(self.inner.remote.as_ref(), &self.inner.room_id, &local).await;

        if pass.outcome.is_success() {
            self.commit(&pass.records).await;
        }

        let outcome = pass.outcome;
        self.inner.status.send_modify(|status| {
            status.phase = SyncPhase::Idle;
            if outcome.is_success() {
                status.last_synced_at = Some(unix_millis_now());
            }
            status.last_outcome = Some(outcome.clone());
        });

        TriggerOutcome::Completed(outcome)
    }

    /// Register a voter: validate, store optimistically, then sync.
    pub async fn add_record(&self, draft: NewVoteRecord) -> Result<(VoteRecord, TriggerOutcome)> {
        let record = draft.into_record()?;
        {
            let mut store = self.inner.store.lock().await;
            if let Err(error) = store.append(record.clone()) {
                tracing::warn!("Failed to persist new record {}: {}", record.id, error);
            }
            self.publish(store.records());
        }

        let outcome = self.sync_now().await;
        Ok((record, outcome))
    }

    /// Delete a record locally, then sync.
    ///
    /// Returns whether the record existed. A record the remote already holds
    /// comes back with the next pass, since passes only ever union.
    pub async fn delete_record(&self, id: &RecordId) -> (bool, TriggerOutcome) {
        let removed = {
            let mut store = self.inner.store.lock().await;
            let removed = match store.remove(id) {
                Ok(removed) => removed,
                Err(error) => {
                    tracing::warn!("Failed to persist removal of {}: {}", id, error);
                    true
                }
            };
            self.publish(store.records());
            removed
        };

        let outcome = self.sync_now().await;
        (removed, outcome)
    }

    /// Start the periodic loop: one pass immediately, then one per interval.
    pub fn spawn(&self) -> SchedulerHandle {
        let scheduler = self.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(scheduler.inner.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        scheduler.sync_now().await;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Sync scheduler for '{}' stopped", scheduler.inner.room_id);
                        break;
                    }
                }
            }
        });

        SchedulerHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    /// Fold a pass result under the current local list and publish it.
    ///
    /// Mutations made while the pass was in flight are kept: the current list
    /// wins on collision and local-only records survive the union.
    async fn commit(&self, reconciled: &[VoteRecord]) {
        let mut store = self.inner.store.lock().await;
        let folded = merge_records(store.records(), reconciled).records;
        if let Err(error) = store.replace(folded) {
            tracing::warn!("Failed to persist reconciled records: {}", error);
        }
        self.publish(store.records());
    }

    fn publish(&self, records: &[VoteRecord]) {
        self.inner.published.send_if_modified(|current| {
            if current.as_slice() == records {
                false
            } else {
                *current = records.to_vec();
                true
            }
        });
    }
}

/// Handle to a running periodic loop. Dropping it also stops the loop.
pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the loop once the current pass (if any) has finished.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(error) = (&mut self.task).await {
            tracing::warn!("Sync scheduler task ended abnormally: {}", error);
        }
    }
}
