//! Replication of the local record list against the shared remote snapshot.

#[cfg(test)]
pub(crate) mod fake;
mod merge;
mod scheduler;

pub use merge::{merge_records, reconcile, MergeResult, PassOutcome, SyncPass};
pub use scheduler::{SchedulerHandle, SyncScheduler};
