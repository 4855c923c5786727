//! Shared sync state types.

use crate::sync::PassOutcome;

/// Scheduler phase of a single client process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Idle,
    Syncing,
}

/// What happened to one sync trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A pass ran to completion (successfully or degraded to local).
    Completed(PassOutcome),
    /// Another pass was already in flight; this trigger was discarded.
    Dropped,
}

impl TriggerOutcome {
    #[must_use]
    pub const fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped)
    }
}

/// Snapshot of the scheduler for status displays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    /// Outcome of the most recent completed pass
    pub last_outcome: Option<PassOutcome>,
    /// Timestamp (unix ms) of the most recent successful pass
    pub last_synced_at: Option<i64>,
}
