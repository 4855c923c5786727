use std::path::Path;

use warroom_core::config::SyncConfig;
use warroom_core::network::ElectoralProgress;
use warroom_core::state::{SyncPhase, SyncStatus, TriggerOutcome};

use crate::commands::common::{describe_outcome, open_scheduler};
use crate::error::CliError;

pub async fn run_watch(cache_path: &Path, config: &SyncConfig) -> Result<(), CliError> {
    let scheduler = open_scheduler(cache_path, config)?;
    let mut updates = scheduler.subscribe();
    let mut statuses = scheduler.subscribe_status();
    let mut last_count = updates.borrow_and_update().len();
    let mut last_report: Option<String> = None;

    println!(
        "Watching '{}' every {}s with {last_count} local records (Ctrl-C to stop)",
        scheduler.room_id(),
        config.interval.as_secs()
    );

    let handle = scheduler.spawn();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = updates.borrow_and_update().len();
                println!("{}", format_count_change(last_count, count));
                last_count = count;
            }
            changed = statuses.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = format_status_change(&statuses.borrow_and_update());
                if let Some(line) = report.filter(|line| last_report.as_ref() != Some(line)) {
                    println!("{line}");
                    last_report = Some(line);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    handle.shutdown().await;
    println!("Stopped with {last_count} records");
    Ok(())
}

pub fn format_count_change(previous: usize, current: usize) -> String {
    let progress = ElectoralProgress::new(current);
    let delta = if current >= previous {
        format!("+{}", current - previous)
    } else {
        format!("-{}", previous - current)
    };

    format!(
        "{current} records ({delta}), {:.1}% of {} target",
        progress.percent, progress.target
    )
}

/// Describe the last finished pass; `None` while a pass is running.
pub fn format_status_change(status: &SyncStatus) -> Option<String> {
    if status.phase == SyncPhase::Syncing {
        return None;
    }
    let outcome = status.last_outcome.clone()?;
    Some(describe_outcome(&TriggerOutcome::Completed(outcome)))
}
