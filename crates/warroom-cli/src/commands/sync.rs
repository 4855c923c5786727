use std::path::Path;

use warroom_core::config::SyncConfig;

use crate::commands::common::{describe_outcome, open_scheduler};
use crate::error::CliError;

pub async fn run_sync(cache_path: &Path, config: &SyncConfig) -> Result<(), CliError> {
    let scheduler = open_scheduler(cache_path, config)?;
    let outcome = scheduler.sync_now().await;
    let count = scheduler.records().await.len();

    println!("{} ({count} records)", describe_outcome(&outcome));
    Ok(())
}
