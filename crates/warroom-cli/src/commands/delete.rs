use std::path::Path;

use warroom_core::config::SyncConfig;

use crate::commands::common::{describe_outcome, open_scheduler, resolve_record};
use crate::error::CliError;

pub async fn run_delete(id: &str, cache_path: &Path, config: &SyncConfig) -> Result<(), CliError> {
    let scheduler = open_scheduler(cache_path, config)?;
    let records = scheduler.records().await;
    let record_id = resolve_record(id, &records)?.id.clone();

    let (_, outcome) = scheduler.delete_record(&record_id).await;
    println!("Deleted {record_id}");
    eprintln!("{}", describe_outcome(&outcome));

    let restored = scheduler
        .records()
        .await
        .iter()
        .any(|record| record.id == record_id);
    if restored {
        eprintln!("Record {record_id} is still in the shared registry and was restored locally");
    }

    Ok(())
}
