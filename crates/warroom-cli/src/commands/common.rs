use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use warroom_core::config::SyncConfig;
use warroom_core::network::ActorNetwork;
use warroom_core::remote::HttpObjectStore;
use warroom_core::state::TriggerOutcome;
use warroom_core::store::{FileCacheSlot, RecordStore};
use warroom_core::sync::{PassOutcome, SyncScheduler};
use warroom_core::VoteRecord;

use crate::error::CliError;

const ENV_CACHE_PATH: &str = "WARROOM_CACHE_PATH";

#[derive(Debug, Serialize)]
pub struct RecordListItem {
    pub id: String,
    pub voter_name: String,
    pub id_number: String,
    pub phone_number: String,
    pub actor_id: String,
    pub actor_name: Option<String>,
    pub timestamp: i64,
    pub registered_at: String,
    pub relative_time: String,
}

pub fn resolve_cache_path(cli_cache_path: Option<PathBuf>) -> PathBuf {
    cli_cache_path
        .or_else(|| env::var_os(ENV_CACHE_PATH).map(PathBuf::from))
        .unwrap_or_else(default_cache_path)
}

pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("warroom")
        .join("records.json")
}

pub fn open_store(cache_path: &Path) -> RecordStore {
    RecordStore::load(FileCacheSlot::new(cache_path))
}

pub fn open_scheduler(cache_path: &Path, config: &SyncConfig) -> Result<SyncScheduler, CliError> {
    let remote = HttpObjectStore::new(&config.store_url)?;
    tracing::debug!(
        "Syncing room '{}' via {} every {}s",
        config.room_id,
        config.store_url,
        config.interval.as_secs()
    );
    Ok(SyncScheduler::new(
        Arc::new(remote),
        config,
        open_store(cache_path),
    ))
}

/// Write `rendered` to `output` (joining `suggested_name` when it is a
/// directory), or to stdout when no output was given.
pub fn write_output(
    output: Option<&Path>,
    suggested_name: &str,
    rendered: &str,
) -> Result<(), CliError> {
    let Some(output) = output else {
        println!("{rendered}");
        return Ok(());
    };

    let path = if output.is_dir() {
        output.join(suggested_name)
    } else {
        output.to_path_buf()
    };
    std::fs::write(&path, rendered)?;
    println!("{}", path.display());
    Ok(())
}

pub fn format_record_lines(records: &[VoteRecord], network: &ActorNetwork) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    records
        .iter()
        .map(|record| {
            let short_id = record.id.as_str().chars().take(13).collect::<String>();
            let name = truncate(&record.voter_name, 28);
            let actor = network
                .actor_name(&record.actor_id)
                .unwrap_or(record.actor_id.as_str());
            let relative_time = format_relative_time(record.timestamp, now_ms);

            format!(
                "{short_id:<13}  {name:<28}  {:<12}  {actor:<24}  {relative_time}",
                record.id_number
            )
        })
        .collect()
}

pub fn record_to_list_item(record: &VoteRecord, network: &ActorNetwork) -> RecordListItem {
    let now_ms = Utc::now().timestamp_millis();

    RecordListItem {
        id: record.id.to_string(),
        voter_name: record.voter_name.clone(),
        id_number: record.id_number.clone(),
        phone_number: record.phone_number.clone(),
        actor_id: record.actor_id.clone(),
        actor_name: network.actor_name(&record.actor_id).map(str::to_string),
        timestamp: record.timestamp,
        registered_at: format_timestamp(record.timestamp),
        relative_time: format_relative_time(record.timestamp, now_ms),
    }
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_record_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyRecordId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find a record by exact id, falling back to a unique id prefix.
pub fn resolve_record<'a>(
    query: &str,
    records: &'a [VoteRecord],
) -> Result<&'a VoteRecord, CliError> {
    let query = normalize_record_identifier(query)?;

    if let Some(record) = records.iter().find(|record| record.id.as_str() == query) {
        return Ok(record);
    }

    let matching = records
        .iter()
        .filter(|record| record.id.as_str().starts_with(&query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::RecordNotFound(query)),
        [record] => Ok(*record),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|record| record.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousRecordId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn describe_outcome(outcome: &TriggerOutcome) -> String {
    match outcome {
        TriggerOutcome::Dropped => "Sync already in progress; trigger skipped".to_string(),
        TriggerOutcome::Completed(PassOutcome::Created) => "Created shared registry".to_string(),
        TriggerOutcome::Completed(PassOutcome::Rewritten) => "Shared registry updated".to_string(),
        TriggerOutcome::Completed(PassOutcome::Unchanged) => "Already in sync".to_string(),
        TriggerOutcome::Completed(PassOutcome::Unavailable(reason)) => {
            format!("Sync unavailable, kept local records ({reason})")
        }
    }
}
