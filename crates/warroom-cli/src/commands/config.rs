use std::path::Path;

use warroom_core::config::{AnalysisConfig, SyncConfig};

pub fn run_config(cache_path: &Path, sync: &SyncConfig, analysis: Option<&AnalysisConfig>) {
    for line in format_config_lines(cache_path, sync, analysis) {
        println!("{line}");
    }
}

pub fn format_config_lines(
    cache_path: &Path,
    sync: &SyncConfig,
    analysis: Option<&AnalysisConfig>,
) -> Vec<String> {
    let mut lines = vec![
        format!("cache_path     = {}", cache_path.display()),
        format!("store_url      = {}", sync.store_url),
        format!("room_id        = {}", sync.room_id),
        format!("sync_interval  = {}s", sync.interval.as_secs()),
    ];

    match analysis {
        Some(analysis) => {
            lines.push("analysis_key   = [REDACTED]".to_string());
            lines.push(format!("analysis_url   = {}", analysis.base_url));
            lines.push(format!("analysis_model = {}", analysis.model));
        }
        None => lines.push("analysis_key   = (not set, analysis disabled)".to_string()),
    }

    lines
}
