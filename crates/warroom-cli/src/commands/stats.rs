use std::path::Path;

use serde::Serialize;
use warroom_core::network::{ActorNetwork, DashboardMetrics, ElectoralProgress};

use crate::commands::common::open_store;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub progress: ElectoralProgress,
    pub metrics: DashboardMetrics,
}

pub fn build_stats(voter_count: usize) -> StatsReport {
    StatsReport {
        progress: ElectoralProgress::new(voter_count),
        metrics: ActorNetwork::builtin().metrics(voter_count),
    }
}

pub fn run_stats(as_json: bool, cache_path: &Path) -> Result<(), CliError> {
    let store = open_store(cache_path);
    let report = build_stats(store.len());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let progress = report.progress;
    println!("Census:      {}", progress.potential_voters);
    println!("Registered:  {}", progress.current);
    println!("Target:      {}", progress.target);
    println!("Remaining:   {}", progress.remaining);
    println!("Progress:    {:.1}%", progress.percent);
    println!(
        "Network:     {} sectors, {} relations",
        report.metrics.sectors, report.metrics.relations
    );
    Ok(())
}
