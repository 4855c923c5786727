use std::path::Path;

use warroom_core::analysis::{AnalysisMode, AnalysisRequest, AnalysisResponse};
use warroom_core::config::{AnalysisConfig, SyncConfig};
use warroom_core::models::NewVoteRecord;
use warroom_core::network::ActorNetwork;
use warroom_core::VoteRecord;

use crate::commands::analyze::{print_report, request_report};
use crate::commands::common::{describe_outcome, open_scheduler, open_store};
use crate::error::CliError;

pub struct AddArgs {
    pub draft: NewVoteRecord,
    pub no_sync: bool,
    /// Follow the registration with an impact report
    pub analyze: bool,
}

pub async fn run_add(
    args: AddArgs,
    cache_path: &Path,
    config: &SyncConfig,
    analysis: Option<&AnalysisConfig>,
) -> Result<(), CliError> {
    let AddArgs {
        draft,
        no_sync,
        analyze,
    } = args;

    let network = ActorNetwork::builtin();
    let actor_id = draft.actor_id.trim();
    if network.actor(actor_id).is_none() {
        return Err(CliError::UnknownActor(actor_id.to_string()));
    }
    let analysis = if analyze {
        Some(analysis.ok_or(CliError::AnalysisNotConfigured)?)
    } else {
        None
    };

    let (record, total_records) = if no_sync {
        let record = draft.into_record()?;
        let mut store = open_store(cache_path);
        store.append(record.clone())?;
        println!("{}", record.id);
        (record, store.len())
    } else {
        let scheduler = open_scheduler(cache_path, config)?;
        let (record, outcome) = scheduler.add_record(draft).await?;
        println!("{}", record.id);
        eprintln!("{}", describe_outcome(&outcome));
        (record, scheduler.records().await.len())
    };

    if let Some(analysis) = analysis {
        let report = match registration_report(network, analysis, record, total_records).await {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!("Registration analysis failed: {}", error);
                None
            }
        };
        print_report(report.as_ref(), false)?;
    }
    Ok(())
}

/// Impact report for a just-registered voter.
pub async fn registration_report(
    network: ActorNetwork,
    config: &AnalysisConfig,
    record: VoteRecord,
    total_records: usize,
) -> Result<Option<AnalysisResponse>, CliError> {
    let request = AnalysisRequest {
        mode: AnalysisMode::VoteRegistryImpact,
        selected_actor: None,
        last_record: Some(record),
        total_records,
        metric: None,
    };
    request_report(network, config, &request).await
}
