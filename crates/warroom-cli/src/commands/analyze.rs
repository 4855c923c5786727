use std::path::Path;

use warroom_core::analysis::{AnalysisRequest, AnalysisResponse, AnalysisService};
use warroom_core::config::AnalysisConfig;
use warroom_core::network::ActorNetwork;

use crate::cli::ModeArg;
use crate::commands::common::open_store;
use crate::error::CliError;

pub struct AnalyzeArgs {
    pub mode: ModeArg,
    pub actor: Option<String>,
    pub metric: Option<String>,
    pub json: bool,
}

pub async fn run_analyze(
    args: AnalyzeArgs,
    cache_path: &Path,
    config: Option<&AnalysisConfig>,
) -> Result<(), CliError> {
    let config = config.ok_or(CliError::AnalysisNotConfigured)?;
    let network = ActorNetwork::builtin();

    if let Some(actor) = args.actor.as_deref() {
        if network.actor(actor).is_none() {
            return Err(CliError::UnknownActor(actor.to_string()));
        }
    }

    let store = open_store(cache_path);
    let request = AnalysisRequest {
        mode: args.mode.into(),
        selected_actor: args.actor,
        last_record: store.records().first().cloned(),
        total_records: store.len(),
        metric: args.metric,
    };

    let report = request_report(network, config, &request).await?;
    print_report(report.as_ref(), args.json)
}

/// `Ok(None)` when the model gave no usable report.
pub async fn request_report(
    network: ActorNetwork,
    config: &AnalysisConfig,
    request: &AnalysisRequest,
) -> Result<Option<AnalysisResponse>, CliError> {
    let service = AnalysisService::gemini(network, config)?;
    Ok(service.analyze(request).await)
}

pub fn print_report(report: Option<&AnalysisResponse>, json: bool) -> Result<(), CliError> {
    let Some(report) = report else {
        println!("No analysis available.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in format_report_lines(report) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_report_lines(report: &AnalysisResponse) -> Vec<String> {
    let mut lines = vec![report.summary.clone()];

    for (title, entries) in [
        ("Correlations", &report.correlations),
        ("Strategic insights", &report.strategic_insights),
    ] {
        if entries.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{title}:"));
        lines.extend(entries.iter().map(|entry| format!("  - {entry}")));
    }

    lines
}
