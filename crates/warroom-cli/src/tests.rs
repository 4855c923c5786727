use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use warroom_core::analysis::AnalysisResponse;
use warroom_core::config::{AnalysisConfig, SyncConfig};
use warroom_core::models::NewVoteRecord;
use warroom_core::network::ActorNetwork;
use warroom_core::state::{SyncPhase, SyncStatus, TriggerOutcome};
use warroom_core::sync::PassOutcome;
use warroom_core::VoteRecord;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::cli::{Cli, Commands, CompletionShell, ExportFormat, ModeArg};
use crate::commands::actors::format_network_lines;
use crate::commands::add::{run_add, AddArgs};
use crate::commands::analyze::{format_report_lines, run_analyze, AnalyzeArgs};
use crate::commands::card::run_card;
use crate::commands::common::{
    describe_outcome, format_relative_time, normalize_record_identifier, resolve_cache_path,
    resolve_record, truncate,
};
use crate::commands::completions::run_completions;
use crate::commands::config::format_config_lines;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::stats::build_stats;
use crate::commands::sync::run_sync;
use crate::commands::watch::{format_count_change, format_status_change};
use crate::error::CliError;

fn record(id: &str, name: &str, timestamp: i64) -> VoteRecord {
    VoteRecord {
        id: id.into(),
        actor_id: "guild".to_string(),
        voter_name: name.to_string(),
        id_number: "1020304050".to_string(),
        phone_number: "3101234567".to_string(),
        timestamp,
    }
}

fn draft(actor: &str) -> NewVoteRecord {
    NewVoteRecord {
        actor_id: actor.to_string(),
        voter_name: "Ana Pérez".to_string(),
        id_number: "1020".to_string(),
        phone_number: "3100000000".to_string(),
    }
}

fn add_args(actor: &str, no_sync: bool) -> AddArgs {
    AddArgs {
        draft: draft(actor),
        no_sync,
        analyze: false,
    }
}

fn analysis_config(base_url: String) -> AnalysisConfig {
    AnalysisConfig {
        api_key: "test-key".to_string(),
        base_url,
        model: "test-model".to_string(),
    }
}

fn seed_cache(dir: &Path, records: &[VoteRecord]) -> PathBuf {
    let cache_path = dir.join("records.json");
    std::fs::write(&cache_path, serde_json::to_string(records).unwrap()).unwrap();
    cache_path
}

fn read_cache(cache_path: &Path) -> Vec<VoteRecord> {
    serde_json::from_str(&std::fs::read_to_string(cache_path).unwrap()).unwrap()
}

fn sync_config(store_url: String) -> SyncConfig {
    SyncConfig {
        store_url,
        room_id: "room".to_string(),
        interval: Duration::from_secs(15),
    }
}

async fn empty_store() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/objects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "obj-1", "name": "room", "data": null })),
        )
        .mount(&server)
        .await;
    server
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m ago");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h ago");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d ago");
}

#[test]
fn normalize_record_identifier_rejects_empty() {
    assert!(matches!(
        normalize_record_identifier("   "),
        Err(CliError::EmptyRecordId)
    ));
    assert_eq!(normalize_record_identifier(" abc ").unwrap(), "abc");
}

#[test]
fn resolve_record_prefers_exact_then_unique_prefix() {
    let records = vec![
        record("0190-aaaa", "Ana", 3),
        record("0190-aabb", "Luis", 2),
        record("0190", "Exact", 1),
    ];

    assert_eq!(resolve_record("0190", &records).unwrap().voter_name, "Exact");
    assert_eq!(resolve_record("0190-aaa", &records).unwrap().voter_name, "Ana");
    assert!(matches!(
        resolve_record("0190-aa", &records),
        Err(CliError::AmbiguousRecordId(_))
    ));
    assert!(matches!(
        resolve_record("ffff", &records),
        Err(CliError::RecordNotFound(_))
    ));
}

#[test]
fn truncate_collapses_whitespace_and_shortens() {
    assert_eq!(truncate("  Ana   María ", 20), "Ana María");
    assert_eq!(truncate("abcdefghij", 6), "abc...");
}

#[test]
fn resolve_cache_path_prefers_explicit_path() {
    let explicit = PathBuf::from("/tmp/custom.json");
    assert_eq!(resolve_cache_path(Some(explicit.clone())), explicit);
}

#[test]
fn describe_outcome_covers_dropped_and_unavailable() {
    assert_eq!(
        describe_outcome(&TriggerOutcome::Dropped),
        "Sync already in progress; trigger skipped"
    );
    assert_eq!(
        describe_outcome(&TriggerOutcome::Completed(PassOutcome::Unavailable(
            "timeout".to_string()
        ))),
        "Sync unavailable, kept local records (timeout)"
    );
}

#[test]
fn format_count_change_reports_delta_and_progress() {
    assert_eq!(
        format_count_change(0, 201),
        "201 records (+201), 20.0% of 1005 target"
    );
    assert_eq!(
        format_count_change(5, 4),
        "4 records (-1), 0.4% of 1005 target"
    );
}

#[test]
fn format_config_lines_redacts_api_key() {
    let analysis = AnalysisConfig {
        api_key: "super-secret".to_string(),
        base_url: "https://example.com".to_string(),
        model: "m".to_string(),
    };
    let lines = format_config_lines(
        Path::new("/tmp/records.json"),
        &SyncConfig::default(),
        Some(&analysis),
    );
    let rendered = lines.join("\n");

    assert!(rendered.contains("room_id        = warroom-registry"));
    assert!(rendered.contains("sync_interval  = 15s"));
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("super-secret"));

    let disabled = format_config_lines(Path::new("x"), &SyncConfig::default(), None).join("\n");
    assert!(disabled.contains("analysis disabled"));
}

#[test]
fn format_report_lines_skips_empty_sections() {
    let report = AnalysisResponse {
        summary: "Resumen".to_string(),
        correlations: vec!["c1".to_string()],
        strategic_insights: Vec::new(),
    };
    assert_eq!(
        format_report_lines(&report),
        vec!["Resumen", "", "Correlations:", "  - c1"]
    );
}

#[test]
fn format_network_lines_lists_actors_then_relations() {
    let lines = format_network_lines(&ActorNetwork::builtin());
    assert_eq!(lines.len(), 21);
    assert!(lines[0].starts_with("guild"));
    assert!(lines[11].contains("==>"));
}

#[test]
fn build_stats_uses_voter_count() {
    let stats = build_stats(1200);
    assert_eq!(stats.progress.remaining, 0);
    assert_eq!(stats.metrics.voters, 1200);
    assert_eq!(stats.metrics.sectors, 10);
}

#[test]
fn cli_parses_add_and_defaults() {
    let cli = Cli::try_parse_from([
        "warroom",
        "--cache-path",
        "/tmp/r.json",
        "add",
        "--actor",
        "guild",
        "--name",
        "Ana",
        "--id-number",
        "1",
        "--phone",
        "2",
        "--no-sync",
    ])
    .unwrap();
    assert_eq!(cli.cache_path, Some(PathBuf::from("/tmp/r.json")));
    assert!(matches!(
        cli.command,
        Some(Commands::Add {
            no_sync: true,
            analyze: false,
            ..
        })
    ));

    let cli = Cli::try_parse_from(["warroom", "export"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            format: ExportFormat::Csv,
            output: None
        })
    ));

    let cli = Cli::try_parse_from(["warroom", "analyze", "--mode", "metric", "--metric", "x"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            mode: ModeArg::Metric,
            ..
        })
    ));
}

#[test]
fn run_completions_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("warroom.bash");

    run_completions(CompletionShell::Bash, Some(&output)).unwrap();

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.contains("warroom"));
}

#[tokio::test]
async fn run_add_without_sync_only_touches_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("nested").join("records.json");
    let config = sync_config("http://127.0.0.1:9".to_string());

    run_add(add_args("guild", true), &cache_path, &config, None)
        .await
        .unwrap();

    let cached = read_cache(&cache_path);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].voter_name, "Ana Pérez");
}

#[tokio::test]
async fn run_add_rejects_unknown_actor() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("records.json");
    let config = sync_config("http://127.0.0.1:9".to_string());

    let error = run_add(add_args("martians", true), &cache_path, &config, None)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::UnknownActor(_)));
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn run_add_creates_shared_registry_on_first_sync() {
    let server = empty_store().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("records.json");

    run_add(
        add_args("empleados", false),
        &cache_path,
        &sync_config(server.uri()),
        None,
    )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|request| request.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["name"], "room");
    assert_eq!(body["data"]["records"][0]["actorId"], "empleados");
    assert_eq!(read_cache(&cache_path).len(), 1);
}

#[tokio::test]
async fn run_sync_keeps_local_records_when_store_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let records = vec![record("a", "Ana", 100)];
    let cache_path = seed_cache(dir.path(), &records);

    run_sync(&cache_path, &sync_config(server.uri()))
        .await
        .unwrap();

    assert_eq!(read_cache(&cache_path), records);
}

#[tokio::test]
async fn run_delete_removes_local_only_record() {
    let server = empty_store().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = seed_cache(
        dir.path(),
        &[record("keep", "Ana", 200), record("drop-me", "Luis", 100)],
    );

    run_delete("drop", &cache_path, &sync_config(server.uri()))
        .await
        .unwrap();

    assert_eq!(read_cache(&cache_path), vec![record("keep", "Ana", 200)]);
}

#[test]
fn run_export_writes_suggested_file_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = seed_cache(dir.path(), &[record("a", "Ana", 1_700_000_000_000)]);
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    run_export(ExportFormat::Csv, Some(&out_dir), &cache_path).unwrap();

    let written = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert_eq!(written.len(), 1);
    let name = written[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("warroom-registry-"));
    assert!(name.ends_with(".csv"));

    let csv = std::fs::read_to_string(&written[0]).unwrap();
    assert!(csv.starts_with("ID number,Full name,Phone,Linked actor,Registered at"));
    assert!(csv.contains("Gremio Carbonero"));
}

#[test]
fn run_card_writes_svg_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = seed_cache(
        dir.path(),
        &[record("a1", "Ana Pérez", 2), record("b1", "Luis", 1)],
    );
    let output = dir.path().join("card.svg");

    run_card("a1", Some(&output), &cache_path).unwrap();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("¡Hola, ANA!"));
    assert!(svg.contains("¡YA SOMOS 2!"));
}

#[tokio::test]
async fn run_analyze_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let args = AnalyzeArgs {
        mode: ModeArg::General,
        actor: None,
        metric: None,
        json: false,
    };

    let error = run_analyze(args, &dir.path().join("records.json"), None)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::AnalysisNotConfigured));
}

#[test]
fn format_status_change_reports_finished_passes_only() {
    assert_eq!(format_status_change(&SyncStatus::default()), None);

    let syncing = SyncStatus {
        phase: SyncPhase::Syncing,
        last_outcome: Some(PassOutcome::Rewritten),
        last_synced_at: Some(1),
    };
    assert_eq!(format_status_change(&syncing), None);

    let degraded = SyncStatus {
        last_outcome: Some(PassOutcome::Unavailable("HTTP 503".to_string())),
        ..SyncStatus::default()
    };
    assert_eq!(
        format_status_change(&degraded).as_deref(),
        Some("Sync unavailable, kept local records (HTTP 503)")
    );
}

#[tokio::test]
async fn run_add_with_analyze_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("records.json");
    let args = AddArgs {
        analyze: true,
        ..add_args("guild", true)
    };

    let error = run_add(args, &cache_path, &sync_config("http://127.0.0.1:9".to_string()), None)
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::AnalysisNotConfigured));
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn run_add_with_analyze_reports_registration_impact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(body_string_contains("IMPACTO DE NUEVO REGISTRO"))
        .and(body_string_contains("Votante: Ana Pérez vinculada a Gremio Carbonero."))
        .and(body_string_contains("Progreso: 2 de 1005 votos."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{
                    "text": "{\"summary\":\"Impacto alto\",\"correlations\":[],\"strategicInsights\":[]}"
                }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = seed_cache(dir.path(), &[record("a", "Luis", 100)]);
    let args = AddArgs {
        analyze: true,
        ..add_args("guild", true)
    };

    run_add(
        args,
        &cache_path,
        &sync_config("http://127.0.0.1:9".to_string()),
        Some(&analysis_config(server.uri())),
    )
    .await
    .unwrap();

    assert_eq!(read_cache(&cache_path).len(), 2);
}

#[tokio::test]
async fn run_add_keeps_record_when_analysis_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("records.json");
    let args = AddArgs {
        analyze: true,
        ..add_args("guild", true)
    };

    run_add(
        args,
        &cache_path,
        &sync_config("http://127.0.0.1:9".to_string()),
        Some(&analysis_config(server.uri())),
    )
    .await
    .unwrap();

    let cached = read_cache(&cache_path);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].actor_id, "guild");
}
