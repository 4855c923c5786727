//! Registry export and thank-you card rendering.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::VoteRecord;
use crate::network::ActorNetwork;

/// Label used when a record points at an actor missing from the catalog.
pub const UNDEFINED_ACTOR: &str = "Undefined";

const CSV_HEADER: [&str; 5] = [
    "ID number",
    "Full name",
    "Phone",
    "Linked actor",
    "Registered at",
];

/// Spreadsheet export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// One exported registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id_number: String,
    pub full_name: String,
    pub phone: String,
    pub linked_actor: String,
    pub registered_at: String,
}

/// Resolve a record into its export row.
#[must_use]
pub fn record_to_export_row(record: &VoteRecord, network: &ActorNetwork) -> ExportRow {
    ExportRow {
        id_number: record.id_number.clone(),
        full_name: record.voter_name.clone(),
        phone: record.phone_number.clone(),
        linked_actor: network
            .actor_name(&record.actor_id)
            .unwrap_or(UNDEFINED_ACTOR)
            .to_string(),
        registered_at: format_timestamp(record.timestamp),
    }
}

/// Render records as CSV with a header row.
#[must_use]
pub fn render_csv_export(records: &[VoteRecord], network: &ActorNetwork) -> String {
    let mut output = String::new();
    push_csv_line(&mut output, CSV_HEADER);

    for record in records {
        let row = record_to_export_row(record, network);
        push_csv_line(
            &mut output,
            [
                row.id_number.as_str(),
                row.full_name.as_str(),
                row.phone.as_str(),
                row.linked_actor.as_str(),
                row.registered_at.as_str(),
            ],
        );
    }

    output
}

/// Render records as a pretty-printed JSON array of rows.
pub fn render_json_export(
    records: &[VoteRecord],
    network: &ActorNetwork,
) -> serde_json::Result<String> {
    let rows = records
        .iter()
        .map(|record| record_to_export_row(record, network))
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&rows)
}

pub fn render_registry_export(
    records: &[VoteRecord],
    network: &ActorNetwork,
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Csv => Ok(render_csv_export(records, network)),
        ExportFormat::Json => render_json_export(records, network),
    }
}

/// Default export file name, dated by `timestamp_ms` (UTC).
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    let date = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .format("%Y-%m-%d");
    format!("warroom-registry-{date}.{}", format.extension())
}

/// Standalone SVG thank-you card for a newly registered voter.
#[must_use]
pub fn render_thank_you_card(voter_name: &str, voter_count: usize) -> String {
    let first_name = voter_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();
    let first_name = escape_xml(&first_name);
    let full_name = escape_xml(voter_name.trim());

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="640" viewBox="0 0 500 640">"##
    );
    let _ = writeln!(
        svg,
        r##"  <rect x="4" y="4" width="492" height="632" rx="32" fill="#ffffff" stroke="#facc15" stroke-width="8"/>"##
    );
    let _ = writeln!(
        svg,
        r##"  <rect x="8" y="8" width="484" height="170" rx="28" fill="#1e3a8a"/>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="90" text-anchor="middle" font-family="sans-serif" font-size="30" font-weight="900" fill="#ffffff">¡QUÉ BUENO TENERTE AQUÍ!</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="130" text-anchor="middle" font-family="sans-serif" font-size="14" font-weight="700" fill="#38bdf8">ERES PARTE DE ESTA FAMILIA</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="260" text-anchor="middle" font-family="sans-serif" font-size="40" font-weight="900" fill="#1e3a8a">¡YA SOMOS {voter_count}!</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="300" text-anchor="middle" font-family="sans-serif" font-size="16" font-weight="900" fill="#0ea5e9">¡CADA VEZ MÁS CERCA DE LA META!</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="390" text-anchor="middle" font-family="sans-serif" font-size="30" font-weight="900" fill="#1e3a8a">¡Hola, {first_name}!</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="430" text-anchor="middle" font-family="sans-serif" font-size="18" fill="#475569">¡Qué alegría que ya estés en el equipo!</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="500" text-anchor="middle" font-family="sans-serif" font-size="14" fill="#64748b">{full_name}</text>"##
    );
    let _ = writeln!(
        svg,
        r##"  <rect x="8" y="580" width="484" height="48" fill="#facc15"/>"##
    );
    let _ = writeln!(
        svg,
        r##"  <text x="250" y="610" text-anchor="middle" font-family="sans-serif" font-size="13" font-weight="900" fill="#1e3a8a">#UNIDOS POR TI BOYACÁ</text>"##
    );
    svg.push_str("</svg>\n");
    svg
}

/// File name for a thank-you card: whitespace runs become `_`, path-unsafe
/// characters are dropped.
#[must_use]
pub fn suggested_card_file_name(voter_name: &str) -> String {
    let stem = voter_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '.'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        "warroom-thanks.svg".to_string()
    } else {
        format!("warroom-thanks-{stem}.svg")
    }
}

fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn push_csv_line<'a>(output: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            output.push(',');
        }
        output.push_str(&escape_csv(field));
    }
    output.push('\n');
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
