use std::path::Path;

use chrono::Utc;
use warroom_core::export::{self, render_registry_export, suggested_export_file_name};
use warroom_core::network::ActorNetwork;

use crate::cli::ExportFormat;
use crate::commands::common::{open_store, write_output};
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    cache_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(cache_path);
    let format: export::ExportFormat = format.into();
    let rendered = render_registry_export(store.records(), &ActorNetwork::builtin(), format)?;
    let suggested = suggested_export_file_name(format, Utc::now().timestamp_millis());

    write_output(output_path, &suggested, rendered.trim_end())
}
