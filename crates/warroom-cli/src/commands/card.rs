use std::path::Path;

use warroom_core::export::{render_thank_you_card, suggested_card_file_name};

use crate::commands::common::{open_store, resolve_record, write_output};
use crate::error::CliError;

pub fn run_card(id: &str, output_path: Option<&Path>, cache_path: &Path) -> Result<(), CliError> {
    let store = open_store(cache_path);
    let record = resolve_record(id, store.records())?;

    let svg = render_thank_you_card(&record.voter_name, store.len());
    write_output(
        output_path,
        &suggested_card_file_name(&record.voter_name),
        svg.trim_end(),
    )
}
