use std::path::Path;

use warroom_core::network::ActorNetwork;

use crate::commands::common::{format_record_lines, open_store, record_to_list_item, RecordListItem};
use crate::error::CliError;

pub fn run_list(limit: usize, as_json: bool, cache_path: &Path) -> Result<(), CliError> {
    let store = open_store(cache_path);
    let network = ActorNetwork::builtin();
    let records = &store.records()[..limit.min(store.len())];

    if as_json {
        let json_items = records
            .iter()
            .map(|record| record_to_list_item(record, &network))
            .collect::<Vec<RecordListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if records.is_empty() {
        println!("No voters registered yet.");
    } else {
        for line in format_record_lines(records, &network) {
            println!("{line}");
        }
    }

    Ok(())
}
