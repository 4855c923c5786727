use warroom_core::models::RelationType;
use warroom_core::network::ActorNetwork;

use crate::error::CliError;

pub fn run_actors(as_json: bool) -> Result<(), CliError> {
    let network = ActorNetwork::builtin();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&network)?);
        return Ok(());
    }

    for line in format_network_lines(&network) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_network_lines(network: &ActorNetwork) -> Vec<String> {
    let mut lines = network
        .actors
        .iter()
        .map(|actor| {
            let base_count = actor
                .base_count
                .map_or_else(String::new, |count| count.to_string());
            format!(
                "{:<14}  {:<24}  {:<12}  {base_count:>5}  {}",
                actor.id,
                actor.name,
                actor.category.as_str(),
                actor.description
            )
        })
        .collect::<Vec<_>>();

    lines.push(String::new());
    lines.extend(network.relations.iter().map(|relation| {
        let arrow = match relation.kind {
            RelationType::PrimaryFlow => "==>",
            RelationType::SecondaryFlow => "-->",
            RelationType::VotingInfluence => "~~>",
        };
        format!(
            "{:<14} {arrow} {:<14}  {}",
            relation.source, relation.target, relation.label
        )
    }));

    lines
}
