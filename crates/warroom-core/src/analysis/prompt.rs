//! Prompt construction.

use std::fmt::Write as _;

use super::{AnalysisMode, AnalysisRequest};
use crate::network::{ActorNetwork, REGISTRATION_TARGET};

/// Build the full prompt for `request`.
///
/// A mode whose context is missing (no selected actor, no last record, no
/// metric label, or an unknown actor id) falls back to the general prompt.
#[must_use]
pub fn build_prompt(network: &ActorNetwork, request: &AnalysisRequest) -> String {
    let mut prompt = context_section(network, request);

    let actors = serde_json::to_string(&network.actors).unwrap_or_default();
    let relations = serde_json::to_string(&network.relations).unwrap_or_default();

    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "ESTRUCTURA DE RED:");
    let _ = writeln!(prompt, "ACTORES: {actors}");
    let _ = writeln!(prompt, "RELACIONES: {relations}");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Genera un informe en JSON:");
    let _ = writeln!(prompt, "1. summary: Análisis crítico.");
    let _ = writeln!(prompt, "2. correlations: 3 tendencias.");
    let _ = writeln!(prompt, "3. strategicInsights: 3 acciones.");

    prompt
}

fn context_section(network: &ActorNetwork, request: &AnalysisRequest) -> String {
    let mut section = String::new();

    match request.mode {
        AnalysisMode::ActorTactical => {
            if let Some(actor) = request
                .selected_actor
                .as_deref()
                .and_then(|id| network.actor(id))
            {
                let _ = writeln!(section, "MODO: ANÁLISIS TÁCTICO DE ACTOR");
                let _ = writeln!(section, "Actor: \"{}\"", actor.name);
                let _ = writeln!(section, "Categoría: {}", actor.category.as_str());
                let _ = writeln!(
                    section,
                    "Analiza cómo este actor asegura la lealtad política para Eduard Triana."
                );
                return section;
            }
        }
        AnalysisMode::VoteRegistryImpact => {
            if let Some(record) = &request.last_record {
                let actor = network
                    .actor_name(&record.actor_id)
                    .unwrap_or(record.actor_id.as_str());
                let _ = writeln!(section, "MODO: IMPACTO DE NUEVO REGISTRO");
                let _ = writeln!(section, "Votante: {} vinculada a {actor}.", record.voter_name);
                let _ = writeln!(
                    section,
                    "Progreso: {} de {REGISTRATION_TARGET} votos.",
                    request.total_records
                );
                return section;
            }
        }
        AnalysisMode::MetricProjection => {
            if let Some(metric) = request.metric.as_deref() {
                let _ = writeln!(section, "MODO: PROYECCIÓN MÉTRICA ESTRATÉGICA");
                let _ = writeln!(section, "Métrica Analizada: {metric}");
                let _ = writeln!(
                    section,
                    "Datos actuales: {} registros vs Meta de {REGISTRATION_TARGET}.",
                    request.total_records
                );
                let _ = writeln!(
                    section,
                    "Analiza si la velocidad de captación y la red de influencia actual permiten llegar a la meta."
                );
                return section;
            }
        }
        AnalysisMode::GeneralEcosystem => {}
    }

    let _ = writeln!(section, "MODO: ANÁLISIS GENERAL DE COBERTURA");
    let _ = writeln!(section, "Analiza la salud de la red de Eduard Triana en Paipa.");
    section
}
