//! Built-in actor network and dashboard figures.

use serde::Serialize;

use crate::models::{ActorCategory, ActorNode, RelationLink, RelationType};

/// Registration goal for the campaign.
pub const REGISTRATION_TARGET: u32 = 1005;

/// Eligible voters in the municipality.
pub const POTENTIAL_VOTERS: u32 = 30_226;

const ACTORS: &[(&str, &str, ActorCategory, &str, u32)] = &[
    (
        "guild",
        "Gremio Carbonero",
        ActorCategory::Core,
        "Empresas y minas núcleo de la economía local.",
        500,
    ),
    (
        "dotaciones",
        "Empresas de Dotaciones",
        ActorCategory::Supplier,
        "Uniformes y seguridad industrial.",
        45,
    ),
    (
        "talleres",
        "Talleres Mecánicos",
        ActorCategory::Supplier,
        "Mantenimiento de maquinaria pesada.",
        80,
    ),
    (
        "transporte",
        "Transporte y Logística",
        ActorCategory::Supplier,
        "Flota de carga pesada para carbón.",
        120,
    ),
    (
        "empleados",
        "Empleados y Familias",
        ActorCategory::Consumption,
        "El puente clave entre economía y votos.",
        1500,
    ),
    (
        "supermercados",
        "Comercio Local",
        ActorCategory::Consumption,
        "Supermercados, carnicerías y tiendas.",
        300,
    ),
    (
        "gasolineras",
        "Estaciones de Servicio",
        ActorCategory::Consumption,
        "Combustible para operación y movilidad.",
        60,
    ),
    (
        "rep_camara",
        "Eduard Triana Rincón",
        ActorCategory::Political,
        "Representante a la Cámara por Boyacá.",
        1,
    ),
    (
        "alcaldia",
        "Alcaldía Municipal",
        ActorCategory::Political,
        "Poder ejecutivo local.",
        150,
    ),
    (
        "concejales",
        "Concejales",
        ActorCategory::Political,
        "Influencia normativa local.",
        13,
    ),
];

const RELATIONS: &[(&str, &str, RelationType, &str)] = &[
    ("guild", "empleados", RelationType::PrimaryFlow, "Salarios"),
    ("guild", "dotaciones", RelationType::PrimaryFlow, "Compras B2B"),
    ("guild", "talleres", RelationType::PrimaryFlow, "Mantenimiento"),
    ("guild", "transporte", RelationType::PrimaryFlow, "Logística"),
    ("empleados", "supermercados", RelationType::SecondaryFlow, "Consumo Hogar"),
    ("empleados", "gasolineras", RelationType::SecondaryFlow, "Movilidad"),
    ("empleados", "rep_camara", RelationType::VotingInfluence, "Voto Directo"),
    ("guild", "rep_camara", RelationType::VotingInfluence, "Lobby/Apoyo"),
    ("rep_camara", "guild", RelationType::VotingInfluence, "Defensa Gremial"),
    ("supermercados", "rep_camara", RelationType::VotingInfluence, "Voto Comercial"),
];

/// The actor/relation graph every client works against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorNetwork {
    pub actors: Vec<ActorNode>,
    pub relations: Vec<RelationLink>,
}

impl ActorNetwork {
    /// The deployment's fixed catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let actors = ACTORS
            .iter()
            .map(|&(id, name, category, description, base_count)| ActorNode {
                id: id.to_string(),
                name: name.to_string(),
                category,
                description: description.to_string(),
                base_count: Some(base_count),
            })
            .collect();

        let relations = RELATIONS
            .iter()
            .map(|&(source, target, kind, label)| RelationLink {
                source: source.to_string(),
                target: target.to_string(),
                kind,
                label: label.to_string(),
            })
            .collect();

        Self { actors, relations }
    }

    #[must_use]
    pub fn actor(&self, id: &str) -> Option<&ActorNode> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Display name for an actor id, if it is in the catalog.
    #[must_use]
    pub fn actor_name(&self, id: &str) -> Option<&str> {
        self.actor(id).map(|actor| actor.name.as_str())
    }

    /// Relations touching `id` on either end.
    pub fn relations_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RelationLink> + 'a {
        self.relations
            .iter()
            .filter(move |relation| relation.source == id || relation.target == id)
    }

    #[must_use]
    pub fn metrics(&self, voter_count: usize) -> DashboardMetrics {
        DashboardMetrics {
            voters: voter_count,
            relations: self.relations.len(),
            sectors: self.actors.len(),
        }
    }
}

impl Default for ActorNetwork {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Headline counters shown above the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub voters: usize,
    pub relations: usize,
    pub sectors: usize,
}

/// Progress of the registration drive against its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralProgress {
    pub current: usize,
    pub target: u32,
    pub potential_voters: u32,
    /// Capped at 100
    pub percent: f64,
    /// Floored at 0
    pub remaining: u32,
}

impl ElectoralProgress {
    #[must_use]
    pub fn new(current: usize) -> Self {
        let current_u32 = u32::try_from(current).unwrap_or(u32::MAX);
        let percent = (f64::from(current_u32) / f64::from(REGISTRATION_TARGET) * 100.0).min(100.0);

        Self {
            current,
            target: REGISTRATION_TARGET,
            potential_voters: POTENTIAL_VOTERS,
            percent,
            remaining: REGISTRATION_TARGET.saturating_sub(current_u32),
        }
    }
}
