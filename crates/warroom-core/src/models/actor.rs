//! Actor network model

use serde::{Deserialize, Serialize};

/// Role an actor plays in the local economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorCategory {
    Core,
    Supplier,
    Consumption,
    Political,
}

impl ActorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "CORE",
            Self::Supplier => "SUPPLIER",
            Self::Consumption => "CONSUMPTION",
            Self::Political => "POLITICAL",
        }
    }
}

/// An economic or political sector in the influence network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorNode {
    pub id: String,
    pub name: String,
    pub category: ActorCategory,
    pub description: String,
    /// Direct employees plus owners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_count: Option<u32>,
}

/// Kind of edge between two actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    PrimaryFlow,
    SecondaryFlow,
    VotingInfluence,
}

/// Directed relation between two actors, by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationType,
    pub label: String,
}
