//! Data models for War Room

mod actor;
mod record;

pub use actor::{ActorCategory, ActorNode, RelationLink, RelationType};
pub use record::{NewVoteRecord, RecordId, VoteRecord};
