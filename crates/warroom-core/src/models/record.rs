//! Vote record model

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::unix_millis_now;

/// Opaque identifier of a vote record.
///
/// Fresh ids are UUID v7 strings, but any non-empty string read from a replica
/// is accepted as-is so records created by other clients round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new unique record ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A captured voter registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// Client-assigned unique identifier, never reused
    pub id: RecordId,
    /// Actor (sector) the voter is tied to
    pub actor_id: String,
    pub voter_name: String,
    /// National ID number
    pub id_number: String,
    pub phone_number: String,
    /// Creation timestamp (Unix ms), display/sort key only
    pub timestamp: i64,
}

/// Registration form input, before an id and timestamp are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoteRecord {
    pub actor_id: String,
    pub voter_name: String,
    pub id_number: String,
    pub phone_number: String,
}

impl NewVoteRecord {
    /// Trim every field and reject the draft if any of them ends up empty.
    pub fn validate(self) -> Result<Self> {
        let draft = Self {
            actor_id: self.actor_id.trim().to_string(),
            voter_name: self.voter_name.trim().to_string(),
            id_number: self.id_number.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        };

        for (field, value) in [
            ("actor", &draft.actor_id),
            ("voter name", &draft.voter_name),
            ("ID number", &draft.id_number),
            ("phone number", &draft.phone_number),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidInput(format!("{field} must not be empty")));
            }
        }

        Ok(draft)
    }

    /// Validate the draft and stamp it with a fresh id and the current time.
    pub fn into_record(self) -> Result<VoteRecord> {
        let draft = self.validate()?;
        Ok(VoteRecord {
            id: RecordId::new(),
            actor_id: draft.actor_id,
            voter_name: draft.voter_name,
            id_number: draft.id_number,
            phone_number: draft.phone_number,
            timestamp: unix_millis_now(),
        })
    }
}
