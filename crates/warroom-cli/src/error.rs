use std::io;

use thiserror::Error;
use warroom_core::analysis::AnalysisError;
use warroom_core::remote::SyncUnavailable;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] warroom_core::Error),
    #[error(transparent)]
    Remote(#[from] SyncUnavailable),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Record ID cannot be empty")]
    EmptyRecordId,
    #[error("Record not found for id/prefix: {0}")]
    RecordNotFound(String),
    #[error("{0}")]
    AmbiguousRecordId(String),
    #[error("Unknown actor '{0}'. Run `warroom actors` to list valid ids.")]
    UnknownActor(String),
    #[error("Analysis is not configured. Set GEMINI_API_KEY (or API_KEY) to enable it.")]
    AnalysisNotConfigured,
}
