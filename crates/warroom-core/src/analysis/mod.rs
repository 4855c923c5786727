//! Narrative "intelligence" reports from a hosted language model.
//!
//! The prompt is built locally from the actor network and the caller's
//! context; a [`NarrativeBackend`] turns it into JSON text. Failures never
//! reach the caller: [`AnalysisService::analyze`] returns `None` instead.

mod gemini;
mod prompt;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::models::VoteRecord;
use crate::network::ActorNetwork;

pub use gemini::GeminiBackend;
pub use prompt::build_prompt;

/// Entries kept per list in a report.
pub const MAX_LIST_ENTRIES: usize = 3;

/// Errors raised by a narrative backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Analysis response was empty")]
    EmptyResponse,

    #[error("Analysis response could not be parsed: {0}")]
    Parse(String),
}

/// What the report should focus on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    /// Loyalty levers of one selected actor
    ActorTactical,
    /// Effect of the most recent registration
    VoteRegistryImpact,
    /// Health of the whole network
    #[default]
    GeneralEcosystem,
    /// Whether the current pace reaches the target
    MetricProjection,
}

impl AnalysisMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActorTactical => "ACTOR_TACTICAL",
            Self::VoteRegistryImpact => "VOTE_REGISTRY_IMPACT",
            Self::GeneralEcosystem => "GENERAL_ECOSYSTEM",
            Self::MetricProjection => "METRIC_PROJECTION",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode plus whatever context that mode needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    /// Actor id, used by [`AnalysisMode::ActorTactical`]
    pub selected_actor: Option<String>,
    /// Used by [`AnalysisMode::VoteRegistryImpact`]
    pub last_record: Option<VoteRecord>,
    pub total_records: usize,
    /// Metric label, used by [`AnalysisMode::MetricProjection`]
    pub metric: Option<String>,
}

/// Structured report returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub summary: String,
    #[serde(default)]
    pub correlations: Vec<String>,
    #[serde(default)]
    pub strategic_insights: Vec<String>,
}

/// Parse model output into a report, keeping at most three entries per list.
pub fn parse_analysis(text: &str) -> Result<AnalysisResponse, AnalysisError> {
    let mut response: AnalysisResponse = serde_json::from_str(text.trim())
        .map_err(|error| AnalysisError::Parse(error.to_string()))?;
    response.correlations.truncate(MAX_LIST_ENTRIES);
    response.strategic_insights.truncate(MAX_LIST_ENTRIES);
    Ok(response)
}

/// Turns a prompt into the model's raw JSON text.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Backend identifier (model name) for logs.
    fn id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Builds prompts from the network and asks a backend for a report.
pub struct AnalysisService {
    network: ActorNetwork,
    backend: Box<dyn NarrativeBackend>,
}

impl fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisService")
            .field("backend", &self.backend.id())
            .finish_non_exhaustive()
    }
}

impl AnalysisService {
    pub fn new(network: ActorNetwork, backend: impl NarrativeBackend + 'static) -> Self {
        Self {
            network,
            backend: Box::new(backend),
        }
    }

    /// Service backed by the hosted Gemini API.
    pub fn gemini(network: ActorNetwork, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Ok(Self::new(network, GeminiBackend::new(config)?))
    }

    /// Request a report. `None` means no analysis is available right now.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Option<AnalysisResponse> {
        let prompt = build_prompt(&self.network, request);
        tracing::debug!(
            "Requesting {} analysis from {}",
            request.mode,
            self.backend.id()
        );

        let result = match self.backend.generate(&prompt).await {
            Ok(text) => parse_analysis(&text),
            Err(error) => Err(error),
        };

        match result {
            Ok(response) => Some(response),
            Err(error) => {
                tracing::warn!("{} analysis unavailable: {}", request.mode, error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone, Default)]
    struct ScriptedBackend {
        reply: Option<String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NarrativeBackend for ScriptedBackend {
        fn id(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| AnalysisError::Request("offline".to_string()))
        }
    }

    #[test]
    fn parse_analysis_truncates_lists() {
        let text = r#"{
            "summary": "Red estable",
            "correlations": ["a", "b", "c", "d"],
            "strategicInsights": ["x", "y", "z", "w", "v"]
        }"#;

        let parsed = parse_analysis(text).unwrap();
        assert_eq!(parsed.summary, "Red estable");
        assert_eq!(parsed.correlations, vec!["a", "b", "c"]);
        assert_eq!(parsed.strategic_insights, vec!["x", "y", "z"]);
    }

    #[test]
    fn parse_analysis_rejects_non_json() {
        assert!(matches!(
            parse_analysis("not json"),
            Err(AnalysisError::Parse(_))
        ));
    }

    #[test]
    fn mode_uses_wire_names() {
        let value = serde_json::to_value(AnalysisMode::VoteRegistryImpact).unwrap();
        assert_eq!(value, "VOTE_REGISTRY_IMPACT");
        assert_eq!(AnalysisMode::default(), AnalysisMode::GeneralEcosystem);
    }

    #[tokio::test]
    async fn analyze_returns_parsed_report() {
        let backend = ScriptedBackend {
            reply: Some(
                r#"{"summary":"ok","correlations":["c"],"strategicInsights":["s"]}"#.to_string(),
            ),
            ..ScriptedBackend::default()
        };
        let prompts = backend.prompts.clone();
        let service = AnalysisService::new(ActorNetwork::builtin(), backend);

        let report = service.analyze(&AnalysisRequest::default()).await.unwrap();

        assert_eq!(report.summary, "ok");
        assert_eq!(prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn analyze_yields_none_on_backend_failure() {
        let service = AnalysisService::new(ActorNetwork::builtin(), ScriptedBackend::default());
        assert_eq!(service.analyze(&AnalysisRequest::default()).await, None);
    }

    #[tokio::test]
    async fn analyze_yields_none_on_malformed_output() {
        let backend = ScriptedBackend {
            reply: Some("```json nope".to_string()),
            ..ScriptedBackend::default()
        };
        let service = AnalysisService::new(ActorNetwork::builtin(), backend);
        assert_eq!(service.analyze(&AnalysisRequest::default()).await, None);
    }
}
