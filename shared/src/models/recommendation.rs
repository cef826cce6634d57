//! Plant recommendation models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recommended plant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    pub name: String,
    #[serde(rename = "type")]
    pub plant_type: String,
    pub why: String,
    pub how_many: u32,
    pub placement: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub care: Vec<String>,
    /// Provider confidence in [0, 1]
    pub confidence: f64,
}

/// Recommendation list returned to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub total_plants: u32,
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecommendationResult {
    /// The fixed local recommendation used whenever the provider fails
    pub fn fallback() -> Self {
        Self {
            total_plants: 1,
            plants: vec![Plant {
                name: "Spider Plant".to_string(),
                plant_type: "indoor".to_string(),
                why: "Tolerant and filters light pollutants".to_string(),
                how_many: 1,
                placement: "indoor".to_string(),
                care: vec![
                    "moderate light".to_string(),
                    "keep soil slightly moist".to_string(),
                ],
                confidence: 0.6,
            }],
            notes: Some("Using local fallback due to AI unavailability.".to_string()),
        }
    }

    /// Plant count matches the list and every confidence lies in [0, 1]
    pub fn is_consistent(&self) -> bool {
        self.total_plants as usize == self.plants.len()
            && self
                .plants
                .iter()
                .all(|p| (0.0..=1.0).contains(&p.confidence))
    }
}

/// Why the provider could not produce a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AiErrorKind {
    InvalidPayload,
    NoApiKey,
    NoContent,
    ParseFailed,
    BadRequest,
    AuthError,
    RequestFailed,
}

impl AiErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            AiErrorKind::InvalidPayload => "invalid_payload",
            AiErrorKind::NoApiKey => "no_api_key",
            AiErrorKind::NoContent => "no_content",
            AiErrorKind::ParseFailed => "parse_failed",
            AiErrorKind::BadRequest => "bad_request",
            AiErrorKind::AuthError => "auth_error",
            AiErrorKind::RequestFailed => "request_failed",
        }
    }

    /// Classify a failed provider call by its HTTP status, if it got one
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400) => AiErrorKind::BadRequest,
            Some(401) => AiErrorKind::AuthError,
            _ => AiErrorKind::RequestFailed,
        }
    }
}

impl std::fmt::Display for AiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A provider failure with the fallback shown in its place
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub kind: AiErrorKind,
    pub message: String,
    pub fallback: RecommendationResult,
    /// Upstream HTTP status, when the provider answered
    pub status: Option<u16>,
    /// Reply text that could not be parsed
    pub raw: Option<String>,
    /// Provider envelope or error body
    pub details: Option<Value>,
}

impl ProviderFailure {
    pub fn new(kind: AiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fallback: RecommendationResult::fallback(),
            status: None,
            raw: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Result of one recommendation request.
///
/// A successful reply is kept as the JSON the provider produced; it is not
/// checked against [`RecommendationResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success { result: Value },
    Failure(ProviderFailure),
}

impl ProviderOutcome {
    pub fn failure(kind: AiErrorKind, message: impl Into<String>) -> Self {
        ProviderOutcome::Failure(ProviderFailure::new(kind, message))
    }

    pub fn error_kind(&self) -> Option<AiErrorKind> {
        match self {
            ProviderOutcome::Success { .. } => None,
            ProviderOutcome::Failure(failure) => Some(failure.kind),
        }
    }
}

impl From<ProviderFailure> for ProviderOutcome {
    fn from(failure: ProviderFailure) -> Self {
        ProviderOutcome::Failure(failure)
    }
}
