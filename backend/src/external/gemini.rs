//! Gemini recommendation client
//!
//! Sends an environment snapshot to the Gemini text generation API and turns
//! the reply into plant recommendations. The model is asked for strict JSON
//! but does not always comply, so replies go through a strict parse and then
//! a salvage parse of the first balanced `{...}` block. Every failure is
//! classified and carries the local fallback recommendation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use shared::{AiErrorKind, EnvironmentSnapshot, ProviderFailure, ProviderOutcome};

use crate::config::GeminiConfig;
use crate::error::{AppError, AppResult};

/// Anything that can turn a snapshot into recommendations
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, snapshot: &EnvironmentSnapshot) -> ProviderOutcome;
}

/// Client for the Gemini `generateText` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: Option<String>,
    endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTextRequest {
    prompt: TextPrompt,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
}

impl GeminiClient {
    /// Create a new client; the request timeout comes from `config`
    pub fn new(config: &GeminiConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.api_key().map(str::to_string),
            endpoint: format!(
                "{}/models/{}:generateText",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// Request recommendations for an arbitrary JSON payload.
    ///
    /// Payload and credential checks run before any network traffic.
    pub async fn request_recommendation(&self, payload: &Value) -> ProviderOutcome {
        if let Err(reason) = validate_payload(payload) {
            return ProviderOutcome::failure(AiErrorKind::InvalidPayload, reason);
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return ProviderOutcome::failure(AiErrorKind::NoApiKey, "GEMINI_API_KEY not configured");
        };

        let request = GenerateTextRequest {
            prompt: TextPrompt {
                text: build_prompt(payload),
            },
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        let response = match self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_timeout() {
                    "AI request timed out"
                } else {
                    "AI request failed"
                };
                tracing::error!("Gemini AI request failed: {}", e);
                let status = e.status().map(|s| s.as_u16());
                return ProviderFailure::new(AiErrorKind::from_status(status), message)
                    .with_status(status)
                    .with_details(Value::String(e.to_string()))
                    .into();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Gemini AI response could not be read: {}", e);
                return ProviderFailure::new(AiErrorKind::RequestFailed, "AI request failed")
                    .with_status(Some(status.as_u16()))
                    .with_details(Value::String(e.to_string()))
                    .into();
            }
        };
        let envelope = serde_json::from_str(&body).unwrap_or(Value::String(body));

        if !status.is_success() {
            tracing::error!(
                "Gemini AI request failed. status={} body={}",
                status.as_u16(),
                envelope
            );
            return ProviderFailure::new(
                AiErrorKind::from_status(Some(status.as_u16())),
                "AI request failed",
            )
            .with_status(Some(status.as_u16()))
            .with_details(envelope)
            .into();
        }

        interpret_envelope(envelope)
    }
}

#[async_trait]
impl RecommendationProvider for GeminiClient {
    async fn recommend(&self, snapshot: &EnvironmentSnapshot) -> ProviderOutcome {
        match serde_json::to_value(snapshot) {
            Ok(payload) => self.request_recommendation(&payload).await,
            Err(e) => ProviderOutcome::failure(AiErrorKind::InvalidPayload, e.to_string()),
        }
    }
}

/// Check that a payload is an object carrying `pollution_value` or `aqi`
pub fn validate_payload(payload: &Value) -> Result<(), &'static str> {
    let Some(fields) = payload.as_object() else {
        return Err("payload missing or not an object");
    };
    let present = |key: &str| fields.get(key).is_some_and(|v| !v.is_null());
    if !present("pollution_value") && !present("aqi") {
        return Err("missing pollution_value or aqi");
    }
    Ok(())
}

/// Prompt embedding the payload and the reply schema
pub fn build_prompt(payload: &Value) -> String {
    format!(
        "ENVIRONMENT: {}\n\n\
         Return ONLY valid JSON with: {{ \"total_plants\": int, \"plants\": [ {{ \"name\",\"type\",\"why\",\"how_many\",\"placement\",\"care?\",\"confidence\" }} ], \"notes?\" }}. No extra text.",
        payload
    )
}

/// Text content of a provider reply envelope.
///
/// Looks at the first candidate's `content`, then its `output`, then a
/// top-level `result`. Each may be a string, an object with `text`, or an
/// object with `parts[0].text`.
pub fn extract_text(envelope: &Value) -> Option<String> {
    envelope
        .pointer("/candidates/0/content")
        .and_then(text_of)
        .or_else(|| envelope.pointer("/candidates/0/output").and_then(text_of))
        .or_else(|| envelope.get("result").and_then(text_of))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => value
            .get("text")
            .and_then(text_of)
            .or_else(|| value.pointer("/parts/0/text").and_then(text_of)),
        _ => None,
    }
}

/// Parse reply text as JSON, salvaging the first balanced `{...}` block on
/// failure
pub fn parse_reply(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    first_object(text)
}

/// First JSON value starting at the first `{`, ignoring whatever follows it
fn first_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Value>()
        .next()?
        .ok()
}

/// Turn a successful provider envelope into an outcome
pub fn interpret_envelope(envelope: Value) -> ProviderOutcome {
    let Some(text) = extract_text(&envelope) else {
        return ProviderFailure::new(
            AiErrorKind::NoContent,
            "No textual content in Gemini response",
        )
        .with_details(envelope)
        .into();
    };

    match parse_reply(&text) {
        Some(result) => ProviderOutcome::Success { result },
        None => ProviderFailure::new(
            AiErrorKind::ParseFailed,
            "Could not parse JSON from Gemini response",
        )
        .with_raw(text)
        .with_details(envelope)
        .into(),
    }
}
