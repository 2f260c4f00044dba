//! LLM client: the single point of entry for all text-generation calls.
//!
//! No other module talks to a model provider directly. Services build a
//! `PromptRequest`, hand it to `LlmClient::call_json`, and get back a typed,
//! schema-checked value.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub mod openai;
pub mod prompts;

pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(serde_json::Error),

    #[error("Response does not match the expected schema: {0}")]
    Schema(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the model answered with well-formed JSON of the wrong shape.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, LlmError::Schema(_))
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            // Valid JSON that failed to map onto the target type.
            serde_json::error::Category::Data => LlmError::Schema(e.to_string()),
            _ => LlmError::Parse(e),
        }
    }
}

/// One prompt configuration submitted to a provider.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The provider capability: submit a prompt configuration, receive text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &PromptRequest<'_>) -> Result<String, LlmError>;
}

/// A value the model is asked to produce. `validate` runs after deserialization
/// and rejects structurally valid JSON that breaks the documented contract.
pub trait StructuredOutput: DeserializeOwned {
    fn validate(&self) -> Result<(), String>;
}

/// Cloneable handle over the configured `TextGenerator`.
#[derive(Clone)]
pub struct LlmClient {
    generator: Arc<dyn TextGenerator>,
}

impl LlmClient {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Calls the model and deserializes its text reply into `T`.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: StructuredOutput>(
        &self,
        request: &PromptRequest<'_>,
    ) -> Result<T, LlmError> {
        let raw = self.generator.generate(request).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&raw);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        let value: T = serde_json::from_str(text).map_err(|e| {
            warn!("LLM reply could not be decoded: {e}");
            LlmError::from(e)
        })?;
        value.validate().map_err(|violation| {
            warn!("LLM reply failed schema validation: {violation}");
            LlmError::Schema(violation)
        })?;

        debug!("LLM reply decoded ({} chars)", text.len());
        Ok(value)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
