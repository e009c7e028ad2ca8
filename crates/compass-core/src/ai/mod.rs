//! AI-assisted content generation for wizard steps.
//!
//! The wizard sends a [`CompletionRequest`] (a prompt built from the current
//! plan plus a JSON schema describing the expected response) to a
//! [`CompletionService`]. The service answers with free-form JSON which
//! [`map_response`] folds into a [`WizardUpdate`](crate::models::WizardUpdate)
//! through a fixed per-step key mapping. Anything missing or ill-typed in the
//! response is skipped, so a partial answer never erases existing content.

mod http;
mod mapping;
mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use http::HttpCompletionService;
pub use mapping::{
    map_response, mappings_for_step, FieldMapping, MappedResponse, FIELD_MAPPINGS,
};
pub use prompts::{prompt_for_step, response_schema, SYSTEM_PROMPT};

use crate::error::Result;

/// Request sent to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_prompt: String,
    /// JSON schema the response `data` should follow
    pub response_json_schema: Value,
}

/// Response returned by the completion service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl CompletionResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Message describing why the response cannot be applied, if it cannot.
    pub fn failure_reason(&self) -> Option<String> {
        if !self.success {
            return Some(
                self.error
                    .clone()
                    .unwrap_or_else(|| "AI generation failed".to_string()),
            );
        }
        if self.data.is_none() {
            return Some("AI response carried no data".to_string());
        }
        None
    }
}

/// A service that turns prompts into structured JSON.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn response_tolerates_missing_fields() {
        let response: CompletionResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(response.success);
        assert_eq!(
            response.failure_reason().as_deref(),
            Some("AI response carried no data")
        );

        let response: CompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.failure_reason().as_deref(), Some("AI generation failed"));
    }

    #[test]
    fn successful_response_has_no_failure() {
        let response = CompletionResponse::ok(json!({"vision_en": "Leading"}));
        assert!(response.failure_reason().is_none());
        assert_eq!(
            CompletionResponse::failed("quota").failure_reason().as_deref(),
            Some("quota")
        );
    }
}
