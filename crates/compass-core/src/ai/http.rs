use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, CompletionService};
use crate::{
    config::AiConfig,
    error::{CompassError, Result},
};

/// Completion service reached over HTTP.
///
/// Posts the request as JSON to the configured endpoint and expects a
/// `{success, data, error}` JSON body back.
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionService {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| CompassError::Configuration {
                message: "AI endpoint is not configured".to_string(),
            })?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        log::debug!("Requesting AI completion from {}", self.endpoint);
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompassError::ai(format!(
                "completion service returned {status}: {}",
                body.trim()
            )));
        }

        Ok(response.json::<CompletionResponse>().await?)
    }
}
