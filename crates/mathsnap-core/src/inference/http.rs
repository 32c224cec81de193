//! Blocking HTTP backend for OpenAI-compatible endpoints.

use std::time::Duration;

use super::{ChatRequest, ChatResponse, InferenceBackend, InferenceError};
use crate::config::InferenceConfig;

/// Sends chat requests to `{base_url}/chat/completions` with bearer auth.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        if config.api_key.trim().is_empty() {
            return Err(InferenceError::Config("API key is not set".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: completions_url(&config.base_url),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl InferenceBackend for HttpBackend {
    fn complete(&self, request: &ChatRequest) -> Result<Option<String>, InferenceError> {
        log::debug!(
            "POST {} model={} images={}",
            self.endpoint,
            request.model,
            request.image_count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                log::error!("inference request to {} failed: {}", self.endpoint, e);
                InferenceError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| InferenceError::Transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            log::error!("inference endpoint returned {}", status);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Extract `choices[0].message.content` from a completion body.
pub fn parse_completion(body: &str) -> Result<Option<String>, InferenceError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
    Ok(response.into_content())
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
