use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::error::{LifeError, LifeResult};
use crate::models::{AssistantReply, AssistantRequest, ChatContext, SuggestedAction};
use crate::utils::config::AssistantConfig;

/// Anything that can answer a chat turn. The HTTP backend is the real one;
/// tests plug in scripted replies.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn send(&self, message: &str, context: &ChatContext) -> LifeResult<AssistantReply>;
}

pub struct HttpAssistant {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl HttpAssistant {
    pub fn new(config: AssistantConfig) -> LifeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LifeError::BackendUnavailable(format!("http client setup failed: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl Assistant for HttpAssistant {
    async fn send(&self, message: &str, context: &ChatContext) -> LifeResult<AssistantReply> {
        let request = AssistantRequest {
            message,
            context: Some(context),
        };

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LifeError::BackendUnavailable(format!("request timed out: {}", e))
            } else {
                LifeError::BackendUnavailable(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LifeError::BackendUnavailable(format!("reading body failed: {}", e)))?;
        if !status.is_success() {
            return Err(LifeError::BackendUnavailable(format!(
                "assistant returned {}: {}",
                status, body
            )));
        }

        parse_reply(&body)
    }
}

/// `reply` must be a string; `action` is optional and dropped when it does
/// not look like an action object.
pub fn parse_reply(body: &str) -> LifeResult<AssistantReply> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LifeError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    let reply = value
        .get("reply")
        .and_then(Value::as_str)
        .ok_or_else(|| LifeError::InvalidResponse("missing string field `reply`".to_string()))?
        .trim()
        .to_string();

    let action = value
        .get("action")
        .filter(|a| a.is_object())
        .and_then(|a| serde_json::from_value::<SuggestedAction>(a.clone()).ok())
        .filter(|a| !a.action_type.trim().is_empty());

    Ok(AssistantReply { reply, action })
}
