//! HTTP delegate for an OpenAI-compatible chat-completions service.
//!
//! Each call is one blocking request:
//!
//! ```text
//! POST {base_url}/chat/completions
//! Authorization: Bearer {key}
//!
//! {"model": ..., "temperature": ...,
//!  "messages": [{"role": "system", "content": persona},
//!               {"role": "user",   "content": prompt}]}
//! ```
//!
//! and the reply is `choices[0].message.content`.

use std::{sync::Arc, time::Duration};

use serde_json::{json, Value};
use tracing::debug;

use autoshop_contracts::{error::DelegateError, error::ShopResult, stage::StageId};
use autoshop_core::{Delegate, StageDelegates};

use crate::config::{ServiceConfig, ShopConfig};

/// One stage's view of the chat service.
///
/// Holds a shared `ureq::Agent`, so building one per stage costs nothing
/// beyond the persona string.
pub struct ChatDelegate {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    persona: String,
}

impl ChatDelegate {
    pub fn new(
        agent: ureq::Agent,
        service: &ServiceConfig,
        api_key: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            endpoint: format!("{}/chat/completions", service.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: service.model.clone(),
            temperature: service.temperature,
            timeout_secs: service.timeout_secs,
            persona: persona.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The JSON body sent for `prompt`.
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": self.persona },
                { "role": "user", "content": prompt },
            ],
        })
    }

    fn map_error(&self, err: ureq::Error) -> DelegateError {
        match err {
            ureq::Error::StatusCode(code) => DelegateError::Status { code },
            ureq::Error::Timeout(_) => DelegateError::Timeout {
                seconds: self.timeout_secs,
            },
            other => DelegateError::Transport {
                reason: other.to_string(),
            },
        }
    }
}

impl Delegate for ChatDelegate {
    fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError> {
        debug!(endpoint = %self.endpoint, model = %self.model, "sending chat completion");

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(self.request_body(prompt))
            .map_err(|e| self.map_error(e))?;

        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| DelegateError::Malformed {
                reason: format!("response body is not JSON: {}", e),
            })?;

        extract_reply(&body)
    }
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn extract_reply(body: &Value) -> Result<String, DelegateError> {
    let content = body
        .pointer("/choices/0/message/content")
        .ok_or_else(|| DelegateError::Malformed {
            reason: "response has no choices[0].message.content".to_string(),
        })?;

    let text = content.as_str().ok_or_else(|| DelegateError::Malformed {
        reason: format!("message content is not a string: {}", content),
    })?;

    if text.trim().is_empty() {
        return Err(DelegateError::EmptyReply);
    }
    Ok(text.to_string())
}

/// Build one `ChatDelegate` per stage, sharing a single HTTP agent.
///
/// Returns `ShopError::Config` if the API key is not set.
pub fn stage_delegates(config: &ShopConfig) -> ShopResult<StageDelegates> {
    let api_key = config.api_key()?;
    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.service.timeout_secs)))
            .build(),
    );

    Ok(StageDelegates::from_fn(|stage: StageId| {
        Arc::new(ChatDelegate::new(
            agent.clone(),
            &config.service,
            api_key.clone(),
            config.persona(stage),
        ))
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use autoshop_contracts::error::DelegateError;

    use super::{extract_reply, ChatDelegate};
    use crate::config::ServiceConfig;

    fn delegate(base_url: &str) -> ChatDelegate {
        let service = ServiceConfig {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            ..Default::default()
        };
        ChatDelegate::new(ureq::Agent::new_with_defaults(), &service, "k", "You are a mechanic.")
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            delegate("https://api.example.com/v1/").endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            delegate("http://localhost:8080/v1").endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_carries_persona_then_prompt() {
        let body = delegate("http://x").request_body("Scan the vehicle");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a mechanic.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Scan the vehicle");
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = json!({
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Replace brake pads." } },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" } },
            ],
        });
        assert_eq!(extract_reply(&body).unwrap(), "Replace brake pads.");
    }

    #[test]
    fn missing_choices_is_malformed() {
        let err = extract_reply(&json!({ "error": "rate limited" })).unwrap_err();
        assert!(matches!(err, DelegateError::Malformed { .. }));
        assert!(!err.is_transient());

        let err = extract_reply(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, DelegateError::Malformed { .. }));
    }

    #[test]
    fn non_string_content_is_malformed() {
        let body = json!({ "choices": [{ "message": { "content": null } }] });
        assert!(matches!(
            extract_reply(&body).unwrap_err(),
            DelegateError::Malformed { .. }
        ));
    }

    #[test]
    fn blank_content_is_empty_reply() {
        let body = json!({ "choices": [{ "message": { "content": "  \n" } }] });
        assert_eq!(extract_reply(&body).unwrap_err(), DelegateError::EmptyReply);
    }
}
