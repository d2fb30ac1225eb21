//! OpenAI-compatible chat-completions adapter for the LLM gateway port.
//!
//! Works against any endpoint speaking the `/chat/completions` wire
//! shape (OpenAI itself, vLLM, LiteLLM proxies, Ollama). One request per
//! `send`; the deliberation engine supplies its own per-call timeout, so
//! the client-level timeout here is only a safety net.

use async_trait::async_trait;
use circle_application::{GatewayError, LlmGateway, LlmSession};
use circle_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(300);

/// Gateway adapter for OpenAI-compatible HTTP endpoints
pub struct OpenAiCompatGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatGateway {
    /// Create a gateway against a base URL (e.g. `https://api.openai.com/v1`)
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.create_session_with_system_prompt(model, "").await
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            client: self.client.clone(),
            url: self.completions_url(),
            api_key: self.api_key.clone(),
            model: model.clone(),
            system_prompt: (!system_prompt.is_empty()).then(|| system_prompt.to_string()),
        }))
    }
}

struct OpenAiSession {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: Model,
    system_prompt: Option<String>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        let body = ChatRequest {
            model: self.model.as_str(),
            messages,
            temperature: 0.2,
        };

        debug!("POST {} model={}", self.url, self.model);
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(GatewayError::ModelNotAvailable(format!(
                    "{} ({})",
                    self.model, status
                )));
            }
            return Err(GatewayError::RequestFailed(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GatewayError::RequestFailed("response carried no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let gateway = OpenAiCompatGateway::new("http://localhost:8000/v1/", None).unwrap();
        assert_eq!(
            gateway.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_wire_shape() {
        let body = ChatRequest {
            model: "gpt-5.2",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "judge the text",
                },
                ChatMessage {
                    role: "user",
                    content: "the text",
                },
            ],
            temperature: 0.2,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-5.2");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "the text");
    }

    #[tokio::test]
    async fn test_session_carries_system_prompt() {
        let gateway = OpenAiCompatGateway::new("http://localhost:8000/v1", None).unwrap();
        let model: Model = "gpt-5.2".parse().unwrap();
        let session = gateway
            .create_session_with_system_prompt(&model, "be skeptical")
            .await
            .unwrap();
        assert_eq!(session.model().as_str(), "gpt-5.2");
    }
}
