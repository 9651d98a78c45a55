use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, warn};

pub const SYSTEM_PROMPT: &str = "你是一个观测云(Guance Cloud)的专家助手。你的目标是帮助用户理解监控、日志、链路追踪和DQL(Data Query Language)。保持回答简洁、专业且易懂，并推广统一可观测性的好处。如果被问及查询，请提供伪代码或DQL示例。";

/// Returned when the service answers but carries no usable text.
pub const NO_INSIGHT_FALLBACK: &str = "暂时无法生成见解。";

/// Returned for transport failures, non-2xx statuses and undecodable bodies.
pub const UNREACHABLE_FALLBACK: &str = "我目前无法连接到 DeepSeek 知识库，请检查网络或稍后再试。";

#[derive(Clone, PartialEq, Eq)]
pub struct InsightConfig {
    api_url: String,
    api_key: String,
    model: String,
    timeout_ms: Option<u64>,
}

impl InsightConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_ms: None,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }
}

impl fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("failed to reach chat-completion service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("chat-completion request timed out after {0} ms")]
    Timeout(u64),

    #[error("chat-completion request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode chat-completion response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("chat-completion response body was JSON null")]
    NullBody,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, query: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            stream: false,
        }
    }
}

/// Turns free-text questions into answers about monitoring, logging, tracing and DQL.
///
/// `generate_insight` never fails: every error collapses into one of the two
/// fallback strings, so callers can display the result directly.
#[derive(Debug, Clone)]
pub struct InsightClient {
    http: reqwest::Client,
    config: Arc<InsightConfig>,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: InsightConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub async fn generate_insight(&self, query: &str) -> String {
        match self.request_insight(query).await {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                warn!(model = %self.config.model, "chat-completion response carried no content");
                NO_INSIGHT_FALLBACK.to_string()
            }
            Err(err) => {
                error!(error = %err, "insight request failed");
                UNREACHABLE_FALLBACK.to_string()
            }
        }
    }

    async fn request_insight(&self, query: &str) -> Result<Option<String>, InsightError> {
        match self.config.timeout_ms {
            Some(ms) => timeout(Duration::from_millis(ms), self.exchange(query))
                .await
                .map_err(|_| InsightError::Timeout(ms))?,
            None => self.exchange(query).await,
        }
    }

    /// Sends the request and reads the whole body; the configured timeout covers both.
    async fn exchange(&self, query: &str) -> Result<Option<String>, InsightError> {
        let payload = ChatCompletionRequest::new(&self.config.model, query);
        debug!(
            model = %self.config.model,
            query_len = query.len(),
            "sending insight request"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(InsightError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            return Err(InsightError::Status { status, body });
        }

        let body = response.text().await.map_err(InsightError::Transport)?;
        let document: Value = serde_json::from_str(&body).map_err(InsightError::Decode)?;
        if document.is_null() {
            return Err(InsightError::NullBody);
        }
        Ok(first_choice_content(&document))
    }
}

/// `choices[0].message.content`, if it is a non-empty string.
fn first_choice_content(document: &Value) -> Option<String> {
    document["choices"][0]["message"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .map(str::to_owned)
}
