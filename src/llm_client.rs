use crate::config::Config;
use crate::error::ModelError;
use crate::gemini::{GeminiGenerationConfig, GeminiRequest, GeminiResponse};
use crate::models::{Message, Part};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub text: String,
}

/// A hosted chat model: takes the conversation so far plus a new user turn
/// and answers with text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, session: &ChatSession, turn: &[Part]) -> Result<ModelReply, ModelError>;
}

/// Conversation state for one exchange. Lives only as long as the request.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<Message>,
    system_instruction: Option<String>,
}

impl ChatSession {
    pub fn start(history: Vec<Message>, system_instruction: Option<String>) -> Self {
        Self { history, system_instruction }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Sends `content` as the next user turn. On success both the turn and
    /// the reply are appended to the history; on failure it is left as is.
    pub async fn send_message(
        &mut self,
        model: &dyn ChatModel,
        content: Vec<Part>,
    ) -> Result<ModelReply, ModelError> {
        let reply = model.generate(self, &content).await?;
        self.history.push(Message::new("user", content));
        self.history.push(Message::new("model", vec![Part::Text(reply.text.clone())]));
        Ok(reply)
    }
}

#[derive(Debug)]
pub struct GeminiClient {
    http_client: Arc<reqwest::Client>,
    api_base: String,
    api_key: String,
    model: String,
    generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiClient {
    pub fn new(http_client: Arc<reqwest::Client>, config: &Config, api_key: String) -> Self {
        Self {
            http_client,
            api_base: config.api_base.clone(),
            api_key,
            model: config.model_id().to_string(),
            generation_config: GeminiGenerationConfig::from_settings(&config.generation),
        }
    }

    pub fn with_generation_config(mut self, generation_config: Option<GeminiGenerationConfig>) -> Self {
        self.generation_config = generation_config;
        self
    }

    fn build_target_url(&self) -> String {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        if self.api_base.ends_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, session: &ChatSession, turn: &[Part]) -> Result<ModelReply, ModelError> {
        let request = GeminiRequest::new(
            session.history(),
            turn,
            session.system_instruction(),
            self.generation_config.clone(),
        );
        let target_url = self.build_target_url();

        info!("Forwarding request to: {}", target_url);
        debug!(
            "contents: {}, system instruction: {}",
            request.contents.len(),
            request.system_instruction.is_some()
        );

        let response = self
            .http_client
            .post(&target_url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Gemini request failed with status {}: {}", status, body);
            return Err(ModelError::Status { status: status.as_u16(), body: error_summary(&body) });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        if let Some(usage) = &parsed.usage_metadata {
            debug!("token usage: {:?}", usage.total_token_count);
        }
        Ok(ModelReply { text: parsed.text()? })
    }
}

/// Google error bodies nest the useful line under `error.message`.
fn error_summary(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    let flat = message.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, 300)
}

pub fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…", &s[..idx]),
    }
}
