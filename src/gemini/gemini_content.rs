use crate::gemini::GeminiPart;
use crate::models::{Message, Part};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>, // "user" or "model"
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user(parts: &[Part]) -> Self {
        GeminiContent {
            role: Some("user".to_string()),
            parts: parts.iter().map(GeminiPart::from).collect(),
        }
    }
}

/// Gemini knows only `user` and `model`; `assistant` is taken as `model`
/// and any other role is sent as `user`.
pub fn gemini_role(role: &str) -> &'static str {
    match role {
        "model" | "assistant" => "model",
        _ => "user",
    }
}

impl From<&Message> for GeminiContent {
    fn from(message: &Message) -> Self {
        GeminiContent {
            role: Some(gemini_role(&message.role).to_string()),
            parts: message.parts.iter().map(GeminiPart::from).collect(),
        }
    }
}
