use crate::error::ModelError;
use crate::gemini::{GeminiCandidate, GeminiPromptFeedback, GeminiUsage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(rename = "modelVersion")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(rename = "promptFeedback")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiResponse {
    /// Concatenated answer text of the first candidate.
    pub fn text(&self) -> Result<String, ModelError> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_ref()) {
            return Err(ModelError::Blocked(reason.to_string()));
        }

        let candidate = self.candidates.first().ok_or(ModelError::EmptyReply)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.answer_text())
            .collect();

        if text.is_empty() {
            return match candidate.finish_reason {
                Some(reason) if reason.is_blocked() => {
                    Err(ModelError::Blocked(format!("finish reason {}", reason)))
                }
                _ => Err(ModelError::EmptyReply),
            };
        }
        Ok(text)
    }
}
