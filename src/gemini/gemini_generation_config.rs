use crate::config::GenerationSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(rename = "maxOutputTokens")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GeminiGenerationConfig {
    /// `None` when nothing is set so the request omits `generationConfig`.
    pub fn from_settings(settings: &GenerationSettings) -> Option<Self> {
        if settings.temperature.is_none() && settings.max_output_tokens.is_none() {
            return None;
        }
        Some(GeminiGenerationConfig {
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }
}
