use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiFinishReason {
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    ImageSafety,
    #[serde(other)]
    Other,
}

impl GeminiFinishReason {
    /// Reasons that mean the reply was withheld by a content filter.
    pub fn is_blocked(self) -> bool {
        matches!(
            self,
            GeminiFinishReason::Safety
                | GeminiFinishReason::Recitation
                | GeminiFinishReason::Blocklist
                | GeminiFinishReason::ProhibitedContent
                | GeminiFinishReason::Spii
                | GeminiFinishReason::ImageSafety
        )
    }
}

impl fmt::Display for GeminiFinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeminiFinishReason::FinishReasonUnspecified => "FINISH_REASON_UNSPECIFIED",
            GeminiFinishReason::Stop => "STOP",
            GeminiFinishReason::MaxTokens => "MAX_TOKENS",
            GeminiFinishReason::Safety => "SAFETY",
            GeminiFinishReason::Recitation => "RECITATION",
            GeminiFinishReason::Language => "LANGUAGE",
            GeminiFinishReason::Blocklist => "BLOCKLIST",
            GeminiFinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            GeminiFinishReason::Spii => "SPII",
            GeminiFinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            GeminiFinishReason::ImageSafety => "IMAGE_SAFETY",
            GeminiFinishReason::Other => "OTHER",
        };
        f.write_str(s)
    }
}
