use crate::classifier::DecodedImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl From<&DecodedImage> for GeminiInlineData {
    fn from(image: &DecodedImage) -> Self {
        GeminiInlineData {
            mime_type: image.mime_type().to_string(),
            data: image.to_base64(),
        }
    }
}
