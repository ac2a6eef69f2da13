use crate::gemini::{GeminiContent, GeminiGenerationConfig, GeminiPart};
use crate::models::{Message, Part};
use serde::{Deserialize, Serialize};

/// Body of a `generateContent` call. The whole conversation is replayed on
/// every call; the REST API keeps no session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiRequest {
    pub fn new(
        history: &[Message],
        turn: &[Part],
        system_instruction: Option<&str>,
        generation_config: Option<GeminiGenerationConfig>,
    ) -> Self {
        let mut contents: Vec<GeminiContent> = history.iter().map(GeminiContent::from).collect();
        contents.push(GeminiContent::user(turn));

        let system_instruction = system_instruction
            .filter(|s| !s.trim().is_empty())
            .map(|s| GeminiContent { role: None, parts: vec![GeminiPart::text(s)] });

        GeminiRequest { contents, system_instruction, generation_config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DecodedImage;
    use image::ImageFormat;
    use serde_json::json;

    #[test]
    fn test_history_then_turn() {
        let history = vec![
            Message::new("user", vec![Part::from("hi")]),
            Message::new("assistant", vec![Part::from("hello")]),
        ];
        let req = GeminiRequest::new(&history, &[Part::from("next")], None, None);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "hi" }] },
                    { "role": "model", "parts": [{ "text": "hello" }] },
                    { "role": "user", "parts": [{ "text": "next" }] }
                ]
            })
        );
    }

    #[test]
    fn test_image_part_becomes_inline_data() {
        let image = DecodedImage { bytes: vec![0x89, 0x50, 0x4E, 0x47], format: ImageFormat::Png };
        let turn = vec![Part::Image(image), Part::from("what is on screen?")];
        let req = GeminiRequest::new(&[], &turn, None, None);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(v["contents"][0]["parts"][0]["inlineData"]["data"], "iVBORw==");
        assert_eq!(v["contents"][0]["parts"][1]["text"], "what is on screen?");
    }

    #[test]
    fn test_system_instruction_and_generation_config() {
        let gen_config = GeminiGenerationConfig { temperature: Some(0.2), max_output_tokens: None };
        let req = GeminiRequest::new(&[], &[Part::from("x")], Some("Only talk about apps."), Some(gen_config));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["system_instruction"], json!({ "parts": [{ "text": "Only talk about apps." }] }));
        assert_eq!(v["generationConfig"], json!({ "temperature": 0.2 }));
    }

    #[test]
    fn test_blank_system_instruction_is_dropped() {
        let req = GeminiRequest::new(&[], &[Part::from("x")], Some("  \n"), None);
        assert!(req.system_instruction.is_none());
    }
}
