use crate::classifier::DecodedImage;
use crate::error::RelayError;
use serde::{Deserialize, Serialize};

/// One unit of message content. Requests only ever carry strings, which
/// arrive as `Text`; the classifier may later swap a part for `Image`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum Part {
    Text(String),
    Image(DecodedImage),
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Text(text)
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Message {
    pub fn new(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self { role: role.into(), parts }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Parts(Vec<Part>),
}

impl Prompt {
    pub fn is_empty(&self) -> bool {
        match self {
            Prompt::Text(text) => text.is_empty(),
            Prompt::Parts(parts) => parts.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub prompt: Option<Prompt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl Default for EnvelopeHeaders {
    fn default() -> Self {
        Self { content_type: "application/json".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBody {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Fixed-shape wrapper returned for every `/chat` call, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub headers: EnvelopeHeaders,
    pub body: EnvelopeBody,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            headers: EnvelopeHeaders::default(),
            body: EnvelopeBody {
                status_code: 200,
                message: message.into(),
                error_message: None,
            },
        }
    }

    pub fn from_error(err: &RelayError) -> Self {
        Self {
            headers: EnvelopeHeaders::default(),
            body: EnvelopeBody {
                status_code: err.status_code().as_u16(),
                message: String::new(),
                error_message: Some(err.to_string()),
            },
        }
    }
}
