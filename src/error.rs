use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the outbound model call. `Display` output is what ends up in
/// the `errorMessage` field, so every variant renders to a short line.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("prompt blocked by the model: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyReply,

    #[error("failed to parse model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model call timed out after {0}s")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Please supply the prompt")]
    MissingPrompt,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingPrompt | RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
}
