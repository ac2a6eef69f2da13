use crate::classifier::classify_parts;
use crate::config::Config;
use crate::error::{ModelError, RelayError};
use crate::llm_client::{ChatModel, ChatSession};
use crate::models::{ChatRequest, Part, Prompt, ResponseEnvelope, WelcomeResponse};
use crate::request_id::inject_request_id;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

pub const WELCOME_MESSAGE: &str = "Welcome to the server of Gen AI Tester!";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<dyn ChatModel>,
}

pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse { message: WELCOME_MESSAGE.to_string() })
}

#[axum_macros::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let envelope = match payload {
        Ok(Json(request)) => match handle_chat(&state, request).await {
            Ok(text) => ResponseEnvelope::ok(text),
            Err(err) => {
                warn!("chat request failed: {}", err);
                ResponseEnvelope::from_error(&err)
            }
        },
        Err(rejection) => {
            let err = RelayError::InvalidBody(rejection.body_text());
            info!("{}", err);
            ResponseEnvelope::from_error(&err)
        }
    };

    let status = if state.config.mirror_status_code {
        StatusCode::from_u16(envelope.body.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    } else {
        StatusCode::OK
    };
    (status, Json(envelope)).into_response()
}

/// Validate, classify, call the model. Returns the reply text.
pub async fn handle_chat(state: &AppState, request: ChatRequest) -> Result<String, RelayError> {
    let prompt = match request.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(RelayError::MissingPrompt),
    };

    let profile = &state.config.chat;
    let mut messages = request.messages;
    let turn = match prompt {
        Prompt::Text(text) => vec![Part::Text(text)],
        Prompt::Parts(mut parts) => {
            if profile.supports_image_parts {
                let images = classify_parts(&mut parts);
                debug!("prompt: {} parts, {} images", parts.len(), images);
            }
            parts
        }
    };
    if profile.supports_image_parts {
        let images: usize = messages.iter_mut().map(|m| classify_parts(&mut m.parts)).sum();
        debug!("history: {} messages, {} images", messages.len(), images);
    }

    let mut session = ChatSession::start(messages, profile.system_instruction.clone());
    let timeout = state.config.request_timeout();
    let reply = tokio::time::timeout(timeout, session.send_message(state.model.as_ref(), turn))
        .await
        .map_err(|_| ModelError::Timeout(timeout.as_secs()))??;

    info!("model {} replied with {} chars", state.model.model_name(), reply.text.len());
    Ok(reply.text)
}
