use crate::error::ApiError;
use crate::routes::method_not_allowed;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's message; must be a non-empty string
    pub message: String,
}

impl ChatRequest {
    /// Accepts only a JSON object whose `message` is a non-empty string
    fn from_body(body: Result<Json<Value>, JsonRejection>) -> Result<Self, ApiError> {
        let Json(body) = body.map_err(|_| ApiError::InvalidMessage)?;
        match body.get("message") {
            Some(Value::String(message)) if !message.is_empty() => Ok(Self {
                message: message.clone(),
            }),
            _ => Err(ApiError::InvalidMessage),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply, with any tool result appended", body = ChatResponse),
        (status = 400, description = "Missing or malformed message", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = ChatRequest::from_body(body)?;

    let reply = willow::reply(
        state.provider.as_ref(),
        state.toolset.as_ref(),
        &state.chat,
        &request.message,
    )
    .await?;

    Ok(Json(ChatResponse { reply }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat).fallback(method_not_allowed))
        .with_state(state)
}
