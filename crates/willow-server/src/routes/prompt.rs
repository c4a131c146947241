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
pub struct PromptRequest {
    pub prompt: String,
}

impl PromptRequest {
    fn from_body(body: Result<Json<Value>, JsonRejection>) -> Result<Self, ApiError> {
        let Json(body) = body.map_err(|_| ApiError::PromptRequired)?;
        match body.get("prompt") {
            Some(Value::String(prompt)) if !prompt.is_empty() => Ok(Self {
                prompt: prompt.clone(),
            }),
            _ => Err(ApiError::PromptRequired),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromptResponse {
    pub response: String,
}

#[utoipa::path(
    post,
    path = "/prompt",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Completion text", body = PromptResponse),
        (status = 500, description = "Missing prompt or upstream failure", body = ErrorResponse)
    )
)]
pub async fn prompt(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PromptResponse>, ApiError> {
    let request = PromptRequest::from_body(body)?;
    let response =
        willow::completion(state.provider.as_ref(), &state.prompt, &request.prompt).await?;
    Ok(Json(PromptResponse { response }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/prompt", post(prompt).fallback(method_not_allowed))
        .with_state(state)
}
