use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

/// Table read by the connectivity check
pub const USERS_TABLE: &str = "users";

#[utoipa::path(
    get,
    path = "/test-supabase",
    responses(
        (status = 200, description = "Every row of the users table"),
        (status = 500, description = "Query failed or Supabase is not configured", body = ErrorResponse)
    )
)]
pub async fn test_supabase(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let datastore = state
        .datastore
        .as_ref()
        .ok_or(ApiError::DataStoreUnavailable)?;

    let rows = datastore.select_all(USERS_TABLE).await?;
    tracing::debug!(rows = rows.len(), "supabase query succeeded");
    Ok(Json(rows))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/test-supabase", get(test_supabase))
        .with_state(state)
}
