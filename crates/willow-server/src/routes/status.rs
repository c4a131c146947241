use axum::{routing::get, Router};

/// Liveness probe
#[utoipa::path(get, path = "/status",
    responses((status = 200, description = "Server is running", body = String))
)]
pub async fn status() -> &'static str {
    "ok"
}

pub fn routes() -> Router {
    Router::new().route("/status", get(status))
}
