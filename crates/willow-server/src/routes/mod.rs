// Export route modules
pub mod chat;
pub mod prompt;
pub mod status;
pub mod supabase;

use axum::Router;

use crate::error::ApiError;

// Function to configure all routes
pub fn configure(state: crate::state::AppState) -> Router {
    Router::new()
        .merge(status::routes())
        .merge(chat::routes(state.clone()))
        .merge(prompt::routes(state.clone()))
        .merge(supabase::routes(state))
}

/// Method fallback shared by the JSON routes
pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
