use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use willow::datastore::DataStoreError;
use willow::providers::ProviderError;
use willow::ChatError;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const INVALID_MESSAGE: &str = "Invalid message";
pub const CHAT_FAILED: &str = "Failed to fetch response from ChatGPT";
pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const SUPABASE_NOT_CONFIGURED: &str = "Supabase is not configured";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid message")]
    InvalidMessage,
    #[error("Chat failed: {0}")]
    Chat(#[from] ChatError),
    #[error("Prompt is required")]
    PromptRequired,
    #[error("{0}")]
    Prompt(#[from] ProviderError),
    #[error("Supabase is not configured")]
    DataStoreUnavailable,
    #[error("{0}")]
    DataStore(#[from] DataStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            Self::InvalidMessage => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Chat(err) => {
                // The upstream detail stays in the server log
                tracing::error!("Chat API error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED.to_string())
            }
            Self::Prompt(err) => {
                tracing::error!("Prompt completion error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::DataStore(err) => {
                tracing::error!("Supabase error: {:?}", err);
                let error = match err {
                    DataStoreError::Query(message) => message.clone(),
                    DataStoreError::Request(_) => INTERNAL_SERVER_ERROR.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, error)
            }
            Self::PromptRequired | Self::DataStoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Helper function to format environment variable names
pub(crate) fn to_env_var(field_path: &str) -> String {
    format!("WILLOW_{}", field_path.replace('.', "__").to_uppercase())
}
