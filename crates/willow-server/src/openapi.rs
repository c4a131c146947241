use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::chat::{ChatRequest, ChatResponse};
use crate::routes::prompt::{PromptRequest, PromptResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "willowd",
        description = "Chat and data API behind the Willow AI dashboard"
    ),
    paths(
        crate::routes::chat::chat,
        crate::routes::prompt::prompt,
        crate::routes::supabase::test_supabase,
        crate::routes::status::status,
    ),
    components(schemas(ChatRequest, ChatResponse, PromptRequest, PromptResponse, ErrorResponse))
)]
pub struct ApiDoc;

/// Render the OpenAPI document as pretty JSON
pub fn generate_schema() -> serde_json::Result<String> {
    ApiDoc::openapi().to_pretty_json()
}
