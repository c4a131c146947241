use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolsetError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to parse response: {0}")]
    ResponseParseError(String),
}

impl From<reqwest::Error> for ToolsetError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ToolsetError::ResponseParseError(error.to_string())
        } else {
            ToolsetError::RequestFailed(error.to_string())
        }
    }
}
