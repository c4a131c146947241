pub mod base;
pub mod errors;
pub mod formats;
pub mod mock;
pub mod openai;
pub mod utils;

pub use base::{
    CompletionRequest, CompletionResult, Provider, ProviderCompleteResponse, ToolChoice, Usage,
};
pub use errors::ProviderError;
