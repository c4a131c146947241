pub mod base;
pub mod composio;
pub mod errors;
pub mod mock;

pub use base::ToolProvider;
pub use errors::ToolsetError;
