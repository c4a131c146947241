pub mod chat;
pub mod completion;
pub mod datastore;
pub mod message;
pub mod model;
pub mod providers;
pub mod tool;
pub mod toolset;

pub use chat::{reply, ChatConfig, ChatError, ToolCallOutcome};
pub use completion::{completion, PromptConfig};
pub use message::{ChatMessage, Role};
pub use model::ModelConfig;
pub use tool::{Tool, ToolCall};
