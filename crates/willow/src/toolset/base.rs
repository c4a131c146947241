use async_trait::async_trait;
use serde_json::Value;

use super::errors::ToolsetError;
use crate::providers::base::CompletionResult;
use crate::tool::Tool;

/// An external service that publishes callable actions and executes the
/// ones a model asks for
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Fetch the descriptors of the given actions
    async fn get_tools(&self, actions: &[String]) -> Result<Vec<Tool>, ToolsetError>;

    /// Execute the first tool call carried by a completion, exactly once
    ///
    /// # Returns
    /// `None` when the completion requested no tool, otherwise a single
    /// opaque result for the executed call
    async fn handle_tool_call(
        &self,
        result: &CompletionResult,
    ) -> Result<Option<Vec<Value>>, ToolsetError>;
}
