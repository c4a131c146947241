use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::ProviderError;
use crate::message::ChatMessage;
use crate::model::ModelConfig;
use crate::tool::{Tool, ToolCall};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// How the model may pick among the offered tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides whether to call a tool
    Auto,
    None,
    Required,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: ModelConfig,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<Tool>,
    pub tool_choice: Option<ToolChoice>,
}

impl CompletionRequest {
    pub fn new(model: ModelConfig, messages: Vec<ChatMessage>) -> Self {
        Self {
            model,
            messages,
            tools: Vec::new(),
            tool_choice: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Tool>, tool_choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = Some(tool_choice);
        self
    }
}

/// The assistant turn produced by a completion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionResult {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl CompletionResult {
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_calls.push(tool_call);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCompleteResponse {
    pub result: CompletionResult,
    pub model: String,
    pub usage: Usage,
}

impl ProviderCompleteResponse {
    pub fn new(result: CompletionResult, model: String, usage: Usage) -> Self {
        Self {
            result,
            model,
            usage,
        }
    }
}

/// Base trait for completion providers (OpenAI and compatible APIs)
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue a single completion request
    ///
    /// # Arguments
    /// * `request` - Model settings, the ordered message context, and the tools
    ///   the model may call
    ///
    /// # Errors
    /// ProviderError for transport failures, non-success statuses, and
    /// responses that cannot be parsed
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ProviderCompleteResponse, ProviderError>;
}
