use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::base::ToolProvider;
use super::errors::ToolsetError;
use crate::providers::base::CompletionResult;
use crate::tool::Tool;

/// A tool provider with fixed tools and a fixed tool-call result
pub struct MockToolset {
    tools: Vec<Tool>,
    tool_result: Option<Vec<Value>>,
    fail_get_tools: Option<String>,
    fail_tool_call: Option<String>,
    get_tools_calls: AtomicUsize,
    tool_calls: AtomicUsize,
}

impl MockToolset {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self {
            tools,
            tool_result: None,
            fail_get_tools: None,
            fail_tool_call: None,
            get_tools_calls: AtomicUsize::new(0),
            tool_calls: AtomicUsize::new(0),
        }
    }

    /// Result handed back when the completion carries a tool call
    pub fn with_tool_result(mut self, result: Vec<Value>) -> Self {
        self.tool_result = Some(result);
        self
    }

    pub fn failing_get_tools<S: Into<String>>(mut self, message: S) -> Self {
        self.fail_get_tools = Some(message.into());
        self
    }

    pub fn failing_tool_call<S: Into<String>>(mut self, message: S) -> Self {
        self.fail_tool_call = Some(message.into());
        self
    }

    pub fn get_tools_calls(&self) -> usize {
        self.get_tools_calls.load(Ordering::SeqCst)
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolProvider for MockToolset {
    async fn get_tools(&self, _actions: &[String]) -> Result<Vec<Tool>, ToolsetError> {
        self.get_tools_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_get_tools {
            Some(message) => Err(ToolsetError::RequestFailed(message.clone())),
            None => Ok(self.tools.clone()),
        }
    }

    async fn handle_tool_call(
        &self,
        result: &CompletionResult,
    ) -> Result<Option<Vec<Value>>, ToolsetError> {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_tool_call {
            return Err(ToolsetError::RequestFailed(message.clone()));
        }
        if !result.has_tool_calls() {
            return Ok(None);
        }
        Ok(self.tool_result.clone())
    }
}
