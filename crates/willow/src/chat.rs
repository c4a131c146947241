//! Tool-augmented chat reply.
//!
//! One request makes up to three sequential outbound calls: fetch the tool
//! descriptors, ask the model for a completion with those tools attached,
//! then let the tool provider execute whatever the model asked for. The
//! executed result is summarized into the reply text.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::message::ChatMessage;
use crate::model::ModelConfig;
use crate::providers::base::{CompletionRequest, Provider, ToolChoice};
use crate::providers::errors::ProviderError;
use crate::providers::openai::OPEN_AI_DEFAULT_MODEL;
use crate::toolset::{ToolProvider, ToolsetError};

pub const GITHUB_AUTHENTICATED_USER_ACTION: &str = "GITHUB_GET_THE_AUTHENTICATED_USER";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that can use tools to \
    interact with the Composio MCP Server. When using a tool, always provide a clear, natural \
    language response to the user based on the tool result, followed by the tool result in a \
    simplified format.";

pub const TOOL_RESULT_PARSE_ERROR: &str = "\nError parsing tool result.";

const UNKNOWN_USERNAME: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: ModelConfig,
    /// Action identifiers requested from the tool provider on every call
    pub actions: Vec<String>,
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::new(OPEN_AI_DEFAULT_MODEL),
            actions: vec![GITHUB_AUTHENTICATED_USER_ACTION.to_string()],
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to fetch tools: {0}")]
    Tools(#[source] ToolsetError),

    #[error("Completion failed: {0}")]
    Completion(#[from] ProviderError),

    #[error("Tool execution failed: {0}")]
    ToolExecution(#[source] ToolsetError),
}

/// What came back from executing the model's tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallOutcome {
    /// The model did not call a tool
    NoCall,
    /// The first result, still JSON-encoded
    Executed(String),
    /// Results were returned but the first one is not a string
    MalformedResult,
}

impl ToolCallOutcome {
    pub fn from_results(results: Option<Vec<Value>>) -> Self {
        match results {
            None => ToolCallOutcome::NoCall,
            Some(results) => match results.into_iter().next() {
                Some(Value::String(raw)) => ToolCallOutcome::Executed(raw),
                _ => ToolCallOutcome::MalformedResult,
            },
        }
    }
}

/// Produce the reply to a single user message.
///
/// Errors from fetching tools, the completion, or executing the tool call are
/// terminal. A tool result that is not valid JSON is not an error: the reply
/// carries a parse notice instead.
pub async fn reply(
    provider: &dyn Provider,
    toolset: &dyn ToolProvider,
    config: &ChatConfig,
    message: &str,
) -> Result<String, ChatError> {
    let tools = toolset
        .get_tools(&config.actions)
        .await
        .map_err(ChatError::Tools)?;

    let messages = vec![
        ChatMessage::system(config.system_prompt.clone()),
        ChatMessage::user(message),
    ];
    let request = CompletionRequest::new(config.model.clone(), messages)
        .with_tools(tools, ToolChoice::Auto);

    let response = provider.complete(&request).await?;
    debug!(model = %response.model, usage = ?response.usage, "chat completion received");

    let results = toolset
        .handle_tool_call(&response.result)
        .await
        .map_err(ChatError::ToolExecution)?;

    let content = response.result.content.unwrap_or_default();
    Ok(compose_reply(content, ToolCallOutcome::from_results(results)))
}

/// Fold the tool outcome into the model's text
pub fn compose_reply(content: String, outcome: ToolCallOutcome) -> String {
    match outcome {
        ToolCallOutcome::NoCall => content,
        ToolCallOutcome::MalformedResult => {
            debug!("ignoring tool result with unexpected shape");
            content
        }
        ToolCallOutcome::Executed(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => {
                let block = tool_result_block(extract_username(&parsed));
                if content.trim().is_empty() {
                    block
                } else {
                    format!("{content}\n{block}")
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to parse tool result");
                content + TOOL_RESULT_PARSE_ERROR
            }
        },
    }
}

fn extract_username(parsed: &Value) -> &str {
    parsed
        .pointer("/data/login")
        .and_then(Value::as_str)
        .filter(|login| !login.is_empty())
        .unwrap_or(UNKNOWN_USERNAME)
}

fn tool_result_block(username: &str) -> String {
    format!("Tool Result: {{\n  \"username\": \"{username}\"\n}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::base::CompletionResult;
    use crate::providers::mock::MockProvider;
    use crate::tool::{Tool, ToolCall};
    use crate::toolset::mock::MockToolset;
    use crate::message::Role;
    use serde_json::json;

    const OCTOCAT_RESULT: &str = "{\"data\":{\"login\":\"octocat\"}}";

    fn github_tool() -> Tool {
        Tool::new(
            GITHUB_AUTHENTICATED_USER_ACTION,
            "Get the authenticated user",
            json!({"type": "object", "properties": {}}),
        )
    }

    fn tool_call_completion(content: Option<&str>) -> CompletionResult {
        CompletionResult {
            content: content.map(str::to_string),
            tool_calls: vec![],
        }
        .with_tool_call(ToolCall::new("call_1", GITHUB_AUTHENTICATED_USER_ACTION, "{}"))
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(ToolCallOutcome::from_results(None), ToolCallOutcome::NoCall);
        assert_eq!(
            ToolCallOutcome::from_results(Some(vec![json!("raw"), json!(1)])),
            ToolCallOutcome::Executed("raw".to_string())
        );
        assert_eq!(
            ToolCallOutcome::from_results(Some(vec![])),
            ToolCallOutcome::MalformedResult
        );
        assert_eq!(
            ToolCallOutcome::from_results(Some(vec![json!({"data": {}})])),
            ToolCallOutcome::MalformedResult
        );
    }

    #[test]
    fn test_compose_reply_block_alone_when_content_blank() {
        let outcome = ToolCallOutcome::Executed(OCTOCAT_RESULT.to_string());
        assert_eq!(
            compose_reply("".to_string(), outcome.clone()),
            "Tool Result: {\n  \"username\": \"octocat\"\n}"
        );
        assert_eq!(
            compose_reply("  \n".to_string(), outcome),
            "Tool Result: {\n  \"username\": \"octocat\"\n}"
        );
    }

    #[test]
    fn test_compose_reply_unknown_username() {
        for raw in ["{}", "null", "{\"data\":{\"login\":\"\"}}", "{\"data\":{\"login\":7}}"] {
            assert_eq!(
                compose_reply(
                    "Done".to_string(),
                    ToolCallOutcome::Executed(raw.to_string())
                ),
                "Done\nTool Result: {\n  \"username\": \"Unknown\"\n}",
                "raw result: {raw}"
            );
        }
    }

    #[test]
    fn test_compose_reply_parse_error_on_empty_content() {
        assert_eq!(
            compose_reply(
                String::new(),
                ToolCallOutcome::Executed("not json".to_string())
            ),
            "\nError parsing tool result."
        );
    }

    #[tokio::test]
    async fn test_plain_reply() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![CompletionResult::text("Hello")]);
        let toolset = MockToolset::new(vec![github_tool()]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Hi").await?;

        assert_eq!(reply, "Hello");
        assert_eq!(toolset.get_tools_calls(), 1);
        assert_eq!(provider.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_request_carries_context_and_tools() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![CompletionResult::text("Hello")]);
        let toolset = MockToolset::new(vec![github_tool()]);

        reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model.model_name, "gpt-4o");
        assert_eq!(request.tools, vec![github_tool()]);
        assert_eq!(request.tool_choice, Some(ToolChoice::Auto));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(request.messages[1], ChatMessage::user("Who am I?"));
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_result_with_empty_content() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![tool_call_completion(Some(""))]);
        let toolset = MockToolset::new(vec![github_tool()])
            .with_tool_result(vec![json!(OCTOCAT_RESULT)]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        assert_eq!(reply, "Tool Result: {\n  \"username\": \"octocat\"\n}");
        assert_eq!(toolset.tool_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_result_with_null_content() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![tool_call_completion(None)]);
        let toolset = MockToolset::new(vec![github_tool()])
            .with_tool_result(vec![json!(OCTOCAT_RESULT)]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        assert_eq!(reply, "Tool Result: {\n  \"username\": \"octocat\"\n}");
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_result_appended_to_content() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![tool_call_completion(Some("Here you go"))]);
        let toolset = MockToolset::new(vec![github_tool()])
            .with_tool_result(vec![json!(OCTOCAT_RESULT)]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        assert_eq!(
            reply,
            "Here you go\nTool Result: {\n  \"username\": \"octocat\"\n}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_tool_result_is_annotated() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![tool_call_completion(Some("Here you go"))]);
        let toolset =
            MockToolset::new(vec![github_tool()]).with_tool_result(vec![json!("<html>")]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        assert_eq!(reply, "Here you go\nError parsing tool result.");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_tool_result_is_ignored() -> anyhow::Result<()> {
        let provider = MockProvider::new(vec![tool_call_completion(Some("Here you go"))]);
        let toolset = MockToolset::new(vec![github_tool()])
            .with_tool_result(vec![json!({"data": {"login": "octocat"}})]);

        let reply = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?").await?;

        assert_eq!(reply, "Here you go");
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_fetch_failure_skips_completion() {
        let provider = MockProvider::new(vec![CompletionResult::text("Hello")]);
        let toolset = MockToolset::new(vec![]).failing_get_tools("composio unreachable");

        let err = reply(&provider, &toolset, &ChatConfig::default(), "Hi")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Tools(_)));
        assert!(err.to_string().contains("composio unreachable"));
        assert_eq!(provider.calls(), 0);
        assert_eq!(toolset.tool_calls(), 0);
    }

    #[tokio::test]
    async fn test_completion_failure() {
        let provider = MockProvider::failing("upstream down");
        let toolset = MockToolset::new(vec![github_tool()]);

        let err = reply(&provider, &toolset, &ChatConfig::default(), "Hi")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Completion(_)));
        assert_eq!(toolset.tool_calls(), 0);
    }

    #[tokio::test]
    async fn test_tool_execution_failure() {
        let provider = MockProvider::new(vec![tool_call_completion(Some("Here you go"))]);
        let toolset = MockToolset::new(vec![github_tool()]).failing_tool_call("timeout");

        let err = reply(&provider, &toolset, &ChatConfig::default(), "Who am I?")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::ToolExecution(_)));
    }
}
