use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::base::{CompletionRequest, Provider, ProviderCompleteResponse};
use super::errors::ProviderError;
use super::formats::openai::{create_request, get_usage, response_to_result};
use super::utils::{emit_debug_trace, get_model, handle_response};

pub const OPEN_AI_DEFAULT_HOST: &str = "https://api.openai.com";
pub const OPEN_AI_DEFAULT_MODEL: &str = "gpt-4o";

fn default_host() -> String {
    OPEN_AI_DEFAULT_HOST.to_string()
}

fn default_base_path() -> String {
    "v1/chat/completions".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiProviderConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub organization: Option<String>,
}

impl OpenAiProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            host: default_host(),
            base_path: default_base_path(),
            organization: None,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }
}

#[derive(Debug)]
pub struct OpenAiProvider {
    config: OpenAiProviderConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn from_config(config: OpenAiProviderConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> Result<url::Url, ProviderError> {
        let base_url = url::Url::parse(&self.config.host)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid base URL: {e}")))?;
        base_url.join(&self.config.base_path).map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to construct endpoint URL: {e}"))
        })
    }

    async fn post(&self, payload: &Value) -> Result<Value, ProviderError> {
        let mut request_builder = self
            .client
            .post(self.endpoint()?)
            .header("Authorization", format!("Bearer {}", self.config.api_key));
        if let Some(org) = &self.config.organization {
            request_builder = request_builder.header("OpenAI-Organization", org);
        }

        let response = request_builder.json(payload).send().await?;
        handle_response(payload, response).await
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    #[tracing::instrument(skip(self, request), fields(model = %request.model.model_name))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ProviderCompleteResponse, ProviderError> {
        let payload = create_request(request);
        let response = self.post(&payload).await?;

        let result = response_to_result(&response)?;
        let usage = get_usage(&response);
        let model = get_model(&response);
        emit_debug_trace(&request.model, &payload, &response, &usage);
        Ok(ProviderCompleteResponse::new(result, model, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChatMessage;
    use crate::model::ModelConfig;
    use crate::providers::base::{ToolChoice, Usage};
    use crate::tool::{Tool, ToolCall};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_INPUT_TOKENS: i32 = 12;
    const TEST_OUTPUT_TOKENS: i32 = 15;
    const TEST_TOTAL_TOKENS: i32 = 27;

    fn create_mock_open_ai_response(model_name: &str, content: &str) -> Value {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content,
                    "tool_calls": null
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": TEST_INPUT_TOKENS,
                "completion_tokens": TEST_OUTPUT_TOKENS,
                "total_tokens": TEST_TOTAL_TOKENS
            },
            "model": model_name
        })
    }

    async fn setup_mock_server(response_code: u16, response_body: Value) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(response_code).set_body_json(response_body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::from_config(OpenAiProviderConfig::new("test-key").with_host(server.uri()))
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(ModelConfig::new("gpt-4o"), vec![ChatMessage::user("Hello?")])
    }

    #[tokio::test]
    async fn test_complete_basic() -> anyhow::Result<()> {
        let server = setup_mock_server(
            200,
            create_mock_open_ai_response("gpt-4o", "Hello! How can I assist you today?"),
        )
        .await;

        let response = provider_for(&server).complete(&request()).await?;

        assert_eq!(
            response.result.content.as_deref(),
            Some("Hello! How can I assist you today?")
        );
        assert!(response.result.tool_calls.is_empty());
        assert_eq!(response.model, "gpt-4o");
        assert_eq!(
            response.usage,
            Usage::new(
                Some(TEST_INPUT_TOKENS),
                Some(TEST_OUTPUT_TOKENS),
                Some(TEST_TOTAL_TOKENS)
            )
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_tool_request() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "tool_choice": "auto",
                "tools": [{"type": "function", "function": {"name": "get_weather"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_123",
                            "type": "function",
                            "function": {
                                "name": "get_weather",
                                "arguments": "{\"location\":\"San Francisco, CA\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "model": "gpt-4o"
            })))
            .mount(&server)
            .await;

        let tool = Tool::new(
            "get_weather",
            "Gets the current weather for a location",
            json!({
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }),
        );
        let request = request().with_tools(vec![tool], ToolChoice::Auto);
        let response = provider_for(&server).complete(&request).await?;

        assert_eq!(response.result.content, None);
        assert_eq!(
            response.result.tool_calls,
            vec![ToolCall::new(
                "call_123",
                "get_weather",
                "{\"location\":\"San Francisco, CA\"}"
            )]
        );
        assert_eq!(response.usage, Usage::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let server = setup_mock_server(401, json!({"error": {"message": "bad key"}})).await;
        let err = provider_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_error() {
        let server = setup_mock_server(429, json!({})).await;
        let err = provider_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimitExceeded(_)));
    }

    #[tokio::test]
    async fn test_context_length_error() {
        let server = setup_mock_server(
            400,
            json!({"error": {
                "code": "context_length_exceeded",
                "message": "maximum context length exceeded"
            }}),
        )
        .await;
        let err = provider_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ContextLengthExceeded(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = setup_mock_server(500, json!({})).await;
        let err = provider_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ServerError(_)));
    }

    #[test]
    fn test_invalid_host_is_request_error() {
        let provider =
            OpenAiProvider::from_config(OpenAiProviderConfig::new("key").with_host("not a url"));
        assert!(matches!(
            provider.endpoint(),
            Err(ProviderError::RequestFailed(_))
        ));
    }
}
