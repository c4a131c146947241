use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::base::ToolProvider;
use super::errors::ToolsetError;
use crate::providers::base::CompletionResult;
use crate::tool::{Tool, ToolCall};

pub const COMPOSIO_DEFAULT_HOST: &str = "https://backend.composio.dev";
pub const COMPOSIO_DEFAULT_ENTITY: &str = "default";

fn default_host() -> String {
    COMPOSIO_DEFAULT_HOST.to_string()
}

fn default_entity_id() -> String {
    COMPOSIO_DEFAULT_ENTITY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposioConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_host")]
    pub host: String,
    /// The entity whose connected accounts execute the actions
    #[serde(default = "default_entity_id")]
    pub entity_id: String,
}

impl ComposioConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            host: default_host(),
            entity_id: default_entity_id(),
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ActionSchema {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<Value>,
}

impl From<ActionSchema> for Tool {
    fn from(action: ActionSchema) -> Self {
        Tool::new(
            action.name,
            action.description.unwrap_or_default(),
            action
                .parameters
                .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
        )
    }
}

/// Tool provider backed by the Composio actions API
#[derive(Debug)]
pub struct ComposioToolset {
    config: ComposioConfig,
    client: Client,
}

impl ComposioToolset {
    pub fn from_config(config: ComposioConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.config.host.trim_end_matches('/'), path)
    }

    async fn get_action(&self, action: &str) -> Result<Tool, ToolsetError> {
        let response = self
            .client
            .get(self.url(&format!("actions/{action}")))
            .header("x-api-key", &self.config.api_key)
            .send()
            .await?;

        let schema: ActionSchema = check_status(response).await?.json().await?;
        Ok(schema.into())
    }

    async fn execute(&self, tool_call: &ToolCall) -> Result<Value, ToolsetError> {
        let input: Value = if tool_call.arguments.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&tool_call.arguments)
                .map_err(|e| ToolsetError::InvalidArguments(format!("{}: {}", tool_call.name, e)))?
        };

        info!(action = %tool_call.name, "executing tool call");
        let response = self
            .client
            .post(self.url(&format!("actions/{}/execute", tool_call.name)))
            .header("x-api-key", &self.config.api_key)
            .json(&json!({
                "entityId": self.config.entity_id,
                "input": input,
            }))
            .send()
            .await?;

        let body: Value = check_status(response).await?.json().await?;
        debug!(action = %tool_call.name, output = %body, "tool call executed");
        Ok(body)
    }
}

async fn check_status(response: Response) -> Result<Response, ToolsetError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ToolsetError::Authentication(format!(
                "Composio rejected the API key. Status: {}",
                response.status()
            )))
        }
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(ToolsetError::RequestFailed(format!(
                "Request failed with status: {}. Body: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl ToolProvider for ComposioToolset {
    async fn get_tools(&self, actions: &[String]) -> Result<Vec<Tool>, ToolsetError> {
        let mut tools = Vec::with_capacity(actions.len());
        for action in actions {
            tools.push(self.get_action(action).await?);
        }
        Ok(tools)
    }

    async fn handle_tool_call(
        &self,
        result: &CompletionResult,
    ) -> Result<Option<Vec<Value>>, ToolsetError> {
        // Only the first call runs
        let Some(tool_call) = result.tool_calls.first() else {
            return Ok(None);
        };
        if result.tool_calls.len() > 1 {
            debug!(
                ignored = result.tool_calls.len() - 1,
                "executing the first tool call only"
            );
        }

        let output = self.execute(tool_call).await?;
        Ok(Some(vec![Value::String(output.to_string())]))
    }
}
