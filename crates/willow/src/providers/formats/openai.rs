use serde_json::{json, Map, Value};

use crate::message::ChatMessage;
use crate::providers::base::{CompletionRequest, CompletionResult, Usage};
use crate::providers::errors::ProviderError;
use crate::tool::{Tool, ToolCall};

/// Convert internal messages to OpenAI's API message specification
pub fn format_messages(messages: &[ChatMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": message.content,
            })
        })
        .collect()
}

/// Convert tools to OpenAI's function tool specification
pub fn format_tools(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
}

/// Convert an OpenAI chat completion response into a CompletionResult
pub fn response_to_result(response: &Value) -> Result<CompletionResult, ProviderError> {
    let message = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| {
            ProviderError::ResponseParseError("Response contains no choices".to_string())
        })?;

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for call in calls {
            let id = call.get("id").and_then(Value::as_str).unwrap_or_default();
            let function = call.get("function").ok_or_else(|| {
                ProviderError::ResponseParseError(format!("Tool call {id} has no function"))
            })?;
            let name = function
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ProviderError::ResponseParseError(format!("Tool call {id} has no name"))
                })?;
            let arguments = function
                .get("arguments")
                .and_then(Value::as_str)
                .unwrap_or_default();
            tool_calls.push(ToolCall::new(id, name, arguments));
        }
    }

    Ok(CompletionResult {
        content,
        tool_calls,
    })
}

pub fn get_usage(data: &Value) -> Usage {
    let usage = match data.get("usage") {
        Some(usage) => usage,
        None => return Usage::default(),
    };
    let read = |key: &str| {
        usage
            .get(key)
            .and_then(Value::as_i64)
            .map(|v| v as i32)
    };

    let input_tokens = read("prompt_tokens");
    let output_tokens = read("completion_tokens");
    let total_tokens = read("total_tokens").or_else(|| match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

pub fn is_context_length_error(error: &Value) -> Option<ProviderError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        Some(ProviderError::ContextLengthExceeded(message))
    } else {
        None
    }
}

pub fn create_request(request: &CompletionRequest) -> Value {
    let mut payload = Map::new();
    payload.insert("model".to_string(), json!(request.model.model_name));
    payload.insert(
        "messages".to_string(),
        json!(format_messages(&request.messages)),
    );

    if !request.tools.is_empty() {
        payload.insert("tools".to_string(), json!(format_tools(&request.tools)));
        if let Some(tool_choice) = request.tool_choice {
            payload.insert("tool_choice".to_string(), json!(tool_choice));
        }
    }
    if let Some(temperature) = request.model.temperature {
        payload.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(max_tokens) = request.model.max_tokens {
        payload.insert("max_tokens".to_string(), json!(max_tokens));
    }

    Value::Object(payload)
}
