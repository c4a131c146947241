use crate::message::ChatMessage;
use crate::model::ModelConfig;
use crate::providers::base::{CompletionRequest, Provider};
use crate::providers::errors::ProviderError;

pub const PROMPT_DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const PROMPT_DEFAULT_TEMPERATURE: f32 = 0.7;
pub const PROMPT_DEFAULT_MAX_TOKENS: i32 = 500;

/// Settings for single-prompt completions without tools
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub model: ModelConfig,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::new(PROMPT_DEFAULT_MODEL)
                .with_temperature(Some(PROMPT_DEFAULT_TEMPERATURE))
                .with_max_tokens(Some(PROMPT_DEFAULT_MAX_TOKENS)),
        }
    }
}

/// Send `prompt` as the only user turn and return the model's text, or an
/// empty string when the model returned none
pub async fn completion(
    provider: &dyn Provider,
    config: &PromptConfig,
    prompt: &str,
) -> Result<String, ProviderError> {
    let request = CompletionRequest::new(config.model.clone(), vec![ChatMessage::user(prompt)]);
    let response = provider.complete(&request).await?;

    let content = response.result.content.unwrap_or_default();
    tracing::debug!(preview = %content.chars().take(50).collect::<String>(), "prompt completion received");
    Ok(content)
}
