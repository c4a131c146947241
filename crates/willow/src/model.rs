use serde::{Deserialize, Serialize};

/// Configuration for model-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The name of the model to use
    pub model_name: String,
    /// Optional temperature setting (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Optional maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
}

impl ModelConfig {
    pub fn new<S: Into<String>>(model_name: S) -> Self {
        Self {
            model_name: model_name.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temp: Option<f32>) -> Self {
        self.temperature = temp;
        self
    }

    /// Set the max tokens
    pub fn with_max_tokens(mut self, tokens: Option<i32>) -> Self {
        self.max_tokens = tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_builder() {
        let config = ModelConfig::new("gpt-3.5-turbo")
            .with_temperature(Some(0.7))
            .with_max_tokens(Some(500));

        assert_eq!(config.model_name, "gpt-3.5-turbo");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(500));
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let value = serde_json::to_value(ModelConfig::new("gpt-4o")).unwrap();
        assert_eq!(value, serde_json::json!({"model_name": "gpt-4o"}));
    }
}
