use crate::error::{to_env_var, ConfigError};
use config::{Config, ConfigBuilder, Environment};
use config::builder::DefaultState;
use serde::Deserialize;
use std::net::SocketAddr;
use willow::completion::{
    PromptConfig, PROMPT_DEFAULT_MAX_TOKENS, PROMPT_DEFAULT_MODEL, PROMPT_DEFAULT_TEMPERATURE,
};
use willow::datastore::SupabaseConfig;
use willow::providers::openai::{OpenAiProviderConfig, OPEN_AI_DEFAULT_HOST, OPEN_AI_DEFAULT_MODEL};
use willow::toolset::composio::{ComposioConfig, COMPOSIO_DEFAULT_ENTITY, COMPOSIO_DEFAULT_HOST};
use willow::{ChatConfig, ModelConfig};

/// Variables read under their bare names, as the dashboard's `.env` files
/// have always spelled them. `WILLOW_` variables take precedence.
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "openai.api_key"),
    ("COMPOSIO_API_KEY", "composio.api_key"),
    ("SUPABASE_URL", "supabase.url"),
    ("SUPABASE_ANON_KEY", "supabase.anon_key"),
];

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default)]
    pub organization: Option<String>,
}

impl OpenAiSettings {
    pub fn into_config(self) -> OpenAiProviderConfig {
        let mut config = OpenAiProviderConfig::new(self.api_key).with_host(self.host);
        config.organization = self.organization;
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct ComposioSettings {
    #[serde(default = "default_composio_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_entity_id")]
    pub entity_id: String,
}

impl ComposioSettings {
    pub fn into_config(self) -> ComposioConfig {
        let mut config = ComposioConfig::new(self.api_key).with_host(self.host);
        config.entity_id = self.entity_id;
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseSettings {
    pub fn into_config(self) -> SupabaseConfig {
        SupabaseConfig::new(self.url, self.anon_key)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_chat_model")]
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
        }
    }
}

impl ChatSettings {
    pub fn into_config(self) -> ChatConfig {
        ChatConfig {
            model: ModelConfig::new(self.model),
            ..ChatConfig::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptSettings {
    #[serde(default = "default_prompt_model")]
    pub model: String,
    #[serde(default = "default_prompt_temperature")]
    pub temperature: Option<f32>,
    #[serde(default = "default_prompt_max_tokens")]
    pub max_tokens: Option<i32>,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            model: default_prompt_model(),
            temperature: default_prompt_temperature(),
            max_tokens: default_prompt_max_tokens(),
        }
    }
}

impl PromptSettings {
    pub fn into_config(self) -> PromptConfig {
        PromptConfig {
            model: ModelConfig::new(self.model)
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_tokens),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub composio: ComposioSettings,
    #[serde(default)]
    pub supabase: Option<SupabaseSettings>,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub prompt: PromptSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Upstream defaults
            .set_default("openai.host", default_openai_host())?
            .set_default("composio.host", default_composio_host())?;
        builder = with_legacy_env(builder)?;

        let config = builder
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("WILLOW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if let Some(field) = missing_field_path(&error_str) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(&field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn with_legacy_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in LEGACY_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            builder = builder.set_default(*key, value)?;
        }
    }
    Ok(builder)
}

// Turns "missing field `api_key` for key `openai`" into "openai.api_key"
fn missing_field_path(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;
    let parent = rest
        .split_once("for key `")
        .and_then(|(_, key)| key.split_once('`'))
        .map(|(key, _)| key);

    Some(match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}.{field}"),
        _ => field.to_string(),
    })
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openai_host() -> String {
    OPEN_AI_DEFAULT_HOST.to_string()
}

fn default_composio_host() -> String {
    COMPOSIO_DEFAULT_HOST.to_string()
}

fn default_entity_id() -> String {
    COMPOSIO_DEFAULT_ENTITY.to_string()
}

fn default_chat_model() -> String {
    OPEN_AI_DEFAULT_MODEL.to_string()
}

fn default_prompt_model() -> String {
    PROMPT_DEFAULT_MODEL.to_string()
}

fn default_prompt_temperature() -> Option<f32> {
    Some(PROMPT_DEFAULT_TEMPERATURE)
}

fn default_prompt_max_tokens() -> Option<i32> {
    Some(PROMPT_DEFAULT_MAX_TOKENS)
}

fn default_log_dir() -> String {
    "logs".to_string()
}
