use std::sync::Arc;
use willow::datastore::{DataStore, SupabaseClient};
use willow::providers::openai::OpenAiProvider;
use willow::providers::Provider;
use willow::toolset::composio::ComposioToolset;
use willow::toolset::ToolProvider;
use willow::{ChatConfig, PromptConfig};

use crate::configuration::Settings;

/// Shared application state. Clients are built once at start-up and shared
/// read-only by every request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub toolset: Arc<dyn ToolProvider>,
    pub datastore: Option<Arc<dyn DataStore>>,
    pub chat: Arc<ChatConfig>,
    pub prompt: Arc<PromptConfig>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn Provider>,
        toolset: Arc<dyn ToolProvider>,
        datastore: Option<Arc<dyn DataStore>>,
    ) -> Self {
        Self {
            provider,
            toolset,
            datastore,
            chat: Arc::new(ChatConfig::default()),
            prompt: Arc::new(PromptConfig::default()),
        }
    }

    pub fn with_chat_config(mut self, chat: ChatConfig) -> Self {
        self.chat = Arc::new(chat);
        self
    }

    pub fn with_prompt_config(mut self, prompt: PromptConfig) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    /// Build the production clients from loaded settings
    pub fn from_settings(settings: Settings) -> Self {
        let provider = Arc::new(OpenAiProvider::from_config(settings.openai.into_config()));
        let toolset = Arc::new(ComposioToolset::from_config(
            settings.composio.into_config(),
        ));
        let datastore = settings.supabase.map(|supabase| {
            Arc::new(SupabaseClient::from_config(supabase.into_config())) as Arc<dyn DataStore>
        });

        Self::new(provider, toolset, datastore)
            .with_chat_config(settings.chat.into_config())
            .with_prompt_config(settings.prompt.into_config())
    }
}
