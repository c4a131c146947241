use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataStore, DataStoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://<project>.supabase.co
    pub url: String,
    #[serde(skip_serializing)]
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new<U: Into<String>, K: Into<String>>(url: U, anon_key: K) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
        }
    }
}

/// Minimal PostgREST client for a Supabase project
#[derive(Debug)]
pub struct SupabaseClient {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseClient {
    pub fn from_config(config: SupabaseConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn select_all(&self, table: &str) -> Result<Vec<Value>, DataStoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.config.anon_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("Request failed with status: {}", status));
            return Err(DataStoreError::Query(message));
        }

        Ok(response.json().await?)
    }
}
