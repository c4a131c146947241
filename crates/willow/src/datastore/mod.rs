pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use supabase::{SupabaseClient, SupabaseConfig};

#[derive(Error, Debug)]
pub enum DataStoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A managed relational store reachable over HTTP
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Select every row of `table`
    async fn select_all(&self, table: &str) -> Result<Vec<Value>, DataStoreError>;
}
