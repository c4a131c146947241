use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::base::{
    CompletionRequest, CompletionResult, Provider, ProviderCompleteResponse, Usage,
};
use super::errors::ProviderError;

/// A mock provider that returns pre-configured results for testing
pub struct MockProvider {
    responses: Mutex<Vec<CompletionResult>>,
    error: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of results
    pub fn new(responses: Vec<CompletionResult>) -> Self {
        Self {
            responses: Mutex::new(responses),
            error: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock provider whose every call fails with a server error
    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(Vec::new())
        }
    }

    /// Number of times `complete` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The requests received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ProviderCompleteResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(error) = &self.error {
            return Err(ProviderError::ServerError(error.clone()));
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        // Return empty response if no more pre-configured responses
        let result = if responses.is_empty() {
            CompletionResult::text("")
        } else {
            responses.remove(0)
        };

        Ok(ProviderCompleteResponse::new(
            result,
            request.model.model_name.clone(),
            Usage::new(Some(1), Some(1), Some(2)),
        ))
    }
}
