//! Canned `GenerationService` for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::{GenerationService, LlmError};

/// Answers the first call with a fixed response and every later call with
/// `LlmError::EmptyContent`. Counts calls.
pub struct StubGenerator {
    response: Mutex<Option<Result<Value, LlmError>>>,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn ok(value: Value) -> Arc<Self> {
        Self::with(Ok(value))
    }

    pub fn err(error: LlmError) -> Arc<Self> {
        Self::with(Err(error))
    }

    fn with(response: Result<Value, LlmError>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(response)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for StubGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
