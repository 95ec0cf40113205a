//! Mock translator for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::translation::{TranslationError, Translator};

/// Mock implementation of the Translator trait.
///
/// Prefixes every input with `[pt-br] ` so tests can tell translated
/// text apart, or fails every call once `set_failing(true)` is used.
#[derive(Debug, Default)]
pub struct MockTranslator {
    requests: Arc<RwLock<Vec<String>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent calls fail (or succeed again).
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Texts passed to `translate`, in call order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        self.requests.write().await.push(text.to_string());

        if *self.failing.read().await {
            return Err(TranslationError::ApiError {
                status: 429,
                message: "daily quota exceeded".to_string(),
            });
        }

        Ok(format!("[pt-br] {}", text))
    }
}
