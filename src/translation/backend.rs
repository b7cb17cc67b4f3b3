/*!
 * Contract between the batch translator and whatever performs translation.
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProviderError;

/// A service that translates a list of texts in one call.
///
/// Implementations must return exactly one translation per input, in input
/// order, or an error. Throttling must be reported as an error for which
/// `ProviderError::is_rate_limited` is true.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `texts` into `target_language`.
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
impl<T: TranslationBackend + ?Sized> TranslationBackend for Arc<T> {
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>, ProviderError> {
        (**self).translate(texts, target_language).await
    }
}
