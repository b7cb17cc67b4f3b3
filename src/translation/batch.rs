/*!
 * Batch translation processing.
 *
 * Splits an ordered list of texts into fixed-size batches and sends them to
 * a `TranslationBackend` one after another. Throttled batches are retried
 * with exponential backoff plus jitter; a batch that cannot be translated
 * falls back to its original texts, so the output always lines up with the
 * input one-to-one.
 */

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::backend::TranslationBackend;
use crate::app_config::TranslationCommonConfig;
use crate::errors::{ProviderError, TranslationError};

/// Default number of texts per backend call
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Something that can wait. Injected so tests never sleep for real.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How throttled batches are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts per batch
    pub max_retries: u32,

    /// Base delay, doubled for every throttled attempt
    pub backoff_base: Duration,

    /// Upper bound (exclusive) of the uniform random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_base: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from the common translation settings.
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self {
            max_retries: common.retry_count,
            backoff_base: Duration::from_millis(common.retry_backoff_ms),
            max_jitter: Duration::from_millis(common.retry_jitter_ms),
        }
    }

    /// Attempts allowed per batch; at least one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay after the `failures`-th throttled attempt, with random jitter.
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() { 0.0 } else { rand::random::<f64>() };
        self.backoff_delay_with_jitter(failures, jitter)
    }

    /// Delay after the `failures`-th throttled attempt: `2^failures * base + jitter * max_jitter`.
    pub fn backoff_delay_with_jitter(&self, failures: u32, jitter: f64) -> Duration {
        let factor = 2u32.saturating_pow(failures);
        self.backoff_base.saturating_mul(factor) + self.max_jitter.mul_f64(jitter.clamp(0.0, 1.0))
    }
}

/// A batch that ended up untranslated
#[derive(Debug)]
pub struct BatchFailure {
    /// 1-based batch number
    pub batch: usize,
    /// Why it failed
    pub error: TranslationError,
}

/// Statistics for one `translate_all` run
#[derive(Debug)]
pub struct BatchReport {
    /// Number of batches sent
    pub batches: usize,
    /// Batches translated successfully
    pub succeeded: usize,
    /// Batches that fell back to the original text
    pub fell_back: usize,
    /// Throttled attempts that were retried
    pub throttle_retries: u32,
    /// Details of each fallback
    pub failures: Vec<BatchFailure>,
    /// Start of the run
    pub start_time: Instant,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self {
            batches: 0,
            succeeded: 0,
            fell_back: 0,
            throttle_retries: 0,
            failures: Vec::new(),
            start_time: Instant::now(),
        }
    }
}

impl BatchReport {
    /// True when no batch fell back to its original text.
    pub fn fully_translated(&self) -> bool {
        self.fell_back == 0
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} batch(es): {} translated, {} left untranslated, {} throttle retries, {:.1}s elapsed",
            self.batches,
            self.succeeded,
            self.fell_back,
            self.throttle_retries,
            self.start_time.elapsed().as_secs_f64()
        )
    }
}

/// Batch translator for processing ordered text lists in batches
pub struct BatchTranslator {
    /// Backend performing the translation
    backend: Arc<dyn TranslationBackend>,

    /// Source of delays
    sleeper: Arc<dyn Sleeper>,

    /// Retry behaviour for throttled batches
    policy: RetryPolicy,

    /// Texts per backend call
    batch_size: usize,

    /// Pause after each successful batch
    pacing: Duration,
}

impl BatchTranslator {
    /// Create a batch translator with default settings.
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            pacing: Duration::from_secs(1),
        }
    }

    /// Create a batch translator configured from the common translation settings.
    pub fn from_config(backend: Arc<dyn TranslationBackend>, common: &TranslationCommonConfig) -> Self {
        Self::new(backend)
            .with_policy(RetryPolicy::from_config(common))
            .with_batch_size(common.batch_size)
            .with_pacing(Duration::from_millis(common.rate_limit_delay_ms))
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the batch size; zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the pause after each successful batch.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the sleeper.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches `count` texts will be split into.
    pub fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.batch_size)
    }

    /// Translate every text, returning exactly one output per input in order.
    pub async fn translate_all(&self, texts: &[String], target_language: &str) -> (Vec<String>, BatchReport) {
        self.translate_all_with_progress(texts, target_language, |_, _| {}).await
    }

    /// Like `translate_all`, calling `progress(done, total)` after each batch.
    pub async fn translate_all_with_progress<F>(
        &self,
        texts: &[String],
        target_language: &str,
        progress: F,
    ) -> (Vec<String>, BatchReport)
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let mut report = BatchReport::default();
        let mut translations = Vec::with_capacity(texts.len());
        let total_batches = self.batch_count(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let batch_number = batch_index + 1;
            report.batches += 1;

            match self.translate_batch(batch, batch_number, total_batches, target_language, &mut report).await {
                Ok(translated) => {
                    report.succeeded += 1;
                    translations.extend(translated);
                    self.sleeper.sleep(self.pacing).await;
                }
                Err(error) => {
                    error!(
                        "Failed to translate batch {} of {}: {}. Using original text.",
                        batch_number, total_batches, error
                    );
                    report.fell_back += 1;
                    report.failures.push(BatchFailure {
                        batch: batch_number,
                        error,
                    });
                    translations.extend(batch.iter().cloned());
                }
            }

            progress(batch_number, total_batches);
        }

        debug!("{}", report.summary());
        (translations, report)
    }

    /// Send one batch, retrying while it is throttled.
    async fn translate_batch(
        &self,
        batch: &[String],
        batch_number: usize,
        total_batches: usize,
        target_language: &str,
        report: &mut BatchReport,
    ) -> Result<Vec<String>, TranslationError> {
        let max_attempts = self.policy.max_attempts();
        let mut failures = 0;

        loop {
            let error = match self.backend.translate(batch, target_language).await {
                Ok(translated) if translated.len() == batch.len() => {
                    info!("Successfully translated batch {} of {}", batch_number, total_batches);
                    return Ok(translated);
                }
                Ok(translated) => ProviderError::ResponseMismatch {
                    expected: batch.len(),
                    actual: translated.len(),
                },
                Err(error) => error,
            };

            if !error.is_rate_limited() {
                return Err(error.into());
            }

            failures += 1;
            if failures >= max_attempts {
                return Err(TranslationError::RetryBudgetExhausted {
                    batch: batch_number,
                    attempts: failures,
                });
            }

            let delay = self.policy.backoff_delay(failures);
            warn!(
                "Rate limit reached. Waiting {:.2} seconds before retry {}/{}...",
                delay.as_secs_f64(),
                failures,
                max_attempts
            );
            report.throttle_retries += 1;
            self.sleeper.sleep(delay).await;
        }
    }
}
