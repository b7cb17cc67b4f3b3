/*!
 * Mock backend implementations for testing.
 *
 * `MockBackend` simulates the behaviors the batch translator must cope with:
 * - `MockBackend::working()` - Always succeeds with `[lang] text`
 * - `MockBackend::throttled(n)` - Throttles the first `n` calls, then succeeds
 * - `MockBackend::failing()` - Always fails with a non-throttling error
 *
 * `RecordingSleeper` records requested delays instead of sleeping.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::translation::backend::TranslationBackend;
use crate::translation::batch::Sleeper;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[lang] text`
    Working,
    /// Answers every text with the same string
    Fixed(String),
    /// Always fails with a server error
    Failing,
    /// Throttles the first `times` calls, then works
    ThrottleFirst { times: usize },
    /// Always throttles
    AlwaysThrottled,
    /// Returns one translation fewer than requested
    ShortResponse,
}

/// Scriptable `TranslationBackend`; clones share call counters and request logs
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of calls made so far
    request_count: Arc<AtomicUsize>,
    /// Texts of every call, in order
    requests: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock backend
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock backend that answers every text with `reply`
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(reply.into()))
    }

    /// Create a failing mock backend
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock backend that throttles the first `times` calls
    pub fn throttled(times: usize) -> Self {
        Self::new(MockBehavior::ThrottleFirst { times })
    }

    /// Create a mock backend that never stops throttling
    pub fn always_throttled() -> Self {
        Self::new(MockBehavior::AlwaysThrottled)
    }

    /// Create a mock backend that drops the last translation of every batch
    pub fn short_response() -> Self {
        Self::new(MockBehavior::ShortResponse)
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts of every call, in order
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().clone()
    }

    fn working_reply(texts: &[String], target_language: &str) -> Vec<String> {
        texts.iter().map(|text| format!("[{}] {}", target_language, text)).collect()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(texts.to_vec());

        match &self.behavior {
            MockBehavior::Working => Ok(Self::working_reply(texts, target_language)),
            MockBehavior::Fixed(reply) => Ok(vec![reply.clone(); texts.len()]),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::ThrottleFirst { times } if count < *times => Err(ProviderError::RateLimitExceeded(
                format!("Simulated throttling (request #{})", count + 1),
            )),
            MockBehavior::ThrottleFirst { .. } => Ok(Self::working_reply(texts, target_language)),
            MockBehavior::AlwaysThrottled => Err(ProviderError::ApiError {
                status_code: 429,
                message: "Resource has been exhausted".to_string(),
            }),
            MockBehavior::ShortResponse => {
                let mut reply = Self::working_reply(texts, target_language);
                reply.pop();
                Ok(reply)
            }
        }
    }
}

/// Sleeper that records delays and returns immediately
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Sum of all requested delays
    pub fn total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}
