/*!
 * Core translation service implementation.
 *
 * `TranslationService` wraps the configured LLM provider and exposes it as a
 * `TranslationBackend`: one prompt per batch, one reply parsed back into one
 * translation per text.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use std::time::Instant;

use super::backend::TranslationBackend;
use super::prompts::{PromptTemplate, build_batch_prompt, parse_batch_response};
use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::ollama::{ChatRequest, Ollama};

/// Upper bound on generated tokens per request
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Google Gemini API
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Main translation service backed by an LLM provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();
        let provider = match config.provider {
            ConfigTranslationProvider::Gemini => TranslationProviderImpl::Gemini {
                client: Gemini::new(config.get_api_key(), config.get_endpoint(), config.get_model(), timeout_secs),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), config.get_model(), timeout_secs),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(&config.get_endpoint(), timeout_secs)
                    .map_err(|e| anyhow!("Invalid Ollama configuration: {}", e))?,
            },
        };

        Ok(Self { provider, config })
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );

        let result = match &self.provider {
            TranslationProviderImpl::Gemini { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
        };

        result.map_err(|e| anyhow!("Failed to connect to {}: {}", self.config.provider.display_name(), e))
    }

    /// Send one system + user prompt pair and return the raw reply text
    pub async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, ProviderError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let start_time = Instant::now();

        let text = match &self.provider {
            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(model)
                    .system(system_prompt)
                    .add_user_text(prompt)
                    .temperature(temperature)
                    .max_output_tokens(MAX_OUTPUT_TOKENS);
                Gemini::extract_text(&client.complete(request).await?)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, MAX_OUTPUT_TOKENS)
                    .system(system_prompt)
                    .add_message("user", prompt)
                    .temperature(temperature);
                Anthropic::extract_text(&client.complete(request).await?)
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = ChatRequest::new(model)
                    .add_message("system", system_prompt)
                    .add_message("user", prompt)
                    .temperature(temperature);
                Ollama::extract_text(&client.complete(request).await?)
            }
        };

        debug!(
            "{} response received in {:?}",
            self.config.provider.display_name(),
            start_time.elapsed()
        );
        Ok(text)
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>, ProviderError> {
        let format = self.config.common.prompt_format;
        let system_prompt = PromptTemplate::new(&self.config.common.system_prompt).render(target_language);
        let prompt = build_batch_prompt(texts, target_language, format);

        let response = self.complete(&system_prompt, &prompt).await?;
        parse_batch_response(&response, texts.len(), format)
    }
}
