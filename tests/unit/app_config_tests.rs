/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use std::fs;
use xliff_translator::app_config::{Config, LogLevel, TranslationProvider};
use xliff_translator::translation::PromptFormat;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.available_providers.len(), 3);

    let common = &config.translation.common;
    assert_eq!(common.batch_size, 5);
    assert_eq!(common.retry_count, 5);
    assert_eq!(common.retry_backoff_ms, 1000);
    assert_eq!(common.retry_jitter_ms, 1000);
    assert_eq!(common.rate_limit_delay_ms, 1000);
    assert_eq!(common.prompt_format, PromptFormat::Lines);
    assert!(common.system_prompt.contains("{target_language}"));
}

#[test]
fn test_translationConfig_getters_shouldFallBackToProviderDefaults() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_timeout_secs(), 60);
    assert!(config.translation.get_active_provider_config().is_none());
}

#[test]
fn test_translationConfig_configuredApiKey_shouldWinOverEnvironment() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    let index = config
        .translation
        .available_providers
        .iter()
        .position(|p| p.provider_type == "anthropic")
        .expect("anthropic entry");
    config.translation.available_providers[index].api_key = "configured-key".to_string();

    assert_eq!(config.translation.get_api_key(), "configured-key");
}

#[test]
fn test_setModel_shouldUpdateActiveProviderOnly() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;

    config.set_model("claude-3-5-sonnet-latest");

    assert_eq!(config.translation.get_model(), "claude-3-5-sonnet-latest");
    let gemini = config
        .translation
        .get_provider_config(&TranslationProvider::Gemini)
        .expect("gemini entry");
    assert_eq!(gemini.model, "gemini-1.5-flash");
}

#[test]
fn test_setModel_missingEntry_shouldAddProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.available_providers.clear();

    config.set_model("mistral");

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "mistral");
}

#[test]
fn test_validate_shouldRejectInvalidSettings() {
    let mut config = common::config_for("  ");
    config.translation.provider = TranslationProvider::Ollama;
    assert!(config.validate().is_err());

    config.target_language = "de".to_string();
    assert!(config.validate().is_ok());

    config.translation.common.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_keyedProviderWithoutKey_shouldFail() {
    let mut config = common::config_for("de");
    config.translation.provider = TranslationProvider::Gemini;

    // A key exported in the environment satisfies validation
    if std::env::var("GEMINI_API_KEY").is_err() {
        assert!(config.validate().is_err());
    }
}

#[test]
fn test_translationProvider_fromStr_shouldBeCaseInsensitive() -> Result<()> {
    assert_eq!("GEMINI".parse::<TranslationProvider>()?, TranslationProvider::Gemini);
    assert_eq!("Ollama".parse::<TranslationProvider>()?, TranslationProvider::Ollama);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
    Ok(())
}

#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "fr");
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.translation.common.batch_size, config.translation.common.batch_size);
    Ok(())
}

#[test]
fn test_loadOrCreate_partialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "ja",
            "translation": {
                "provider": "ollama",
                "common": { "batch_size": 12, "prompt_format": "markers" }
            },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.common.batch_size, 12);
    assert_eq!(config.translation.common.prompt_format, PromptFormat::Markers);
    assert_eq!(config.translation.common.retry_count, 5);
    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    Ok(())
}

#[test]
fn test_loadOrCreate_invalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    fs::write(&path, "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
