/*!
 * Tests for prompt building, planning, batching and remapping
 */

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use xliff_translator::errors::{ProviderError, TranslationError};
use xliff_translator::providers::mock::{MockBackend, RecordingSleeper};
use xliff_translator::translation::prompts::{build_batch_prompt, parse_batch_response};
use xliff_translator::translation::{
    BatchTranslator, Destination, PromptFormat, TranslationBackend, apply_translations, is_translatable,
    plan_translations,
};
use xliff_translator::xliff::parse_document;

use crate::common;

/// Backend that answers a line prompt by upper-casing every requested line
struct LineEchoBackend {
    format: PromptFormat,
}

#[async_trait]
impl TranslationBackend for LineEchoBackend {
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>, ProviderError> {
        let prompt = build_batch_prompt(texts, target_language, self.format);
        let reply = match self.format {
            PromptFormat::Lines => prompt.lines().skip(1).map(str::to_uppercase).collect::<Vec<_>>().join("\n\n"),
            PromptFormat::Markers => prompt
                .lines()
                .skip(1)
                .map(|line| if line.starts_with("<<") { line.to_string() } else { line.to_uppercase() })
                .collect::<Vec<_>>()
                .join("\n"),
        };
        parse_batch_response(&reply, texts.len(), self.format)
    }
}

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_isTranslatable_shouldClassifyFragments() {
    for text in ["123", "", "   ", "!!", "42 %", "\u{00e9}\u{00e8}"] {
        assert!(!is_translatable(text), "{:?} should be copied verbatim", text);
    }
    for text in ["Hello", "Bonjour 123", "a", " x "] {
        assert!(is_translatable(text), "{:?} should be translated", text);
    }
}

#[test]
fn test_planTranslations_sample_shouldListCandidatesInTraversalOrder() -> Result<()> {
    let mut document = parse_document(common::SAMPLE_XLIFF)?;
    document.copy_source_to_target();

    let plan = plan_translations(&mut document);

    assert_eq!(plan.texts(), texts(&["Welcome back", "Save", "all changes", "About us"]));
    assert_eq!(plan.copied_verbatim, 2);
    assert!(matches!(
        &plan.items[2].destination,
        Destination::Placeholder { placeholder_id, .. } if placeholder_id == "1"
    ));
    Ok(())
}

#[test]
fn test_planTranslations_shouldDropStaleTargetMarkup() -> Result<()> {
    let mut document = parse_document(common::SAMPLE_XLIFF)?;
    document.copy_source_to_target();
    plan_translations(&mut document);

    let unit = document.files[0].unit("save").expect("unit exists");
    assert_eq!(unit.target(), unit.source());
    assert!(unit.target().placeholder("9").is_none());
    Ok(())
}

#[test]
fn test_applyTranslations_shouldFillTargetsOnly() -> Result<()> {
    let mut document = parse_document(common::SAMPLE_XLIFF)?;
    document.copy_source_to_target();
    let plan = plan_translations(&mut document);
    let translated: Vec<String> = plan.texts().iter().map(|text| format!("<{}>", text)).collect();

    let report = apply_translations(&mut document, &plan.items, translated);

    assert_eq!(report.applied, 4);
    assert_eq!(report.skipped, 0);
    let unit = document.files[0].unit("save").expect("unit exists");
    assert_eq!(unit.source().text.as_deref(), Some("Save"));
    assert_eq!(unit.target().text.as_deref(), Some("<Save>"));
    assert_eq!(unit.target().placeholder("1").map(|span| span.text.as_str()), Some("<all changes>"));
    assert_eq!(unit.target().placeholder("2").map(|span| span.text.as_str()), Some(""));
    Ok(())
}

#[tokio::test]
async fn test_batchTranslator_lineEchoBackend_shouldRoundTripPrompts() {
    let backend = Arc::new(LineEchoBackend { format: PromptFormat::Lines });
    let translator = BatchTranslator::new(backend)
        .with_batch_size(2)
        .with_sleeper(Arc::new(RecordingSleeper::new()));

    let input = texts(&["one", "two\nlines", "three"]);
    let (output, report) = translator.translate_all(&input, "de").await;

    assert_eq!(output, texts(&["ONE", "TWO LINES", "THREE"]));
    assert_eq!(report.batches, 2);
    assert!(report.fully_translated());
}

#[tokio::test]
async fn test_batchTranslator_markerEchoBackend_shouldKeepMultilineEntries() {
    let backend = Arc::new(LineEchoBackend { format: PromptFormat::Markers });
    let translator = BatchTranslator::new(backend).with_sleeper(Arc::new(RecordingSleeper::new()));

    let input = texts(&["first", "second\nline"]);
    let (output, _) = translator.translate_all(&input, "de").await;

    assert_eq!(output, texts(&["FIRST", "SECOND\nLINE"]));
}

#[tokio::test]
async fn test_batchTranslator_throttledThenFailing_shouldRecordEachFailure() {
    let backend = MockBackend::always_throttled();
    let sleeper = RecordingSleeper::new();
    let translator = BatchTranslator::new(Arc::new(backend.clone()))
        .with_policy(common::deterministic_policy())
        .with_batch_size(3)
        .with_sleeper(Arc::new(sleeper.clone()));

    let input = texts(&["a", "b", "c", "d"]);
    let (output, report) = translator.translate_all(&input, "fr").await;

    assert_eq!(output, input);
    assert_eq!(report.fell_back, 2);
    assert_eq!(backend.call_count(), 10);
    assert_eq!(report.throttle_retries, 8);
    assert!(report.failures.iter().all(|failure| matches!(
        failure.error,
        TranslationError::RetryBudgetExhausted { attempts: 5, .. }
    )));
    // 2 + 4 + 8 + 16 seconds per batch, no pacing after failures
    assert_eq!(sleeper.total(), Duration::from_secs(60));
}

#[tokio::test]
async fn test_batchTranslator_fromConfig_shouldUseConfiguredBatchSize() {
    let mut config = common::config_for("es");
    config.translation.common.batch_size = 2;
    config.translation.common.rate_limit_delay_ms = 10;
    let backend = MockBackend::working();
    let sleeper = RecordingSleeper::new();
    let translator = BatchTranslator::from_config(Arc::new(backend.clone()), &config.translation.common)
        .with_sleeper(Arc::new(sleeper.clone()));

    let (_, report) = translator.translate_all(&texts(&["a", "b", "c"]), "es").await;

    assert_eq!(translator.batch_size(), 2);
    assert_eq!(report.batches, 2);
    assert_eq!(backend.requests(), vec![texts(&["a", "b"]), texts(&["c"])]);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(10); 2]);
}
