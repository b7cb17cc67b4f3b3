/*!
 * End-to-end tests: XLIFF text in, translated XLIFF text out
 */

use anyhow::Result;
use std::time::Duration;
use xliff_translator::providers::mock::MockBackend;
use xliff_translator::xliff::{Document, parse_document};

use crate::common;

fn unit_texts(document: &Document) -> Vec<Option<String>> {
    document.units().map(|unit| unit.target().text.clone()).collect()
}

#[tokio::test]
async fn test_translateStr_sample_shouldPreserveStructure() -> Result<()> {
    common::init_test_logging();
    let backend = MockBackend::working();
    let (pipeline, _) = common::test_pipeline(&backend);

    let (xml, report) = pipeline.translate_str(common::SAMPLE_XLIFF, "de").await?;
    let original = parse_document(common::SAMPLE_XLIFF)?;
    let translated = parse_document(&xml)?;

    assert_eq!(translated.files.len(), original.files.len());
    for (before, after) in original.units().zip(translated.units()) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.source(), after.source());

        let source_spans: Vec<(&str, Option<&str>)> = after
            .source()
            .placeholders
            .iter()
            .map(|span| (span.id.as_str(), span.ctype.as_deref()))
            .collect();
        let target_spans: Vec<(&str, Option<&str>)> = after
            .target()
            .placeholders
            .iter()
            .map(|span| (span.id.as_str(), span.ctype.as_deref()))
            .collect();
        assert_eq!(source_spans, target_spans, "unit {}", after.id);
    }

    assert_eq!(report.units, 4);
    assert_eq!(report.fragments, 4);
    assert_eq!(report.copied_verbatim, 2);
    assert_eq!(report.remap.applied, 4);
    assert!(report.batch.fully_translated());
    Ok(())
}

#[tokio::test]
async fn test_translateStr_sample_shouldTranslateTextAndSpans() -> Result<()> {
    let backend = MockBackend::working();
    let (pipeline, _) = common::test_pipeline(&backend);

    let (xml, _) = pipeline.translate_str(common::SAMPLE_XLIFF, "de").await?;

    assert!(xml.contains("<target>[de] Welcome back</target>"));
    assert!(xml.contains(
        "<target>[de] Save<g id=\"1\" ctype=\"x-bold\">[de] all changes</g><g id=\"2\" ctype=\"x-br\"/></target>"
    ));
    assert!(xml.contains("<target>42</target>"));
    assert!(!xml.contains("x-link"));
    assert!(!xml.contains("stale"));
    Ok(())
}

#[tokio::test]
async fn test_translateStr_fixedReply_shouldBecomeTarget() -> Result<()> {
    let backend = MockBackend::fixed("X");
    let (pipeline, _) = common::test_pipeline(&backend);

    let (xml, _) = pipeline.translate_str(common::HELLO_XLIFF, "fr").await?;
    let document = parse_document(&xml)?;
    let unit = document.units().next().expect("one unit");

    assert_eq!(unit.source().text.as_deref(), Some("Hello world"));
    assert_eq!(unit.target().text.as_deref(), Some("X"));
    assert_eq!(backend.requests(), vec![vec!["Hello world".to_string()]]);
    Ok(())
}

#[tokio::test]
async fn test_translateStr_numericOnlyText_shouldNeverBeSent() -> Result<()> {
    let backend = MockBackend::working();
    let (pipeline, _) = common::test_pipeline(&backend);

    pipeline.translate_str(common::SAMPLE_XLIFF, "fr").await?;

    let sent: Vec<String> = backend.requests().into_iter().flatten().collect();
    assert!(!sent.iter().any(|text| text == "42"));
    assert!(sent.iter().all(|text| !text.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_translateStr_nonCandidatesOnly_shouldNotCallBackend() -> Result<()> {
    let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="n">
    <body>
      <trans-unit id="a"><source>123</source></trans-unit>
      <trans-unit id="b"><source></source></trans-unit>
      <trans-unit id="c"><source>   </source></trans-unit>
      <trans-unit id="d"><source>!!</source></trans-unit>
    </body>
  </file>
</xliff>"#;
    let backend = MockBackend::working();
    let (pipeline, sleeper) = common::test_pipeline(&backend);

    let (output, report) = pipeline.translate_str(xml, "fr").await?;
    let document = parse_document(&output)?;

    assert_eq!(backend.call_count(), 0);
    assert_eq!(report.fragments, 0);
    assert_eq!(report.batch.batches, 0);
    assert!(sleeper.sleeps().is_empty());
    assert_eq!(
        unit_texts(&document),
        vec![Some("123".to_string()), None, None, Some("!!".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_translateStr_failingBackend_shouldCopySourceToTarget() -> Result<()> {
    let backend = MockBackend::failing();
    let (pipeline, sleeper) = common::test_pipeline(&backend);

    let (xml, report) = pipeline.translate_str(common::SAMPLE_XLIFF, "es").await?;
    let document = parse_document(&xml)?;

    for unit in document.units() {
        assert_eq!(unit.target(), unit.source(), "unit {}", unit.id);
    }
    assert_eq!(backend.call_count(), 1);
    assert_eq!(report.batch.fell_back, 1);
    assert!(!report.batch.fully_translated());
    assert!(sleeper.sleeps().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_translateStr_throttledTwice_shouldKeepCountAndOrder() -> Result<()> {
    let backend = MockBackend::throttled(2);
    let (pipeline, sleeper) = common::test_pipeline(&backend);

    let (xml, report) = pipeline.translate_str(&common::xliff_with_units(7), "it").await?;
    let document = parse_document(&xml)?;

    let expected: Vec<Option<String>> = (0..7).map(|i| Some(format!("[it] Text number {}", i))).collect();
    assert_eq!(unit_texts(&document), expected);
    assert_eq!(report.batch.batches, 2);
    assert_eq!(report.batch.throttle_retries, 2);
    assert_eq!(backend.call_count(), 4);
    assert_eq!(
        sleeper.sleeps(),
        vec![
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(1),
            Duration::from_secs(1)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_translateDocument_shouldReportProgressPerBatch() -> Result<()> {
    let backend = MockBackend::working();
    let (pipeline, _) = common::test_pipeline(&backend);
    let mut document = parse_document(&common::xliff_with_units(12))?;
    let calls = parking_lot::Mutex::new(Vec::new());

    pipeline
        .translate_document(&mut document, "pl", |done, total| calls.lock().push((done, total)))
        .await;

    assert_eq!(calls.into_inner(), vec![(1, 3), (2, 3), (3, 3)]);
    Ok(())
}
