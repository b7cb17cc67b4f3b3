/*!
 * Document translation pipeline.
 *
 * Runs the stages over one parsed document, in order:
 * 1. Copy-forward: every target becomes a copy of its source
 * 2. Planning: collect translatable fragments, copy the rest verbatim
 * 3. Batch translation
 * 4. Remapping: write translations into the targets
 */

use log::info;
use std::time::{Duration, Instant};

use super::batch::{BatchReport, BatchTranslator};
use super::planner::plan_translations;
use super::remap::{RemapReport, apply_translations};
use crate::errors::ParseError;
use crate::xliff::{Document, parse_document, to_xliff_string};

/// Result of translating one document
#[derive(Debug)]
pub struct PipelineReport {
    /// Translation units in the document
    pub units: usize,

    /// Fragments sent for translation
    pub fragments: usize,

    /// Fragments copied to the target unchanged
    pub copied_verbatim: usize,

    /// Batch statistics
    pub batch: BatchReport,

    /// Remapping statistics
    pub remap: RemapReport,

    /// Total duration
    pub duration: Duration,
}

impl PipelineReport {
    /// Get a summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "{} unit(s), {} fragment(s) translated in {} batch(es), {} copied verbatim, {} batch(es) left untranslated, {:.2}s",
            self.units,
            self.remap.applied,
            self.batch.batches,
            self.copied_verbatim,
            self.batch.fell_back,
            self.duration.as_secs_f32()
        )
    }
}

/// Translates whole XLIFF documents
pub struct XliffPipeline {
    translator: BatchTranslator,
}

impl XliffPipeline {
    /// Create a pipeline around a batch translator.
    pub fn new(translator: BatchTranslator) -> Self {
        Self { translator }
    }

    /// The batch translator in use
    pub fn translator(&self) -> &BatchTranslator {
        &self.translator
    }

    /// Translate a document in place.
    ///
    /// Never fails: fragments whose batch could not be translated keep their
    /// source text.
    pub async fn translate_document<F>(&self, document: &mut Document, target_language: &str, progress: F) -> PipelineReport
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let start_time = Instant::now();

        document.copy_source_to_target();
        let plan = plan_translations(document);
        info!(
            "Planned {} fragment(s) for translation to {} ({} copied verbatim)",
            plan.len(),
            target_language,
            plan.copied_verbatim
        );

        let texts = plan.texts();
        let (translations, batch) = self
            .translator
            .translate_all_with_progress(&texts, target_language, progress)
            .await;
        let remap = apply_translations(document, &plan.items, translations);

        PipelineReport {
            units: document.unit_count(),
            fragments: plan.len(),
            copied_verbatim: plan.copied_verbatim,
            batch,
            remap,
            duration: start_time.elapsed(),
        }
    }

    /// Parse, translate and serialize an XLIFF string.
    pub async fn translate_str(&self, xml: &str, target_language: &str) -> Result<(String, PipelineReport), ParseError> {
        let mut document = parse_document(xml)?;
        let report = self.translate_document(&mut document, target_language, |_, _| {}).await;
        Ok((to_xliff_string(&document, target_language), report))
    }
}
