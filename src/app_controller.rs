use anyhow::{Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::translation::{BatchTranslator, TranslationBackend, TranslationService, XliffPipeline, plan_translations};
use crate::xliff::{self, Document};

// @module: Application controller for XLIFF file processing

/// Name of the summary log written next to processed folders
pub const FOLDER_LOG_FILE: &str = "xliff-translator.log";

/// What happened to one input file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// A translated document was written
    Translated {
        /// Output path
        output: PathBuf,
        /// Batches that fell back to source text
        untranslated_batches: usize,
    },
    /// The output already existed and overwriting was not requested
    Skipped {
        /// Existing output path
        output: PathBuf,
    },
}

/// Counts for a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files translated
    pub processed: usize,
    /// Files skipped because their output existed
    pub skipped: usize,
    /// Files that failed
    pub errors: usize,
}

/// Parsed document plus translation statistics, for `inspect`
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Number of translation units
    pub units: usize,
    /// Fragments that would be sent for translation
    pub candidates: usize,
    /// Fragments that would be copied unchanged
    pub copied_verbatim: usize,
    /// The document model
    pub document: Document,
}

/// Input file checked and parsed, ready for translation
enum PreparedFile {
    Skip(PathBuf),
    Ready { document: Document, output: PathBuf },
}

/// Main application controller for XLIFF translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a pipeline around any backend, using the configured batching and retry settings
    pub fn pipeline_for(&self, backend: Arc<dyn TranslationBackend>) -> XliffPipeline {
        XliffPipeline::new(BatchTranslator::from_config(backend, &self.config.translation.common))
    }

    /// Build the provider-backed pipeline.
    ///
    /// Only configuration problems fail here. An unreachable or throttling
    /// provider is logged and the run goes on; batches it cannot serve keep
    /// their source text.
    pub async fn build_pipeline(&self) -> Result<XliffPipeline> {
        let service = TranslationService::new(self.config.translation.clone())?;
        if let Err(e) = service.test_connection().await {
            warn!("{:#}. Continuing; untranslatable batches keep their source text", e);
        }
        info!(
            "Using {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );
        Ok(self.pipeline_for(Arc::new(service)))
    }

    /// Translate one file with the configured provider
    pub async fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        match self.prepare_file(&input_file, output_file, force_overwrite)? {
            PreparedFile::Skip(output) => Ok(FileOutcome::Skipped { output }),
            PreparedFile::Ready { document, output } => {
                let pipeline = self.build_pipeline().await?;
                self.translate_parsed(&pipeline, &input_file, document, &output, &MultiProgress::new())
                    .await
            }
        }
    }

    /// Translate one file with the given pipeline
    pub async fn run_with(
        &self,
        pipeline: &XliffPipeline,
        input_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        match self.prepare_file(input_file, output_file, force_overwrite)? {
            PreparedFile::Skip(output) => Ok(FileOutcome::Skipped { output }),
            PreparedFile::Ready { document, output } => {
                self.translate_parsed(pipeline, input_file, document, &output, &MultiProgress::new())
                    .await
            }
        }
    }

    /// Resolve the output path and parse the input, before any provider is contacted
    fn prepare_file(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<PreparedFile> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        let output = output_file.unwrap_or_else(|| self.default_output_path(input_file));
        if output.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(PreparedFile::Skip(output));
        }

        let document = xliff::parse_file(input_file)?;
        Ok(PreparedFile::Ready { document, output })
    }

    /// Translate every XLIFF file under a directory with the configured provider
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let files = self.folder_inputs(&input_dir)?;
        let pipeline = self.build_pipeline().await?;
        self.run_folder_with_pipeline(&pipeline, &input_dir, files, force_overwrite).await
    }

    /// Translate every XLIFF file under a directory with the given pipeline
    pub async fn run_folder_with(&self, pipeline: &XliffPipeline, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let files = self.folder_inputs(input_dir)?;
        self.run_folder_with_pipeline(pipeline, input_dir, files, force_overwrite).await
    }

    /// Input documents of a folder, excluding outputs generated for the current target language
    fn folder_inputs(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let target_language = &self.config.target_language;
        let files: Vec<PathBuf> = FileManager::find_xliff_files(input_dir)?
            .into_iter()
            .filter(|path| !FileManager::is_translation_output(path, target_language))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No XLIFF files found in directory: {:?}", input_dir));
        }
        Ok(files)
    }

    async fn run_folder_with_pipeline(
        &self,
        pipeline: &XliffPipeline,
        input_dir: &Path,
        files: Vec<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();
        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(Self::progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();
        for input_file in &files {
            let file_name = input_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output_path = self.default_output_path(input_file);
            match self
                .translate_file(pipeline, input_file, &output_path, force_overwrite, &multi_progress)
                .await
            {
                Ok(FileOutcome::Translated { .. }) => summary.processed += 1,
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }
            folder_pb.inc(1);
        }
        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.errors
        );
        info!("{}", summary_message);

        let log_path = input_dir.join(FOLDER_LOG_FILE);
        let entry = format!(
            "{} ({}) - Duration: {}",
            summary_message,
            input_dir.display(),
            Self::format_duration(start_time.elapsed())
        );
        if let Err(e) = FileManager::append_to_log_file(&log_path, &entry) {
            warn!("Failed to write folder summary to {}: {}", log_path.display(), e);
        }

        Ok(summary)
    }

    /// Read, translate and write one document
    pub async fn translate_file(
        &self,
        pipeline: &XliffPipeline,
        input_file: &Path,
        output_path: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome> {
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped {
                output: output_path.to_path_buf(),
            });
        }

        let document = xliff::parse_file(input_file)?;
        self.translate_parsed(pipeline, input_file, document, output_path, multi_progress)
            .await
    }

    /// Translate a parsed document and write it to `output_path`
    async fn translate_parsed(
        &self,
        pipeline: &XliffPipeline,
        input_file: &Path,
        mut document: Document,
        output_path: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome> {
        let target_language = &self.config.target_language;
        info!("Translating {:?} ({} units) to {}", input_file, document.unit_count(), target_language);

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(Self::progress_style("batches"));
        progress_bar.set_message("Translating");
        let report = pipeline
            .translate_document(&mut document, target_language, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        FileManager::write_to_file(output_path, &xliff::to_xliff_string(&document, target_language))?;

        if report.batch.fully_translated() {
            info!("{}", report.summary());
        } else {
            warn!("{}", report.summary());
        }
        info!("Success: {}", output_path.display());

        Ok(FileOutcome::Translated {
            output: output_path.to_path_buf(),
            untranslated_batches: report.batch.fell_back,
        })
    }

    /// Parse a document and describe it without calling any provider
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<InspectReport> {
        let document = xliff::parse_file(path)?;

        let mut planned = document.clone();
        planned.copy_source_to_target();
        let plan = plan_translations(&mut planned);

        Ok(InspectReport {
            units: document.unit_count(),
            candidates: plan.len(),
            copied_verbatim: plan.copied_verbatim,
            document,
        })
    }

    /// `<stem>.<lang>.xlf` next to the input
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        let output_dir = input_file.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(input_file, output_dir, &self.config.target_language)
    }

    fn progress_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
                unit
            ))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
