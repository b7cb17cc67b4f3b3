/*!
 * Translation of XLIFF documents using AI providers.
 *
 * This module is split into several submodules:
 *
 * - `backend`: The contract every translation backend fulfils
 * - `core`: Provider-backed translation service
 * - `prompts`: Prompt construction and response parsing
 * - `planner`: Selection of translatable fragments
 * - `batch`: Batched translation with throttling retries
 * - `remap`: Writing translations back into the document
 * - `pipeline`: The stages above run over one document
 */

// Re-export main types for easier usage
pub use self::backend::TranslationBackend;
pub use self::batch::{BatchReport, BatchTranslator, RetryPolicy, Sleeper, TokioSleeper};
pub use self::core::TranslationService;
pub use self::pipeline::{PipelineReport, XliffPipeline};
pub use self::planner::{Destination, TranslationPlan, UnitRef, WorkItem, is_translatable, plan_translations};
pub use self::prompts::{PromptFormat, PromptTemplate};
pub use self::remap::{RemapReport, apply_translations};

// Submodules
pub mod backend;
pub mod batch;
pub mod core;
pub mod pipeline;
pub mod planner;
pub mod prompts;
pub mod remap;
