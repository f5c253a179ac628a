// THEORY:
// This file is the main entry point for the `derma_vision` library crate.
// It exposes the deterministic analysis core (feature extraction, condition
// scoring and result assembly over a fixed catalog) together with the host-side
// layer that drives it: the `AnalysisPipeline`, the `BatchAnalyzer` worker pool,
// the bounded `HistoryLog` and the configuration struct.
//
// The core modules never touch I/O, clocks or shared mutable state. Everything
// with side effects (timing, decoding, the auxiliary classifier, history) lives
// in the pipeline layer, which owns it and calls into the pure functions.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod history;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::AnalyzerConfig;
pub use core_modules::condition_catalog::{CATALOG, CONDITION_COUNT, ConditionDefinition};
pub use core_modules::condition_scorer::{ScoreVector, score_conditions};
pub use core_modules::feature_extractor::{FeatureVector, extract_features};
pub use core_modules::pixel_buffer::PixelBuffer;
pub use core_modules::result_assembler::{
    AUX_LABEL_PLACEHOLDER, AnalysisMeta, AnalysisResult, CareAdvice, ConditionScore,
    assemble_result,
};
pub use error::{AnalysisError, ClassifierError};
pub use history::{HistoryEntry, HistoryLog};
pub use parallel_pipeline::BatchAnalyzer;
pub use pipeline::{AnalysisPipeline, AuxiliaryClassifier};
