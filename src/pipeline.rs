// THEORY:
// The `pipeline` module is the top-level API for a single analysis. It wraps the
// pure core (extract → score → assemble) with the two things the core refuses
// to own: a wall clock and the optional auxiliary classifier.
//
// There is exactly one deterministic path. `analyze` runs it and stamps the
// result with a placeholder label. `analyze_with_classifier` runs the same path
// and then awaits an external classifier under a timeout; whatever comes back
// (a label, an error, or nothing in time) only ever lands in `meta.aux_label`.
// The probabilities are computed before the classifier is even polled, so they
// cannot depend on it.

use crate::config::AnalyzerConfig;
use crate::core_modules::condition_scorer::{ScoreVector, score_conditions};
use crate::core_modules::feature_extractor::extract_features;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::result_assembler::{AnalysisResult, assemble_result};
use crate::error::{AnalysisError, ClassifierError};
use futures::future::BoxFuture;
use std::time::Instant;
use tracing::{debug, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::feature_extractor::FeatureVector;
pub use crate::core_modules::result_assembler::{AUX_LABEL_PLACEHOLDER, ConditionScore};

/// An external, general-purpose image classifier producing a descriptive label.
///
/// Implementations are free to do I/O, run a model or call a service. The
/// pipeline bounds each call with `AnalyzerConfig::aux_timeout`.
pub trait AuxiliaryClassifier: Send + Sync {
    fn classify<'a>(&'a self, buffer: &'a PixelBuffer) -> BoxFuture<'a, Result<String, ClassifierError>>;
}

/// The main entry point for analysing one image.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalyzerConfig,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl AnalysisPipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs the deterministic path only.
    pub fn analyze(&self, buffer: &PixelBuffer) -> Result<AnalysisResult, AnalysisError> {
        let (scores, elapsed_ms) = self.score(buffer)?;
        Ok(assemble_result(&scores, elapsed_ms, buffer.width(), buffer.height(), None))
    }

    /// Runs the deterministic path, then merges a label from `classifier`.
    ///
    /// Classifier errors and timeouts are logged and replaced by the placeholder
    /// label; only malformed pixel input fails the call.
    pub async fn analyze_with_classifier(
        &self,
        buffer: &PixelBuffer,
        classifier: &dyn AuxiliaryClassifier,
    ) -> Result<AnalysisResult, AnalysisError> {
        let (scores, elapsed_ms) = self.score(buffer)?;
        let label = self.auxiliary_label(buffer, classifier).await;
        Ok(assemble_result(
            &scores,
            elapsed_ms,
            buffer.width(),
            buffer.height(),
            label.as_deref(),
        ))
    }

    /// Extraction and scoring, timed together.
    fn score(&self, buffer: &PixelBuffer) -> Result<(ScoreVector, f64), AnalysisError> {
        let started = Instant::now();
        let features = extract_features(buffer)?;
        let scores = score_conditions(&features);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

        let (top, confidence) = scores.top();
        debug!(
            width = buffer.width(),
            height = buffer.height(),
            luminance = features.luminance,
            colorfulness = features.colorfulness,
            red_ratio = features.red_ratio,
            center_vs_edge = features.center_vs_edge,
            top,
            confidence,
            elapsed_ms,
            "scored image"
        );

        Ok((scores, elapsed_ms))
    }

    async fn auxiliary_label(&self, buffer: &PixelBuffer, classifier: &dyn AuxiliaryClassifier) -> Option<String> {
        let timeout = self.config.aux_timeout;
        match tokio::time::timeout(timeout, classifier.classify(buffer)).await {
            Ok(Ok(label)) => Some(label),
            Ok(Err(error)) => {
                warn!(%error, "auxiliary classifier failed");
                None
            }
            Err(_) => {
                let error = ClassifierError::TimedOut(timeout.as_millis() as u64);
                warn!(%error, "auxiliary classifier did not answer in time");
                None
            }
        }
    }
}
