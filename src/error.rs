// THEORY:
// Errors are split by who can recover from them. `AnalysisError` covers
// everything the caller must see: malformed pixel input (a silently wrong
// feature vector would corrupt every downstream probability), decode failures,
// bad configuration and host-side persistence problems. `ClassifierError` is
// the auxiliary classifier's own failure type; the pipeline logs it and swaps
// in a placeholder label, so it never escapes an analysis call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Zero-area input is a hard precondition violation.
    #[error("invalid image geometry {width}x{height}: both dimensions must be at least 1")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("pixel buffer is empty")]
    EmptyPixels,

    #[error("pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// A caller-built probability vector broke the [0,1] / sum-to-one invariants.
    #[error("probabilities are not a normalized distribution (sum = {sum})")]
    UnnormalizedScores { sum: f64 },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid configuration value for {key}: {value:?}")]
    Config { key: &'static str, value: String },

    #[error("history serialization failed: {0}")]
    History(#[from] serde_json::Error),

    #[error("batch worker pool is unavailable: {0}")]
    WorkerPool(&'static str),
}

/// Failure reported by an auxiliary classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classification failed: {0}")]
    Failed(String),

    #[error("classifier timed out after {0} ms")]
    TimedOut(u64),
}
