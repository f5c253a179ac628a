// THEORY:
// `AnalyzerConfig` holds the host-side knobs: how long to wait for the auxiliary
// classifier, how many past analyses the history keeps and how wide the batch
// worker pool is. None of these touch the scoring math. Defaults cover the
// common case; `from_env` lets a deployment override them without code changes.

use crate::error::AnalysisError;
use std::time::Duration;

pub const ENV_AUX_TIMEOUT_MS: &str = "DERMA_AUX_TIMEOUT_MS";
pub const ENV_HISTORY_CAPACITY: &str = "DERMA_HISTORY_CAPACITY";
pub const ENV_WORKERS: &str = "DERMA_WORKERS";

const DEFAULT_AUX_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Configuration for the analysis pipeline and its host-side helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// How long the pipeline waits for an auxiliary classifier label.
    pub aux_timeout: Duration,
    /// Maximum number of entries kept in a `HistoryLog`.
    pub history_capacity: usize,
    /// Number of batch worker tasks.
    pub worker_count: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            aux_timeout: Duration::from_millis(DEFAULT_AUX_TIMEOUT_MS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            worker_count: num_cpus::get().max(1),
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overridden by `DERMA_*` environment variables.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_positive(&lookup, ENV_AUX_TIMEOUT_MS)? {
            config.aux_timeout = Duration::from_millis(ms as u64);
        }
        if let Some(capacity) = parse_positive(&lookup, ENV_HISTORY_CAPACITY)? {
            config.history_capacity = capacity;
        }
        if let Some(workers) = parse_positive(&lookup, ENV_WORKERS)? {
            config.worker_count = workers;
        }

        Ok(config)
    }
}

fn parse_positive<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(AnalysisError::Config { key, value: raw }),
    }
}
