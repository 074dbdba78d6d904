//! Scheduling of per-file analysis.

use serde::{Deserialize, Serialize};

const fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Tokenize, parse and normalize files on a worker pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker pool size. `0` lets the pool pick one per core.
    #[serde(default)]
    pub worker_threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            worker_threads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AnalysisConfig::default();
        assert!(config.parallel);
        assert_eq!(config.worker_threads, 0);
    }
}
