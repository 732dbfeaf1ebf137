use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Number of ranked entries handed to the output consumer by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent workers in each of the map and reduce pools.
    pub pool_size: usize,

    /// Number of entries to rank.
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl PipelineConfig {
    pub fn new(pool_size: usize, top_n: usize) -> Self {
        Self { pool_size, top_n }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "pool size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hardware concurrency, or 1 when it cannot be determined.
pub fn default_pool_size() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
