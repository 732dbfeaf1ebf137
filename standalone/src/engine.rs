//! Runs a workload through tokenize, map, shuffle and reduce on this machine.
//!
//! Map and reduce run on their own [`WorkerPool`], created for the run and
//! dropped as soon as the phase returns. Tokenizing and shuffling run as
//! single blocking tasks, off the async executor. Shuffling starts only after
//! every map task has been joined, and the count map is only assembled after
//! every reduce task has been joined.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use common::error::{Phase, PipelineError, Result};
use common::source::TextSource;
use common::{PipelineConfig, RankedEntry, ReducedPair, WordCountMap, Workload};

use crate::pool::{run_blocking, WorkerPool};
use crate::rank;
use crate::shuffle::shuffle;

#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    workload: Workload,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, workload: Workload) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            workload,
            cancel: CancellationToken::new(),
        })
    }

    /// A pipeline running the word-count workload.
    pub fn word_count(config: PipelineConfig) -> Result<Self> {
        Self::new(config, workload::word_count())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handle for aborting runs of this pipeline.
    ///
    /// Cancellation is permanent: once the token fires, this and every later
    /// run returns [`PipelineError::Cancelled`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch the text from `source` and run the pipeline over it.
    ///
    /// If the source fails, no phase is started. Cancelling while the fetch
    /// is still pending abandons it straight away.
    pub async fn run_source(&self, source: &dyn TextSource) -> Result<WordCountMap> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { phase: Phase::Fetch });
        }
        let text = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("cancelled while fetching {}", source.describe());
                return Err(PipelineError::Cancelled { phase: Phase::Fetch });
            }
            fetched = source.fetch() => fetched?,
        };
        self.process(text).await
    }

    pub async fn run(&self, text: &str) -> Result<WordCountMap> {
        self.process(text.to_owned()).await
    }

    async fn process(&self, text: String) -> Result<WordCountMap> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { phase: Phase::Tokenize });
        }

        let tokenize = self.workload.tokenize_fn;
        let tokens = run_blocking(Phase::Tokenize, move || tokenize(&text)).await?;
        info!(
            "Performing MapReduce over {} tokens with {} workers per phase",
            tokens.len(),
            self.config.pool_size
        );
        if tokens.is_empty() {
            return Ok(WordCountMap::new());
        }

        let mapped = {
            let pool = WorkerPool::new(Phase::Map, self.config.pool_size, &self.cancel);
            pool.execute(tokens, self.workload.map_fn).await?
        };
        debug!("map phase produced {} pairs", mapped.len());

        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { phase: Phase::Shuffle });
        }
        let groups = run_blocking(Phase::Shuffle, move || shuffle(mapped)).await?;
        debug!("shuffle produced {} groups", groups.len());

        let reduced = {
            let pool = WorkerPool::new(Phase::Reduce, self.config.pool_size, &self.cancel);
            pool.execute(groups, self.workload.reduce_fn).await?
        };

        let counts = collect_counts(reduced);
        info!("MapReduce finished with {} distinct words", counts.len());
        Ok(counts)
    }

    /// Rank `counts` using the configured `top_n`.
    pub fn rank(&self, counts: &WordCountMap) -> Vec<RankedEntry> {
        rank::top_n(counts, self.config.top_n)
    }
}

fn collect_counts(reduced: Vec<ReducedPair>) -> WordCountMap {
    let mut counts = WordCountMap::with_capacity(reduced.len());
    for pair in reduced {
        let (word, total) = pair.into_parts();
        let previous = counts.insert(word, total);
        // One group per key, one reduced pair per group.
        debug_assert!(previous.is_none(), "key reduced twice");
    }
    counts
}
