//! Error taxonomy for a pipeline run.
//!
//! Empty input is not an error: it produces an empty count map.

use std::fmt;

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Stages of a run, in the order they execute.
///
/// Only `Map` and `Reduce` run on a worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetch,
    Tokenize,
    Map,
    Shuffle,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Fetch => f.write_str("fetch"),
            Phase::Tokenize => f.write_str("tokenize"),
            Phase::Map => f.write_str("map"),
            Phase::Shuffle => f.write_str("shuffle"),
            Phase::Reduce => f.write_str("reduce"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The text source could not be obtained. No phase was started.
    #[error("input unavailable from {source_desc}: {reason}")]
    InputUnavailable { source_desc: String, reason: String },

    /// A task of the given phase faulted. The whole run is abandoned.
    #[error("{phase} worker failed: {reason}")]
    WorkerFault { phase: Phase, reason: String },

    /// The run was cancelled while the given phase was executing.
    #[error("pipeline cancelled during {phase} phase")]
    Cancelled { phase: Phase },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn input_unavailable(source_desc: impl Into<String>, reason: impl fmt::Display) -> Self {
        PipelineError::InputUnavailable {
            source_desc: source_desc.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_input_unavailable(&self) -> bool {
        matches!(self, PipelineError::InputUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_phase() {
        let err = PipelineError::WorkerFault {
            phase: Phase::Reduce,
            reason: "boom".into(),
        };
        assert_eq!(err.to_string(), "reduce worker failed: boom");

        let err = PipelineError::Cancelled { phase: Phase::Map };
        assert_eq!(err.to_string(), "pipeline cancelled during map phase");

        let err = PipelineError::Cancelled { phase: Phase::Fetch };
        assert_eq!(err.to_string(), "pipeline cancelled during fetch phase");
    }

    #[test]
    fn input_unavailable_helper() {
        let err = PipelineError::input_unavailable("file `a.txt`", "not found");
        assert!(err.is_input_unavailable());
        assert_eq!(err.to_string(), "input unavailable from file `a.txt`: not found");
    }
}
