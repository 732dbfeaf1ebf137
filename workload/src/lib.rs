//! MapReduce applications runnable by the standalone engine.

use common::Workload;

pub mod wc;

/// The word-count application: `(word, 1)` per token, summed per word.
pub fn word_count() -> Workload {
    Workload {
        tokenize_fn: wc::tokenize,
        map_fn: wc::map,
        reduce_fn: wc::reduce,
    }
}
