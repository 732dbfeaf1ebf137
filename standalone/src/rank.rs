use std::cmp::Reverse;

use itertools::Itertools;

use common::{RankedEntry, WordCountMap};

/// The `n` most frequent words, most frequent first.
///
/// Equal totals keep the map's iteration order, which for a pipeline result
/// means the word that appeared first in the text ranks first.
pub fn top_n(counts: &WordCountMap, n: usize) -> Vec<RankedEntry> {
    counts
        .iter()
        .sorted_by_key(|(_, total)| Reverse(**total))
        .take(n)
        .map(|(word, total)| RankedEntry::new(word.as_str(), *total))
        .collect()
}
