use indexmap::IndexMap;

use common::{MappedPair, ShuffleGroup};

/// Group mapped pairs by key.
///
/// Groups come out in the order their key first occurs in `pairs`, and each
/// group's values keep the order they were emitted in. Must only be called
/// with the complete output of the map phase.
pub fn shuffle(pairs: Vec<MappedPair>) -> Vec<ShuffleGroup> {
    let mut grouped: IndexMap<String, Vec<u64>> = IndexMap::new();
    for pair in pairs {
        let (key, value) = pair.into_parts();
        grouped.entry(key).or_default().push(value);
    }

    grouped
        .into_iter()
        .map(|(key, values)| ShuffleGroup { key, values })
        .collect()
}
