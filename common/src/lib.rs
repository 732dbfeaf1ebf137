//! Shared types for the word-frequency MapReduce pipeline.
//!
//! The application (tokenize, map, reduce) lives in the `workload` crate and
//! the engine that runs it lives in `standalone`. Everything both sides need
//! to agree on is defined here.

use std::fmt;
use std::fmt::Formatter;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod source;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// Splits the raw input text into the units the map phase consumes.
pub type TokenizeFn = fn(text: &str) -> Vec<Token>;

/// A map function turns one token into one intermediate key-value pair.
pub type MapFn = fn(token: Token) -> MappedPair;

/// A reduce function folds every value collected for a key into a single
/// output pair for that key.
pub type ReduceFn = fn(group: ShuffleGroup) -> ReducedPair;

/// A map reduce application.
#[derive(Copy, Clone)]
pub struct Workload {
    pub tokenize_fn: TokenizeFn,
    pub map_fn: MapFn,
    pub reduce_fn: ReduceFn,
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").finish_non_exhaustive()
    }
}

/////////////////////////////////////////////////////////////////////////////
// Tokens
/////////////////////////////////////////////////////////////////////////////

/// One whitespace-delimited unit of input text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token(String);

impl Token {
    pub fn new(word: impl Into<String>) -> Self {
        Self(word.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns the underlying word.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single key-value pair.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyValue<V> {
    /// The key.
    pub key: String,

    /// The value.
    pub value: V,
}

/// Output of the map phase: `(word, 1)`.
pub type MappedPair = KeyValue<u64>;

/// Output of the reduce phase: `(word, total)`.
pub type ReducedPair = KeyValue<u64>;

impl<V> KeyValue<V> {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Get the key of this key-value pair.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value of this key-value pair.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the key-value pair and returns the key.
    #[inline]
    pub fn into_key(self) -> String {
        self.key
    }

    /// Consumes the key-value pair and returns the value.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Consumes the pair and returns both halves.
    #[inline]
    pub fn into_parts(self) -> (String, V) {
        (self.key, self.value)
    }
}

impl<V: fmt::Display> fmt::Display for KeyValue<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.value)
    }
}

/////////////////////////////////////////////////////////////////////////////
// Shuffle and output types
/////////////////////////////////////////////////////////////////////////////

/// Every intermediate value emitted for one key.
///
/// A group only exists because at least one mapped pair carried its key, so
/// `values` is never empty.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ShuffleGroup {
    pub key: String,
    pub values: Vec<u64>,
}

impl ShuffleGroup {
    pub fn new(key: impl Into<String>, values: Vec<u64>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

/// Final word counts.
///
/// Iterates in the order each word first appeared in the input text. The
/// ranker relies on this for its tie-break.
pub type WordCountMap = IndexMap<String, u64>;

/// One row of the ranked output handed to the output consumer.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct RankedEntry {
    pub word: String,
    pub total: u64,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, total: u64) -> Self {
        Self {
            word: word.into(),
            total,
        }
    }
}

impl From<(&str, u64)> for RankedEntry {
    fn from((word, total): (&str, u64)) -> Self {
        Self::new(word, total)
    }
}
