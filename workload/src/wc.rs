//! A MapReduce-compatible implementation of word count.
//!
//! Words are compared byte for byte: no case folding, no punctuation
//! stripping. `"The"` and `"the,"` are different words.
//!
//! Separators are Unicode whitespace plus the ASCII information separators
//! `\x1c` to `\x1f`, which Rust does not classify as whitespace.

use common::{MappedPair, ReducedPair, ShuffleGroup, Token};

/// Splits text on runs of separators.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .map(Token::new)
        .collect()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

pub fn map(token: Token) -> MappedPair {
    MappedPair::new(token.into_string(), 1)
}

pub fn reduce(group: ShuffleGroup) -> ReducedPair {
    let total: u64 = group.values.iter().sum();
    ReducedPair::new(group.key, total)
}
