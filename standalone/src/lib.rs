//! Single-machine MapReduce engine.
//!
//! Runs a [`common::Workload`] over an in-memory text with parallel map and
//! reduce phases, then ranks the result for an output consumer.

pub mod args;
pub mod chart;
pub mod engine;
pub mod pool;
pub mod rank;
pub mod shuffle;

pub use engine::Pipeline;
