use clap::{Parser, ValueEnum};

use common::config::{default_pool_size, DEFAULT_TOP_N};
use common::PipelineConfig;

/// Pride and Prejudice, from Project Gutenberg.
pub const DEFAULT_INPUT: &str = "https://www.gutenberg.org/files/1342/1342-0.txt";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// URL or file path of the text to count.
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Number of workers in each of the map and reduce pools.
    /// Defaults to the available hardware concurrency.
    #[arg(short, long)]
    pub pool_size: Option<usize>,

    /// Number of words to report.
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// How to print the ranked words.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Chart)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Horizontal text bar chart.
    Chart,
    /// JSON array of `{"word", "total"}` objects.
    Json,
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(
            self.pool_size.unwrap_or_else(default_pool_size),
            self.top_n,
        )
    }
}
