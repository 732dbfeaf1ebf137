use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::source;
use standalone::args::{Args, OutputFormat};
use standalone::{chart, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let pipeline = Pipeline::word_count(args.pipeline_config())?;
    let source = source::from_location(&args.input)?;

    // Ctrl-C abandons the run; nothing partial is printed.
    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling...");
            cancel.cancel();
        }
    });

    let counts = match pipeline.run_source(source.as_ref()).await {
        Ok(counts) => counts,
        Err(e) => {
            error!("MapReduce failed: {e}");
            return Err(e.into());
        }
    };

    let ranked = pipeline.rank(&counts);
    info!("Visualizing top {} words...", ranked.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Chart => chart::render_bar_chart(&ranked, &mut out),
        OutputFormat::Json => chart::render_json(&ranked, &mut out),
    }
    .context("failed to write results")?;
    out.flush()?;

    Ok(())
}
