//! Chartify Insight - command line entry point

use anyhow::Context;
use chartify_insight::config::AnalysisConfig;
use chartify_insight::data::sample::SAMPLE_SELECTOR;
use chartify_insight::pipeline;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Explore a table, print summary statistics and render a chart report",
    long_about = "Loads a table, reports its structure, drops incomplete rows, prints \
                  descriptive statistics with group means and writes a 2x2 chart grid \
                  to a PNG file.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CHARTIFY_CONFIG    Path to a JSON configuration file\n  \
                  RUST_LOG           Log filter, overrides the configured level"
)]
struct Cli {
    /// `iris` for the built-in sample, or a path to a CSV/TSV file
    #[arg(default_value = SAMPLE_SELECTOR)]
    source: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AnalysisConfig::from_env().context("loading configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    println!("🎯 DATA ANALYSIS REPORT");
    println!("{}", "=".repeat(40));
    println!("Loading dataset '{}'...", cli.source);

    let summary = pipeline::run(&cli.source, &config);
    pipeline::print_summary(&summary);
    Ok(())
}
