use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use resistor_search::format::{parse_threshold, parse_value};
use resistor_search::{Error, SearchConfig, SeriesId};

/// Finds combinations of standard resistor values approximating a target.
///
/// Examples:
///   restool -s e24 12.34k           best parallel and series pair for 12.34k
///   restool -s e24 -e 1% 12.34k     same, listing everything within 1%
///   restool -r 1 2 4 8 16           resistors for a 5-bit DAC ladder
#[derive(Parser, Debug)]
#[command(name = "restool", version, verbatim_doc_comment)]
struct Cli {
    /// Series of values to draw from: e3, e6, e12, e24, e48, e96 or e192
    #[arg(short, long, default_value = "e24", env = "RESTOOL_SERIES")]
    series: SeriesId,

    /// Maximum relative error of listed results, as a fraction or percentage (at most 0.101).
    /// The best result is always printed
    #[arg(short = 'e', long = "error", default_value = "0", value_parser = parse_threshold)]
    threshold: f64,

    /// Find a parallel and a series pair approximating a single value (default)
    #[arg(short = 'c', long, conflicts_with_all = ["ratio", "divider"])]
    combination: bool,

    /// Find resistors in the ratio num0:1, or proportional to each of several weights
    #[arg(short = 'r', long, conflicts_with = "divider")]
    ratio: bool,

    /// Treat the values as voltages of a resistive divider, input first
    #[arg(short = 'v', long)]
    divider: bool,

    /// Target value(s), e.g. 150, 12.34k or 4k7
    #[arg(required = true, allow_negative_numbers = true, value_parser = parse_value)]
    values: Vec<f64>,
}

fn run(cli: &Cli) -> Result<()> {
    let config = SearchConfig::new(cli.series, cli.threshold)?;
    tracing::debug!(series = %config.series_id(), threshold = config.threshold(), "config");

    if cli.divider {
        bail!(Error::DividerUnsupported);
    }

    if cli.ratio {
        match cli.values.as_slice() {
            [ratio] => config
                .ratio_pair(*ratio)
                .with_context(|| format!("ratio search for {}", ratio))?
                .print(),
            weights => config
                .weighted_set(weights)
                .context("weighted search")?
                .print(),
        }
        return Ok(());
    }

    ensure!(
        cli.values.len() == 1,
        "a combination search takes exactly one value, got {}",
        cli.values.len()
    );
    let target = cli.values[0];
    let (par, ser) = config
        .combination(target)
        .with_context(|| format!("combination search for {}", target))?;
    par.print();
    println!();
    ser.print();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}
