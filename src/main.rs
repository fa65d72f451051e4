use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use business_analyzer::{
    load_store_with, AggregationEngine, LoadPolicy, LoaderConfig, OutputFormat, Shell, SystemClock,
};

/// List implementation toggle kept for command-line compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListImpl {
    #[value(name = "AL")]
    ArrayList,
    #[value(name = "LL")]
    LinkedList,
}

#[derive(Parser)]
#[command(name = "business-analyzer")]
#[command(about = "Interactive summaries over a business registry CSV", version)]
struct Cli {
    /// Registry file (first line is a header)
    file: PathBuf,

    /// List implementation (accepted, has no effect)
    #[arg(value_enum)]
    list_impl: ListImpl,

    /// Skip malformed lines instead of aborting the load
    #[arg(long)]
    skip_invalid: bool,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Shell output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    debug!(list_impl = ?cli.list_impl, "List implementation selected");

    if !cli.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character, got '{}'", cli.delimiter);
    }

    let policy = if cli.skip_invalid {
        LoadPolicy::SkipInvalid
    } else {
        LoadPolicy::Abort
    };
    let config = LoaderConfig::default()
        .with_delimiter(cli.delimiter as u8)
        .with_policy(policy);

    let outcome = load_store_with(&cli.file, &config)
        .with_context(|| format!("Failed to load {}", cli.file.display()))?;

    if !outcome.skipped.is_empty() {
        eprintln!("Skipped {} malformed line(s)", outcome.skipped.len());
    }
    info!(records = outcome.store.len(), "Starting shell");

    let clock = SystemClock;
    let stdin = io::stdin();
    let mut shell = Shell::new(
        AggregationEngine::new(&outcome.store),
        &clock,
        stdin.lock(),
        io::stdout(),
    )
    .with_format(cli.format);

    shell.run()
}
