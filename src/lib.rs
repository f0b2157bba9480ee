//! Penguinview: shareable, URL-synchronized exploration of the Palmer
//! penguins dataset.
//!
//! The whole view (chart kind, plotted fields and six filter dimensions)
//! lives in the page's query string, so any view can be shared as a link.
//! This crate holds the pieces that make that work outside of any UI
//! toolkit.
//!
//! # Modules
//!
//! - [`data`]: vocabularies, records, ingestion and category normalization
//! - [`filter`]: the commutative filter pipeline
//! - [`chart`]: chart configuration and partial updates
//! - [`aggregate`]: histogram, box plot and scatter aggregations
//! - [`url_state`]: query-string codec and address-bar sync controller
//! - [`logging`]: `tracing` subscriber setup for the CLI
//! - [`error`]: error types

pub mod aggregate;
pub mod chart;
pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod url_state;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::PenguinviewError;

use crate::aggregate::SummaryOptions;
use crate::data::DatasetFormat;
use crate::logging::{LogConfig, LogFormat};
use crate::url_state::{
    query_from_input, CodecOptions, MemoryLocation, SyncOptions, UrlState, UrlStateCodec,
    UrlSyncController,
};

/// The penguinview CLI application.
#[derive(Parser)]
#[command(name = "penguinview")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Decode a query string (or full URL) into chart and filter state.
    Decode(DecodeArgs),
    /// Print the canonical share URL for a URL's state.
    Share(ShareArgs),
    /// Summarize a dataset under the filters and chart of a query string.
    Summary(SummaryArgs),
}

/// How command results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Bin count handling shared by commands that decode queries.
#[derive(clap::Args)]
struct BinArgs {
    /// Bin count used when `bins` is missing or invalid.
    #[arg(
        long,
        default_value_t = chart::DEFAULT_BINS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(chart::BIN_LIMIT_CEILING))
    )]
    default_bins: u32,

    /// Largest accepted `bins` value.
    #[arg(
        long,
        default_value_t = chart::MAX_BINS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(chart::BIN_LIMIT_CEILING))
    )]
    max_bins: u32,
}

impl BinArgs {
    fn codec(&self) -> UrlStateCodec {
        UrlStateCodec::new(CodecOptions {
            default_bins: self.default_bins,
            max_bins: self.max_bins,
        })
    }
}

/// Arguments for the decode subcommand.
#[derive(clap::Args)]
struct DecodeArgs {
    /// Query string (with or without '?') or absolute URL.
    input: String,

    #[command(flatten)]
    bins: BinArgs,

    /// Output format ('text' or 'json').
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the share subcommand.
#[derive(clap::Args)]
struct ShareArgs {
    /// Absolute URL whose query describes the view.
    url: String,

    #[command(flatten)]
    bins: BinArgs,
}

/// Arguments for the summary subcommand.
#[derive(clap::Args)]
struct SummaryArgs {
    /// Dataset file (JSON array of rows, or the CSV export).
    #[arg(long, env = "PENGUINVIEW_DATA")]
    data: PathBuf,

    /// Dataset format ('json' or 'csv'). Inferred from the extension when omitted.
    #[arg(long)]
    format: Option<String>,

    /// Query string (or URL) selecting chart and filters.
    #[arg(long, default_value = "")]
    query: String,

    #[command(flatten)]
    bins: BinArgs,

    /// Width of count bars in text output.
    #[arg(long, default_value_t = 20)]
    bar_width: usize,

    /// Decimal places for measurements in text output.
    #[arg(long, default_value_t = 1)]
    decimals: usize,

    /// Output format ('text' or 'json').
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Run the penguinview CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PenguinviewError> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(std::io::stderr().is_terminal());
    logging::init_logging(&log_config)?;

    match cli.command {
        Some(Commands::Decode(args)) => run_decode(args),
        Some(Commands::Share(args)) => run_share(args),
        Some(Commands::Summary(args)) => run_summary(args),
        None => {
            println!("penguinview {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Shareable, URL-synchronized penguin data exploration.");
            println!();
            println!("Run 'penguinview --help' for usage information.");
            Ok(())
        }
    }
}

fn run_decode(args: DecodeArgs) -> Result<(), PenguinviewError> {
    let codec = args.bins.codec();
    let query = query_from_input(&args.input)?;
    let state = codec.decode(&query);

    match args.output {
        OutputFormat::Json => print_json(&state)?,
        OutputFormat::Text => {
            print!("{}", state);
            println!("{:<12} {}", "query:", codec.encode(&state));
        }
    }
    Ok(())
}

fn run_share(args: ShareArgs) -> Result<(), PenguinviewError> {
    let location = MemoryLocation::parse(args.url.trim())?;
    let mut controller = UrlSyncController::with_codec(args.bins.codec(), SyncOptions::default());

    let mut state = UrlState::default();
    let current = state.clone();
    controller.mount(&location, &current, &mut state);

    println!("{}", controller.build_share_url(&location, &state));
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<(), PenguinviewError> {
    let format = match args.format.as_deref() {
        Some(name) => DatasetFormat::from_name(name)?,
        None => DatasetFormat::from_path(&args.data),
    };

    tracing::info!(path = %args.data.display(), ?format, "loading dataset");
    let records = data::load_dataset(&args.data, format)?;
    let unexpected = data::normalize::unexpected_category_summary();

    let query = query_from_input(&args.query)?;
    let state = args.bins.codec().decode(&query);

    let opts = SummaryOptions {
        bar_width: args.bar_width,
        decimals: args.decimals,
    };
    let report = aggregate::summarize(&records, &state.chart, &state.filters, &opts)
        .with_unexpected_values(unexpected);

    match args.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), PenguinviewError> {
    let json = serde_json::to_string_pretty(value).map_err(PenguinviewError::ReportSerialize)?;
    println!("{}", json);
    Ok(())
}
