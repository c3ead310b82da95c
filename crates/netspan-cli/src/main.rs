use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use netspan_cidr::{Address, Network, Range};

mod batch;
mod report;

use batch::BatchProcessor;
use report::{AddressReport, BatchRow, ContainsReport, NetworkReport, RangeReport, Report};

/// IPv4/IPv6 address, CIDR network and range toolkit
#[derive(Parser)]
#[command(name = "netspan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every representation of an address
    Address(AddressArgs),
    /// Describe a CIDR network
    Network(NetworkArgs),
    /// Decompose a range into CIDR blocks
    Range(RangeArgs),
    /// Test whether an address, network or range lies within a range
    Contains(ContainsArgs),
    /// Decompose range expressions from a file or stdin in parallel
    Batch(BatchArgs),
}

#[derive(Parser)]
struct AddressArgs {
    /// Dotted quad, IPv6 literal, bit string, hex or decimal
    #[arg(value_name = "INPUT")]
    input: String,
}

#[derive(Parser)]
struct NetworkArgs {
    /// CIDR literal (e.g., 192.168.0.0/16) or a bare address
    #[arg(value_name = "CIDR")]
    cidr: String,
}

#[derive(Parser)]
struct RangeArgs {
    /// First address, or a whole range expression ("A - B", CIDR)
    #[arg(value_name = "FIRST")]
    first: String,

    /// Last address
    #[arg(value_name = "LAST")]
    last: Option<String>,
}

#[derive(Parser)]
struct ContainsArgs {
    /// Enclosing range expression
    #[arg(value_name = "RANGE")]
    range: String,

    /// Address, CIDR or range expression to test
    #[arg(value_name = "OTHER")]
    other: String,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable table output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Address(args) => handle_address(args, cli.output)?,
        Commands::Network(args) => handle_network(args, cli.output)?,
        Commands::Range(args) => handle_range(args, cli.output)?,
        Commands::Contains(args) => handle_contains(args, cli.output)?,
        Commands::Batch(args) => handle_batch(args, cli.output)?,
    }

    Ok(())
}

/// Logs go to stderr; `NETSPAN_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("NETSPAN_LOG").unwrap_or_else(|_| level(verbose).into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn handle_address(args: AddressArgs, format: OutputFormat) -> Result<()> {
    let address = Address::parse(args.input.as_str())
        .with_context(|| format!("Invalid address: {}", args.input))?;

    print_result(&AddressReport::new(&args.input, address), format)
}

fn handle_network(args: NetworkArgs, format: OutputFormat) -> Result<()> {
    let net = Network::parse(args.cidr.as_str())
        .with_context(|| format!("Invalid network: {}", args.cidr))?;

    print_result(&NetworkReport::from(net), format)
}

fn handle_range(args: RangeArgs, format: OutputFormat) -> Result<()> {
    let range = match args.last {
        Some(ref last) => Range::new(args.first.as_str(), last.as_str()),
        None => Range::parse(args.first.as_str()),
    }
    .context("Invalid range")?;

    info!(range = %range, "decomposing");
    print_result(&RangeReport::from(range), format)
}

fn handle_contains(args: ContainsArgs, format: OutputFormat) -> Result<()> {
    let range = Range::parse(args.range.as_str())
        .with_context(|| format!("Invalid range: {}", args.range))?;
    let contained = range
        .contains_input(args.other.as_str())
        .with_context(|| format!("Invalid input: {}", args.other))?;

    let report = ContainsReport {
        range,
        other: args.other,
        contained,
    };
    print_result(&report, format)
}

fn handle_batch(args: BatchArgs, format: OutputFormat) -> Result<()> {
    let processor = BatchProcessor::new(args.workers)?;

    match args.file.as_deref() {
        Some(file) if file != "-" => info!("Reading from: {}", file),
        _ => info!("Reading from stdin"),
    }
    info!("Batch processing with {} workers", processor.thread_count());

    let lines = batch::read_lines(args.file.as_deref())?;
    let rows: Vec<BatchRow> = processor
        .process_ranges(lines)
        .into_iter()
        .map(BatchRow::from)
        .collect();

    print_all(&rows, format)?;

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 && matches!(format, OutputFormat::Human) {
        eprintln!("{} {} of {} lines failed", "›".yellow(), failed, rows.len());
    }
    Ok(())
}

fn print_result<R: Report>(result: &R, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => result.print_human(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(result)?),
        OutputFormat::Csv => print_csv(std::slice::from_ref(result))?,
    }
    Ok(())
}

fn print_all<R: Report>(results: &[R], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => results.iter().for_each(Report::print_human),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(results)?),
        OutputFormat::Csv => print_csv(results)?,
    }
    Ok(())
}

fn print_csv<R: Report>(results: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(R::csv_header())?;
    for result in results {
        wtr.write_record(result.csv_record())?;
    }
    wtr.flush()?;
    Ok(())
}
