use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netcalc_cidr::{
    address_in_any, calculate, canonicalize, cidr_in_cidr, distance, ipv4, ipv6, reverse_zone,
    Distance,
};
use netcalc_core::{classify, format, AddressFamily};

mod batch;
mod config;

use batch::{BatchProcessor, BatchResult};
use config::Config;

/// IPv4 / IPv6 address and subnet calculator
#[derive(Parser)]
#[command(name = "netcalc")]
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
    /// Summarize a block (network, broadcast, host range, ...)
    Calc(CalcArgs),
    /// Canonical form of an address, optionally moved by an offset
    Clean(CleanArgs),
    /// Signed distance between two addresses
    Distance(DistanceArgs),
    /// Test whether an address lies in any of the given blocks
    Contains(ContainsArgs),
    /// Test whether one IPv4 block lies inside another
    SubnetIn(SubnetInArgs),
    /// Reverse DNS zone of an address or block
    Arpa(ArpaArgs),
    /// List every address of an IPv4 block (/20 or longer)
    List(ListArgs),
    /// Largest aligned IPv4 block starting at a lower bound
    NextSubnet(NextSubnetArgs),
    /// Convert between a prefix length and an IPv4 netmask
    Mask(MaskArgs),
    /// Summarize many blocks from a file or stdin in parallel
    Batch(BatchArgs),
}

#[derive(Parser)]
struct CalcArgs {
    /// Block in CIDR notation (e.g., 212.224.70.222/24)
    #[arg(value_name = "CIDR")]
    cidr: String,
}

#[derive(Parser)]
struct CleanArgs {
    /// Address, optionally with /prefix
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// Value added to the address
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    offset: i128,
}

#[derive(Parser)]
struct DistanceArgs {
    #[arg(value_name = "FROM")]
    from: String,
    #[arg(value_name = "TO")]
    to: String,
}

#[derive(Parser)]
struct ContainsArgs {
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// One or more blocks in CIDR notation
    #[arg(value_name = "CIDR", required = true)]
    networks: Vec<String>,
}

#[derive(Parser)]
struct SubnetInArgs {
    /// Enclosing block
    #[arg(value_name = "OUTER")]
    outer: String,
    /// Block to test
    #[arg(value_name = "INNER")]
    inner: String,
}

#[derive(Parser)]
struct ArpaArgs {
    /// Address or block
    #[arg(value_name = "TARGET")]
    target: String,
}

#[derive(Parser)]
struct ListArgs {
    #[arg(value_name = "CIDR")]
    cidr: String,
}

#[derive(Parser)]
struct NextSubnetArgs {
    /// First free address
    #[arg(value_name = "LOWER")]
    lower: String,
    /// Last usable address (default: 255.255.255.255)
    #[arg(value_name = "UPPER")]
    upper: Option<String>,
}

#[derive(Parser)]
struct MaskArgs {
    /// Prefix length (24) or netmask (255.255.255.0)
    #[arg(value_name = "PREFIX|NETMASK")]
    value: String,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Number of worker threads (overrides NETCALC_WORKERS)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Serialize)]
struct CleanResult {
    input: String,
    canonical: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full: Option<String>,
}

#[derive(Serialize)]
struct DistanceResult {
    from: String,
    to: String,
    distance: Distance,
}

#[derive(Serialize)]
struct ContainsResult {
    address: String,
    networks: String,
    contained: bool,
}

#[derive(Serialize)]
struct SubnetInResult {
    outer: String,
    inner: String,
    contained: bool,
}

#[derive(Serialize)]
struct ArpaResult {
    target: String,
    zone: String,
}

#[derive(Serialize)]
struct NextSubnetResult {
    lower: String,
    upper: String,
    subnet: Option<String>,
    broadcast: Option<String>,
}

#[derive(Serialize)]
struct MaskResult {
    prefix: u8,
    netmask: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    if !config.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Calc(args) => handle_calc(args, cli.output)?,
        Commands::Clean(args) => handle_clean(args, cli.output)?,
        Commands::Distance(args) => handle_distance(args, cli.output)?,
        Commands::Contains(args) => handle_contains(args, cli.output)?,
        Commands::SubnetIn(args) => handle_subnet_in(args, cli.output)?,
        Commands::Arpa(args) => handle_arpa(args, cli.output)?,
        Commands::List(args) => handle_list(args, cli.output)?,
        Commands::NextSubnet(args) => handle_next_subnet(args, cli.output)?,
        Commands::Mask(args) => handle_mask(args, cli.output)?,
        Commands::Batch(args) => handle_batch(args, config, cli.output)?,
    }

    Ok(())
}

/// Log to stderr; RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn handle_calc(args: CalcArgs, format: OutputFormat) -> Result<()> {
    tracing::info!(cidr = %args.cidr, "calculating block");
    let calc = calculate(&args.cidr)?;
    print_result("Block Summary", &calc, format)
}

fn handle_clean(args: CleanArgs, format: OutputFormat) -> Result<()> {
    let canonical = canonicalize(&args.address, args.offset)?;
    let full = match classify(&canonical) {
        Some(AddressFamily::V6) => Some(ipv6::full(&canonical)?),
        _ => None,
    };

    let result = CleanResult {
        input: args.address,
        canonical,
        full,
    };
    print_result("Canonical Address", &result, format)
}

fn handle_distance(args: DistanceArgs, format: OutputFormat) -> Result<()> {
    let result = DistanceResult {
        distance: distance(&args.from, &args.to)?,
        from: args.from,
        to: args.to,
    };
    print_result("Address Distance", &result, format)
}

fn handle_contains(args: ContainsArgs, format: OutputFormat) -> Result<()> {
    let result = ContainsResult {
        contained: address_in_any(&args.address, &args.networks),
        networks: args.networks.join(" "),
        address: args.address,
    };
    print_result("Containment", &result, format)
}

fn handle_subnet_in(args: SubnetInArgs, format: OutputFormat) -> Result<()> {
    let result = SubnetInResult {
        contained: cidr_in_cidr(&args.outer, &args.inner)?,
        outer: args.outer,
        inner: args.inner,
    };
    print_result("Subnet Containment", &result, format)
}

fn handle_arpa(args: ArpaArgs, format: OutputFormat) -> Result<()> {
    let result = ArpaResult {
        zone: reverse_zone(&args.target)?,
        target: args.target,
    };
    print_result("Reverse Zone", &result, format)
}

fn handle_list(args: ListArgs, format: OutputFormat) -> Result<()> {
    let addresses = ipv4::list_addresses(&args.cidr)?;
    tracing::debug!(count = addresses.len(), "listed addresses");
    print_result("Addresses", &addresses, format)
}

fn handle_next_subnet(args: NextSubnetArgs, format: OutputFormat) -> Result<()> {
    let next = ipv4::find_next_subnet(&args.lower, args.upper.as_deref())?;

    let result = NextSubnetResult {
        lower: ipv4::clean(&args.lower)?,
        upper: match args.upper.as_deref() {
            Some(upper) => ipv4::clean(upper)?,
            None => format::ipv4(u32::MAX),
        },
        subnet: next.map(|n| n.to_string()),
        broadcast: next.map(|n| format::ipv4(n.broadcast)),
    };
    print_result("Next Subnet", &result, format)
}

fn handle_mask(args: MaskArgs, format: OutputFormat) -> Result<()> {
    let result = if args.value.contains('.') {
        MaskResult {
            prefix: ipv4::netmask_to_cidr(&args.value)?,
            netmask: args.value,
        }
    } else {
        let prefix: u8 = match args.value.trim_start_matches('/').parse() {
            Ok(prefix) => prefix,
            Err(_) => bail!("Expected a prefix length or netmask, got {}", args.value),
        };
        MaskResult {
            prefix,
            netmask: ipv4::cidr_to_netmask(prefix)?,
        }
    };
    print_result("Netmask", &result, format)
}

fn handle_batch(args: BatchArgs, config: Config, format: OutputFormat) -> Result<()> {
    let config = config.load_workers()?.with_workers(args.workers)?;
    let processor = BatchProcessor::new(config.workers)?;

    match args.file.as_deref() {
        Some(file) => tracing::info!(file, "reading batch input"),
        None => tracing::info!("reading batch input from stdin"),
    }
    let inputs = batch::read_inputs(args.file.as_deref())?;
    tracing::info!(
        inputs = inputs.len(),
        threads = processor.thread_count(),
        "processing batch"
    );

    let results = processor.process(inputs);
    print_batch(&results, format)
}

fn print_result<T: Serialize>(title: &str, result: &T, format: OutputFormat) -> Result<()> {
    let value = serde_json::to_value(result)?;
    match format {
        OutputFormat::Human => print_human(title, &value),
        OutputFormat::Json => print_json(&value, true)?,
        OutputFormat::JsonCompact => print_json(&value, false)?,
        OutputFormat::Csv => print_csv(&value)?,
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_human(title: &str, value: &Value) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(50).dimmed());

    match value {
        Value::Object(fields) => {
            for (key, field) in fields {
                match field {
                    Value::Null => continue,
                    Value::Bool(true) => println!("{:>15}: {}", key.bold(), "yes".green()),
                    Value::Bool(false) => println!("{:>15}: {}", key.bold(), "no".red()),
                    other => println!("{:>15}: {}", key.bold(), display_value(other)),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("  {}", display_value(item));
            }
        }
        other => println!("  {}", display_value(other)),
    }
    println!();
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

fn print_csv(value: &Value) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    match value {
        Value::Object(fields) => {
            wtr.write_record(fields.keys())?;
            wtr.write_record(fields.values().map(|v| match v {
                Value::Null => String::new(),
                other => display_value(other),
            }))?;
        }
        Value::Array(items) => {
            wtr.write_record(["value"])?;
            for item in items {
                wtr.write_record([display_value(item)])?;
            }
        }
        other => {
            wtr.write_record(["value"])?;
            wtr.write_record([display_value(other)])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn print_batch(results: &[BatchResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for result in results {
                match (&result.result, &result.error) {
                    (Some(_), _) => {
                        let [_, family, network, last, cidrmask, _] = result.csv_row();
                        println!(
                            "{} {} {} {} - {} /{}",
                            "✓".green(),
                            result.input.bold(),
                            family.dimmed(),
                            network,
                            last,
                            cidrmask
                        );
                    }
                    (None, Some(err)) => {
                        println!("{} {} {}", "✗".red(), result.input.bold(), err.red())
                    }
                    (None, None) => {}
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(results)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["input", "family", "network", "last", "cidrmask", "error"])?;
            for result in results {
                wtr.write_record(result.csv_row())?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}
