use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use slot_engine::{slot_availability, Availability, IanaZones, Slot};
use tracing::{info, Level};

/// Hourly availability slots for one civil day in any timezone.
#[derive(Parser)]
#[command(name = "slots", version, about, propagate_version = true)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cut an availability payload into hourly slots for one date.
    Slot {
        /// The civil date to slot into (YYYY-MM-DD).
        #[arg(long, env = "SLOTS_DATE", value_parser = parse_date_arg)]
        date: NaiveDate,

        /// IANA timezone the date is observed in.
        #[arg(long, short = 'z', env = "SLOTS_TIMEZONE", default_value = "UTC")]
        timezone: String,

        /// Availability JSON file (reads stdin if omitted).
        input: Option<PathBuf>,
    },

    /// Re-express an availability payload in another timezone.
    Localize {
        /// IANA timezone to present the ranges in.
        #[arg(long, short = 'z', env = "SLOTS_TIMEZONE", default_value = "UTC")]
        timezone: String,

        /// Availability JSON file (reads stdin if omitted).
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Slot {
            date,
            timezone,
            input,
        } => {
            let availability = read_availability(input.as_deref())?;
            let slots = slot_availability(&availability, date, &timezone, &IanaZones)?;
            info!(%date, timezone = %timezone, slots = slots.len(), "generated slots");
            print_ranges(&slots, cli.format)?;
        }
        Command::Localize { timezone, input } => {
            let availability = read_availability(input.as_deref())?;
            let localized = availability.localize_to(&timezone, &IanaZones)?;
            info!(timezone = %timezone, ranges = localized.len(), "localized availability");
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&localized)?),
                Format::Text => print_ranges(localized.time_ranges(), cli.format)?,
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    slot_engine::parse_date(s).map_err(|e| e.to_string())
}

fn read_availability(path: Option<&Path>) -> Result<Availability> {
    let raw = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let stdin = io::stdin();
            let is_terminal = stdin.is_terminal();
            read_stdin(stdin.lock(), is_terminal)?
        }
    };
    serde_json::from_str(&raw).context("Failed to decode availability JSON")
}

fn read_stdin(mut reader: impl Read, is_terminal: bool) -> Result<String> {
    if is_terminal {
        bail!("No INPUT file given and stdin is a terminal; pass a file or pipe availability JSON");
    }
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("Failed to read availability from stdin")?;
    Ok(buf)
}

fn print_ranges(ranges: &[Slot], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(ranges)?),
        Format::Text => {
            for range in ranges {
                println!("{range}");
            }
        }
    }
    Ok(())
}
