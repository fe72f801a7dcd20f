use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Seed used for demo data when no input file is given
pub const DEFAULT_DEMO_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "streamfund")]
#[command(about = "Stream Fund - creator revenue vault pricing\nForecast, risk-score and price yield vaults, project returns, and search listings")]
#[command(version)]
pub struct Cli {
  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
  pub format: OutputFormat,

  /// Configuration file (defaults to .streamfund.json, streamfund.json, then the user config dir)
  #[arg(long, global = true, env = "STREAMFUND_CONFIG")]
  pub config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
  /// Human-readable, colored
  Pretty,
  /// Indented JSON
  Json,
  /// Single-line JSON
  Compact,
}

/// Where channel figures come from
#[derive(Args, Debug)]
pub struct ChannelSource {
  /// JSON fixture keyed by channel id
  #[arg(long, value_name = "FILE", conflicts_with = "demo_seed")]
  pub fixture: Option<PathBuf>,

  /// Generate reproducible demo data from this seed
  #[arg(long, value_name = "N")]
  pub demo_seed: Option<u64>,
}

/// Where vault listings come from
#[derive(Args, Debug)]
pub struct ListingSource {
  /// JSON array of vault listings
  #[arg(long, value_name = "FILE", conflicts_with = "demo_seed")]
  pub listings: Option<PathBuf>,

  /// Generate reproducible demo listings from this seed
  #[arg(long, value_name = "N")]
  pub demo_seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Price a vault for a channel end to end
  Quote {
    /// Channel identifier
    channel: String,
    #[command(flatten)]
    source: ChannelSource,
    /// Calendar month for seasonality (1-12, defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Months between payouts
    #[arg(long, default_value_t = vaultsmith::pipeline::DEFAULT_PAYOUT_GAP_MONTHS)]
    payout_gap: f64,
  },
  /// Forecast monthly revenue from a metrics file
  Forecast {
    /// JSON file holding one channel's metrics
    #[arg(long, value_name = "FILE")]
    metrics: PathBuf,
    /// Calendar month for seasonality (1-12, defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
  },
  /// Score volatility risk from a view history
  Risk {
    /// View counts, oldest first
    #[arg(required = true)]
    views: Vec<u64>,
    /// Channel age in months
    #[arg(long)]
    age: u32,
  },
  /// Month-by-month compounding projection
  Project {
    #[arg(long)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long)]
    apr: f64,
    #[arg(long)]
    months: u32,
  },
  /// Final balance under periodic compounding
  Compound {
    #[arg(long)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long)]
    apr: f64,
    /// Compounding periods per year
    #[arg(long, default_value_t = 12)]
    periods: u32,
    #[arg(long)]
    years: f64,
  },
  /// Price a vault from a metrics file and lay out its payout calendar
  Schedule {
    /// JSON file holding one channel's metrics
    #[arg(long, value_name = "FILE")]
    metrics: PathBuf,
    /// Comma-separated view counts, oldest first
    #[arg(long, value_delimiter = ',', required = true)]
    history: Vec<u64>,
    /// First day of the vault (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Months between payouts
    #[arg(long, default_value_t = vaultsmith::pipeline::DEFAULT_PAYOUT_GAP_MONTHS)]
    payout_gap: f64,
  },
  /// Search vault listings with a free-text query
  Search {
    /// Query words, e.g. "12% apr gaming low risk"
    #[arg(required = true)]
    query: Vec<String>,
    #[command(flatten)]
    source: ListingSource,
  },
  /// Inspect or create configuration
  Config {
    #[command(subcommand)]
    action: ConfigAction,
  },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
  /// Print the effective configuration
  Show,
  /// Write the default configuration to a file
  Init {
    /// Destination (defaults to .streamfund.json)
    path: Option<PathBuf>,
    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
  },
}
