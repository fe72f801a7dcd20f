use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

use mockingbird::{sample_listings, DemoSupplier};
use vaultsmith::accrual;
use vaultsmith::forecast;
use vaultsmith::intent::IntentParser;
use vaultsmith::matching::{self, VaultListing};
use vaultsmith::supplier::MetricsSupplier;
use vaultsmith::{risk, ChannelMetrics, Config, FileSupplier, QuotePipeline, RiskLevel};

use crate::cli::{ChannelSource, Cli, Commands, ConfigAction, ListingSource, OutputFormat, DEFAULT_DEMO_SEED};
use crate::report::{self, ChannelQuote, CompoundReport, ProjectionReport, RiskReport, ScheduleReport, SearchReport};
use crate::status;

const DEFAULT_CONFIG_FILE: &str = ".streamfund.json";
const DEMO_LISTING_COUNT: usize = 24;

/// Execute a parsed command line, returning what should go to stdout
pub fn run(cli: Cli) -> Result<String> {
  let config = load_config(cli.config.as_deref())?;
  let format = cli.format;

  match cli.command {
    Commands::Quote { channel, source, month, payout_gap } => quote(&config, format, &channel, &source, month, payout_gap),
    Commands::Forecast { metrics, month } => forecast_file(&config, format, &metrics, month),
    Commands::Risk { views, age } => risk_score(format, &views, age),
    Commands::Project { principal, apr, months } => project(format, principal, apr, months),
    Commands::Compound { principal, apr, periods, years } => compound(format, principal, apr, periods, years),
    Commands::Schedule { metrics, history, start, payout_gap } => {
      schedule(&config, format, &metrics, &history, start, payout_gap)
    }
    Commands::Search { query, source } => search(&config, format, &query.join(" "), &source),
    Commands::Config { action } => match action {
      ConfigAction::Show => show_config(&config, format),
      ConfigAction::Init { path, force } => init_config(path, force),
    },
  }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
  match path {
    Some(path) => {
      Config::load_from_file(path).with_context(|| format!("Failed to load config from {}", path.display()))
    }
    None => Config::load().context("Failed to load configuration"),
  }
}

fn current_month() -> u32 {
  Local::now().month()
}

fn read_metrics(path: &Path) -> Result<ChannelMetrics> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read metrics file {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("Failed to parse metrics file {}", path.display()))
}

fn channel_supplier(source: &ChannelSource) -> Result<Box<dyn MetricsSupplier>> {
  if let Some(path) = &source.fixture {
    let supplier = FileSupplier::load(path).with_context(|| format!("Failed to load fixture {}", path.display()))?;
    return Ok(Box::new(supplier));
  }

  let seed = source.demo_seed.unwrap_or_else(|| {
    status::info(&format!("No fixture given, using demo data (seed {DEFAULT_DEMO_SEED})"));
    DEFAULT_DEMO_SEED
  });
  Ok(Box::new(DemoSupplier::new(seed)))
}

fn quote(
  config: &Config,
  format: OutputFormat,
  channel: &str,
  source: &ChannelSource,
  month: Option<u32>,
  payout_gap: f64,
) -> Result<String> {
  let supplier = channel_supplier(source)?;
  let pipeline = QuotePipeline::new(config.clone());
  let month = month.unwrap_or_else(current_month);

  let quote = pipeline
    .quote_channel(supplier.as_ref(), channel, month, payout_gap)
    .with_context(|| format!("Failed to quote channel '{channel}'"))?;
  tracing::info!(channel, mintable = quote.mintable, "quote produced");

  report::render(format, &ChannelQuote { channel: channel.to_string(), quote }, report::pretty_quote)
}

fn forecast_file(config: &Config, format: OutputFormat, metrics_path: &Path, month: Option<u32>) -> Result<String> {
  let metrics = read_metrics(metrics_path)?;
  let result = forecast::forecast(&metrics, month.unwrap_or_else(current_month), &config.rates, &config.forecast)?;
  report::render(format, &result, report::pretty_forecast)
}

fn risk_score(format: OutputFormat, views: &[u64], age: u32) -> Result<String> {
  let score = risk::score(views, age)?;
  let report = RiskReport { score, level: RiskLevel::from_score(score) };
  report::render(format, &report, report::pretty_risk)
}

fn project(format: OutputFormat, principal: f64, apr: f64, months: u32) -> Result<String> {
  let report = ProjectionReport { principal, apr_percent: apr, months: accrual::project(principal, apr, months)?.collect() };
  report::render(format, &report, report::pretty_projection)
}

fn compound(format: OutputFormat, principal: f64, apr: f64, periods: u32, years: f64) -> Result<String> {
  let final_balance = accrual::compound(principal, apr, periods, years)?;
  let effective_apy = if principal > 0.0 { accrual::effective_apy(principal, apr, periods, years)? } else { 0.0 };

  let report = CompoundReport {
    principal,
    apr_percent: apr,
    periods_per_year: periods,
    years,
    final_balance,
    interest_earned: final_balance - principal,
    effective_apy,
  };
  report::render(format, &report, report::pretty_compound)
}

fn schedule(
  config: &Config,
  format: OutputFormat,
  metrics_path: &Path,
  history: &[u64],
  start: Option<NaiveDate>,
  payout_gap: f64,
) -> Result<String> {
  let metrics = read_metrics(metrics_path)?;
  let start = start.unwrap_or_else(|| Local::now().date_naive());

  let quote = QuotePipeline::new(config.clone()).quote(&metrics, history, start.month(), payout_gap)?;
  let payouts = quote.vault.payout_schedule(start)?;

  report::render(format, &ScheduleReport { quote, payouts }, report::pretty_schedule)
}

fn load_listings(source: &ListingSource) -> Result<Vec<VaultListing>> {
  if let Some(path) = &source.listings {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read listings {}", path.display()))?;
    return serde_json::from_str(&content).with_context(|| format!("Failed to parse listings {}", path.display()));
  }

  let seed = source.demo_seed.unwrap_or_else(|| {
    status::info(&format!("No listings file given, using demo marketplace (seed {DEFAULT_DEMO_SEED})"));
    DEFAULT_DEMO_SEED
  });
  Ok(sample_listings(seed, DEMO_LISTING_COUNT))
}

fn search(config: &Config, format: OutputFormat, query: &str, source: &ListingSource) -> Result<String> {
  let listings = load_listings(source)?;
  let parser = IntentParser::new(&config.search)?;
  let intent = parser.parse(query);
  if intent.is_empty() {
    status::warn("No filters recognised, nothing will score above the threshold");
  }

  let results = matching::rank(&listings, &intent, config.search.match_threshold);
  let summary = matching::summarize(query, &results, &intent);

  let report = SearchReport {
    query: query.to_string(),
    filters: intent.to_string(),
    confidence: intent.confidence(),
    results,
    summary,
  };
  report::render(format, &report, report::pretty_search)
}

fn show_config(config: &Config, format: OutputFormat) -> Result<String> {
  Ok(match format {
    OutputFormat::Compact => serde_json::to_string(config)?,
    OutputFormat::Pretty | OutputFormat::Json => serde_json::to_string_pretty(config)?,
  })
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<String> {
  let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
  if path.exists() && !force {
    bail!("{} already exists (use --force to overwrite)", path.display());
  }

  Config::default()
    .save_to_file(&path)
    .with_context(|| format!("Failed to write config to {}", path.display()))?;
  status::done(&format!("Wrote default configuration to {}", path.display()));
  Ok(String::new())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;
  use tempfile::TempDir;

  fn run_args(args: &[&str]) -> Result<String> {
    let mut argv = vec!["streamfund"];
    argv.extend_from_slice(args);
    run(Cli::parse_from(argv))
  }

  fn write_metrics(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("metrics.json");
    let metrics = serde_json::json!({
      "subscriber_count": 2400000,
      "average_views_per_video": 850000,
      "cost_per_mille": 2.8,
      "channel_age_months": 36,
      "category": "gaming",
      "engagement_rate_bps": 600,
      "average_watch_time_secs": 320
    });
    fs::write(&path, metrics.to_string()).unwrap();
    path
  }

  #[test]
  fn test_risk_json() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let config_path = dir.path().join("config.json");
    config.save_to_file(&config_path).unwrap();

    let out = run_args(&["risk", "100", "100", "100", "--age", "36", "--format", "compact", "--config", config_path.to_str().unwrap()])
      .unwrap();
    assert_eq!(out, r#"{"score":0.0,"level":"low"}"#);
  }

  #[test]
  fn test_forecast_file() {
    let dir = TempDir::new().unwrap();
    let metrics = write_metrics(&dir);
    let config_path = dir.path().join("config.json");
    Config::default().save_to_file(&config_path).unwrap();

    let out = run_args(&[
      "forecast",
      "--metrics",
      metrics.to_str().unwrap(),
      "--month",
      "6",
      "--format",
      "json",
      "--config",
      config_path.to_str().unwrap(),
    ])
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["breakdown"]["monthly_views"], 28_050_000);
    assert_eq!(value["confidence"], 0.95);
  }

  #[test]
  fn test_schedule_uses_start_month() {
    let dir = TempDir::new().unwrap();
    let metrics = write_metrics(&dir);
    let config_path = dir.path().join("config.json");
    Config::default().save_to_file(&config_path).unwrap();

    let out = run_args(&[
      "schedule",
      "--metrics",
      metrics.to_str().unwrap(),
      "--history",
      "800000,920000,750000",
      "--start",
      "2025-06-01",
      "--payout-gap",
      "2",
      "--format",
      "json",
      "--config",
      config_path.to_str().unwrap(),
    ])
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["vault"]["duration_months"], 9);
    assert_eq!(value["payouts"].as_array().map(Vec::len), Some(9));
    assert_eq!(value["payouts"][0]["date"], "2025-07-01");
    assert_eq!(value["forecast"]["breakdown"]["seasonal_multiplier"], 0.95);
  }

  #[test]
  fn test_missing_metrics_file_names_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    Config::default().save_to_file(&config_path).unwrap();
    let missing = dir.path().join("nope.json");

    let err = run_args(&["forecast", "--metrics", missing.to_str().unwrap(), "--config", config_path.to_str().unwrap()])
      .unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
  }

  #[test]
  fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("streamfund.json");

    assert!(init_config(Some(target.clone()), false).is_ok());
    assert!(Config::load_from_file(&target).is_ok());
    assert!(init_config(Some(target.clone()), false).is_err());
    assert!(init_config(Some(target), true).is_ok());
  }
}
