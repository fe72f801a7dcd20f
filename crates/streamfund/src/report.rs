//! Rendering command results as colored text or JSON

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt::Write;

use vaultsmith::accrual::ProjectionEntry;
use vaultsmith::forecast::ForecastResult;
use vaultsmith::matching::RankedVault;
use vaultsmith::vault::ScheduledPayout;
use vaultsmith::{RiskLevel, VaultQuote};

use crate::cli::OutputFormat;

const LABEL_WIDTH: usize = 18;

#[derive(Debug, Serialize)]
pub struct ChannelQuote {
  pub channel: String,
  #[serde(flatten)]
  pub quote: VaultQuote,
}

#[derive(Debug, Serialize)]
pub struct RiskReport {
  pub score: f64,
  pub level: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct ProjectionReport {
  pub principal: f64,
  pub apr_percent: f64,
  pub months: Vec<ProjectionEntry>,
}

#[derive(Debug, Serialize)]
pub struct CompoundReport {
  pub principal: f64,
  pub apr_percent: f64,
  pub periods_per_year: u32,
  pub years: f64,
  pub final_balance: f64,
  pub interest_earned: f64,
  pub effective_apy: f64,
}

#[derive(Debug, Serialize)]
pub struct ScheduleReport {
  #[serde(flatten)]
  pub quote: VaultQuote,
  pub payouts: Vec<ScheduledPayout>,
}

#[derive(Debug, Serialize)]
pub struct SearchReport {
  pub query: String,
  pub filters: String,
  pub confidence: f64,
  pub results: Vec<RankedVault>,
  pub summary: String,
}

/// Render `value` in the requested format, using `pretty` for human output
pub fn render<T: Serialize>(format: OutputFormat, value: &T, pretty: impl Fn(&T) -> String) -> Result<String> {
  Ok(match format {
    OutputFormat::Pretty => pretty(value),
    OutputFormat::Json => serde_json::to_string_pretty(value)?,
    OutputFormat::Compact => serde_json::to_string(value)?,
  })
}

/// `$1,234.56`
pub fn money(amount: f64) -> String {
  let formatted = format!("{:.2}", amount.abs());
  let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if amount < 0.0 { "-" } else { "" };
  format!("{sign}${grouped}.{cents}")
}

fn risk_label(level: RiskLevel) -> ColoredString {
  match level {
    RiskLevel::Low => level.to_string().green(),
    RiskLevel::Medium => level.to_string().yellow(),
    RiskLevel::High => level.to_string().red(),
  }
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
  let _ = writeln!(out, "  {label:<LABEL_WIDTH$} {value}");
}

pub fn pretty_forecast(forecast: &ForecastResult) -> String {
  let b = &forecast.breakdown;
  let mut out = format!("{}\n", "Revenue forecast".bold());
  row(&mut out, "Monthly revenue", money(forecast.forecasted_revenue).green());
  row(&mut out, "Current revenue", money(forecast.current_revenue));
  row(&mut out, "Annual revenue", money(forecast.annual_revenue));
  row(&mut out, "Growth rate", format!("{:.1}%", forecast.growth_rate * 100.0));
  row(&mut out, "Confidence", format!("{:.0}%", forecast.confidence * 100.0));
  row(&mut out, "Monthly views", b.monthly_views);
  row(&mut out, "Effective CPM", money(b.effective_cpm));
  row(&mut out, "RPM", money(b.rpm));
  row(&mut out, "Ad impression rate", format!("{:.1}%", b.ad_impression_rate * 100.0));
  row(
    &mut out,
    "Multipliers",
    format!(
      "category {:.2} / geography {:.2} / season {:.2}",
      b.category_multiplier, b.geography_multiplier, b.seasonal_multiplier
    )
    .dimmed(),
  );
  out
}

fn vault_rows(out: &mut String, quote: &VaultQuote) {
  let vault = &quote.vault;
  row(out, "Monthly revenue", money(quote.forecast.forecasted_revenue));
  row(out, "Confidence", format!("{:.0}%", quote.forecast.confidence * 100.0));
  row(out, "Risk", format!("{:.3} ({})", quote.risk_score, risk_label(vault.risk_level)));
  row(out, "Max funding", money(vault.max_funding_amount).green().bold());
  row(out, "Target APR", format!("{:.2}%", vault.target_apr_percent).cyan());
  row(out, "Duration", format!("{} months", vault.duration_months));
  row(out, "Monthly payout", money(vault.monthly_payout_amount));
  let mintable = if quote.mintable { "yes".green() } else { "no".yellow() };
  row(out, "Mintable", mintable);
}

pub fn pretty_quote(report: &ChannelQuote) -> String {
  let mut out = format!("{} {}\n", "Vault quote for".bold(), report.channel.cyan().bold());
  vault_rows(&mut out, &report.quote);
  out
}

pub fn pretty_risk(report: &RiskReport) -> String {
  format!("Risk score {:.3} ({})", report.score, risk_label(report.level))
}

pub fn pretty_projection(report: &ProjectionReport) -> String {
  let mut out = format!(
    "{} {} at {:.2}% APR\n",
    "Projection for".bold(),
    money(report.principal),
    report.apr_percent
  );
  let _ = writeln!(out, "  {:>5}  {:>14}  {:>16}  {:>9}", "MONTH", "YIELD", "TOTAL", "APR");
  for entry in &report.months {
    let _ = writeln!(
      out,
      "  {:>5}  {:>14}  {:>16}  {:>8.2}%",
      entry.month,
      money(entry.yield_earned),
      money(entry.total_value),
      entry.realized_apr
    );
  }
  out
}

pub fn pretty_compound(report: &CompoundReport) -> String {
  let mut out = format!(
    "{} {} at {:.2}% APR, {} periods/year for {} years\n",
    "Compounding".bold(),
    money(report.principal),
    report.apr_percent,
    report.periods_per_year,
    report.years
  );
  row(&mut out, "Final balance", money(report.final_balance).green());
  row(&mut out, "Interest earned", money(report.interest_earned));
  row(&mut out, "Effective APY", format!("{:.4}%", report.effective_apy));
  out
}

pub fn pretty_schedule(report: &ScheduleReport) -> String {
  let mut out = format!("{}\n", "Vault terms".bold());
  vault_rows(&mut out, &report.quote);
  let _ = writeln!(out, "\n{}", "Payout calendar".bold());
  for payout in &report.payouts {
    let _ = writeln!(out, "  {:>3}  {}  {:>14}", payout.month, payout.date, money(payout.amount));
  }
  out
}

pub fn pretty_search(report: &SearchReport) -> String {
  let mut out = String::new();
  if report.filters.is_empty() {
    let _ = writeln!(out, "{} {}", "No filters recognised in:".yellow(), report.query);
  } else {
    let _ = writeln!(
      out,
      "{} {} {}",
      "Filters:".bold(),
      report.filters,
      format!("(confidence {:.0}%)", report.confidence * 100.0).dimmed()
    );
  }

  for ranked in &report.results {
    let listing = &ranked.listing;
    let _ = writeln!(
      out,
      "  {} {} {} {:.1}% APR, {} risk, min {} {}",
      format!("#{}", listing.id).dimmed(),
      listing.creator.cyan().bold(),
      format!("[{}]", listing.category).yellow(),
      listing.apr_percent,
      listing.risk_level,
      money(listing.min_investment),
      format!("score {:.2}", ranked.match_score).green()
    );
  }

  let _ = writeln!(out, "\n{}", report.summary);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_money_grouping() {
    assert_eq!(money(0.0), "$0.00");
    assert_eq!(money(999.999), "$1,000.00");
    assert_eq!(money(1234567.891), "$1,234,567.89");
    assert_eq!(money(-42_000.5), "-$42,000.50");
    assert_eq!(money(100_000.0), "$100,000.00");
  }

  #[test]
  fn test_render_formats() {
    colored::control::set_override(false);
    let report = RiskReport { score: 0.25, level: RiskLevel::Low };

    let pretty = render(OutputFormat::Pretty, &report, pretty_risk).unwrap();
    assert_eq!(pretty, "Risk score 0.250 (Low)");

    let compact = render(OutputFormat::Compact, &report, pretty_risk).unwrap();
    assert_eq!(compact, r#"{"score":0.25,"level":"low"}"#);

    let json = render(OutputFormat::Json, &report, pretty_risk).unwrap();
    assert!(json.contains("\n  \"level\": \"low\""));
  }

  #[test]
  fn test_compound_rows() {
    colored::control::set_override(false);
    let report = CompoundReport {
      principal: 1000.0,
      apr_percent: 12.0,
      periods_per_year: 12,
      years: 1.0,
      final_balance: 1126.83,
      interest_earned: 126.83,
      effective_apy: 12.6825,
    };
    let text = pretty_compound(&report);
    assert!(text.contains("Final balance"));
    assert!(text.contains("$1,126.83"));
    assert!(text.contains("12.6825%"));
  }
}
