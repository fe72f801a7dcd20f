//! Vault configuration assembly and lifecycle checks

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::VaultPolicy;
use crate::error::{ensure_finite, ensure_non_negative};
use crate::forecast::ForecastResult;
use crate::risk::RiskLevel;
use crate::{apr, duration, funding, Result, VaultsmithError};

/// Revenue below this fraction of the forecast puts a vault in default
const DEFAULT_PERFORMANCE_FLOOR: f64 = 0.6;
const SHORTFALL_PENALTY_RATE: f64 = 1.2;
const MAX_PENALTY_SHARE: f64 = 0.1;
/// Portion of creator revenue passed through to investors
pub const INVESTOR_DISTRIBUTION_RATE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfiguration {
  pub max_funding_amount: f64,
  pub target_apr_percent: f64,
  pub duration_months: u32,
  pub risk_level: RiskLevel,
  pub monthly_payout_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayout {
  pub month: u32,
  pub date: NaiveDate,
  pub amount: f64,
}

pub fn monthly_payout(max_funding_amount: f64, target_apr_percent: f64) -> f64 {
  max_funding_amount * (target_apr_percent / 100.0) / 12.0
}

/// Combine a forecast, risk score and duration into a vault configuration
pub fn assemble(
  forecast: &ForecastResult,
  risk_score: f64,
  duration_months: u32,
  policy: &VaultPolicy,
) -> Result<VaultConfiguration> {
  let risk_score = ensure_finite("risk_score", risk_score)?;
  if !duration::is_supported(duration_months) {
    return Err(VaultsmithError::invalid_input(
      "duration_months",
      format!(
        "expected {}-{} months, got {duration_months}",
        duration::MIN_DURATION_MONTHS,
        duration::MAX_DURATION_MONTHS
      ),
    ));
  }

  let max_funding_amount = funding::max_cap(forecast.forecasted_revenue, risk_score)?;
  let target_apr_percent = apr::calculate_with_premium(policy.base_apr_percent, risk_score, policy.risk_premium_percent)?;

  let config = VaultConfiguration {
    max_funding_amount,
    target_apr_percent,
    duration_months,
    risk_level: RiskLevel::from_score(risk_score),
    monthly_payout_amount: monthly_payout(max_funding_amount, target_apr_percent),
  };

  tracing::debug!(
    max_funding = config.max_funding_amount,
    apr = config.target_apr_percent,
    months = config.duration_months,
    risk = %config.risk_level,
    "vault assembled"
  );

  Ok(config)
}

impl VaultConfiguration {
  /// Whether the monthly payout still agrees with funding and APR
  pub fn payout_is_consistent(&self) -> bool {
    let expected = monthly_payout(self.max_funding_amount, self.target_apr_percent);
    (self.monthly_payout_amount - expected).abs() <= 1e-9 * expected.abs().max(1.0)
  }

  /// A vault can be minted once the forecast is trustworthy and the raise is meaningful
  pub fn is_mintable(&self, forecast: &ForecastResult, policy: &VaultPolicy) -> bool {
    forecast.confidence > policy.mint_min_confidence && self.max_funding_amount > policy.mint_min_funding
  }

  /// One payout per month of the vault's term, starting a month after `start`
  pub fn payout_schedule(&self, start: NaiveDate) -> Result<Vec<ScheduledPayout>> {
    (1..=self.duration_months)
      .map(|month| {
        let date = start
          .checked_add_months(Months::new(month))
          .ok_or_else(|| VaultsmithError::invalid_input("start", format!("{start} + {month} months is out of range")))?;
        Ok(ScheduledPayout { month, date, amount: self.monthly_payout_amount })
      })
      .collect()
  }

  pub fn is_in_default(&self, actual_revenue: f64, expected_revenue: f64) -> Result<bool> {
    let actual = ensure_non_negative("actual_revenue", actual_revenue)?;
    let expected = ensure_non_negative("expected_revenue", expected_revenue)?;
    if expected == 0.0 {
      return Err(VaultsmithError::zero_denominator("expected_revenue"));
    }
    Ok(actual / expected < DEFAULT_PERFORMANCE_FLOOR)
  }

  /// Penalty owed on a revenue shortfall, capped at a tenth of the vault
  pub fn default_penalty(&self, shortfall: f64) -> Result<f64> {
    let shortfall = ensure_non_negative("shortfall", shortfall)?;
    Ok((shortfall * SHORTFALL_PENALTY_RATE).min(self.max_funding_amount * MAX_PENALTY_SHARE))
  }

  /// An investor's pro-rata cut of the revenue distributed for one period
  pub fn investor_payout(&self, total_revenue: f64, investor_shares: f64, total_shares: f64) -> Result<f64> {
    let revenue = ensure_non_negative("total_revenue", total_revenue)?;
    let held = ensure_non_negative("investor_shares", investor_shares)?;
    let outstanding = ensure_non_negative("total_shares", total_shares)?;
    if outstanding == 0.0 {
      return Err(VaultsmithError::zero_denominator("total_shares"));
    }
    if held > outstanding {
      return Err(VaultsmithError::invalid_input(
        "investor_shares",
        format!("{held} exceeds the {outstanding} shares outstanding"),
      ));
    }
    Ok(revenue * INVESTOR_DISTRIBUTION_RATE * (held / outstanding))
  }
}
