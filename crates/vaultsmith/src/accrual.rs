//! Yield accrual simulation
//!
//! Simple interest, periodic compounding, and a month-by-month projection in
//! which every month earns on the running total of the month before.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative};
use crate::{Result, VaultsmithError};

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Simple interest earned after `elapsed_days`
pub fn accrued(principal: f64, apr_percent: f64, elapsed_days: f64) -> Result<f64> {
  let principal = ensure_non_negative("principal", principal)?;
  let apr = ensure_finite("apr_percent", apr_percent)?;
  let days = ensure_non_negative("elapsed_days", elapsed_days)?;
  ensure_finite("accrued", principal * (apr / 100.0 / DAYS_PER_YEAR) * days)
}

/// Final balance after compounding `periods_per_year` times a year for `years`
pub fn compound(principal: f64, apr_percent: f64, periods_per_year: u32, years: f64) -> Result<f64> {
  let principal = ensure_non_negative("principal", principal)?;
  let apr = ensure_finite("apr_percent", apr_percent)?;
  let years = ensure_finite("years", years)?;
  if periods_per_year == 0 {
    return Err(VaultsmithError::invalid_input("periods_per_year", "must be at least 1"));
  }
  if years <= 0.0 {
    return Err(VaultsmithError::invalid_input("years", format!("must be positive, got {years}")));
  }

  let n = periods_per_year as f64;
  let balance = principal * (1.0 + apr / 100.0 / n).powf(n * years);
  ensure_finite("balance", balance)
}

/// Annualised yield actually realised by compounding, in percent
pub fn effective_apy(principal: f64, apr_percent: f64, periods_per_year: u32, years: f64) -> Result<f64> {
  if principal == 0.0 {
    return Err(VaultsmithError::zero_denominator("principal"));
  }
  let balance = compound(principal, apr_percent, periods_per_year, years)?;
  Ok(((balance / principal).powf(1.0 / years) - 1.0) * 100.0)
}

/// Annualised return of an investment now worth `current_value`, in percent
pub fn realized_apr(invested: f64, current_value: f64, elapsed_days: f64) -> Result<f64> {
  let invested = ensure_non_negative("invested", invested)?;
  let current_value = ensure_non_negative("current_value", current_value)?;
  let days = ensure_non_negative("elapsed_days", elapsed_days)?;
  if invested == 0.0 {
    return Err(VaultsmithError::zero_denominator("invested"));
  }
  if days == 0.0 {
    return Err(VaultsmithError::zero_denominator("elapsed_days"));
  }
  let gain = current_value - invested;
  Ok(gain / invested * (DAYS_PER_YEAR / days) * 100.0)
}

/// Realised APR as a percentage of the target
pub fn performance_vs_target(actual_apr_percent: f64, target_apr_percent: f64) -> Result<f64> {
  let actual = ensure_finite("actual_apr_percent", actual_apr_percent)?;
  let target = ensure_finite("target_apr_percent", target_apr_percent)?;
  if target == 0.0 {
    return Err(VaultsmithError::zero_denominator("target_apr_percent"));
  }
  Ok(actual / target * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntry {
  pub month: u32,
  /// Yield earned during this month alone
  pub yield_earned: f64,
  /// Principal plus all yield so far
  pub total_value: f64,
  /// Cumulative yield annualised over the months elapsed, in percent
  pub realized_apr: f64,
}

/// Lazy month-by-month projection. Cloning before iteration, or calling
/// [`project`] again, restarts from month 1.
#[derive(Debug, Clone)]
pub struct MonthlyProjection {
  principal: f64,
  monthly_rate: f64,
  duration_months: u32,
  month: u32,
  running_total: f64,
}

/// Start a projection. Rejects a monthly rate of -100% or below, and any
/// principal/rate/duration whose final month would overflow.
pub fn project(principal: f64, apr_percent: f64, duration_months: u32) -> Result<MonthlyProjection> {
  let principal = ensure_non_negative("principal", principal)?;
  let apr = ensure_finite("apr_percent", apr_percent)?;
  let monthly_rate = apr / 100.0 / MONTHS_PER_YEAR;
  if monthly_rate <= -1.0 {
    return Err(VaultsmithError::invalid_input(
      "apr_percent",
      format!("must be above -1200 to leave a balance, got {apr}"),
    ));
  }

  // Only a growing balance can overflow, and it is largest in the last month
  if duration_months > 0 {
    let growth = (1.0 + monthly_rate).powf(duration_months as f64);
    ensure_finite("total_value", principal * growth)?;
    ensure_finite("realized_apr", (growth - 1.0) * (MONTHS_PER_YEAR / duration_months as f64) * 100.0)?;
  }

  Ok(MonthlyProjection {
    principal,
    monthly_rate,
    duration_months,
    month: 0,
    running_total: principal,
  })
}

impl MonthlyProjection {
  pub fn principal(&self) -> f64 {
    self.principal
  }

  pub fn duration_months(&self) -> u32 {
    self.duration_months
  }
}

impl Iterator for MonthlyProjection {
  type Item = ProjectionEntry;

  fn next(&mut self) -> Option<Self::Item> {
    if self.month >= self.duration_months {
      return None;
    }
    self.month += 1;

    let yield_earned = self.running_total * self.monthly_rate;
    self.running_total += yield_earned;

    let realized_apr = if self.principal > 0.0 {
      (self.running_total - self.principal) / self.principal * (MONTHS_PER_YEAR / self.month as f64) * 100.0
    } else {
      0.0
    };

    Some(ProjectionEntry { month: self.month, yield_earned, total_value: self.running_total, realized_apr })
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = (self.duration_months - self.month) as usize;
    (remaining, Some(remaining))
  }
}

impl ExactSizeIterator for MonthlyProjection {}
