//! Aggregate figures for a live vault and its investors

use serde::{Deserialize, Serialize};

use crate::error::ensure_non_negative;
use crate::vault::VaultConfiguration;
use crate::{Result, VaultsmithError};

/// One investor's position in a vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
  pub invested_amount: f64,
  pub shares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultStats {
  pub total_value_locked: f64,
  pub average_monthly_revenue: f64,
  pub total_investors: usize,
  pub total_shares: f64,
  /// Raised capital as a percentage of the funding cap
  pub utilization_percent: f64,
  /// Average revenue as a percentage of the monthly payout
  pub performance_percent: f64,
}

impl VaultStats {
  pub fn collect(vault: &VaultConfiguration, investments: &[Investment], revenue_history: &[f64]) -> Result<Self> {
    if revenue_history.is_empty() {
      return Err(VaultsmithError::zero_denominator("revenue_history"));
    }
    if vault.max_funding_amount == 0.0 {
      return Err(VaultsmithError::zero_denominator("max_funding_amount"));
    }
    if vault.monthly_payout_amount == 0.0 {
      return Err(VaultsmithError::zero_denominator("monthly_payout_amount"));
    }

    let mut total_value_locked = 0.0;
    let mut total_shares = 0.0;
    for investment in investments {
      total_value_locked += ensure_non_negative("invested_amount", investment.invested_amount)?;
      total_shares += ensure_non_negative("shares", investment.shares)?;
    }

    let mut revenue_total = 0.0;
    for revenue in revenue_history {
      revenue_total += ensure_non_negative("revenue", *revenue)?;
    }
    let average_monthly_revenue = revenue_total / revenue_history.len() as f64;

    let stats = Self {
      total_value_locked,
      average_monthly_revenue,
      total_investors: investments.len(),
      total_shares,
      utilization_percent: total_value_locked / vault.max_funding_amount * 100.0,
      performance_percent: average_monthly_revenue / vault.monthly_payout_amount * 100.0,
    };

    tracing::debug!(
      investors = stats.total_investors,
      tvl = stats.total_value_locked,
      utilization = stats.utilization_percent,
      "vault stats collected"
    );
    Ok(stats)
  }
}
