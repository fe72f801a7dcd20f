//! Target APR pricing

use crate::error::{ensure_finite, ensure_non_negative};
use crate::Result;

pub const DEFAULT_RISK_PREMIUM_PERCENT: f64 = 8.0;

/// `base + risk x 8`, with the risk score clamped to [0, 1]; a non-finite risk is rejected
pub fn calculate(base_rate_percent: f64, risk_score: f64) -> Result<f64> {
  calculate_with_premium(base_rate_percent, risk_score, DEFAULT_RISK_PREMIUM_PERCENT)
}

/// Same as [`calculate`] with a custom premium at maximum risk
pub fn calculate_with_premium(base_rate_percent: f64, risk_score: f64, max_premium_percent: f64) -> Result<f64> {
  let base = ensure_non_negative("base_rate_percent", base_rate_percent)?;
  let premium = ensure_non_negative("risk_premium_percent", max_premium_percent)?;
  let risk = ensure_finite("risk_score", risk_score)?.clamp(0.0, 1.0);
  Ok(base + risk * premium)
}
