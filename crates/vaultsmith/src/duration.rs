//! Vault duration recommendation

use crate::error::ensure_finite;
use crate::{Result, VaultsmithError};

pub const MIN_DURATION_MONTHS: u32 = 6;
pub const MAX_DURATION_MONTHS: u32 = 24;

/// `round(ln(views) / payout_gap)` clamped into the supported duration range
pub fn recommend(estimated_view_count: f64, payout_gap_months: f64) -> Result<u32> {
  let views = ensure_finite("estimated_view_count", estimated_view_count)?;
  if views < 1.0 {
    return Err(VaultsmithError::invalid_input(
      "estimated_view_count",
      format!("must be at least 1, got {views}"),
    ));
  }

  let gap = ensure_finite("payout_gap_months", payout_gap_months)?;
  if gap <= 0.0 {
    return Err(VaultsmithError::invalid_input("payout_gap_months", format!("must be positive, got {gap}")));
  }

  let months = (views.ln() / gap).round();
  Ok(months.clamp(MIN_DURATION_MONTHS as f64, MAX_DURATION_MONTHS as f64) as u32)
}

pub fn is_supported(duration_months: u32) -> bool {
  (MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&duration_months)
}
