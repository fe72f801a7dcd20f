//! Funding cap sizing

use crate::error::{ensure_finite, ensure_non_negative};
use crate::risk::{HIGH_RISK_FLOOR, MEDIUM_RISK_FLOOR};
use crate::Result;

/// Months of forecasted revenue a vault may raise against, by risk tier
pub fn tier_multiplier(risk_score: f64) -> f64 {
  if risk_score < MEDIUM_RISK_FLOOR {
    8.0
  } else if risk_score < HIGH_RISK_FLOOR {
    6.0
  } else {
    4.0
  }
}

/// Maximum amount a vault may raise for the given monthly revenue forecast
pub fn max_cap(forecasted_revenue: f64, risk_score: f64) -> Result<f64> {
  let revenue = ensure_non_negative("forecasted_revenue", forecasted_revenue)?;
  let risk = ensure_finite("risk_score", risk_score)?;
  Ok(revenue * tier_multiplier(risk))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tier_multipliers() {
    assert_eq!(max_cap(10_000.0, 0.1).unwrap(), 80_000.0);
    assert_eq!(max_cap(10_000.0, 0.3).unwrap(), 60_000.0);
    assert_eq!(max_cap(10_000.0, 0.6).unwrap(), 40_000.0);
    assert_eq!(max_cap(0.0, 0.9).unwrap(), 0.0);
  }

  #[test]
  fn test_higher_risk_never_raises_multiplier() {
    let mut previous = f64::INFINITY;
    for step in 0..=100 {
      let multiplier = tier_multiplier(step as f64 / 100.0);
      assert!(multiplier <= previous);
      previous = multiplier;
    }
  }

  #[test]
  fn test_rejects_negative_or_non_finite_revenue() {
    assert!(max_cap(-1.0, 0.2).is_err());
    assert!(max_cap(f64::NAN, 0.2).is_err());
  }

  #[test]
  fn test_rejects_non_finite_risk() {
    use crate::VaultsmithError;
    for risk in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
      assert!(matches!(
        max_cap(1_000.0, risk),
        Err(VaultsmithError::InvalidInput { ref field, .. }) if field == "risk_score"
      ));
    }
  }
}
