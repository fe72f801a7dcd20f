//! Volatility-based risk scoring
//!
//! A channel's risk is the coefficient of variation of its recent view counts,
//! plus a flat penalty for channels younger than a year, clamped to [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Result, VaultsmithError};

const YOUNG_CHANNEL_MONTHS: u32 = 12;
const YOUNG_CHANNEL_PENALTY: f64 = 0.2;

pub const MEDIUM_RISK_FLOOR: f64 = 0.3;
pub const HIGH_RISK_FLOOR: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
}

impl RiskLevel {
  /// Tier for a score; each tier includes its lower bound
  pub fn from_score(score: f64) -> Self {
    if score < MEDIUM_RISK_FLOOR {
      RiskLevel::Low
    } else if score < HIGH_RISK_FLOOR {
      RiskLevel::Medium
    } else {
      RiskLevel::High
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RiskLevel::Low => "low",
      RiskLevel::Medium => "medium",
      RiskLevel::High => "high",
    }
  }

  /// 1 for low through 3 for high
  pub fn rank(&self) -> u8 {
    match self {
      RiskLevel::Low => 1,
      RiskLevel::Medium => 2,
      RiskLevel::High => 3,
    }
  }
}

impl fmt::Display for RiskLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      RiskLevel::Low => "Low",
      RiskLevel::Medium => "Medium",
      RiskLevel::High => "High",
    };
    f.write_str(label)
  }
}

impl FromStr for RiskLevel {
  type Err = VaultsmithError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "low" => Ok(RiskLevel::Low),
      "medium" => Ok(RiskLevel::Medium),
      "high" => Ok(RiskLevel::High),
      other => Err(VaultsmithError::invalid_input("risk_level", format!("unknown risk level '{other}'"))),
    }
  }
}

/// Score a channel's view history.
///
/// An all-zero history has no meaningful mean and is treated as maximum risk.
/// A single observation has no spread, so only the age penalty applies.
pub fn score(view_history: &[u64], channel_age_months: u32) -> Result<f64> {
  if view_history.is_empty() {
    return Err(VaultsmithError::EmptyViewHistory);
  }

  let n = view_history.len() as f64;
  let mean = view_history.iter().map(|&v| v as f64).sum::<f64>() / n;
  if mean == 0.0 {
    tracing::debug!("view history is all zeros, scoring as maximum risk");
    return Ok(1.0);
  }

  let variance = view_history.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
  let volatility = variance.sqrt() / mean;

  let age_penalty = if channel_age_months < YOUNG_CHANNEL_MONTHS { YOUNG_CHANNEL_PENALTY } else { 0.0 };

  let risk = (volatility + age_penalty).clamp(0.0, 1.0);
  tracing::debug!(volatility, age_penalty, risk, "risk scored");
  Ok(risk)
}
