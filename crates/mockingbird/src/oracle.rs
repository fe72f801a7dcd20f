//! Simulated monthly revenue feed
//!
//! Stands in for an on-chain revenue oracle: a random base between $15k and
//! $25k, a sinusoidal seasonal swing of 20%, and 2% linear growth per month.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const BASE_REVENUE: f64 = 15_000.0;
const BASE_REVENUE_SPREAD: f64 = 10_000.0;
const SEASONAL_AMPLITUDE: f64 = 0.2;
const MONTHLY_TREND: f64 = 0.02;
/// Revenue per 1000 views used to back out a view count
const ASSUMED_RPM: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSample {
  pub creator_id: String,
  pub month: u32,
  pub revenue: f64,
  pub views: u64,
}

pub struct RevenueOracle {
  rng: StdRng,
}

impl RevenueOracle {
  pub fn new(seed: u64) -> Self {
    Self { rng: StdRng::seed_from_u64(seed) }
  }

  pub(crate) fn from_rng(rng: StdRng) -> Self {
    Self { rng }
  }

  pub fn simulate(&mut self, creator_id: &str, month: u32) -> RevenueSample {
    let base = BASE_REVENUE + self.rng.gen::<f64>() * BASE_REVENUE_SPREAD;
    let seasonality = 1.0 + SEASONAL_AMPLITUDE * (month as f64 / 12.0 * 2.0 * PI).sin();
    let trend = 1.0 + month as f64 * MONTHLY_TREND;
    let revenue = base * seasonality * trend;

    RevenueSample {
      creator_id: creator_id.to_string(),
      month,
      revenue,
      views: (revenue / ASSUMED_RPM * 1000.0).floor() as u64,
    }
  }

  /// Samples for months 1 through `months`
  pub fn history(&mut self, creator_id: &str, months: u32) -> Vec<RevenueSample> {
    (1..=months).map(|month| self.simulate(creator_id, month)).collect()
  }
}
