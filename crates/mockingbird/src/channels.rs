//! Demo channels
//!
//! A channel id plus the supplier's seed fully determine the channel, so the
//! metrics and view history for one id always agree across calls.

use rand::seq::SliceRandom;
use rand::Rng;
use vaultsmith::supplier::MetricsSupplier;
use vaultsmith::{ChannelMetrics, Result, VaultsmithError};

use crate::keyed_rng;
use crate::oracle::RevenueOracle;

pub(crate) const CATEGORIES: [&str; 6] = ["gaming", "music", "education", "tech", "diy", "lifestyle"];
const GEOGRAPHIES: [&str; 8] = ["US", "UK", "DE", "CA", "AU", "IN", "ID", "BR"];

const METRICS_STREAM: u64 = 0;
const HISTORY_STREAM: u64 = 1;

pub const DEFAULT_HISTORY_MONTHS: u32 = 6;

#[derive(Debug, Clone)]
pub struct DemoSupplier {
  seed: u64,
  history_months: u32,
}

impl DemoSupplier {
  pub fn new(seed: u64) -> Self {
    Self { seed, history_months: DEFAULT_HISTORY_MONTHS }
  }

  pub fn with_history_months(mut self, months: u32) -> Self {
    self.history_months = months;
    self
  }

  fn check_id(channel_id: &str) -> Result<()> {
    if channel_id.trim().is_empty() {
      return Err(VaultsmithError::unknown_channel(channel_id));
    }
    Ok(())
  }
}

impl MetricsSupplier for DemoSupplier {
  fn fetch_channel_metrics(&self, channel_id: &str) -> Result<ChannelMetrics> {
    Self::check_id(channel_id)?;
    let mut rng = keyed_rng(self.seed, channel_id, METRICS_STREAM);

    let subscriber_count: u64 = rng.gen_range(5_000..3_000_000);
    let view_ratio: f64 = rng.gen_range(0.01..0.45);
    let category = CATEGORIES.choose(&mut rng).copied().unwrap_or("gaming");
    let geography = GEOGRAPHIES.choose(&mut rng).copied().unwrap_or("US");

    let metrics = ChannelMetrics {
      subscriber_count,
      average_views_per_video: (subscriber_count as f64 * view_ratio).round() as u64,
      cost_per_mille: (rng.gen_range(1.5..6.0_f64) * 100.0).round() / 100.0,
      channel_age_months: rng.gen_range(3..96),
      category: category.to_string(),
      primary_geography: geography.to_string(),
      engagement_rate_bps: rng.gen_range(100..900),
      average_watch_time_secs: rng.gen_range(60..600),
    };

    tracing::debug!(channel_id, subscribers = metrics.subscriber_count, "demo channel generated");
    Ok(metrics)
  }

  fn fetch_view_history(&self, channel_id: &str) -> Result<Vec<u64>> {
    Self::check_id(channel_id)?;
    let mut oracle = RevenueOracle::from_rng(keyed_rng(self.seed, channel_id, HISTORY_STREAM));
    Ok(oracle.history(channel_id, self.history_months).into_iter().map(|sample| sample.views).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_channels_are_reproducible() {
    let a = DemoSupplier::new(11);
    let b = DemoSupplier::new(11);
    assert_eq!(a.fetch_channel_metrics("ch-1").unwrap(), b.fetch_channel_metrics("ch-1").unwrap());
    assert_eq!(a.fetch_view_history("ch-1").unwrap(), b.fetch_view_history("ch-1").unwrap());
  }

  #[test]
  fn test_seed_and_id_both_matter() {
    let supplier = DemoSupplier::new(11);
    let one = supplier.fetch_channel_metrics("ch-1").unwrap();
    let two = supplier.fetch_channel_metrics("ch-2").unwrap();
    let reseeded = DemoSupplier::new(12).fetch_channel_metrics("ch-1").unwrap();
    assert_ne!(one, two);
    assert_ne!(one, reseeded);
  }

  #[test]
  fn test_generated_metrics_are_valid() {
    let supplier = DemoSupplier::new(99);
    for id in ["alpha", "beta", "gamma", "delta", "epsilon"] {
      let metrics = supplier.fetch_channel_metrics(id).unwrap();
      assert!(metrics.validate().is_ok());
      assert!(metrics.subscriber_count >= 5_000);
      assert!(CATEGORIES.contains(&metrics.category.as_str()));
    }
  }

  #[test]
  fn test_history_length() {
    let supplier = DemoSupplier::new(5).with_history_months(9);
    assert_eq!(supplier.fetch_view_history("ch").unwrap().len(), 9);
    assert_eq!(DemoSupplier::new(5).fetch_view_history("ch").unwrap().len(), 6);
  }

  #[test]
  fn test_blank_id_is_unknown() {
    let supplier = DemoSupplier::new(5);
    assert!(matches!(supplier.fetch_channel_metrics("  "), Err(VaultsmithError::UnknownChannel { .. })));
    assert!(supplier.fetch_view_history("").is_err());
  }
}
