//! Channel metrics as supplied by whatever feeds the pipeline

use serde::{Deserialize, Serialize};

use crate::error::ensure_finite;
use crate::{Result, VaultsmithError};

const MIN_SUBSCRIBERS: u64 = 1_000;
const MIN_TOTAL_VIEWS: u64 = 10_000;
const MIN_AGE_MONTHS: u32 = 3;
const MIN_VIDEOS: u32 = 10;
/// Views per video must exceed this fraction of the subscriber base
const MIN_VIEW_RATE: f64 = 0.01;
const VERIFIED_SCORE_PERCENT: f64 = 80.0;

/// Snapshot of a creator channel's audience and monetisation figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
  pub subscriber_count: u64,
  pub average_views_per_video: u64,
  /// Advertiser cost per 1000 impressions
  pub cost_per_mille: f64,
  pub channel_age_months: u32,
  pub category: String,
  #[serde(default)]
  pub primary_geography: String,
  pub engagement_rate_bps: u32,
  pub average_watch_time_secs: u32,
}

impl ChannelMetrics {
  pub fn validate(&self) -> Result<()> {
    let cpm = ensure_finite("cost_per_mille", self.cost_per_mille)?;
    if cpm <= 0.0 {
      return Err(VaultsmithError::invalid_input("cost_per_mille", format!("must be positive, got {cpm}")));
    }
    Ok(())
  }

  /// Average views per video relative to the subscriber base, in percent
  pub fn subscriber_engagement_percent(&self) -> Result<f64> {
    if self.subscriber_count == 0 {
      return Err(VaultsmithError::zero_denominator("subscriber_count"));
    }
    Ok(self.average_views_per_video as f64 / self.subscriber_count as f64 * 100.0)
  }

  /// True when views per video exceed `multiple` times the subscriber count
  pub fn exceeds_view_multiple(&self, multiple: f64) -> bool {
    self.average_views_per_video as f64 > self.subscriber_count as f64 * multiple
  }
}

/// Outcome of each eligibility check in [`verify_channel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChecks {
  pub min_subscribers: bool,
  pub min_views: bool,
  pub min_age: bool,
  pub min_videos: bool,
  pub view_consistency: bool,
}

impl VerificationChecks {
  fn passed(&self) -> usize {
    [self.min_subscribers, self.min_views, self.min_age, self.min_videos, self.view_consistency]
      .iter()
      .filter(|passed| **passed)
      .count()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelVerification {
  pub checks: VerificationChecks,
  pub score_percent: f64,
  pub verified: bool,
}

impl ChannelVerification {
  pub fn recommendation(&self) -> &'static str {
    if self.verified {
      "Approved"
    } else {
      "Needs Review"
    }
  }
}

/// Score a channel's eligibility to open a vault; four of five checks verify it.
///
/// A channel with no subscribers fails the view consistency check rather than erroring.
pub fn verify_channel(metrics: &ChannelMetrics, total_views: u64, video_count: u32) -> ChannelVerification {
  let view_consistency = metrics.subscriber_count > 0
    && metrics.average_views_per_video as f64 / metrics.subscriber_count as f64 > MIN_VIEW_RATE;

  let checks = VerificationChecks {
    min_subscribers: metrics.subscriber_count >= MIN_SUBSCRIBERS,
    min_views: total_views >= MIN_TOTAL_VIEWS,
    min_age: metrics.channel_age_months >= MIN_AGE_MONTHS,
    min_videos: video_count >= MIN_VIDEOS,
    view_consistency,
  };

  let score_percent = checks.passed() as f64 / 5.0 * 100.0;
  let verification = ChannelVerification { checks, score_percent, verified: score_percent >= VERIFIED_SCORE_PERCENT };
  tracing::debug!(score = score_percent, verified = verification.verified, "channel verified");
  verification
}


#[cfg(test)]
mod tests {
  use super::fixtures::gaming_channel;
  use super::*;

  #[test]
  fn test_validate_accepts_positive_cpm() {
    assert!(gaming_channel().validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_bad_cpm() {
    for cpm in [0.0, -2.5, f64::NAN, f64::INFINITY] {
      let metrics = ChannelMetrics { cost_per_mille: cpm, ..gaming_channel() };
      assert!(metrics.validate().is_err(), "cpm {cpm} should be rejected");
    }
  }

  #[test]
  fn test_subscriber_engagement_percent() {
    let metrics = gaming_channel();
    let ratio = metrics.subscriber_engagement_percent().unwrap();
    assert!((ratio - 35.4166).abs() < 0.001);

    let empty = ChannelMetrics { subscriber_count: 0, ..gaming_channel() };
    assert!(matches!(
      empty.subscriber_engagement_percent(),
      Err(VaultsmithError::ZeroDenominator { .. })
    ));
  }

  #[test]
  fn test_exceeds_view_multiple() {
    let metrics = ChannelMetrics { subscriber_count: 1_000, average_views_per_video: 60_000, ..gaming_channel() };
    assert!(metrics.exceeds_view_multiple(50.0));
    assert!(!gaming_channel().exceeds_view_multiple(50.0));
  }

  #[test]
  fn test_deserialize_without_geography() {
    let json = r#"{
      "subscriber_count": 1000,
      "average_views_per_video": 200,
      "cost_per_mille": 3.0,
      "channel_age_months": 4,
      "category": "music",
      "engagement_rate_bps": 120,
      "average_watch_time_secs": 90
    }"#;
    let metrics: ChannelMetrics = serde_json::from_str(json).unwrap();
    assert_eq!(metrics.primary_geography, "");
    assert_eq!(metrics.category, "music");
  }

  #[test]
  fn test_negative_counts_are_unrepresentable() {
    let json = r#"{
      "subscriber_count": -5,
      "average_views_per_video": 200,
      "cost_per_mille": 3.0,
      "channel_age_months": 4,
      "category": "music",
      "engagement_rate_bps": 120,
      "average_watch_time_secs": 90
    }"#;
    assert!(serde_json::from_str::<ChannelMetrics>(json).is_err());
  }

  #[test]
  fn test_established_channel_is_verified() {
    let verification = verify_channel(&gaming_channel(), 120_000_000, 300);
    assert_eq!(verification.score_percent, 100.0);
    assert!(verification.verified);
    assert_eq!(verification.recommendation(), "Approved");
  }

  #[test]
  fn test_one_failed_check_still_verifies() {
    let young = ChannelMetrics { channel_age_months: 2, ..gaming_channel() };
    let verification = verify_channel(&young, 120_000_000, 300);
    assert!(!verification.checks.min_age);
    assert_eq!(verification.score_percent, 80.0);
    assert!(verification.verified);
  }

  #[test]
  fn test_two_failed_checks_need_review() {
    let verification = verify_channel(&gaming_channel(), 9_999, 9);
    assert!(!verification.checks.min_views);
    assert!(!verification.checks.min_videos);
    assert_eq!(verification.score_percent, 60.0);
    assert!(!verification.verified);
    assert_eq!(verification.recommendation(), "Needs Review");
  }

  #[test]
  fn test_view_consistency_without_subscribers() {
    let empty = ChannelMetrics { subscriber_count: 0, average_views_per_video: 500, ..gaming_channel() };
    let verification = verify_channel(&empty, 50_000, 20);
    assert!(!verification.checks.view_consistency);
    assert!(!verification.checks.min_subscribers);

    // 1% exactly is not enough
    let flat = ChannelMetrics { subscriber_count: 100_000, average_views_per_video: 1_000, ..gaming_channel() };
    assert!(!verify_channel(&flat, 50_000, 20).checks.view_consistency);
  }
}
