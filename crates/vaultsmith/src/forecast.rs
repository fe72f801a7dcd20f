//! Revenue forecasting from channel metrics
//!
//! Monthly creator revenue is modelled as
//! `monthly views x effective CPM x ad impression rate x creator share / 1000`,
//! where the effective CPM is the channel's CPM scaled by category, geography
//! and seasonal multipliers.

use serde::{Deserialize, Serialize};

use crate::config::ForecastPolicy;
use crate::metrics::ChannelMetrics;
use crate::{Result, VaultsmithError};

const BPS: f64 = 10_000.0;

const BASE_IMPRESSION_RATE_BPS: u32 = 8_500;
const MAX_IMPRESSION_RATE_BPS: u32 = 9_500;

const BASE_CONFIDENCE_BPS: u32 = 5_000;
const MAX_CONFIDENCE_BPS: u32 = 9_500;

const DAYS_PER_MONTH: u64 = 30;

/// Source of the multipliers applied to a channel's base CPM.
/// Unknown keys resolve to the neutral multiplier 1.0.
pub trait MultiplierTable {
  fn category_multiplier(&self, category: &str) -> f64;
  fn geography_multiplier(&self, geography: &str) -> f64;
  /// `month` is 1-based (January = 1)
  fn seasonal_multiplier(&self, month: u32) -> f64;
}

/// Intermediate figures behind a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
  pub category_multiplier: f64,
  pub geography_multiplier: f64,
  pub seasonal_multiplier: f64,
  pub effective_cpm: f64,
  /// Fraction of views that carry an ad
  pub ad_impression_rate: f64,
  /// Creator revenue per 1000 views
  pub rpm: f64,
  pub monthly_views: u64,
  pub creator_share: f64,
  pub platform_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
  pub current_revenue: f64,
  /// Forecasted monthly creator revenue
  pub forecasted_revenue: f64,
  pub annual_revenue: f64,
  /// Fractional, 0.15 = 15%
  pub growth_rate: f64,
  /// Within [0, 1]
  pub confidence: f64,
  pub breakdown: RevenueBreakdown,
}

pub fn forecast(
  metrics: &ChannelMetrics,
  current_month: u32,
  tables: &dyn MultiplierTable,
  policy: &ForecastPolicy,
) -> Result<ForecastResult> {
  metrics.validate()?;
  if !(1..=12).contains(&current_month) {
    return Err(VaultsmithError::invalid_input(
      "current_month",
      format!("expected 1-12, got {current_month}"),
    ));
  }

  if metrics.exceeds_view_multiple(policy.sanity_view_multiple) {
    tracing::warn!(
      subscribers = metrics.subscriber_count,
      views = metrics.average_views_per_video,
      "average views exceed {}x the subscriber count",
      policy.sanity_view_multiple
    );
  }

  let category_multiplier = tables.category_multiplier(&metrics.category);
  let geography_multiplier = tables.geography_multiplier(&metrics.primary_geography);
  let seasonal_multiplier = tables.seasonal_multiplier(current_month);

  let effective_cpm = metrics.cost_per_mille * category_multiplier * geography_multiplier * seasonal_multiplier;
  let ad_impression_rate = ad_impression_rate_bps(metrics) as f64 / BPS;
  let rpm = effective_cpm * ad_impression_rate * policy.creator_share;

  let monthly_views = estimate_monthly_views(metrics)?;
  let gross_revenue = monthly_views as f64 * effective_cpm * ad_impression_rate / 1000.0;
  let forecasted_revenue = monthly_views as f64 * rpm / 1000.0;

  let result = ForecastResult {
    current_revenue: forecasted_revenue * policy.current_revenue_ratio,
    forecasted_revenue,
    annual_revenue: forecasted_revenue * 12.0,
    growth_rate: policy.growth_rate,
    confidence: confidence_bps(metrics) as f64 / BPS,
    breakdown: RevenueBreakdown {
      category_multiplier,
      geography_multiplier,
      seasonal_multiplier,
      effective_cpm,
      ad_impression_rate,
      rpm,
      monthly_views,
      creator_share: forecasted_revenue,
      platform_share: gross_revenue - forecasted_revenue,
    },
  };

  tracing::debug!(
    category = %metrics.category,
    month = current_month,
    revenue = result.forecasted_revenue,
    confidence = result.confidence,
    "forecast computed"
  );

  Ok(result)
}

/// Share of views expected to serve an ad, in basis points
pub fn ad_impression_rate_bps(metrics: &ChannelMetrics) -> u32 {
  let mut rate = BASE_IMPRESSION_RATE_BPS;

  if metrics.engagement_rate_bps > 500 {
    rate += 1_000;
  } else if metrics.engagement_rate_bps > 300 {
    rate += 500;
  }

  if metrics.average_watch_time_secs > 300 {
    rate += 500;
  } else if metrics.average_watch_time_secs > 180 {
    rate += 250;
  }

  rate.min(MAX_IMPRESSION_RATE_BPS)
}

/// Thirty uploads' worth of views, nudged by how well the channel converts subscribers to viewers
pub fn estimate_monthly_views(metrics: &ChannelMetrics) -> Result<u64> {
  let engagement = metrics.subscriber_engagement_percent()?;
  let base = metrics
    .average_views_per_video
    .checked_mul(DAYS_PER_MONTH)
    .ok_or_else(|| too_many_views(metrics.average_views_per_video))? as f64;

  let adjusted = if engagement > 10.0 {
    base * 1.1
  } else if engagement < 2.0 {
    base * 0.9
  } else {
    base
  };

  let adjusted = adjusted.round();
  if adjusted >= u64::MAX as f64 {
    return Err(too_many_views(metrics.average_views_per_video));
  }
  Ok(adjusted as u64)
}

fn too_many_views(views: u64) -> VaultsmithError {
  VaultsmithError::invalid_input("average_views_per_video", format!("{views} views per video overflows a month of views"))
}

/// How much the forecast can be trusted, in basis points
pub fn confidence_bps(metrics: &ChannelMetrics) -> u32 {
  let mut confidence = BASE_CONFIDENCE_BPS;

  if metrics.channel_age_months > 24 {
    confidence += 2_000;
  } else if metrics.channel_age_months > 12 {
    confidence += 1_000;
  }

  if metrics.subscriber_count > 1_000_000 {
    confidence += 2_000;
  } else if metrics.subscriber_count > 100_000 {
    confidence += 1_500;
  } else if metrics.subscriber_count > 10_000 {
    confidence += 1_000;
  }

  if metrics.engagement_rate_bps > 500 {
    confidence += 1_000;
  } else if metrics.engagement_rate_bps > 300 {
    confidence += 500;
  }

  confidence.min(MAX_CONFIDENCE_BPS)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::RateTables;
  use crate::metrics::fixtures::gaming_channel;

  fn run(metrics: &ChannelMetrics, month: u32) -> Result<ForecastResult> {
    forecast(metrics, month, &RateTables::default(), &ForecastPolicy::default())
  }

  #[test]
  fn test_gaming_channel_forecast() {
    let result = run(&gaming_channel(), 6).unwrap();

    assert!(result.forecasted_revenue > 0.0);
    assert!(result.confidence >= 0.5);
    assert_eq!(result.confidence, 0.95);

    // 2.8 x 0.85 gaming x 1.0 unknown geo x 0.95 June
    assert!((result.breakdown.effective_cpm - 2.261).abs() < 1e-9);
    assert_eq!(result.breakdown.ad_impression_rate, 0.95);
    // 850k x 30 boosted by 10% for a 35% view-to-subscriber ratio
    assert_eq!(result.breakdown.monthly_views, 28_050_000);

    let expected = 28_050_000.0 * 2.261 * 0.95 * 0.68 / 1000.0;
    assert!((result.forecasted_revenue - expected).abs() < 1e-6);
    assert!((result.current_revenue - expected * 0.85).abs() < 1e-6);
    assert!((result.annual_revenue - expected * 12.0).abs() < 1e-6);
    assert_eq!(result.growth_rate, 0.15);
  }

  #[test]
  fn test_forecast_is_idempotent() {
    let metrics = gaming_channel();
    assert_eq!(run(&metrics, 11).unwrap(), run(&metrics, 11).unwrap());
  }

  #[test]
  fn test_shares_add_up_to_gross() {
    let result = run(&gaming_channel(), 3).unwrap();
    let b = &result.breakdown;
    let gross = b.monthly_views as f64 * b.effective_cpm * b.ad_impression_rate / 1000.0;
    assert!((b.creator_share + b.platform_share - gross).abs() < 1e-6);
    assert!((b.creator_share / gross - 0.68).abs() < 1e-9);
  }

  #[test]
  fn test_december_beats_february() {
    let metrics = gaming_channel();
    let december = run(&metrics, 12).unwrap();
    let february = run(&metrics, 2).unwrap();
    assert!(december.forecasted_revenue > february.forecasted_revenue);
  }

  #[test]
  fn test_unknown_category_and_geography_are_neutral() {
    let metrics = ChannelMetrics {
      category: "knitting".to_string(),
      primary_geography: "ZZ".to_string(),
      ..gaming_channel()
    };
    let result = run(&metrics, 4).unwrap();
    assert_eq!(result.breakdown.category_multiplier, 1.0);
    assert_eq!(result.breakdown.geography_multiplier, 1.0);
    assert_eq!(result.breakdown.seasonal_multiplier, 1.0);
    assert!((result.breakdown.effective_cpm - 2.8).abs() < 1e-12);
  }

  #[test]
  fn test_invalid_month_rejected() {
    for month in [0, 13] {
      assert!(matches!(
        run(&gaming_channel(), month),
        Err(VaultsmithError::InvalidInput { ref field, .. }) if field == "current_month"
      ));
    }
  }

  #[test]
  fn test_zero_subscribers_rejected() {
    let metrics = ChannelMetrics { subscriber_count: 0, ..gaming_channel() };
    assert!(matches!(run(&metrics, 6), Err(VaultsmithError::ZeroDenominator { .. })));
  }

  #[test]
  fn test_huge_view_counts_are_rejected() {
    let viral = ChannelMetrics { subscriber_count: 1, average_views_per_video: u64::MAX / 10, ..gaming_channel() };
    assert!(matches!(
      run(&viral, 6),
      Err(VaultsmithError::InvalidInput { ref field, .. }) if field == "average_views_per_video"
    ));

    // Fits in 30 days but not after the 10% engagement bump
    let near_limit = ChannelMetrics { subscriber_count: 1, average_views_per_video: u64::MAX / 31, ..gaming_channel() };
    assert!(estimate_monthly_views(&near_limit).is_err());
  }

  #[test]
  fn test_ad_impression_rate_tiers() {
    let base = ChannelMetrics { engagement_rate_bps: 100, average_watch_time_secs: 60, ..gaming_channel() };
    assert_eq!(ad_impression_rate_bps(&base), 8_500);

    let mid = ChannelMetrics { engagement_rate_bps: 400, average_watch_time_secs: 200, ..base.clone() };
    assert_eq!(ad_impression_rate_bps(&mid), 9_250);

    let top = ChannelMetrics { engagement_rate_bps: 900, average_watch_time_secs: 900, ..base };
    assert_eq!(ad_impression_rate_bps(&top), 9_500);
  }

  #[test]
  fn test_monthly_view_adjustments() {
    let low_engagement = ChannelMetrics { subscriber_count: 1_000_000, average_views_per_video: 10_000, ..gaming_channel() };
    assert_eq!(estimate_monthly_views(&low_engagement).unwrap(), 270_000);

    let neutral = ChannelMetrics { subscriber_count: 1_000_000, average_views_per_video: 50_000, ..gaming_channel() };
    assert_eq!(estimate_monthly_views(&neutral).unwrap(), 1_500_000);
  }

  #[test]
  fn test_confidence_tiers() {
    let fresh = ChannelMetrics {
      channel_age_months: 3,
      subscriber_count: 5_000,
      engagement_rate_bps: 100,
      ..gaming_channel()
    };
    assert_eq!(confidence_bps(&fresh), 5_000);

    let growing = ChannelMetrics {
      channel_age_months: 18,
      subscriber_count: 250_000,
      engagement_rate_bps: 350,
      ..gaming_channel()
    };
    assert_eq!(confidence_bps(&growing), 8_000);

    assert_eq!(confidence_bps(&gaming_channel()), 9_500);
  }
}
