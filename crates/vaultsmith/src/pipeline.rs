//! End-to-end vault quotes
//!
//! forecast -> risk -> funding cap + duration -> APR -> vault configuration

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::forecast::{self, ForecastResult};
use crate::metrics::ChannelMetrics;
use crate::supplier::MetricsSupplier;
use crate::vault::{self, VaultConfiguration};
use crate::{duration, risk, Result};

/// Months between payouts when the caller has no preference
pub const DEFAULT_PAYOUT_GAP_MONTHS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultQuote {
  pub forecast: ForecastResult,
  pub risk_score: f64,
  pub vault: VaultConfiguration,
  pub mintable: bool,
}

pub struct QuotePipeline {
  config: Config,
}

impl QuotePipeline {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Quote a vault for a channel whose figures are already at hand
  pub fn quote(
    &self,
    metrics: &ChannelMetrics,
    view_history: &[u64],
    current_month: u32,
    payout_gap_months: f64,
  ) -> Result<VaultQuote> {
    let forecast = forecast::forecast(metrics, current_month, &self.config.rates, &self.config.forecast)?;
    let risk_score = risk::score(view_history, metrics.channel_age_months)?;
    let duration_months = duration::recommend(forecast.breakdown.monthly_views as f64, payout_gap_months)?;
    let vault = vault::assemble(&forecast, risk_score, duration_months, &self.config.vault)?;
    let mintable = vault.is_mintable(&forecast, &self.config.vault);

    tracing::debug!(risk_score, duration_months, mintable, "quote ready");
    Ok(VaultQuote { forecast, risk_score, vault, mintable })
  }

  /// Fetch a channel's figures from `supplier` and quote it
  pub fn quote_channel(
    &self,
    supplier: &dyn MetricsSupplier,
    channel_id: &str,
    current_month: u32,
    payout_gap_months: f64,
  ) -> Result<VaultQuote> {
    let metrics = supplier.fetch_channel_metrics(channel_id)?;
    let view_history = supplier.fetch_view_history(channel_id)?;
    tracing::debug!(channel_id, periods = view_history.len(), "channel fetched");
    self.quote(&metrics, &view_history, current_month, payout_gap_months)
  }
}

impl Default for QuotePipeline {
  fn default() -> Self {
    Self::new(Config::default())
  }
}
