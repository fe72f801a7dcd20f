//! Where channel metrics come from
//!
//! The pipeline never fetches anything itself. Callers hand it a
//! [`MetricsSupplier`], which in production would front an analytics API and
//! in tests or demos reads fixtures or generates data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::metrics::ChannelMetrics;
use crate::{Result, VaultsmithError};

#[cfg_attr(test, mockall::automock)]
pub trait MetricsSupplier {
  fn fetch_channel_metrics(&self, channel_id: &str) -> Result<ChannelMetrics>;

  /// Recent per-period view counts, oldest first
  fn fetch_view_history(&self, channel_id: &str) -> Result<Vec<u64>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
  pub metrics: ChannelMetrics,
  #[serde(default)]
  pub view_history: Vec<u64>,
}

/// Supplier backed by a JSON document keyed by channel id
#[derive(Debug, Clone, Default)]
pub struct FileSupplier {
  channels: BTreeMap<String, ChannelRecord>,
}

impl FileSupplier {
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)?;
    let supplier = Self::from_json(&content)?;
    tracing::debug!(path = %path.display(), channels = supplier.channels.len(), "fixture loaded");
    Ok(supplier)
  }

  pub fn from_json(content: &str) -> Result<Self> {
    let channels: BTreeMap<String, ChannelRecord> = serde_json::from_str(content)?;
    Ok(Self { channels })
  }

  pub fn insert(&mut self, channel_id: impl Into<String>, record: ChannelRecord) {
    self.channels.insert(channel_id.into(), record);
  }

  pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
    self.channels.keys().map(String::as_str)
  }

  fn record(&self, channel_id: &str) -> Result<&ChannelRecord> {
    self.channels.get(channel_id).ok_or_else(|| VaultsmithError::unknown_channel(channel_id))
  }
}

impl MetricsSupplier for FileSupplier {
  fn fetch_channel_metrics(&self, channel_id: &str) -> Result<ChannelMetrics> {
    Ok(self.record(channel_id)?.metrics.clone())
  }

  fn fetch_view_history(&self, channel_id: &str) -> Result<Vec<u64>> {
    Ok(self.record(channel_id)?.view_history.clone())
  }
}
