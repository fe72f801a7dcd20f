//! Configuration management for Vaultsmith
//!
//! Handles loading, validating, and saving the rate tables and policy
//! constants the scoring pipeline runs against.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::forecast::MultiplierTable;
use crate::{Result, VaultsmithError};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
  /// CPM adjustment tables
  #[serde(default)]
  pub rates: RateTables,
  /// Revenue forecasting constants
  #[serde(default)]
  pub forecast: ForecastPolicy,
  /// Vault sizing and pricing constants
  #[serde(default)]
  pub vault: VaultPolicy,
  /// Search vocabulary and ranking constants
  #[serde(default)]
  pub search: SearchPolicy,
}

/// Multipliers applied to the base CPM, expressed as fractions of neutral (1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTables {
  #[serde(default = "default_category_multipliers")]
  pub category_multipliers: HashMap<String, f64>,
  #[serde(default = "default_geography_multipliers")]
  pub geography_multipliers: HashMap<String, f64>,
  /// January through December
  #[serde(default = "default_seasonal_multipliers")]
  pub seasonal_multipliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPolicy {
  /// Share of ad revenue paid out to the creator
  #[serde(default = "default_creator_share")]
  pub creator_share: f64,
  /// Current revenue as a fraction of the forecast
  #[serde(default = "default_current_revenue_ratio")]
  pub current_revenue_ratio: f64,
  #[serde(default = "default_growth_rate")]
  pub growth_rate: f64,
  /// Views per video above this multiple of subscribers get flagged in the logs
  #[serde(default = "default_sanity_view_multiple")]
  pub sanity_view_multiple: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultPolicy {
  #[serde(default = "default_base_apr_percent")]
  pub base_apr_percent: f64,
  /// APR points added at a risk score of 1.0
  #[serde(default = "default_risk_premium_percent")]
  pub risk_premium_percent: f64,
  #[serde(default = "default_mint_min_confidence")]
  pub mint_min_confidence: f64,
  #[serde(default = "default_mint_min_funding")]
  pub mint_min_funding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPolicy {
  /// Closed vocabulary recognised as a category filter, in priority order
  #[serde(default = "default_categories")]
  pub categories: Vec<String>,
  /// Listings scoring below this are dropped from ranked results
  #[serde(default = "default_match_threshold")]
  pub match_threshold: f64,
  #[serde(default = "default_recommendation_limit")]
  pub recommendation_limit: usize,
}

fn default_category_multipliers() -> HashMap<String, f64> {
  [
    ("gaming", 0.85),
    ("tech", 1.20),
    ("finance", 1.50),
    ("lifestyle", 0.70),
    ("education", 0.90),
    ("entertainment", 0.80),
  ]
  .into_iter()
  .map(|(name, multiplier)| (name.to_string(), multiplier))
  .collect()
}

fn default_geography_multipliers() -> HashMap<String, f64> {
  [
    ("US", 1.50),
    ("UK", 1.20),
    ("DE", 1.10),
    ("CA", 1.30),
    ("AU", 1.15),
    ("IN", 0.30),
    ("ID", 0.25),
    ("BR", 0.40),
  ]
  .into_iter()
  .map(|(code, multiplier)| (code.to_string(), multiplier))
  .collect()
}

// Ad spend peaks in Q4
fn default_seasonal_multipliers() -> Vec<f64> {
  vec![0.90, 0.85, 0.95, 1.00, 1.05, 0.95, 0.90, 0.95, 1.05, 1.15, 1.30, 1.40]
}
fn default_creator_share() -> f64 {
  0.68
}
fn default_current_revenue_ratio() -> f64 {
  0.85
}
fn default_growth_rate() -> f64 {
  0.15
}
fn default_sanity_view_multiple() -> f64 {
  50.0
}
fn default_base_apr_percent() -> f64 {
  8.5
}
fn default_risk_premium_percent() -> f64 {
  8.0
}
fn default_mint_min_confidence() -> f64 {
  0.8
}
fn default_mint_min_funding() -> f64 {
  1000.0
}
fn default_categories() -> Vec<String> {
  ["gaming", "music", "education", "tech", "diy", "lifestyle"].iter().map(|c| c.to_string()).collect()
}
fn default_match_threshold() -> f64 {
  0.3
}
fn default_recommendation_limit() -> usize {
  5
}

impl Default for RateTables {
  fn default() -> Self {
    Self {
      category_multipliers: default_category_multipliers(),
      geography_multipliers: default_geography_multipliers(),
      seasonal_multipliers: default_seasonal_multipliers(),
    }
  }
}

impl Default for ForecastPolicy {
  fn default() -> Self {
    Self {
      creator_share: default_creator_share(),
      current_revenue_ratio: default_current_revenue_ratio(),
      growth_rate: default_growth_rate(),
      sanity_view_multiple: default_sanity_view_multiple(),
    }
  }
}

impl Default for VaultPolicy {
  fn default() -> Self {
    Self {
      base_apr_percent: default_base_apr_percent(),
      risk_premium_percent: default_risk_premium_percent(),
      mint_min_confidence: default_mint_min_confidence(),
      mint_min_funding: default_mint_min_funding(),
    }
  }
}

impl Default for SearchPolicy {
  fn default() -> Self {
    Self {
      categories: default_categories(),
      match_threshold: default_match_threshold(),
      recommendation_limit: default_recommendation_limit(),
    }
  }
}

fn lookup_ignoring_case(table: &HashMap<String, f64>, key: &str) -> Option<f64> {
  table.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)).map(|(_, value)| *value)
}

impl MultiplierTable for RateTables {
  fn category_multiplier(&self, category: &str) -> f64 {
    lookup_ignoring_case(&self.category_multipliers, category).unwrap_or(1.0)
  }

  fn geography_multiplier(&self, geography: &str) -> f64 {
    lookup_ignoring_case(&self.geography_multipliers, geography).unwrap_or(1.0)
  }

  fn seasonal_multiplier(&self, month: u32) -> f64 {
    month
      .checked_sub(1)
      .and_then(|index| self.seasonal_multipliers.get(index as usize))
      .copied()
      .unwrap_or(1.0)
  }
}

impl Config {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Load configuration from the current directory, the user config dir, or defaults
  pub fn load() -> Result<Self> {
    for path in Self::search_paths() {
      if path.exists() {
        tracing::debug!("loading configuration from {}", path.display());
        return Self::load_from_file(path);
      }
    }

    Ok(Config::default())
  }

  fn search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> =
      [".streamfund.json", "streamfund.json"].into_iter().map(PathBuf::from).collect();
    if let Some(config_dir) = dirs::config_dir() {
      paths.push(config_dir.join("streamfund").join("config.json"));
    }
    paths
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(self)?;
    std::fs::write(path, content)?;
    Ok(())
  }

  pub fn validate(&self) -> Result<()> {
    if self.rates.seasonal_multipliers.len() != 12 {
      return Err(VaultsmithError::invalid_config(format!(
        "seasonal_multipliers needs 12 entries, found {}",
        self.rates.seasonal_multipliers.len()
      )));
    }

    check_distinct_ignoring_case("category_multipliers", &self.rates.category_multipliers)?;
    check_distinct_ignoring_case("geography_multipliers", &self.rates.geography_multipliers)?;

    let tables = self.rates.category_multipliers.iter().chain(self.rates.geography_multipliers.iter());
    for (name, multiplier) in tables {
      check_positive(&format!("multiplier for '{name}'"), *multiplier)?;
    }
    for (index, multiplier) in self.rates.seasonal_multipliers.iter().enumerate() {
      check_positive(&format!("seasonal multiplier for month {}", index + 1), *multiplier)?;
    }

    check_fraction("creator_share", self.forecast.creator_share)?;
    check_fraction("current_revenue_ratio", self.forecast.current_revenue_ratio)?;
    check_fraction("match_threshold", self.search.match_threshold)?;
    check_positive("sanity_view_multiple", self.forecast.sanity_view_multiple)?;

    if !self.forecast.growth_rate.is_finite() {
      return Err(VaultsmithError::invalid_config("growth_rate must be finite"));
    }
    if !(self.vault.base_apr_percent.is_finite() && self.vault.base_apr_percent >= 0.0) {
      return Err(VaultsmithError::invalid_config("base_apr_percent must be a non-negative number"));
    }
    if !(self.vault.risk_premium_percent.is_finite() && self.vault.risk_premium_percent >= 0.0) {
      return Err(VaultsmithError::invalid_config("risk_premium_percent must be a non-negative number"));
    }
    check_fraction("mint_min_confidence", self.vault.mint_min_confidence)?;
    if !(self.vault.mint_min_funding.is_finite() && self.vault.mint_min_funding >= 0.0) {
      return Err(VaultsmithError::invalid_config("mint_min_funding must be a non-negative number"));
    }

    Ok(())
  }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(VaultsmithError::invalid_config(format!("{name} must be positive, got {value}")))
  }
}

/// Lookups ignore case, so two keys that differ only by case would shadow each other
fn check_distinct_ignoring_case(name: &str, table: &HashMap<String, f64>) -> Result<()> {
  let mut keys: Vec<&String> = table.keys().collect();
  keys.sort();
  let mut seen = HashSet::new();
  for key in keys {
    if !seen.insert(key.to_lowercase()) {
      return Err(VaultsmithError::invalid_config(format!("{name} has more than one entry for '{key}' ignoring case")));
    }
  }
  Ok(())
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
  if (0.0..=1.0).contains(&value) {
    Ok(())
  } else {
    Err(VaultsmithError::invalid_config(format!("{name} must be within [0, 1], got {value}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.vault.base_apr_percent, 8.5);
    assert_eq!(config.forecast.creator_share, 0.68);
    assert_eq!(config.search.match_threshold, 0.3);
    assert_eq!(config.rates.seasonal_multipliers.len(), 12);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_rate_lookups() {
    let rates = RateTables::default();
    assert_eq!(rates.category_multiplier("gaming"), 0.85);
    assert_eq!(rates.category_multiplier("Gaming"), 0.85);
    assert_eq!(rates.category_multiplier("knitting"), 1.0);
    assert_eq!(rates.geography_multiplier("us"), 1.50);
    assert_eq!(rates.geography_multiplier("FR"), 1.0);
  }

  #[test]
  fn test_seasonal_lookup_bounds() {
    let rates = RateTables::default();
    assert_eq!(rates.seasonal_multiplier(12), 1.40);
    assert_eq!(rates.seasonal_multiplier(1), 0.90);
    assert_eq!(rates.seasonal_multiplier(0), 1.0);
    assert_eq!(rates.seasonal_multiplier(13), 1.0);
  }

  #[test]
  fn test_config_load_nonexistent_file() {
    let result = Config::load_from_file(Path::new("nonexistent.json"));
    assert!(result.is_err());
  }

  #[test]
  fn test_config_load_partial_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("partial.json");

    let config_content = r#"{
            "vault": {
                "base_apr_percent": 10.0
            },
            "rates": {
                "category_multipliers": { "cooking": 1.1 }
            }
        }"#;

    fs::write(&config_path, config_content).unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    assert_eq!(config.vault.base_apr_percent, 10.0);
    assert_eq!(config.vault.risk_premium_percent, 8.0);
    assert_eq!(config.rates.category_multiplier("cooking"), 1.1);
    // Replacing the category table drops the built-in entries
    assert_eq!(config.rates.category_multiplier("gaming"), 1.0);
    assert_eq!(config.rates.geography_multiplier("US"), 1.5);
    assert_eq!(config.search.categories.len(), 6);
  }

  #[test]
  fn test_config_load_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invalid.json");

    fs::write(&config_path, "{ invalid json }").unwrap();

    assert!(matches!(Config::load_from_file(&config_path), Err(VaultsmithError::Json(_))));
  }

  #[test]
  fn test_config_rejects_short_seasonal_table() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("short.json");

    fs::write(&config_path, r#"{ "rates": { "seasonal_multipliers": [1.0, 1.0] } }"#).unwrap();

    let result = Config::load_from_file(&config_path);
    assert!(matches!(result, Err(VaultsmithError::InvalidConfig { .. })));
  }

  #[test]
  fn test_config_rejects_non_positive_multiplier() {
    let mut config = Config::default();
    config.rates.geography_multipliers.insert("XX".to_string(), 0.0);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.search.match_threshold = 1.5;
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_config_rejects_keys_differing_only_by_case() {
    let mut config = Config::default();
    config.rates.category_multipliers.insert("Gaming-Extra".to_string(), 1.1);
    config.rates.category_multipliers.insert("gaming-extra".to_string(), 1.4);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("category_multipliers"));

    let mut config = Config::default();
    config.rates.geography_multipliers.insert("zz".to_string(), 1.0);
    config.rates.geography_multipliers.insert("ZZ".to_string(), 2.0);
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_config_rejects_bad_mint_thresholds() {
    for confidence in [f64::NAN, -0.1, 1.5] {
      let mut config = Config::default();
      config.vault.mint_min_confidence = confidence;
      assert!(config.validate().is_err(), "mint_min_confidence {confidence} should be rejected");
    }

    for funding in [f64::NAN, f64::INFINITY, -1.0] {
      let mut config = Config::default();
      config.vault.mint_min_funding = funding;
      assert!(config.validate().is_err(), "mint_min_funding {funding} should be rejected");
    }

    let mut config = Config::default();
    config.vault.mint_min_funding = 0.0;
    config.vault.mint_min_confidence = 1.0;
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_config_load_and_save() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("streamfund.json");

    let mut original = Config::default();
    original.vault.base_apr_percent = 9.25;
    original.search.categories.push("cooking".to_string());

    original.save_to_file(&config_path).unwrap();
    let loaded = Config::load_from_file(&config_path).unwrap();

    assert_eq!(original, loaded);
  }
}
