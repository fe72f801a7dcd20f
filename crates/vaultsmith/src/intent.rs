//! Rule-based parsing of free-text vault searches
//!
//! Every pattern is tried against the query; each one that matches sets a
//! filter and adds its weight to the intent's confidence.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SearchPolicy;
use crate::risk::RiskLevel;
use crate::Result;

const APR_WEIGHT_BPS: u32 = 3_000;
const CATEGORY_WEIGHT_BPS: u32 = 3_000;
const RISK_WEIGHT_BPS: u32 = 2_000;
const AMOUNT_WEIGHT_BPS: u32 = 2_000;
const FULL_CONFIDENCE_BPS: u32 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIntent {
  pub min_apr: Option<f64>,
  pub category: Option<String>,
  pub risk_level: Option<RiskLevel>,
  pub max_investment: Option<f64>,
  confidence_bps: u32,
  /// Human-readable note for each pattern that matched
  pub parsed_tokens: Vec<String>,
}

impl SearchIntent {
  /// Accumulated pattern weight, capped at 1.0
  pub fn confidence(&self) -> f64 {
    self.confidence_bps.min(FULL_CONFIDENCE_BPS) as f64 / FULL_CONFIDENCE_BPS as f64
  }

  pub fn is_empty(&self) -> bool {
    self.min_apr.is_none() && self.category.is_none() && self.risk_level.is_none() && self.max_investment.is_none()
  }

  fn add(&mut self, weight_bps: u32, token: String) {
    self.confidence_bps += weight_bps;
    self.parsed_tokens.push(token);
  }
}

/// Renders the filters as a conjunction, e.g. `APR >= 12% AND category = "gaming"`
impl fmt::Display for SearchIntent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut conditions = Vec::new();
    if let Some(min_apr) = self.min_apr {
      conditions.push(format!("APR >= {min_apr}%"));
    }
    if let Some(category) = &self.category {
      conditions.push(format!("category = \"{category}\""));
    }
    if let Some(risk) = self.risk_level {
      conditions.push(format!("risk = \"{}\"", risk.as_str()));
    }
    if let Some(max_investment) = self.max_investment {
      conditions.push(format!("min_investment <= ${max_investment}"));
    }
    f.write_str(&conditions.join(" AND "))
  }
}

pub struct IntentParser {
  apr_pattern: Regex,
  risk_pattern: Regex,
  amount_pattern: Regex,
  categories: Vec<String>,
}

impl IntentParser {
  pub fn new(policy: &SearchPolicy) -> Result<Self> {
    Ok(Self {
      apr_pattern: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*%?\s*(apr|yield|return)")?,
      risk_pattern: Regex::new(r"(?i)(low|medium|high)\s*risk")?,
      amount_pattern: Regex::new(r"\$(\d+(?:,\d{3})*(?:\.\d{2})?)")?,
      categories: policy.categories.iter().map(|c| c.to_lowercase()).collect(),
    })
  }

  pub fn parse(&self, query: &str) -> SearchIntent {
    let mut intent = SearchIntent::default();

    if let Some(min_apr) = self.apr_pattern.captures(query).and_then(|caps| caps[1].parse::<f64>().ok()) {
      intent.min_apr = Some(min_apr);
      intent.add(APR_WEIGHT_BPS, format!("APR >= {min_apr}%"));
    }

    let lowered = query.to_lowercase();
    if let Some(category) = self.categories.iter().find(|category| lowered.contains(category.as_str())) {
      intent.category = Some(category.clone());
      intent.add(CATEGORY_WEIGHT_BPS, format!("Category: {category}"));
    }

    if let Some(risk) = self.risk_pattern.captures(query).and_then(|caps| caps[1].parse::<RiskLevel>().ok()) {
      intent.risk_level = Some(risk);
      intent.add(RISK_WEIGHT_BPS, format!("Risk: {}", risk.as_str()));
    }

    if let Some(caps) = self.amount_pattern.captures(query) {
      let raw = &caps[1];
      if let Ok(amount) = raw.replace(',', "").parse::<f64>() {
        intent.max_investment = Some(amount);
        intent.add(AMOUNT_WEIGHT_BPS, format!("Max: ${raw}"));
      }
    }

    tracing::debug!(query, filters = %intent, confidence = intent.confidence(), "intent parsed");
    intent
  }
}
