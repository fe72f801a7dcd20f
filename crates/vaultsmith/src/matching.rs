//! Scoring and ranking vault listings against a search intent

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::intent::SearchIntent;
use crate::risk::RiskLevel;

const APR_MATCH_SCORE: f64 = 0.4;
const APR_PROXIMITY_BONUS: f64 = 0.2;
const CATEGORY_MATCH_SCORE: f64 = 0.3;
const RISK_MATCH_SCORE: f64 = 0.2;
const INVESTMENT_MATCH_SCORE: f64 = 0.1;

/// A vault on offer in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultListing {
  pub id: u64,
  pub creator: String,
  pub category: String,
  pub apr_percent: f64,
  /// Free-text label as published, e.g. "Low"
  pub risk_level: String,
  pub min_investment: f64,
  #[serde(default)]
  pub max_funding: f64,
  #[serde(default)]
  pub subscribers: u64,
  #[serde(default)]
  pub monthly_views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVault {
  #[serde(flatten)]
  pub listing: VaultListing,
  pub match_score: f64,
}

impl VaultListing {
  pub fn parsed_risk(&self) -> Option<RiskLevel> {
    self.risk_level.parse().ok()
  }

  /// Category, yield tier and creator size tags
  pub fn tags(&self) -> Vec<String> {
    let yield_tag = if self.apr_percent >= 15.0 {
      "high-yield"
    } else if self.apr_percent >= 10.0 {
      "medium-yield"
    } else {
      "stable-yield"
    };

    let size_tag = if self.subscribers >= 1_000_000 {
      "mega-creator"
    } else if self.subscribers >= 100_000 {
      "established-creator"
    } else {
      "emerging-creator"
    };

    vec![self.category.to_lowercase(), yield_tag.to_string(), size_tag.to_string()]
  }
}

/// How well a listing satisfies the intent, within [0, 1]
pub fn score(listing: &VaultListing, intent: &SearchIntent) -> f64 {
  let mut score = 0.0;

  if let Some(min_apr) = intent.min_apr {
    if listing.apr_percent >= min_apr {
      let diff = (listing.apr_percent - min_apr).abs();
      score += APR_MATCH_SCORE + (APR_PROXIMITY_BONUS - diff / 20.0).max(0.0);
    }
  }

  if let Some(category) = &intent.category {
    if listing.category.to_lowercase().contains(category.as_str()) {
      score += CATEGORY_MATCH_SCORE;
    }
  }

  if let Some(risk) = intent.risk_level {
    if listing.parsed_risk() == Some(risk) {
      score += RISK_MATCH_SCORE;
    }
  }

  if let Some(max_investment) = intent.max_investment {
    if listing.min_investment <= max_investment {
      score += INVESTMENT_MATCH_SCORE;
    }
  }

  score.clamp(0.0, 1.0)
}

/// Listings scoring at least `threshold`, best first, ties broken by listing id
pub fn rank(listings: &[VaultListing], intent: &SearchIntent, threshold: f64) -> Vec<RankedVault> {
  let mut ranked: Vec<RankedVault> = listings
    .iter()
    .map(|listing| RankedVault { listing: listing.clone(), match_score: score(listing, intent) })
    .filter(|ranked| ranked.match_score >= threshold)
    .collect();

  ranked.sort_by(|a, b| {
    b.match_score
      .partial_cmp(&a.match_score)
      .unwrap_or(Ordering::Equal)
      .then_with(|| a.listing.id.cmp(&b.listing.id))
  });

  tracing::debug!(candidates = listings.len(), kept = ranked.len(), "listings ranked");
  ranked
}

/// Parse counts such as "850K" or "2.4M"; anything unparseable is zero
pub fn parse_compact_number(text: &str) -> f64 {
  let trimmed = text.trim();
  let (digits, multiplier) = match trimmed.chars().last().map(|c| c.to_ascii_uppercase()) {
    Some('K') => (&trimmed[..trimmed.len() - 1], 1e3),
    Some('M') => (&trimmed[..trimmed.len() - 1], 1e6),
    Some('B') => (&trimmed[..trimmed.len() - 1], 1e9),
    _ => (trimmed, 1.0),
  };
  digits.trim().replace(',', "").parse::<f64>().map(|n| n * multiplier).unwrap_or(0.0)
}

/// A past investment, as far as preference inference cares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub category: String,
  pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorPreferences {
  pub risk_tolerance: RiskLevel,
  pub preferred_categories: Vec<String>,
}

impl InvestorPreferences {
  /// Infer tolerance from the average risk tier invested in so far
  pub fn from_history(history: &[HistoryEntry]) -> Self {
    if history.is_empty() {
      return Self { risk_tolerance: RiskLevel::Medium, preferred_categories: Vec::new() };
    }

    let average = history.iter().map(|entry| entry.risk_level.rank() as f64).sum::<f64>() / history.len() as f64;
    let risk_tolerance = if average < 1.5 {
      RiskLevel::Low
    } else if average < 2.5 {
      RiskLevel::Medium
    } else {
      RiskLevel::High
    };

    let preferred_categories: BTreeSet<String> = history.iter().map(|entry| entry.category.to_lowercase()).collect();

    Self { risk_tolerance, preferred_categories: preferred_categories.into_iter().collect() }
  }

  pub fn accepts(&self, listing: &VaultListing) -> bool {
    let risk_ok = match listing.parsed_risk() {
      Some(risk) => risk <= self.risk_tolerance,
      None => self.risk_tolerance == RiskLevel::High,
    };
    let category_ok = self.preferred_categories.is_empty()
      || self.preferred_categories.iter().any(|c| c.eq_ignore_ascii_case(&listing.category));
    risk_ok && category_ok
  }
}

/// Up to `limit` listings that fit the investor's inferred preferences, in input order
pub fn recommend<'a>(listings: &'a [VaultListing], preferences: &InvestorPreferences, limit: usize) -> Vec<&'a VaultListing> {
  listings.iter().filter(|listing| preferences.accepts(listing)).take(limit).collect()
}

/// One-paragraph summary of a search
pub fn summarize(query: &str, results: &[RankedVault], intent: &SearchIntent) -> String {
  let mut summary = format!("Found {} vaults matching \"{}\"", results.len(), query);

  let Some(top) = results.first() else {
    return summary;
  };

  if let Some(min_apr) = intent.min_apr {
    let average = results.iter().map(|r| r.listing.apr_percent).sum::<f64>() / results.len() as f64;
    summary.push_str(&format!("\nAverage APR: {average:.1}% (target: {min_apr}%)"));
  }
  if let Some(category) = &intent.category {
    let count = results.iter().filter(|r| r.listing.category.to_lowercase().contains(category.as_str())).count();
    summary.push_str(&format!("\n{count} {category} creators found"));
  }
  if let Some(risk) = intent.risk_level {
    let count = results.iter().filter(|r| r.listing.parsed_risk() == Some(risk)).count();
    summary.push_str(&format!("\n{count} {} risk vaults available", risk.as_str()));
  }
  summary.push_str(&format!("\nTop recommendation: {} ({:.1}% APR)", top.listing.creator, top.listing.apr_percent));

  summary
}
