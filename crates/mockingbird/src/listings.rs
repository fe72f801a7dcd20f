//! Demo marketplace listings

use rand::seq::SliceRandom;
use rand::Rng;
use vaultsmith::matching::VaultListing;
use vaultsmith::RiskLevel;

use crate::channels::CATEGORIES;
use crate::keyed_rng;

const NAME_PREFIXES: [&str; 8] = ["Pixel", "Synth", "Quest", "Circuit", "Maker", "Daily", "Retro", "Nova"];
const NAME_SUFFIXES: [&str; 6] = ["Pioneer", "Wave", "Loop", "Lab", "Crafts", "Vibes"];
const MIN_INVESTMENTS: [f64; 5] = [50.0, 100.0, 250.0, 500.0, 1_000.0];

/// `count` listings with ids 1..=count
pub fn sample_listings(seed: u64, count: usize) -> Vec<VaultListing> {
  let mut rng = keyed_rng(seed, "listings", 0);

  (1..=count as u64)
    .map(|id| {
      let prefix = NAME_PREFIXES.choose(&mut rng).copied().unwrap_or("Nova");
      let suffix = NAME_SUFFIXES.choose(&mut rng).copied().unwrap_or("Wave");
      let category = CATEGORIES.choose(&mut rng).copied().unwrap_or("gaming");
      let apr_percent = (rng.gen_range(6.0..20.0_f64) * 10.0).round() / 10.0;
      let subscribers = rng.gen_range(20_000..2_500_000_u64);

      VaultListing {
        id,
        creator: format!("{prefix}{suffix}"),
        category: category.to_string(),
        apr_percent,
        risk_level: risk_for_apr(apr_percent).to_string(),
        min_investment: MIN_INVESTMENTS.choose(&mut rng).copied().unwrap_or(100.0),
        max_funding: (rng.gen_range(10_000.0..250_000.0_f64) / 1_000.0).round() * 1_000.0,
        subscribers,
        monthly_views: subscribers * rng.gen_range(2..12),
      }
    })
    .collect()
}

// Higher yields are only on offer from riskier vaults
fn risk_for_apr(apr_percent: f64) -> RiskLevel {
  if apr_percent >= 15.0 {
    RiskLevel::High
  } else if apr_percent >= 10.0 {
    RiskLevel::Medium
  } else {
    RiskLevel::Low
  }
}
