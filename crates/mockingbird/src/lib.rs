//! Mockingbird - believable fake data for Stream Fund demos
//!
//! Every generator is seeded, so the same seed always tells the same story.

pub mod channels;
pub mod listings;
pub mod oracle;

pub use channels::DemoSupplier;
pub use listings::sample_listings;
pub use oracle::{RevenueOracle, RevenueSample};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Stable RNG for a seed and a string key; `std`'s hasher makes no stability promise
pub(crate) fn keyed_rng(seed: u64, key: &str, stream: u64) -> StdRng {
  let mixed = key
    .bytes()
    .fold(seed ^ 0xcbf2_9ce4_8422_2325, |acc, byte| (acc ^ byte as u64).wrapping_mul(0x0100_0000_01b3));
  StdRng::seed_from_u64(mixed.wrapping_add(stream))
}
