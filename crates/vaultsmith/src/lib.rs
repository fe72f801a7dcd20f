//! Vaultsmith - creator revenue forecasting and yield vault pricing
//!
//! Turns a creator channel's audience figures into a priced funding vault
//! (forecast, risk, funding cap, duration, APR), simulates how that vault
//! yields over time, and matches free-text investor searches against listed vaults.

pub mod accrual;
pub mod apr;
pub mod config;
pub mod duration;
pub mod error;
pub mod forecast;
pub mod funding;
pub mod intent;
pub mod matching;
pub mod metrics;
pub mod pipeline;
pub mod risk;
pub mod stats;
pub mod supplier;
pub mod vault;

pub use config::Config;
pub use error::{Result, VaultsmithError};
pub use forecast::ForecastResult;
pub use metrics::ChannelMetrics;
pub use pipeline::{QuotePipeline, VaultQuote};
pub use risk::RiskLevel;
pub use stats::{Investment, VaultStats};
pub use supplier::{FileSupplier, MetricsSupplier};
pub use vault::VaultConfiguration;
