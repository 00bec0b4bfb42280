//! Price feed contract
//!
//! Implementations complete their fetches before the core is invoked with
//! the results; nothing in the core blocks on market data.

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for market data sources
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Close of the previous completed candle, the reference price for
    /// level generation.
    async fn previous_close(&self, symbol: &str) -> anyhow::Result<Decimal>;

    /// Latest traded price.
    async fn current_price(&self, symbol: &str) -> anyhow::Result<Decimal>;
}
