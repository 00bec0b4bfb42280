//! Order execution contract and paper implementation
//!
//! The core never speaks a broker protocol. It hands an [`OrderRequest`] to
//! an [`ExecutionGateway`] and keys the resulting position by the returned
//! id; it never generates order ids of its own.

mod paper;
mod types;

pub use paper::PaperGateway;
pub use types::{Fill, OrderId, OrderRequest, PriceType};

use async_trait::async_trait;

/// Trait for order execution backends
#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Submit an order. Returns a unique order id on success.
    async fn place_order(&self, request: OrderRequest) -> anyhow::Result<OrderId>;

    /// Fills recorded so far.
    async fn fills(&self) -> anyhow::Result<Vec<Fill>>;
}
