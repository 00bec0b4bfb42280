//! Execution types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::risk::Direction;

/// Externally assigned order identifier, treated as an opaque key
pub type OrderId = String;

/// How the order should be priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    /// Immediate execution
    Market,
    /// Execution at the given price
    Limit,
}

/// An order handed to the execution gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trading symbol
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Order size in units
    pub quantity: u64,
    /// Reference price for the order
    pub price: Decimal,
    /// Pricing mode
    pub price_type: PriceType,
}

/// An executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Order id assigned by the gateway
    pub order_id: OrderId,
    /// Trading symbol
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Filled size
    pub quantity: u64,
    /// Fill price
    pub price: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}
