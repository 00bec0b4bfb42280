//! Level engine output types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the eight 45-degree axes of the Square of 9 spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
    Deg180,
    Deg225,
    Deg270,
    Deg315,
}

impl Axis {
    /// All axes in spiral order.
    pub const ALL: [Axis; 8] = [
        Axis::Deg0,
        Axis::Deg45,
        Axis::Deg90,
        Axis::Deg135,
        Axis::Deg180,
        Axis::Deg225,
        Axis::Deg270,
        Axis::Deg315,
    ];

    /// Angle in degrees.
    pub fn degrees(self) -> u32 {
        self as u32 * 45
    }

    /// Cardinal axes step by the raw increment; diagonals take a wider step.
    pub fn is_cardinal(self) -> bool {
        self.degrees() % 90 == 0
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// A target level attributed to the axis that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTarget {
    /// Axis the ring was taken from
    pub axis: Axis,
    /// Ring price
    pub price: Decimal,
}

/// Support and resistance levels derived from a single reference price.
///
/// `sell_below < input_price < buy_above` holds for every value the engine
/// returns; an input with no ring on one side produces no result at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    /// Reference price the levels were derived from
    pub input_price: Decimal,
    /// Nearest ring above the input price on the 0-degree axis
    pub buy_above: Decimal,
    /// Nearest ring below the input price on the 0-degree axis
    pub sell_below: Decimal,
    /// Upside targets, ascending, at most one per axis, deduplicated by price
    pub buy_targets: Vec<LevelTarget>,
    /// Downside targets, descending, deduplicated by price
    pub sell_targets: Vec<LevelTarget>,
    /// Stop for long entries, buffered below `sell_below`
    pub stop_loss_long: Decimal,
    /// Stop for short entries, buffered above `buy_above`
    pub stop_loss_short: Decimal,
}

/// Why a level calculation produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// Reference price was zero or negative
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    /// No ring exists on one side of the price, so no signal is computable
    #[error("no ring straddles price {0}")]
    NoStraddle(Decimal),
}
