//! Level-crossing signal evaluation
//!
//! A signal fires when the live price crosses the straddle: above `buy_above`
//! goes long toward the first buy target, below `sell_below` goes short
//! toward the first sell target. Price between the two levels is no signal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::levels::PriceLevels;
use crate::risk::Direction;

/// A proposed trade derived from a level crossing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Trading symbol
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Live price at evaluation time, the proposed entry
    pub price: Decimal,
    /// The level that was crossed
    pub level: Decimal,
    /// Stop for the proposed trade
    pub stop_loss: Decimal,
    /// Nearest target on the trade's side, if any
    pub target: Option<Decimal>,
    /// Evaluation timestamp
    pub timestamp: DateTime<Utc>,
}

/// Evaluate a level set against the live price.
pub fn evaluate(symbol: &str, levels: &PriceLevels, current_price: Decimal) -> Option<Signal> {
    if current_price > levels.buy_above {
        tracing::info!(
            symbol,
            %current_price,
            buy_above = %levels.buy_above,
            "long signal"
        );
        return Some(Signal {
            symbol: symbol.to_string(),
            direction: Direction::Long,
            price: current_price,
            level: levels.buy_above,
            stop_loss: levels.stop_loss_long,
            target: levels.buy_targets.first().map(|t| t.price),
            timestamp: Utc::now(),
        });
    }

    if current_price < levels.sell_below {
        tracing::info!(
            symbol,
            %current_price,
            sell_below = %levels.sell_below,
            "short signal"
        );
        return Some(Signal {
            symbol: symbol.to_string(),
            direction: Direction::Short,
            price: current_price,
            level: levels.sell_below,
            stop_loss: levels.stop_loss_short,
            target: levels.sell_targets.first().map(|t| t.price),
            timestamp: Utc::now(),
        });
    }

    None
}
