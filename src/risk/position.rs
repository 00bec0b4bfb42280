//! Position tracking

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Direction, ExitReason, PositionStatus};

/// A tracked position.
///
/// Owned exclusively by the risk manager. Exit fields stay `None` until the
/// position closes; once closed it leaves the active set and never returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Externally assigned order id, treated as an opaque key
    pub id: String,
    /// Trading symbol
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Position size in units
    pub quantity: u64,
    /// Entry price
    pub entry_price: Decimal,
    /// Stop loss level
    pub stop_loss: Decimal,
    /// Target level, if the signal carried one
    pub target_price: Option<Decimal>,
    /// Latest marked price
    pub current_price: Decimal,
    /// Capital at risk, fixed at entry
    pub risk_amount: Decimal,
    /// Profit/loss ratio recorded at entry, if a target was set
    pub risk_reward: Option<Decimal>,
    /// Mark-to-market P&L, recomputed on every update
    pub unrealized_pnl: Decimal,
    /// Entry timestamp
    pub entry_time: DateTime<Utc>,
    /// Last price-update timestamp
    pub last_update: DateTime<Utc>,
    /// Lifecycle state
    pub status: PositionStatus,
    /// Exit price, set on close
    pub exit_price: Option<Decimal>,
    /// Exit timestamp, set on close
    pub exit_time: Option<DateTime<Utc>>,
    /// Exit reason, set on close
    pub exit_reason: Option<ExitReason>,
    /// Realized P&L, set on close
    pub realized_pnl: Option<Decimal>,
}

impl Position {
    /// Directional P&L of this position marked at `price`.
    pub fn pnl_at(&self, price: Decimal) -> Decimal {
        let quantity = Decimal::from(self.quantity);
        match self.direction {
            Direction::Long => (price - self.entry_price) * quantity,
            Direction::Short => (self.entry_price - price) * quantity,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }
}
