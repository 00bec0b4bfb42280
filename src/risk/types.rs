//! Risk management types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// The direction that offsets this one.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

/// Position lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Why a position should be exited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TargetReached,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExitReason::StopLoss => "Stop loss triggered",
            ExitReason::TargetReached => "Target price reached",
        })
    }
}

/// Why `can_place_trade` refused a proposed trade.
///
/// Admission rejections are expected and frequent; callers skip the signal
/// and move on rather than treating these as failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("Maximum positions reached ({0})")]
    MaxPositionsReached(usize),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u64),
    #[error("Invalid price levels: entry={entry}, stop={stop}")]
    InvalidPriceLevels { entry: Decimal, stop: Decimal },
    #[error("Invalid potential loss: {0}")]
    InvalidPotentialLoss(Decimal),
    #[error("Risk-reward ratio too low: {ratio:.2} (minimum: {minimum:.2})")]
    RiskRewardTooLow { ratio: Decimal, minimum: Decimal },
    #[error("Maximum risk per symbol exceeded")]
    MaxRiskPerSymbolExceeded,
    #[error("Daily loss limit exceeded")]
    DailyLossLimitExceeded,
    #[error("Maximum drawdown exceeded: {0:.2}%")]
    MaxDrawdownExceeded(Decimal),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Long.opposite(), Direction::Short);
        assert_eq!(Direction::Short.opposite(), Direction::Long);
    }

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(ExitReason::StopLoss.to_string(), "Stop loss triggered");
        assert_eq!(
            ExitReason::TargetReached.to_string(),
            "Target price reached"
        );
    }

    #[test]
    fn test_reject_reason_messages() {
        assert_eq!(
            RejectReason::MaxPositionsReached(5).to_string(),
            "Maximum positions reached (5)"
        );
        assert_eq!(
            RejectReason::RiskRewardTooLow {
                ratio: dec!(1.2),
                minimum: dec!(1.5),
            }
            .to_string(),
            "Risk-reward ratio too low: 1.20 (minimum: 1.50)"
        );
    }
}
