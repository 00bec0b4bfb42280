//! Position sizing, admission rules, and lifecycle tracking

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::position::Position;
use super::types::{Direction, ExitReason, PositionStatus, RejectReason};
use crate::config::RiskConfig;

/// Aggregate performance counters, derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeStatistics {
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub win_rate: Decimal,
    /// Gross profit over gross loss; the denominator is floored at 1 to
    /// avoid division errors, so this is not a precision metric.
    pub profit_factor: Decimal,
    pub total_profit: Decimal,
    pub total_loss: Decimal,
    pub net_profit: Decimal,
    pub daily_pnl: Decimal,
    pub drawdown: Decimal,
    pub current_positions: usize,
}

/// Gatekeeper and ledger for open positions.
///
/// One instance per trading session. All state is mutated through `&mut self`;
/// callers running ticks and signals on separate tasks must serialize access
/// themselves.
pub struct PositionRiskManager {
    config: RiskConfig,
    active_positions: HashMap<String, Position>,
    daily_pnl: Decimal,
    peak_balance: Decimal,
    current_balance: Decimal,
    total_trades: u64,
    winning_trades: u64,
    losing_trades: u64,
    total_profit: Decimal,
    total_loss: Decimal,
}

impl PositionRiskManager {
    /// Create a manager with zeroed counters.
    pub fn new(config: RiskConfig) -> Self {
        tracing::info!(?config, "risk manager initialized");
        Self {
            config,
            active_positions: HashMap::new(),
            daily_pnl: Decimal::ZERO,
            peak_balance: Decimal::ZERO,
            current_balance: Decimal::ZERO,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_profit: Decimal::ZERO,
            total_loss: Decimal::ZERO,
        }
    }

    /// Units to trade so that the stop-loss distance risks at most the
    /// configured fraction of the account. Returns 0 on invalid inputs.
    ///
    /// Also refreshes the balance metrics, since callers size against the
    /// balance they just fetched.
    pub fn calculate_position_size(
        &mut self,
        account_balance: Decimal,
        entry_price: Decimal,
        stop_loss: Decimal,
    ) -> u64 {
        if entry_price <= Decimal::ZERO || stop_loss <= Decimal::ZERO {
            tracing::warn!(%entry_price, %stop_loss, "invalid prices for position sizing");
            return 0;
        }

        self.update_account_metrics(account_balance);

        let risk_per_unit = (entry_price - stop_loss).abs();
        if risk_per_unit <= Decimal::ZERO {
            tracing::warn!(%entry_price, %stop_loss, "zero risk per unit");
            return 0;
        }

        let risk_amount = account_balance * self.config.max_risk_per_trade;
        let quantity = (risk_amount / risk_per_unit).floor().to_u64().unwrap_or(0);

        tracing::info!(quantity, %risk_per_unit, "position size calculated");
        quantity
    }

    /// Advisory admission check. No side effects; must be called before
    /// `register_position`. The first failed rule short-circuits.
    pub fn can_place_trade(
        &self,
        symbol: &str,
        direction: Direction,
        quantity: u64,
        entry_price: Decimal,
        stop_loss: Decimal,
        target_price: Option<Decimal>,
    ) -> Result<(), RejectReason> {
        if self.active_positions.len() >= self.config.max_positions {
            return Err(RejectReason::MaxPositionsReached(self.config.max_positions));
        }

        if quantity == 0 {
            return Err(RejectReason::InvalidQuantity(quantity));
        }

        if entry_price <= Decimal::ZERO || stop_loss <= Decimal::ZERO {
            return Err(RejectReason::InvalidPriceLevels {
                entry: entry_price,
                stop: stop_loss,
            });
        }

        if let Some(target) = target_price {
            let (potential_profit, potential_loss) = match direction {
                Direction::Long => (target - entry_price, entry_price - stop_loss),
                Direction::Short => (entry_price - target, stop_loss - entry_price),
            };

            if potential_loss <= Decimal::ZERO {
                return Err(RejectReason::InvalidPotentialLoss(potential_loss));
            }

            let risk_reward = potential_profit / potential_loss;
            if risk_reward < self.config.min_risk_reward {
                return Err(RejectReason::RiskRewardTooLow {
                    ratio: risk_reward,
                    minimum: self.config.min_risk_reward,
                });
            }
        }

        let symbol_risk: Decimal = self
            .active_positions
            .values()
            .filter(|p| p.symbol == symbol)
            .map(|p| p.risk_amount)
            .sum();
        let new_risk = trade_risk(entry_price, stop_loss, quantity);
        if self.current_balance > Decimal::ZERO
            && (symbol_risk + new_risk) / self.current_balance > self.config.max_risk_per_symbol
        {
            return Err(RejectReason::MaxRiskPerSymbolExceeded);
        }

        if self.daily_pnl < -(self.current_balance * self.config.max_daily_loss) {
            return Err(RejectReason::DailyLossLimitExceeded);
        }

        if self.peak_balance > Decimal::ZERO {
            let drawdown = (self.peak_balance - self.current_balance) / self.peak_balance;
            if drawdown > self.config.max_drawdown {
                return Err(RejectReason::MaxDrawdownExceeded(
                    drawdown * Decimal::ONE_HUNDRED,
                ));
            }
        }

        Ok(())
    }

    /// Register an open position under an externally assigned order id.
    ///
    /// Callers must guarantee id uniqueness; reusing an id overwrites.
    pub fn register_position(
        &mut self,
        id: &str,
        symbol: &str,
        direction: Direction,
        quantity: u64,
        entry_price: Decimal,
        stop_loss: Decimal,
        target_price: Option<Decimal>,
    ) -> String {
        let risk_amount = trade_risk(entry_price, stop_loss, quantity);

        let risk_reward = target_price
            .filter(|t| *t > Decimal::ZERO)
            .and_then(|target| {
                let qty = Decimal::from(quantity);
                let (potential_profit, potential_loss) = match direction {
                    Direction::Long => {
                        ((target - entry_price) * qty, (entry_price - stop_loss) * qty)
                    }
                    Direction::Short => {
                        ((entry_price - target) * qty, (stop_loss - entry_price) * qty)
                    }
                };
                (potential_loss > Decimal::ZERO).then(|| potential_profit / potential_loss)
            });

        let now = Utc::now();
        let position = Position {
            id: id.to_string(),
            symbol: symbol.to_string(),
            direction,
            quantity,
            entry_price,
            stop_loss,
            target_price,
            current_price: entry_price,
            risk_amount,
            risk_reward,
            unrealized_pnl: Decimal::ZERO,
            entry_time: now,
            last_update: now,
            status: PositionStatus::Open,
            exit_price: None,
            exit_time: None,
            exit_reason: None,
            realized_pnl: None,
        };

        self.active_positions.insert(id.to_string(), position);

        tracing::info!(
            id,
            symbol,
            ?direction,
            quantity,
            %entry_price,
            "position registered"
        );
        id.to_string()
    }

    /// Refresh a position's mark price and unrealized P&L.
    ///
    /// Unknown ids are a no-op: a tick may race a close.
    pub fn update_position(&mut self, id: &str, current_price: Decimal) -> Option<&Position> {
        let position = self.active_positions.get_mut(id)?;
        position.current_price = current_price;
        position.unrealized_pnl = position.pnl_at(current_price);
        position.last_update = Utc::now();
        Some(position)
    }

    /// Advisory exit check against the position's stop and target.
    pub fn check_exit_conditions(
        &self,
        position: &Position,
        current_price: Decimal,
    ) -> Option<ExitReason> {
        let stop_hit = match position.direction {
            Direction::Long => current_price <= position.stop_loss,
            Direction::Short => current_price >= position.stop_loss,
        };
        if stop_hit {
            return Some(ExitReason::StopLoss);
        }

        let target = position.target_price?;
        let target_hit = match position.direction {
            Direction::Long => current_price >= target,
            Direction::Short => current_price <= target,
        };
        target_hit.then_some(ExitReason::TargetReached)
    }

    /// Close a position, fold its result into the aggregate counters, and
    /// remove it from the active set.
    ///
    /// The only path out of the active set. Unknown ids return `None`, which
    /// makes a double close a safe no-op. A flat result counts as a loss.
    pub fn close_position(
        &mut self,
        id: &str,
        exit_price: Decimal,
        reason: ExitReason,
    ) -> Option<Position> {
        let mut position = self.active_positions.remove(id)?;

        let realized_pnl = position.pnl_at(exit_price);
        position.status = PositionStatus::Closed;
        position.exit_price = Some(exit_price);
        position.exit_time = Some(Utc::now());
        position.exit_reason = Some(reason);
        position.realized_pnl = Some(realized_pnl);

        self.total_trades += 1;
        self.daily_pnl += realized_pnl;
        if realized_pnl > Decimal::ZERO {
            self.winning_trades += 1;
            self.total_profit += realized_pnl;
        } else {
            self.losing_trades += 1;
            self.total_loss += realized_pnl.abs();
        }

        tracing::info!(id, %exit_price, %realized_pnl, %reason, "position closed");
        Some(position)
    }

    /// Refresh balance metrics from an externally fetched account balance.
    pub fn update_account_metrics(&mut self, account_balance: Decimal) {
        self.current_balance = account_balance;
        if account_balance > self.peak_balance {
            self.peak_balance = account_balance;
        }
    }

    /// Reset the daily P&L counter at the start of a trading day.
    pub fn reset_daily_metrics(&mut self) {
        self.daily_pnl = Decimal::ZERO;
    }

    /// Snapshot of performance counters.
    pub fn trade_statistics(&self) -> TradeStatistics {
        let win_rate =
            Decimal::from(self.winning_trades) / Decimal::from(self.total_trades.max(1));
        let profit_factor = self.total_profit / self.total_loss.max(Decimal::ONE);
        let drawdown = if self.peak_balance > Decimal::ZERO {
            (self.peak_balance - self.current_balance) / self.peak_balance
        } else {
            Decimal::ZERO
        };

        TradeStatistics {
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
            win_rate,
            profit_factor,
            total_profit: self.total_profit,
            total_loss: self.total_loss,
            net_profit: self.total_profit - self.total_loss,
            daily_pnl: self.daily_pnl,
            drawdown,
            current_positions: self.active_positions.len(),
        }
    }

    pub fn position(&self, id: &str) -> Option<&Position> {
        self.active_positions.get(id)
    }

    pub fn active_positions(&self) -> &HashMap<String, Position> {
        &self.active_positions
    }

    /// Open position ids, snapshotted so a batch update can close positions
    /// while iterating.
    pub fn open_ids(&self) -> Vec<String> {
        self.active_positions.keys().cloned().collect()
    }

    pub fn has_open_position(&self, symbol: &str) -> bool {
        self.active_positions.values().any(|p| p.symbol == symbol)
    }

    /// Replace the active set from a snapshot, for crash recovery.
    pub fn restore_positions(&mut self, positions: HashMap<String, Position>) {
        tracing::info!(count = positions.len(), "positions restored from snapshot");
        self.active_positions = positions;
    }

    pub fn current_balance(&self) -> Decimal {
        self.current_balance
    }

    pub fn peak_balance(&self) -> Decimal {
        self.peak_balance
    }

    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }
}

/// Capital lost if the stop is hit at the given size.
fn trade_risk(entry_price: Decimal, stop_loss: Decimal, quantity: u64) -> Decimal {
    (entry_price - stop_loss).abs() * Decimal::from(quantity)
}
