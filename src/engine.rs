//! Scan-cycle composition
//!
//! One scanner per trading session. Each cycle the caller drives `scan` for
//! every tracked symbol and then `monitor` for the open positions; the
//! scanner sequences level generation, signal evaluation, admission, sizing,
//! order placement, and lifecycle bookkeeping.

use rust_decimal::Decimal;

use crate::config::{ConfigError, GannConfig, RiskConfig};
use crate::execution::{ExecutionGateway, OrderId, OrderRequest, PriceType};
use crate::feed::PriceFeed;
use crate::levels::LevelEngine;
use crate::risk::{Position, PositionRiskManager, RejectReason};
use crate::signal;

/// What a scan cycle did for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Levels could not be computed for the reference price
    NoLevels,
    /// Price sits inside the straddle, nothing to do
    NoSignal,
    /// The symbol already has an open position
    AlreadyInPosition,
    /// The admission check refused the trade
    Rejected(RejectReason),
    /// An order was placed and the position registered
    Opened { order_id: OrderId },
}

/// Composes the level engine and risk manager over a gateway and feed.
pub struct Scanner<G, F> {
    levels: LevelEngine,
    risk: PositionRiskManager,
    gateway: G,
    feed: F,
    account_balance: Decimal,
}

impl<G, F> Scanner<G, F>
where
    G: ExecutionGateway,
    F: PriceFeed,
{
    /// Build a scanner from validated configuration.
    pub fn new(
        gann: &GannConfig,
        risk: RiskConfig,
        gateway: G,
        feed: F,
    ) -> Result<Self, ConfigError> {
        let levels = LevelEngine::new(gann)?;
        let account_balance = risk.initial_balance;
        Ok(Self {
            levels,
            risk: PositionRiskManager::new(risk),
            gateway,
            feed,
            account_balance,
        })
    }

    /// Run one signal cycle for a symbol: reference close, levels, signal,
    /// admission, sizing, order, registration.
    pub async fn scan(&mut self, symbol: &str) -> anyhow::Result<ScanOutcome> {
        let reference_price = self.feed.previous_close(symbol).await?;

        let levels = match self.levels.calculate(reference_price) {
            Ok(levels) => levels,
            Err(error) => {
                tracing::warn!(symbol, %error, "skipping symbol, no levels");
                return Ok(ScanOutcome::NoLevels);
            }
        };

        let current_price = self.feed.current_price(symbol).await?;

        // One position per symbol; further exposure needs a distinct signal
        // after this one resolves.
        if self.risk.has_open_position(symbol) {
            return Ok(ScanOutcome::AlreadyInPosition);
        }

        let Some(signal) = signal::evaluate(symbol, &levels, current_price) else {
            return Ok(ScanOutcome::NoSignal);
        };

        let quantity = self.risk.calculate_position_size(
            self.account_balance,
            signal.price,
            signal.stop_loss,
        );

        if let Err(reason) = self.risk.can_place_trade(
            symbol,
            signal.direction,
            quantity,
            signal.price,
            signal.stop_loss,
            signal.target,
        ) {
            tracing::info!(symbol, %reason, "trade rejected");
            return Ok(ScanOutcome::Rejected(reason));
        }

        let order_id = self
            .gateway
            .place_order(OrderRequest {
                symbol: symbol.to_string(),
                direction: signal.direction,
                quantity,
                price: signal.price,
                price_type: PriceType::Market,
            })
            .await?;

        self.risk.register_position(
            &order_id,
            symbol,
            signal.direction,
            quantity,
            signal.price,
            signal.stop_loss,
            signal.target,
        );

        Ok(ScanOutcome::Opened { order_id })
    }

    /// Mark every open position at the live price and close the ones whose
    /// stop or target has been hit. Returns the positions closed this pass.
    ///
    /// The id set is snapshotted up front because closing mutates the ledger
    /// being walked.
    pub async fn monitor(&mut self) -> anyhow::Result<Vec<Position>> {
        let ids = self.risk.open_ids();
        let mut closed = Vec::new();

        for id in ids {
            let Some(position) = self.risk.position(&id) else {
                continue;
            };
            let symbol = position.symbol.clone();

            let current_price = match self.feed.current_price(&symbol).await {
                Ok(price) => price,
                Err(error) => {
                    tracing::warn!(%symbol, %error, "price fetch failed, skipping update");
                    continue;
                }
            };

            self.risk.update_position(&id, current_price);

            let Some(position) = self.risk.position(&id) else {
                continue;
            };
            let Some(reason) = self.risk.check_exit_conditions(position, current_price) else {
                continue;
            };

            let request = OrderRequest {
                symbol,
                direction: position.direction.opposite(),
                quantity: position.quantity,
                price: current_price,
                price_type: PriceType::Market,
            };
            self.gateway.place_order(request).await?;

            if let Some(position) = self.risk.close_position(&id, current_price, reason) {
                closed.push(position);
            }
        }

        Ok(closed)
    }

    pub fn risk(&self) -> &PositionRiskManager {
        &self.risk
    }

    pub fn risk_mut(&mut self) -> &mut PositionRiskManager {
        &mut self.risk
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
