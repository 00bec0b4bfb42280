//! End-to-end tests over the full signal -> order -> exit lifecycle

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gann_sq9::config::Config;
use gann_sq9::engine::{ScanOutcome, Scanner};
use gann_sq9::execution::{ExecutionGateway, PaperGateway};
use gann_sq9::feed::PriceFeed;
use gann_sq9::persist::{load_snapshot, save_snapshot};
use gann_sq9::risk::{Direction, ExitReason, RejectReason};

/// In-memory feed with per-symbol previous close and settable live price.
#[derive(Clone, Default)]
struct SymbolFeed {
    prices: Arc<Mutex<HashMap<String, (Decimal, Decimal)>>>,
}

impl SymbolFeed {
    fn insert(&self, symbol: &str, previous: Decimal, current: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), (previous, current));
    }

    fn set_current(&self, symbol: &str, price: Decimal) {
        if let Some(entry) = self.prices.lock().unwrap().get_mut(symbol) {
            entry.1 = price;
        }
    }
}

#[async_trait]
impl PriceFeed for SymbolFeed {
    async fn previous_close(&self, symbol: &str) -> anyhow::Result<Decimal> {
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .map(|p| p.0)
            .ok_or_else(|| anyhow::anyhow!("unknown symbol: {symbol}"))
    }

    async fn current_price(&self, symbol: &str) -> anyhow::Result<Decimal> {
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .map(|p| p.1)
            .ok_or_else(|| anyhow::anyhow!("unknown symbol: {symbol}"))
    }
}

fn test_config() -> Config {
    let toml = r#"
        [risk]
        min_risk_reward = 0.1
        initial_balance = 1000000

        [telemetry]
        log_level = "debug"
    "#;
    toml::from_str(toml).unwrap()
}

#[tokio::test]
async fn test_full_long_cycle() {
    let config = test_config();
    let feed = SymbolFeed::default();
    feed.insert("NIFTY", dec!(1000), dec!(1001));

    let mut scanner = Scanner::new(
        &config.gann,
        config.risk.clone(),
        PaperGateway::new(),
        feed.clone(),
    )
    .unwrap();

    // levels for 1000: buy above 1000.14, stop 990.27, first target 1008.06
    let outcome = scanner.scan("NIFTY").await.unwrap();
    let ScanOutcome::Opened { order_id } = outcome else {
        panic!("expected open, got {outcome:?}");
    };

    let position = scanner.risk().position(&order_id).unwrap();
    assert_eq!(position.direction, Direction::Long);
    assert_eq!(position.stop_loss, dec!(990.27));
    assert_eq!(position.target_price, Some(dec!(1008.06)));
    let quantity = position.quantity;

    // in range: marked but not closed
    feed.set_current("NIFTY", dec!(1004));
    assert!(scanner.monitor().await.unwrap().is_empty());
    assert_eq!(
        scanner.risk().position(&order_id).unwrap().unrealized_pnl,
        dec!(3) * Decimal::from(quantity)
    );

    // target reached
    feed.set_current("NIFTY", dec!(1010));
    let closed = scanner.monitor().await.unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].exit_reason, Some(ExitReason::TargetReached));
    assert_eq!(
        closed[0].realized_pnl,
        Some(dec!(9) * Decimal::from(quantity))
    );

    let stats = scanner.risk().trade_statistics();
    assert_eq!(stats.total_trades, 1);
    assert_eq!(stats.winning_trades, 1);
    assert_eq!(stats.current_positions, 0);
    assert!(stats.daily_pnl > dec!(0));

    // entry fill and offsetting exit fill
    let fills = scanner.gateway().fills().await.unwrap();
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].direction, Direction::Long);
    assert_eq!(fills[1].direction, Direction::Short);
}

#[tokio::test]
async fn test_short_cycle_stops_out() {
    let config = test_config();
    let feed = SymbolFeed::default();
    // levels for 900: sell below 892.52, short stop 909.34
    feed.insert("BANKNIFTY", dec!(900), dec!(890));

    let mut scanner = Scanner::new(
        &config.gann,
        config.risk.clone(),
        PaperGateway::new(),
        feed.clone(),
    )
    .unwrap();

    let outcome = scanner.scan("BANKNIFTY").await.unwrap();
    let ScanOutcome::Opened { order_id } = outcome else {
        panic!("expected open, got {outcome:?}");
    };
    let position = scanner.risk().position(&order_id).unwrap();
    assert_eq!(position.direction, Direction::Short);
    assert_eq!(position.stop_loss, dec!(909.34));

    feed.set_current("BANKNIFTY", dec!(910));
    let closed = scanner.monitor().await.unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].exit_reason, Some(ExitReason::StopLoss));
    assert!(closed[0].realized_pnl.unwrap() < dec!(0));
    assert_eq!(scanner.risk().trade_statistics().losing_trades, 1);
}

#[tokio::test]
async fn test_default_ratio_gate_rejects_entry() {
    // with the default 1.5 minimum the first target is closer than the
    // buffered stop, so the crossing is rejected at admission
    let feed = SymbolFeed::default();
    feed.insert("NIFTY", dec!(1000), dec!(1001));

    let config = Config::default();
    let mut scanner =
        Scanner::new(&config.gann, config.risk, PaperGateway::new(), feed).unwrap();

    let outcome = scanner.scan("NIFTY").await.unwrap();
    assert!(matches!(
        outcome,
        ScanOutcome::Rejected(RejectReason::RiskRewardTooLow { .. })
    ));
    assert!(scanner.risk().active_positions().is_empty());
}

#[tokio::test]
async fn test_snapshot_recovery_resumes_monitoring() {
    let config = test_config();
    let feed = SymbolFeed::default();
    feed.insert("NIFTY", dec!(1000), dec!(1001));

    let mut scanner = Scanner::new(
        &config.gann,
        config.risk.clone(),
        PaperGateway::new(),
        feed.clone(),
    )
    .unwrap();
    scanner.scan("NIFTY").await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    save_snapshot(&path, scanner.risk().active_positions()).unwrap();

    // a fresh session restores the ledger and picks up monitoring
    let mut restored = Scanner::new(
        &config.gann,
        config.risk.clone(),
        PaperGateway::new(),
        feed.clone(),
    )
    .unwrap();
    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(&snapshot, scanner.risk().active_positions());
    restored.risk_mut().restore_positions(snapshot);

    assert_eq!(
        restored.scan("NIFTY").await.unwrap(),
        ScanOutcome::AlreadyInPosition
    );

    feed.set_current("NIFTY", dec!(1010));
    let closed = restored.monitor().await.unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].exit_reason, Some(ExitReason::TargetReached));
}
