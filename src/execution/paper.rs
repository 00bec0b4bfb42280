//! Paper execution with simulated immediate fills

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ExecutionGateway, Fill, OrderId, OrderRequest};

/// Fills every order instantly at the requested price.
pub struct PaperGateway {
    fills: Arc<RwLock<Vec<Fill>>>,
}

impl PaperGateway {
    /// Create a paper gateway with no fill history.
    pub fn new() -> Self {
        Self {
            fills: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for PaperGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionGateway for PaperGateway {
    async fn place_order(&self, request: OrderRequest) -> anyhow::Result<OrderId> {
        let order_id = format!("PAPER-{}", Uuid::new_v4());

        let fill = Fill {
            order_id: order_id.clone(),
            symbol: request.symbol,
            direction: request.direction,
            quantity: request.quantity,
            price: request.price,
            timestamp: Utc::now(),
        };
        self.fills.write().await.push(fill);

        tracing::info!(%order_id, "paper order filled");
        Ok(order_id)
    }

    async fn fills(&self) -> anyhow::Result<Vec<Fill>> {
        Ok(self.fills.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::PriceType;
    use crate::risk::Direction;
    use rust_decimal_macros::dec;

    fn request(symbol: &str) -> OrderRequest {
        OrderRequest {
            symbol: symbol.to_string(),
            direction: Direction::Long,
            quantity: 100,
            price: dec!(1000),
            price_type: PriceType::Market,
        }
    }

    #[tokio::test]
    async fn test_paper_gateway_fill() {
        let gateway = PaperGateway::new();

        let order_id = gateway.place_order(request("NIFTY")).await.unwrap();
        assert!(order_id.starts_with("PAPER-"));

        let fills = gateway.fills().await.unwrap();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].order_id, order_id);
        assert_eq!(fills[0].price, dec!(1000));
        assert_eq!(fills[0].quantity, 100);
    }

    #[tokio::test]
    async fn test_paper_gateway_unique_ids() {
        let gateway = PaperGateway::new();
        let first = gateway.place_order(request("NIFTY")).await.unwrap();
        let second = gateway.place_order(request("NIFTY")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_paper_gateway_multiple_symbols() {
        let gateway = PaperGateway::new();
        gateway.place_order(request("NIFTY")).await.unwrap();
        gateway.place_order(request("BANKNIFTY")).await.unwrap();

        let fills = gateway.fills().await.unwrap();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].symbol, "NIFTY");
        assert_eq!(fills[1].symbol, "BANKNIFTY");
    }
}
