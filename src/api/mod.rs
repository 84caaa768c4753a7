pub mod auth;
pub mod error;
pub mod gate;

pub use auth::{sign_request, Credentials};
pub use error::GatewayError;
pub use gate::{GateClient, GatewaySettings, GATE_API_BASE};

use crate::models::{Bar, Direction, OrderResult, Position, SpotBalance, SpotOrder};

/// Futures exchange operations the position monitor depends on
///
/// Implemented by `GateClient`; tests drive the monitor with scripted fakes.
#[allow(async_fn_in_trait)]
pub trait ExchangeGateway {
    /// Last traded price of a contract
    async fn get_ticker(&self, contract: &str) -> Result<f64, GatewayError>;

    /// Most recent `limit` candles on `interval` (e.g. "1h"), oldest first
    async fn get_candles(&self, contract: &str, interval: &str, limit: usize) -> Result<Vec<Bar>, GatewayError>;

    /// Open position for the contract, None when flat
    async fn get_position(&self, contract: &str) -> Result<Option<Position>, GatewayError>;

    /// Immediate-or-cancel market order; positive size buys, negative sells
    async fn submit_market_order(
        &self,
        contract: &str,
        size: f64,
        reduce_only: bool,
    ) -> Result<OrderResult, GatewayError>;
}

/// Spot wallet operations used by the threshold trader
#[allow(async_fn_in_trait)]
pub trait SpotGateway {
    /// Last traded price of a currency pair such as `BTC_USDT`
    async fn get_spot_ticker(&self, pair: &str) -> Result<f64, GatewayError>;

    /// Balance of one currency; zero when the account has never held it
    async fn get_spot_balance(&self, currency: &str) -> Result<SpotBalance, GatewayError>;

    /// Good-till-cancelled limit order
    async fn place_spot_limit_order(
        &self,
        pair: &str,
        side: Direction,
        amount: f64,
        price: f64,
    ) -> Result<SpotOrder, GatewayError>;

    async fn list_open_spot_orders(&self, pair: &str) -> Result<Vec<SpotOrder>, GatewayError>;
}
