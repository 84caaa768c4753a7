use super::auth::Credentials;
use super::{ExchangeGateway, GatewayError, SpotGateway};
use crate::models::{Bar, Direction, OrderResult, Position, SpotBalance, SpotOrder};
use chrono::{DateTime, Utc};
use governor::{Quota, RateLimiter};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const GATE_API_BASE: &str = "https://api.gateio.ws/api/v4";
const MAX_RETRIES: u32 = 3;

type GateRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Connection settings for the Gate.io REST API
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_settle")]
    pub settle: String,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// First retry delay, doubled on every further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    GATE_API_BASE.to_string()
}

fn default_settle() -> String {
    "usdt".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            settle: default_settle(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Gate.io v4 client for futures trading and spot market data
///
/// Cloneable; clones share the rate limiter.
#[derive(Clone)]
pub struct GateClient {
    client: Client,
    settings: GatewaySettings,
    credentials: Option<Credentials>,
    rate_limiter: Arc<GateRateLimiter>,
}

// Gate sends most numbers as strings, some as JSON numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    /// Empty strings read as zero
    fn parse(&self, field: &str) -> Result<f64, GatewayError> {
        match self {
            WireNumber::Number(n) => Ok(*n),
            WireNumber::Text(s) if s.trim().is_empty() => Ok(0.0),
            WireNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| GatewayError::Decode(format!("{} is not a number: {:?}", field, s))),
        }
    }

    fn as_text(&self) -> String {
        match self {
            WireNumber::Number(n) => n.to_string(),
            WireNumber::Text(s) => s.clone(),
        }
    }
}

fn optional_number(value: &Option<WireNumber>, field: &str) -> Result<f64, GatewayError> {
    value.as_ref().map_or(Ok(0.0), |v| v.parse(field))
}

/// Row of /futures/{settle}/tickers
#[derive(Debug, Deserialize)]
struct TickerWire {
    #[serde(default)]
    contract: String,
    last: WireNumber,
}

/// Row of /futures/{settle}/candlesticks
#[derive(Debug, Deserialize)]
struct FuturesCandleWire {
    t: i64,
    #[serde(default)]
    v: Option<WireNumber>,
    c: WireNumber,
    h: WireNumber,
    l: WireNumber,
    o: WireNumber,
}

impl TryFrom<FuturesCandleWire> for Bar {
    type Error = GatewayError;

    fn try_from(wire: FuturesCandleWire) -> Result<Self, Self::Error> {
        Ok(Bar {
            timestamp: timestamp_from_secs(wire.t)?,
            open: wire.o.parse("open")?,
            high: wire.h.parse("high")?,
            low: wire.l.parse("low")?,
            close: wire.c.parse("close")?,
            volume: optional_number(&wire.v, "volume")?,
        })
    }
}

/// Row of /spot/candlesticks:
/// `[time, quote_volume, close, high, low, open, base_volume, window_closed]`
#[derive(Debug, Deserialize)]
struct SpotCandleWire(Vec<serde_json::Value>);

impl TryFrom<SpotCandleWire> for Bar {
    type Error = GatewayError;

    fn try_from(wire: SpotCandleWire) -> Result<Self, Self::Error> {
        let row = wire.0;
        if row.len() < 6 {
            return Err(GatewayError::Decode(format!(
                "spot candle row has {} fields, expected at least 6",
                row.len()
            )));
        }

        let field = |idx: usize, name: &str| -> Result<f64, GatewayError> {
            serde_json::from_value::<WireNumber>(row[idx].clone())
                .map_err(|e| GatewayError::Decode(format!("{}: {}", name, e)))?
                .parse(name)
        };

        // base volume only exists on newer responses
        let volume = if row.len() > 6 { field(6, "base_volume")? } else { 0.0 };

        Ok(Bar {
            timestamp: timestamp_from_secs(field(0, "time")? as i64)?,
            open: field(5, "open")?,
            high: field(3, "high")?,
            low: field(4, "low")?,
            close: field(2, "close")?,
            volume,
        })
    }
}

/// Row of /futures/{settle}/positions
#[derive(Debug, Deserialize)]
struct PositionWire {
    contract: String,
    size: WireNumber,
    #[serde(default)]
    entry_price: Option<WireNumber>,
    #[serde(default)]
    mark_price: Option<WireNumber>,
    #[serde(default)]
    leverage: Option<WireNumber>,
    #[serde(default)]
    unrealised_pnl: Option<WireNumber>,
    #[serde(default)]
    mode: String,
}

impl TryFrom<PositionWire> for Position {
    type Error = GatewayError;

    fn try_from(wire: PositionWire) -> Result<Self, Self::Error> {
        Ok(Position {
            size: wire.size.parse("size")?,
            entry_price: optional_number(&wire.entry_price, "entry_price")?,
            mark_price: optional_number(&wire.mark_price, "mark_price")?,
            leverage: optional_number(&wire.leverage, "leverage")?,
            unrealised_pnl: optional_number(&wire.unrealised_pnl, "unrealised_pnl")?,
            contract: wire.contract,
            mode: wire.mode,
        })
    }
}

/// Body of POST /futures/{settle}/orders
#[derive(Debug, Serialize)]
struct FuturesOrderRequest<'a> {
    contract: &'a str,
    size: i64,
    price: &'static str,
    tif: &'static str,
    reduce_only: bool,
    text: String,
}

/// Response of POST /futures/{settle}/orders
#[derive(Debug, Deserialize)]
struct FuturesOrderWire {
    id: WireNumber,
    contract: String,
    size: WireNumber,
    #[serde(default)]
    status: String,
    #[serde(default)]
    fill_price: Option<WireNumber>,
}

impl TryFrom<FuturesOrderWire> for OrderResult {
    type Error = GatewayError;

    fn try_from(wire: FuturesOrderWire) -> Result<Self, Self::Error> {
        let fill_price = optional_number(&wire.fill_price, "fill_price")?;
        Ok(OrderResult {
            id: wire.id.as_text(),
            size: wire.size.parse("size")?,
            contract: wire.contract,
            status: wire.status,
            fill_price: (fill_price > 0.0).then_some(fill_price),
        })
    }
}

/// Row of /spot/tickers
#[derive(Debug, Deserialize)]
struct SpotTickerWire {
    #[serde(default)]
    currency_pair: String,
    last: WireNumber,
}

/// Row of /spot/accounts
#[derive(Debug, Deserialize)]
struct SpotAccountWire {
    currency: String,
    available: WireNumber,
    #[serde(default)]
    locked: Option<WireNumber>,
}

impl TryFrom<SpotAccountWire> for SpotBalance {
    type Error = GatewayError;

    fn try_from(wire: SpotAccountWire) -> Result<Self, Self::Error> {
        Ok(SpotBalance {
            available: wire.available.parse("available")?,
            locked: optional_number(&wire.locked, "locked")?,
            currency: wire.currency,
        })
    }
}

/// Body of POST /spot/orders
#[derive(Debug, Serialize)]
struct SpotOrderRequest<'a> {
    text: String,
    currency_pair: &'a str,
    #[serde(rename = "type")]
    order_type: &'static str,
    account: &'static str,
    side: &'static str,
    amount: String,
    price: String,
    time_in_force: &'static str,
}

/// Spot order as returned by POST and GET /spot/orders
#[derive(Debug, Deserialize)]
struct SpotOrderWire {
    id: WireNumber,
    currency_pair: String,
    side: String,
    amount: WireNumber,
    #[serde(default)]
    price: Option<WireNumber>,
    #[serde(default)]
    status: String,
}

impl TryFrom<SpotOrderWire> for SpotOrder {
    type Error = GatewayError;

    fn try_from(wire: SpotOrderWire) -> Result<Self, Self::Error> {
        let side = match wire.side.as_str() {
            "buy" => Direction::Long,
            "sell" => Direction::Short,
            other => return Err(GatewayError::Decode(format!("unknown spot order side: {:?}", other))),
        };
        Ok(SpotOrder {
            id: wire.id.as_text(),
            side,
            amount: wire.amount.parse("amount")?,
            price: optional_number(&wire.price, "price")?,
            pair: wire.currency_pair,
            status: wire.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorWire {
    #[serde(default)]
    label: String,
    #[serde(default)]
    message: String,
}

fn timestamp_from_secs(secs: i64) -> Result<DateTime<Utc>, GatewayError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| GatewayError::Decode(format!("timestamp out of range: {}", secs)))
}

fn api_error(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiErrorWire>(body) {
        Ok(wire) if !wire.label.is_empty() => GatewayError::Api {
            status,
            label: wire.label,
            message: wire.message,
        },
        _ => GatewayError::Api {
            status,
            label: "UNKNOWN".to_string(),
            message: body.to_string(),
        },
    }
}

/// Row whose key equals `wanted`; an unkeyed row only counts when it is the sole row
fn matching_row<'a, T>(rows: &'a [T], key: impl Fn(&T) -> &str, wanted: &str) -> Option<&'a T> {
    rows.iter().find(|&row| key(row) == wanted).or_else(|| match rows {
        [only] if key(only).is_empty() => Some(only),
        _ => None,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Client order text: Gate wants a `t-` prefix and at most 28 characters
fn client_order_text() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("t-{}", &id[..16])
}

impl GateClient {
    pub fn new(settings: GatewaySettings, credentials: Option<Credentials>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            client,
            settings,
            credentials,
            rate_limiter,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, GatewayError> {
        let base = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        };
        url.map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", base, e)))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.settings.retry_backoff_ms.saturating_mul(2u64.pow(attempt - 1)))
    }

    /// Rate-limited request; GETs retry transient failures with exponential backoff
    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<String>,
        signed: bool,
    ) -> Result<String, GatewayError> {
        if signed && self.credentials.is_none() {
            return Err(GatewayError::MissingCredentials);
        }

        let url = self.url(path, params)?;
        let max_attempts = if method == Method::GET { MAX_RETRIES } else { 1 };

        let mut attempt = 1;
        loop {
            self.rate_limiter.until_ready().await;

            match self.send_once(&method, &url, path, body.as_deref(), signed).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let backoff = self.backoff(attempt);
                    tracing::warn!(
                        error = %e,
                        path,
                        attempt,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "Gate.io request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        path: &str,
        body: Option<&str>,
        signed: bool,
    ) -> Result<String, GatewayError> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header("Accept", "application/json");

        if signed {
            let credentials = self.credentials.as_ref().ok_or(GatewayError::MissingCredentials)?;
            let timestamp = Utc::now().timestamp();
            let signature = credentials.sign(
                method.as_str(),
                path,
                url.query().unwrap_or(""),
                body.unwrap_or(""),
                timestamp,
            )?;
            request = request
                .header("KEY", credentials.api_key())
                .header("Timestamp", timestamp.to_string())
                .header("SIGN", signature);
        }

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(api_error(status.as_u16(), &text))
        }
    }

    fn futures_path(&self, endpoint: &str) -> String {
        format!("/futures/{}/{}", self.settings.settle, endpoint)
    }

    /// Futures candlesticks, oldest first
    pub async fn get_futures_candles(
        &self,
        contract: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, GatewayError> {
        let params = [
            ("contract", contract.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self
            .execute(Method::GET, &self.futures_path("candlesticks"), &params, None, false)
            .await?;

        let rows: Vec<FuturesCandleWire> = decode(&body)?;
        let mut bars = rows.into_iter().map(Bar::try_from).collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|b| b.timestamp);

        tracing::debug!(contract, interval, count = bars.len(), "Fetched futures candles");
        Ok(bars)
    }

    /// Spot candlesticks for a currency pair such as `BTC_USDT`, oldest first
    pub async fn get_spot_candles(
        &self,
        pair: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, GatewayError> {
        let params = [
            ("currency_pair", pair.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self
            .execute(Method::GET, "/spot/candlesticks", &params, None, false)
            .await?;

        let rows: Vec<SpotCandleWire> = decode(&body)?;
        let mut bars = rows.into_iter().map(Bar::try_from).collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|b| b.timestamp);

        tracing::debug!(pair, interval, count = bars.len(), "Fetched spot candles");
        Ok(bars)
    }

    /// Every open (non-zero) futures position in the settle currency
    pub async fn list_positions(&self) -> Result<Vec<Position>, GatewayError> {
        let body = self
            .execute(Method::GET, &self.futures_path("positions"), &[], None, true)
            .await?;

        let rows: Vec<PositionWire> = decode(&body)?;
        let positions = rows
            .into_iter()
            .map(Position::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(positions.into_iter().filter(|p| p.size != 0.0).collect())
    }
}

impl ExchangeGateway for GateClient {
    async fn get_ticker(&self, contract: &str) -> Result<f64, GatewayError> {
        let params = [("contract", contract.to_string())];
        let body = self
            .execute(Method::GET, &self.futures_path("tickers"), &params, None, false)
            .await?;

        let tickers: Vec<TickerWire> = decode(&body)?;
        let ticker = matching_row(&tickers, |t| t.contract.as_str(), contract)
            .ok_or_else(|| GatewayError::MissingTicker(contract.to_string()))?;

        ticker.last.parse("last")
    }

    async fn get_candles(&self, contract: &str, interval: &str, limit: usize) -> Result<Vec<Bar>, GatewayError> {
        self.get_futures_candles(contract, interval, limit).await
    }

    async fn get_position(&self, contract: &str) -> Result<Option<Position>, GatewayError> {
        let positions = self.list_positions().await?;
        Ok(positions.into_iter().find(|p| p.contract == contract))
    }

    async fn submit_market_order(
        &self,
        contract: &str,
        size: f64,
        reduce_only: bool,
    ) -> Result<OrderResult, GatewayError> {
        // futures sizes are whole contracts
        let contracts = size.round() as i64;
        if contracts == 0 {
            return Err(GatewayError::InvalidOrder(format!(
                "order size {} rounds to zero contracts",
                size
            )));
        }

        let order = FuturesOrderRequest {
            contract,
            size: contracts,
            price: "0",
            tif: "ioc",
            reduce_only,
            text: client_order_text(),
        };
        let body = serde_json::to_string(&order).map_err(|e| GatewayError::Decode(e.to_string()))?;

        tracing::info!(contract, size = contracts, reduce_only, text = %order.text, "Submitting market order");

        let response = self
            .execute(Method::POST, &self.futures_path("orders"), &[], Some(body), true)
            .await?;

        let wire: FuturesOrderWire = decode(&response)?;
        let result = OrderResult::try_from(wire)?;

        tracing::info!(
            id = %result.id,
            contract = %result.contract,
            size = result.size,
            status = %result.status,
            "Order accepted"
        );
        Ok(result)
    }
}

impl SpotGateway for GateClient {
    async fn get_spot_ticker(&self, pair: &str) -> Result<f64, GatewayError> {
        let params = [("currency_pair", pair.to_string())];
        let body = self
            .execute(Method::GET, "/spot/tickers", &params, None, false)
            .await?;

        let tickers: Vec<SpotTickerWire> = decode(&body)?;
        let ticker = matching_row(&tickers, |t| t.currency_pair.as_str(), pair)
            .ok_or_else(|| GatewayError::MissingTicker(pair.to_string()))?;

        ticker.last.parse("last")
    }

    async fn get_spot_balance(&self, currency: &str) -> Result<SpotBalance, GatewayError> {
        let params = [("currency", currency.to_string())];
        let body = self
            .execute(Method::GET, "/spot/accounts", &params, None, true)
            .await?;

        let rows: Vec<SpotAccountWire> = decode(&body)?;
        match rows.into_iter().find(|row| row.currency.eq_ignore_ascii_case(currency)) {
            Some(row) => SpotBalance::try_from(row),
            None => Ok(SpotBalance::empty(currency)),
        }
    }

    async fn place_spot_limit_order(
        &self,
        pair: &str,
        side: Direction,
        amount: f64,
        price: f64,
    ) -> Result<SpotOrder, GatewayError> {
        if !(amount > 0.0 && price > 0.0) {
            return Err(GatewayError::InvalidOrder(format!(
                "spot order needs a positive amount and price, got {} @ {}",
                amount, price
            )));
        }

        let order = SpotOrderRequest {
            text: client_order_text(),
            currency_pair: pair,
            order_type: "limit",
            account: "spot",
            side: match side {
                Direction::Long => "buy",
                Direction::Short => "sell",
            },
            amount: amount.to_string(),
            price: price.to_string(),
            time_in_force: "gtc",
        };
        let body = serde_json::to_string(&order).map_err(|e| GatewayError::Decode(e.to_string()))?;

        tracing::info!(pair, side = order.side, amount, price, text = %order.text, "Submitting spot limit order");

        let response = self
            .execute(Method::POST, "/spot/orders", &[], Some(body), true)
            .await?;

        let wire: SpotOrderWire = decode(&response)?;
        let result = SpotOrder::try_from(wire)?;

        tracing::info!(id = %result.id, pair = %result.pair, status = %result.status, "Spot order accepted");
        Ok(result)
    }

    async fn list_open_spot_orders(&self, pair: &str) -> Result<Vec<SpotOrder>, GatewayError> {
        let params = [
            ("currency_pair", pair.to_string()),
            ("status", "open".to_string()),
        ];
        let body = self
            .execute(Method::GET, "/spot/orders", &params, None, true)
            .await?;

        let rows: Vec<SpotOrderWire> = decode(&body)?;
        rows.into_iter().map(SpotOrder::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_futures_candle_mapping() {
        let wire: FuturesCandleWire = serde_json::from_str(
            r#"{"t":1700000000,"v":120,"c":"101.5","h":"102","l":"99.5","o":"100","sum":"12180"}"#,
        )
        .unwrap();
        let bar = Bar::try_from(wire).unwrap();

        assert_eq!(bar.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 102.0);
        assert_eq!(bar.low, 99.5);
        assert_eq!(bar.close, 101.5);
        assert_eq!(bar.volume, 120.0);
    }

    #[test]
    fn test_futures_candle_without_volume() {
        let wire: FuturesCandleWire =
            serde_json::from_str(r#"{"t":1700000000,"c":"1","h":"1","l":"1","o":"1"}"#).unwrap();
        assert_eq!(Bar::try_from(wire).unwrap().volume, 0.0);
    }

    #[test]
    fn test_spot_row_mapping() {
        let wire: SpotCandleWire = serde_json::from_str(
            r#"["1700000000","5000.5","101","103","99","100","50","true"]"#,
        )
        .unwrap();
        let bar = Bar::try_from(wire).unwrap();

        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 103.0);
        assert_eq!(bar.low, 99.0);
        assert_eq!(bar.close, 101.0);
        assert_eq!(bar.volume, 50.0);
    }

    #[test]
    fn test_short_spot_row_rejected() {
        let wire: SpotCandleWire = serde_json::from_str(r#"["1700000000","1","2"]"#).unwrap();
        assert!(matches!(Bar::try_from(wire), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_bad_price_rejected() {
        let wire: FuturesCandleWire =
            serde_json::from_str(r#"{"t":1,"c":"abc","h":"1","l":"1","o":"1"}"#).unwrap();
        assert!(matches!(Bar::try_from(wire), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_position_mapping_reads_blank_as_zero() {
        let wire: PositionWire = serde_json::from_str(
            r#"{"contract":"ASTER_USDT","size":-30,"entry_price":"0.96","mark_price":"","leverage":"10","unrealised_pnl":"1.2","mode":"single"}"#,
        )
        .unwrap();
        let position = Position::try_from(wire).unwrap();

        assert_eq!(position.size, -30.0);
        assert_eq!(position.entry_price, 0.96);
        assert_eq!(position.mark_price, 0.0);
        assert_eq!(position.leverage, 10.0);
    }

    #[test]
    fn test_api_error_parsing() {
        match api_error(400, r#"{"label":"INVALID_PARAM_VALUE","message":"size"}"#) {
            GatewayError::Api { status, label, message } => {
                assert_eq!(status, 400);
                assert_eq!(label, "INVALID_PARAM_VALUE");
                assert_eq!(message, "size");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match api_error(502, "Bad Gateway") {
            GatewayError::Api { label, message, .. } => {
                assert_eq!(label, "UNKNOWN");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ticker_row_must_match_contract() {
        let rows: Vec<TickerWire> = serde_json::from_str(
            r#"[{"contract":"BTC_USDT","last":"43000"},{"contract":"ETH_USDT","last":"2300"}]"#,
        )
        .unwrap();
        fn key(t: &TickerWire) -> &str {
            t.contract.as_str()
        }

        assert_eq!(matching_row(&rows, key, "ETH_USDT").unwrap().last.parse("last").unwrap(), 2300.0);
        assert!(matching_row(&rows, key, "ASTER_USDT").is_none());
        assert!(matching_row(&rows[..1], key, "ASTER_USDT").is_none());

        let unkeyed: Vec<TickerWire> = serde_json::from_str(r#"[{"last":"0.95"}]"#).unwrap();
        assert!(matching_row(&unkeyed, key, "ASTER_USDT").is_some());

        let ambiguous: Vec<TickerWire> =
            serde_json::from_str(r#"[{"last":"0.95"},{"last":"0.96"}]"#).unwrap();
        assert!(matching_row(&ambiguous, key, "ASTER_USDT").is_none());
    }

    #[test]
    fn test_spot_order_mapping() {
        let wire: SpotOrderWire = serde_json::from_str(
            r#"{"id":"1852454420","currency_pair":"BTC_USDT","side":"sell","amount":"0.001","price":"61000","status":"open","type":"limit"}"#,
        )
        .unwrap();
        let order = SpotOrder::try_from(wire).unwrap();

        assert_eq!(order.id, "1852454420");
        assert_eq!(order.side, Direction::Short);
        assert_eq!(order.amount, 0.001);
        assert_eq!(order.price, 61000.0);

        let bad: SpotOrderWire =
            serde_json::from_str(r#"{"id":1,"currency_pair":"BTC_USDT","side":"hold","amount":"1"}"#).unwrap();
        assert!(matches!(SpotOrder::try_from(bad), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_spot_account_without_locked() {
        let wire: SpotAccountWire =
            serde_json::from_str(r#"{"currency":"USDT","available":"125.5"}"#).unwrap();
        let balance = SpotBalance::try_from(wire).unwrap();

        assert_eq!(balance.available, 125.5);
        assert_eq!(balance.locked, 0.0);
    }

    #[test]
    fn test_client_order_text_fits_limit() {
        let text = client_order_text();
        assert!(text.starts_with("t-"));
        assert!(text.len() <= 28);
        assert_ne!(text, client_order_text());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: GatewaySettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.base_url, GATE_API_BASE);
        assert_eq!(settings.settle, "usdt");
        assert_eq!(settings.requests_per_second, 10);
    }
}
