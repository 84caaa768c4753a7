use crate::api::SpotGateway;
use crate::models::{Direction, SpotOrder};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct SpotTraderConfig {
    /// Currency pair such as `BTC_USDT`
    pub pair: String,
    pub base: String,
    pub quote: String,
    /// Buy when the price drops below this
    pub buy_below: f64,
    /// Sell when the price rises above this
    pub sell_above: f64,
    pub buy_amount: f64,
    pub sell_amount: f64,
    pub check_interval: Duration,
}

/// Result of a single trading check
#[derive(Debug, Clone, PartialEq)]
pub enum TradeOutcome {
    Bought(SpotOrder),
    Sold(SpotOrder),
    /// No threshold crossed in the direction the trader can act on
    Waiting { price: f64 },
    InsufficientBalance {
        currency: String,
        required: f64,
        available: f64,
    },
    /// Threshold crossed but the order was rejected
    OrderFailed(Direction),
    /// Data unavailable this cycle
    Skipped,
}

/// Orders placed before `run` was stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeTally {
    pub buys: usize,
    pub sells: usize,
}

/// Buys below one price and sells above another, one lot at a time.
///
/// Starts flat. A buy is only placed while flat and a sell only while holding,
/// so the trader alternates buy, sell, buy.
pub struct SpotThresholdTrader<G> {
    gateway: G,
    config: SpotTraderConfig,
    holding: bool,
    last_buy_price: Option<f64>,
    tally: TradeTally,
}

impl<G: SpotGateway> SpotThresholdTrader<G> {
    pub fn new(gateway: G, config: SpotTraderConfig) -> Self {
        Self {
            gateway,
            config,
            holding: false,
            last_buy_price: None,
            tally: TradeTally::default(),
        }
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn last_buy_price(&self) -> Option<f64> {
        self.last_buy_price
    }

    pub fn tally(&self) -> TradeTally {
        self.tally
    }

    pub async fn run_cycle(&mut self) -> TradeOutcome {
        let pair = self.config.pair.as_str();

        let price = match self.gateway.get_spot_ticker(pair).await {
            Ok(price) if price > 0.0 => price,
            Ok(price) => {
                tracing::warn!(pair, price, "Ticker returned no usable price, skipping check");
                return TradeOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(pair, error = %e, "Failed to fetch price, skipping check");
                return TradeOutcome::Skipped;
            }
        };

        tracing::info!(pair, price, holding = self.holding, "Price check");

        if !self.holding && price < self.config.buy_below {
            self.try_buy(price).await
        } else if self.holding && price > self.config.sell_above {
            self.try_sell(price).await
        } else {
            TradeOutcome::Waiting { price }
        }
    }

    async fn try_buy(&mut self, price: f64) -> TradeOutcome {
        let quote = self.config.quote.as_str();
        let available = match self.gateway.get_spot_balance(quote).await {
            Ok(balance) => balance.available,
            Err(e) => {
                tracing::warn!(currency = quote, error = %e, "Failed to fetch balance, skipping check");
                return TradeOutcome::Skipped;
            }
        };

        let required = price * self.config.buy_amount;
        if available <= required {
            tracing::warn!(currency = quote, required, available, "⚠️ Insufficient balance to buy");
            return TradeOutcome::InsufficientBalance {
                currency: quote.to_string(),
                required,
                available,
            };
        }

        tracing::info!(price, target = self.config.buy_below, "🟢 Price below buy target, buying");

        match self
            .gateway
            .place_spot_limit_order(&self.config.pair, Direction::Long, self.config.buy_amount, price)
            .await
        {
            Ok(order) => {
                tracing::info!(order_id = %order.id, amount = order.amount, price, "✅ Buy order placed");
                self.holding = true;
                self.last_buy_price = Some(price);
                self.tally.buys += 1;
                TradeOutcome::Bought(order)
            }
            Err(e) => {
                tracing::error!(error = %e, "❌ Buy order failed, will retry next cycle");
                TradeOutcome::OrderFailed(Direction::Long)
            }
        }
    }

    async fn try_sell(&mut self, price: f64) -> TradeOutcome {
        let base = self.config.base.as_str();
        let available = match self.gateway.get_spot_balance(base).await {
            Ok(balance) => balance.available,
            Err(e) => {
                tracing::warn!(currency = base, error = %e, "Failed to fetch balance, skipping check");
                return TradeOutcome::Skipped;
            }
        };

        let required = self.config.sell_amount;
        if available < required {
            tracing::warn!(currency = base, required, available, "⚠️ Insufficient balance to sell");
            return TradeOutcome::InsufficientBalance {
                currency: base.to_string(),
                required,
                available,
            };
        }

        let expected_profit = self
            .last_buy_price
            .map(|bought| (price - bought) * self.config.sell_amount);
        tracing::info!(
            price,
            target = self.config.sell_above,
            expected_profit = ?expected_profit,
            "🔴 Price above sell target, selling"
        );

        match self
            .gateway
            .place_spot_limit_order(&self.config.pair, Direction::Short, self.config.sell_amount, price)
            .await
        {
            Ok(order) => {
                tracing::info!(order_id = %order.id, amount = order.amount, price, "✅ Sell order placed");
                self.holding = false;
                self.tally.sells += 1;
                TradeOutcome::Sold(order)
            }
            Err(e) => {
                tracing::error!(error = %e, "❌ Sell order failed, will retry next cycle");
                TradeOutcome::OrderFailed(Direction::Short)
            }
        }
    }

    /// Open orders on the pair; empty when they cannot be fetched
    pub async fn pending_orders(&self) -> Vec<SpotOrder> {
        match self.gateway.list_open_spot_orders(&self.config.pair).await {
            Ok(orders) => {
                for order in &orders {
                    tracing::info!(
                        order_id = %order.id,
                        side = ?order.side,
                        amount = order.amount,
                        price = order.price,
                        "📋 Pending order"
                    );
                }
                orders
            }
            Err(e) => {
                tracing::warn!(pair = %self.config.pair, error = %e, "Failed to list open orders");
                Vec::new()
            }
        }
    }

    /// Check on a fixed-rate schedule until `shutdown` resolves
    ///
    /// The first check runs immediately; ticks missed by a slow check are skipped.
    pub async fn run<F>(mut self, shutdown: F) -> TradeTally
    where
        F: Future<Output = ()>,
    {
        let period = self.config.check_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            pair = %self.config.pair,
            buy_below = self.config.buy_below,
            sell_above = self.config.sell_above,
            buy_amount = self.config.buy_amount,
            sell_amount = self.config.sell_amount,
            interval_secs = period.as_secs_f64(),
            "Spot trader started, press Ctrl+C to stop"
        );

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping trader");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                    self.pending_orders().await;
                }
            }
        }

        tracing::info!(buys = self.tally.buys, sells = self.tally.sells, "Spot trader stopped");
        self.tally
    }
}
