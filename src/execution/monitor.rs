use super::thresholds::{ExitReason, ThresholdConfig, Thresholds};
use crate::api::ExchangeGateway;
use crate::indicators::atr_from_bars;
use crate::models::{OrderResult, Position};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub contract: String,
    pub thresholds: ThresholdConfig,
    pub check_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Monitoring,
    Closed,
}

/// Result of a single check
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Position open, no threshold crossed
    Holding { price: f64, thresholds: Thresholds },
    /// Data unavailable this cycle
    Skipped,
    /// Threshold crossed but the close order was rejected
    OrderFailed(ExitReason),
    NoPosition,
    Closed { reason: ExitReason, order: OrderResult },
}

/// Why `run` returned
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    NoPosition,
    Closed { reason: ExitReason, order: OrderResult },
    Interrupted,
}

/// Watches one futures position and closes it when a threshold is crossed
pub struct PositionMonitor<G> {
    gateway: G,
    config: MonitorConfig,
    state: MonitorState,
}

impl<G: ExchangeGateway> PositionMonitor<G> {
    pub fn new(gateway: G, config: MonitorConfig) -> Self {
        Self {
            gateway,
            config,
            state: MonitorState::Monitoring,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Fetch position and price, check thresholds, close if triggered
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let contract = self.config.contract.as_str();

        let position = match self.gateway.get_position(contract).await {
            Ok(Some(position)) => position,
            Ok(None) => {
                tracing::warn!(contract, "No open position found, stopping monitor");
                self.state = MonitorState::Closed;
                return CycleOutcome::NoPosition;
            }
            Err(e) => {
                tracing::warn!(contract, error = %e, "Failed to fetch position, skipping check");
                return CycleOutcome::Skipped;
            }
        };

        let price = match self.gateway.get_ticker(contract).await {
            Ok(price) if price > 0.0 => price,
            Ok(price) => {
                tracing::warn!(contract, price, "Ticker returned no usable price, skipping check");
                return CycleOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!(contract, error = %e, "Failed to fetch price, skipping check");
                return CycleOutcome::Skipped;
            }
        };

        let Some(thresholds) = self.resolve_thresholds(&position).await else {
            return CycleOutcome::Skipped;
        };
        let direction = position.direction();

        tracing::info!(
            contract,
            side = ?direction,
            size = position.size,
            entry = position.entry_price,
            price,
            pnl_pct = position.pnl_pct(price),
            stop_loss = ?thresholds.stop_loss,
            take_profit = ?thresholds.take_profit,
            "Position check"
        );

        let Some(reason) = thresholds.evaluate(direction, price) else {
            return CycleOutcome::Holding { price, thresholds };
        };

        tracing::warn!(contract, ?reason, price, "🚨 Exit threshold crossed, closing position");

        match self
            .gateway
            .submit_market_order(contract, -position.size, true)
            .await
        {
            Ok(order) => {
                tracing::info!(
                    contract,
                    order_id = %order.id,
                    status = %order.status,
                    ?reason,
                    "✅ Position closed, monitor stopping"
                );
                self.state = MonitorState::Closed;
                CycleOutcome::Closed { reason, order }
            }
            Err(e) => {
                tracing::error!(contract, error = %e, "❌ Close order failed, will retry next cycle");
                CycleOutcome::OrderFailed(reason)
            }
        }
    }

    /// Exit prices for this cycle; None when they cannot be derived
    async fn resolve_thresholds(&self, position: &Position) -> Option<Thresholds> {
        match &self.config.thresholds {
            ThresholdConfig::Fixed {
                stop_loss,
                take_profit,
            } => Some(Thresholds::fixed(*stop_loss, *take_profit)),
            ThresholdConfig::Atr {
                multiplier,
                take_profit_pct,
                period,
                interval,
            } => {
                let entry = position.entry_price;
                if entry <= 0.0 {
                    tracing::warn!(contract = %position.contract, entry, "Position has no entry price, skipping check");
                    return None;
                }

                let direction = position.direction();
                let atr = match self
                    .gateway
                    .get_candles(&position.contract, interval, period + 1)
                    .await
                {
                    Ok(bars) => atr_from_bars(&bars, *period),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to fetch candles for ATR");
                        0.0
                    }
                };

                if atr > 0.0 {
                    tracing::debug!(atr, multiplier, "ATR thresholds");
                    Some(Thresholds::from_atr(direction, entry, atr, *multiplier, *take_profit_pct))
                } else {
                    tracing::warn!("ATR unavailable, falling back to 5% stop/take-profit");
                    Some(Thresholds::fallback(direction, entry))
                }
            }
        }
    }

    /// Check on a fixed-rate schedule until the position is gone or closed,
    /// or `shutdown` resolves
    ///
    /// The first check runs immediately; ticks missed by a slow check are skipped.
    pub async fn run<F>(mut self, shutdown: F) -> MonitorOutcome
    where
        F: Future<Output = ()>,
    {
        let period = self.config.check_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            contract = %self.config.contract,
            thresholds = ?self.config.thresholds,
            interval_secs = period.as_secs_f64(),
            "Position monitor started, press Ctrl+C to stop"
        );

        let outcome = loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping monitor");
                    break MonitorOutcome::Interrupted;
                }
                _ = ticker.tick() => {
                    match self.run_cycle().await {
                        CycleOutcome::NoPosition => break MonitorOutcome::NoPosition,
                        CycleOutcome::Closed { reason, order } => {
                            break MonitorOutcome::Closed { reason, order }
                        }
                        _ => {}
                    }
                }
            }
        };

        tracing::info!(outcome = ?outcome, "Position monitor stopped");
        outcome
    }
}
