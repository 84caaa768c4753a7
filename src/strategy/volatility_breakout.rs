use super::Strategy;
use crate::indicators::{atr_from_bars, trailing_mean};
use crate::models::{Bar, Direction, Signal};

#[derive(Debug, Clone)]
pub struct VolatilityBreakoutConfig {
    pub atr_period: usize,
    pub atr_multiplier: f64,
    pub ma_period: usize,
}

impl Default for VolatilityBreakoutConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            atr_multiplier: 1.5,
            ma_period: 20,
        }
    }
}

/// ATR channel breakout around a simple moving average
#[derive(Debug, Clone, Default)]
pub struct VolatilityBreakoutStrategy {
    config: VolatilityBreakoutConfig,
}

impl VolatilityBreakoutStrategy {
    pub fn new(config: VolatilityBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for VolatilityBreakoutStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let atr = atr_from_bars(bars, self.config.atr_period);
        if atr <= 0.0 {
            return Signal::Hold;
        }

        let closes = Bar::closes(bars);
        let Some(middle) = trailing_mean(&closes, self.config.ma_period) else {
            return Signal::Hold;
        };

        let current_price = closes[closes.len() - 1];
        let band = atr * self.config.atr_multiplier;

        if current_price > middle + band {
            tracing::info!(price = current_price, atr, middle, "🎯 Volatility breakout up");
            Signal::Enter(Direction::Long)
        } else if current_price < middle - band {
            tracing::info!(price = current_price, atr, middle, "🎯 Volatility breakout down");
            Signal::Enter(Direction::Short)
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &str {
        "VolatilityBreakoutStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.atr_period + 10
    }
}
