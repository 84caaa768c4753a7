use super::Strategy;
use crate::indicators::relative_strength_index;
use crate::models::{Bar, Direction, Signal};

#[derive(Debug, Clone)]
pub struct RsiThresholdConfig {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiThresholdConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// RSI threshold strategy
///
/// Oversold readings go long, overbought readings go short. A window with no
/// price change at all reads RSI 0, so a dead flat market signals long.
#[derive(Debug, Clone, Default)]
pub struct RsiThresholdStrategy {
    config: RsiThresholdConfig,
}

impl RsiThresholdStrategy {
    pub fn new(config: RsiThresholdConfig) -> Self {
        Self { config }
    }
}

impl Strategy for RsiThresholdStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let rsi = relative_strength_index(&Bar::closes(bars), self.config.period);

        if rsi < self.config.oversold {
            tracing::info!(rsi, "🎯 RSI oversold");
            Signal::Enter(Direction::Long)
        } else if rsi > self.config.overbought {
            tracing::info!(rsi, "🎯 RSI overbought");
            Signal::Enter(Direction::Short)
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &str {
        "RsiThresholdStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.period + 1
    }
}
