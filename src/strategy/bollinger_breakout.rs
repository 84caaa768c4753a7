use super::Strategy;
use crate::indicators::bollinger_bands;
use crate::models::{Bar, Direction, Signal};

#[derive(Debug, Clone)]
pub struct BollingerBreakoutConfig {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerBreakoutConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// Bollinger band breakout
///
/// Long when the close moves from inside to above the upper band, short when it
/// moves from inside to below the lower band. Bands for the previous bar are
/// computed without the current bar.
#[derive(Debug, Clone, Default)]
pub struct BollingerBreakoutStrategy {
    config: BollingerBreakoutConfig,
}

impl BollingerBreakoutStrategy {
    pub fn new(config: BollingerBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for BollingerBreakoutStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let closes = Bar::closes(bars);
        let last = closes.len() - 1;

        let (Some(curr), Some(prev)) = (
            bollinger_bands(&closes, self.config.period, self.config.std_dev),
            bollinger_bands(&closes[..last], self.config.period, self.config.std_dev),
        ) else {
            return Signal::Hold;
        };

        let price_curr = closes[last];
        let price_prev = closes[last - 1];

        if price_prev <= prev.upper && price_curr > curr.upper {
            tracing::info!(price = price_curr, upper = curr.upper, "🎯 Bollinger upper breakout");
            Signal::Enter(Direction::Long)
        } else if price_prev >= prev.lower && price_curr < curr.lower {
            tracing::info!(price = price_curr, lower = curr.lower, "🎯 Bollinger lower breakout");
            Signal::Enter(Direction::Short)
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &str {
        "BollingerBreakoutStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.period + 1
    }
}
