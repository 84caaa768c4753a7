use super::Strategy;
use crate::models::{Bar, Direction, Signal};

#[derive(Debug, Clone)]
pub struct MomentumBreakoutConfig {
    pub lookback: usize,
    pub threshold_pct: f64, // percent, 0.3 = 0.3%
    pub volume_multiplier: f64,
}

impl Default for MomentumBreakoutConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            threshold_pct: 0.3,
            volume_multiplier: 1.5,
        }
    }
}

/// Range breakout with momentum and volume confirmation
///
/// The current bar must take out the high (or low) of the prior `lookback`
/// bars, close beyond it by at least `threshold_pct` of the range midpoint,
/// and trade more than `volume_multiplier` times the prior average volume.
#[derive(Debug, Clone, Default)]
pub struct MomentumBreakoutStrategy {
    config: MomentumBreakoutConfig,
}

impl MomentumBreakoutStrategy {
    pub fn new(config: MomentumBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MomentumBreakoutStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if self.config.lookback == 0 || bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let current = &bars[bars.len() - 1];
        let history = &bars[bars.len() - 1 - self.config.lookback..bars.len() - 1];

        let max_high = history.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let min_low = history.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let midpoint = (max_high + min_low) / 2.0;
        if midpoint <= 0.0 {
            return Signal::Hold;
        }

        let avg_volume = history.iter().map(|b| b.volume).sum::<f64>() / history.len() as f64;
        let volume_confirmed = current.volume > avg_volume * self.config.volume_multiplier;
        let threshold = self.config.threshold_pct / 100.0;

        if current.high > max_high {
            let breakout = (current.close - max_high) / midpoint;
            if breakout >= threshold && volume_confirmed {
                tracing::info!(breakout_pct = breakout * 100.0, "🎯 Momentum breakout up");
                return Signal::Enter(Direction::Long);
            }
        } else if current.low < min_low {
            let breakout = (min_low - current.close) / midpoint;
            if breakout >= threshold && volume_confirmed {
                tracing::info!(breakout_pct = breakout * 100.0, "🎯 Momentum breakout down");
                return Signal::Enter(Direction::Short);
            }
        }

        Signal::Hold
    }

    fn name(&self) -> &str {
        "MomentumBreakoutStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.lookback + 1
    }
}
