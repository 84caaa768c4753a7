use super::{latest_cross, Strategy};
use crate::indicators::{exponential_moving_average, trailing_mean};
use crate::models::{Bar, Signal};

#[derive(Debug, Clone)]
pub struct EmaBreakoutConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub volume_threshold: f64, // Multiple of average volume
    pub volume_window: usize,
}

impl Default for EmaBreakoutConfig {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 13,
            volume_threshold: 1.2,
            volume_window: 20,
        }
    }
}

/// Fast EMA breakout confirmed by volume
///
/// An EMA cross only counts when the current bar trades above
/// `volume_threshold` times the recent average volume.
#[derive(Debug, Clone, Default)]
pub struct EmaBreakoutStrategy {
    config: EmaBreakoutConfig,
}

impl EmaBreakoutStrategy {
    pub fn new(config: EmaBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for EmaBreakoutStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let closes = Bar::closes(bars);
        let volumes = Bar::volumes(bars);

        let fast = exponential_moving_average(&closes, self.config.fast_period);
        let slow = exponential_moving_average(&closes, self.config.slow_period);

        let signal = latest_cross(&fast, &slow);
        if signal.is_hold() {
            return Signal::Hold;
        }

        // average includes the current bar
        let Some(avg_volume) = trailing_mean(&volumes, self.config.volume_window) else {
            return Signal::Hold;
        };
        let current_volume = volumes[volumes.len() - 1];

        if current_volume > avg_volume * self.config.volume_threshold {
            tracing::info!(
                volume = current_volume,
                avg_volume,
                "🎯 EMA breakout: {}",
                signal
            );
            signal
        } else {
            tracing::debug!(
                volume = current_volume,
                avg_volume,
                "EMA cross without volume confirmation"
            );
            Signal::Hold
        }
    }

    fn name(&self) -> &str {
        "EmaBreakoutStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.slow_period + 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::strategy::test_support::bars_with_volume;

    fn breakout_closes() -> Vec<f64> {
        let mut closes = vec![100.0; 24];
        closes.push(105.0);
        closes
    }

    #[test]
    fn test_breakout_with_volume_goes_long() {
        let closes = breakout_closes();
        let mut volumes = vec![1000.0; 24];
        volumes.push(5000.0);

        let signal = EmaBreakoutStrategy::default().generate_signal(&bars_with_volume(&closes, &volumes));
        assert_eq!(signal, Signal::Enter(Direction::Long));
    }

    #[test]
    fn test_breakout_without_volume_holds() {
        let closes = breakout_closes();
        let volumes = vec![1000.0; 25];

        let signal = EmaBreakoutStrategy::default().generate_signal(&bars_with_volume(&closes, &volumes));
        assert_eq!(signal, Signal::Hold);
    }

    #[test]
    fn test_breakdown_with_volume_goes_short() {
        let mut closes = vec![100.0; 24];
        closes.push(95.0);
        let mut volumes = vec![1000.0; 24];
        volumes.push(5000.0);

        let signal = EmaBreakoutStrategy::default().generate_signal(&bars_with_volume(&closes, &volumes));
        assert_eq!(signal, Signal::Enter(Direction::Short));
    }

    #[test]
    fn test_short_history_holds() {
        let closes = vec![100.0; 17];
        let volumes = vec![1000.0; 17];
        let signal = EmaBreakoutStrategy::default().generate_signal(&bars_with_volume(&closes, &volumes));
        assert_eq!(signal, Signal::Hold);
    }
}
