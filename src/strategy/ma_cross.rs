use super::{latest_cross, Strategy};
use crate::indicators::simple_moving_average;
use crate::models::{Bar, Signal};

#[derive(Debug, Clone)]
pub struct MaCrossConfig {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for MaCrossConfig {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 20,
        }
    }
}

/// Moving-average crossover (golden cross / death cross)
///
/// - fast SMA crosses above slow SMA: long
/// - fast SMA crosses below slow SMA: short
#[derive(Debug, Clone, Default)]
pub struct MaCrossStrategy {
    config: MaCrossConfig,
}

impl MaCrossStrategy {
    pub fn new(config: MaCrossConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MaCrossStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let closes = Bar::closes(bars);
        let fast = simple_moving_average(&closes, self.config.fast_period);
        let slow = simple_moving_average(&closes, self.config.slow_period);

        let signal = latest_cross(&fast, &slow);
        if !signal.is_hold() {
            tracing::info!(
                fast = fast.last().copied().unwrap_or_default(),
                slow = slow.last().copied().unwrap_or_default(),
                "🎯 MA cross: {}",
                signal
            );
        }

        signal
    }

    fn name(&self) -> &str {
        "MaCrossStrategy"
    }

    fn min_candles_required(&self) -> usize {
        // two slow-MA points to compare
        self.config.slow_period.max(self.config.fast_period) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::strategy::test_support::bars_from_closes;

    #[test]
    fn test_insufficient_history_holds() {
        let strategy = MaCrossStrategy::default();
        let bars = bars_from_closes(&[100.0; 20]);
        assert_eq!(strategy.generate_signal(&bars), Signal::Hold);
        assert_eq!(strategy.min_candles_required(), 21);
    }

    #[test]
    fn test_long_emitted_once_when_walking_forward() {
        let strategy = MaCrossStrategy::default();

        let mut closes = vec![100.0; 25];
        closes.extend([110.0, 111.0, 112.0, 113.0]);
        let bars = bars_from_closes(&closes);

        let signals: Vec<Signal> = (1..=bars.len())
            .map(|n| strategy.generate_signal(&bars[..n]))
            .collect();

        let longs: Vec<usize> = signals
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Signal::Enter(Direction::Long))
            .map(|(i, _)| i)
            .collect();

        // cross first visible on the bar that jumps to 110
        assert_eq!(longs, vec![25]);
        assert!(signals[..25].iter().all(|s| s.is_hold()));
    }

    #[test]
    fn test_short_on_death_cross() {
        let strategy = MaCrossStrategy::default();

        let mut closes = vec![100.0; 25];
        closes.push(90.0);
        let bars = bars_from_closes(&closes);

        assert_eq!(
            strategy.generate_signal(&bars),
            Signal::Enter(Direction::Short)
        );
    }

    #[test]
    fn test_steady_trend_holds() {
        let strategy = MaCrossStrategy::default();
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = bars_from_closes(&closes);

        assert_eq!(strategy.generate_signal(&bars), Signal::Hold);
    }
}
