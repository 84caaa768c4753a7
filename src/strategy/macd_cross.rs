use super::{latest_cross, Strategy};
use crate::indicators::macd;
use crate::models::{Bar, Signal};

#[derive(Debug, Clone)]
pub struct MacdCrossConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdCrossConfig {
    fn default() -> Self {
        // faster than the textbook 12/26/9, tuned for minute bars
        Self {
            fast_period: 5,
            slow_period: 13,
            signal_period: 5,
        }
    }
}

/// MACD line crossing its signal line
#[derive(Debug, Clone, Default)]
pub struct MacdCrossStrategy {
    config: MacdCrossConfig,
}

impl MacdCrossStrategy {
    pub fn new(config: MacdCrossConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MacdCrossStrategy {
    fn generate_signal(&self, bars: &[Bar]) -> Signal {
        if bars.len() < self.min_candles_required() {
            return Signal::Hold;
        }

        let Some(result) = macd(
            &Bar::closes(bars),
            self.config.fast_period,
            self.config.slow_period,
            self.config.signal_period,
        ) else {
            return Signal::Hold;
        };

        let signal = latest_cross(&result.macd, &result.signal);
        if !signal.is_hold() {
            tracing::info!(
                histogram = result.histogram.last().copied().unwrap_or_default(),
                "🎯 MACD cross: {}",
                signal
            );
        }

        signal
    }

    fn name(&self) -> &str {
        "MacdCrossStrategy"
    }

    fn min_candles_required(&self) -> usize {
        self.config.slow_period + self.config.signal_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::strategy::test_support::bars_from_closes;

    #[test]
    fn test_turn_up_after_decline_goes_long() {
        // accelerating decline keeps MACD under its signal line
        let mut closes: Vec<f64> = (0..30).map(|i| 130.0 - 0.05 * (i * i) as f64).collect();
        let last = closes[29];
        closes.push(last + 8.0);

        let signal = MacdCrossStrategy::default().generate_signal(&bars_from_closes(&closes));
        assert_eq!(signal, Signal::Enter(Direction::Long));
    }

    #[test]
    fn test_turn_down_after_rally_goes_short() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + 0.05 * (i * i) as f64).collect();
        let last = closes[29];
        closes.push(last - 8.0);

        let signal = MacdCrossStrategy::default().generate_signal(&bars_from_closes(&closes));
        assert_eq!(signal, Signal::Enter(Direction::Short));
    }

    #[test]
    fn test_flat_market_holds() {
        let closes = vec![100.0; 30];
        let signal = MacdCrossStrategy::default().generate_signal(&bars_from_closes(&closes));
        assert_eq!(signal, Signal::Hold);
    }

    #[test]
    fn test_short_history_holds() {
        let closes: Vec<f64> = (0..17).map(|i| i as f64).collect();
        let signal = MacdCrossStrategy::default().generate_signal(&bars_from_closes(&closes));
        assert_eq!(signal, Signal::Hold);
        assert_eq!(MacdCrossStrategy::default().min_candles_required(), 18);
    }
}
