// Technical indicators module
// Pure functions over price slices: SMA, EMA, RSI, Bollinger, MACD, ATR

pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod market_analysis;
pub mod moving_average;
pub mod rsi;

pub use atr::{atr_from_bars, average_true_range, true_range_series};
pub use bollinger::{bollinger_bands, BollingerBands};
pub use macd::{macd, Macd};
pub use market_analysis::{is_volume_spike, price_change_pct, trailing_mean};
pub use moving_average::{exponential_moving_average, simple_moving_average};
pub use rsi::{relative_strength_index, NEUTRAL_RSI};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicators_are_idempotent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.37).cos() * 4.0).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let snapshot = closes.clone();

        assert_eq!(simple_moving_average(&closes, 20), simple_moving_average(&closes, 20));
        assert_eq!(
            exponential_moving_average(&closes, 13),
            exponential_moving_average(&closes, 13)
        );
        assert_eq!(
            relative_strength_index(&closes, 14),
            relative_strength_index(&closes, 14)
        );
        assert_eq!(bollinger_bands(&closes, 20, 2.0), bollinger_bands(&closes, 20, 2.0));
        assert_eq!(macd(&closes, 12, 26, 9), macd(&closes, 12, 26, 9));
        assert_eq!(
            average_true_range(&highs, &lows, &closes, 14),
            average_true_range(&highs, &lows, &closes, 14)
        );

        // inputs untouched
        assert_eq!(closes, snapshot);
    }

    #[test]
    fn test_short_inputs_return_neutral_values() {
        let closes = vec![1.0, 2.0, 3.0];

        assert!(simple_moving_average(&closes, 5).is_empty());
        assert!(exponential_moving_average(&closes, 5).is_empty());
        assert_eq!(relative_strength_index(&closes, 14), NEUTRAL_RSI);
        assert!(bollinger_bands(&closes, 20, 2.0).is_none());
        assert!(macd(&closes, 12, 26, 9).is_none());
        assert_eq!(average_true_range(&closes, &closes, &closes, 14), 0.0);
    }
}
