//! Average True Range (ATR) indicator
//!
//! Measures market volatility by calculating the average of true ranges over a period.
//! True Range is the greatest of:
//! - Current High - Current Low
//! - Abs(Current High - Previous Close)
//! - Abs(Current Low - Previous Close)
//!
//! The average is a plain mean of the trailing `period` true ranges, matching
//! what the stop-distance logic expects.

use crate::models::Bar;

/// True range for every bar after the first
pub fn true_range_series(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let len = highs.len().min(lows.len()).min(closes.len());

    (1..len)
        .map(|i| {
            let high = highs[i];
            let low = lows[i];
            let prev_close = closes[i - 1];

            (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs())
        })
        .collect()
}

/// Calculate ATR from parallel high/low/close slices
///
/// Returns 0 with fewer than `period + 1` bars or mismatched slices.
pub fn average_true_range(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    if period == 0 || highs.len() != lows.len() || highs.len() != closes.len() {
        return 0.0;
    }
    if closes.len() < period + 1 {
        return 0.0;
    }

    let true_ranges = true_range_series(highs, lows, closes);
    let recent = &true_ranges[true_ranges.len() - period..];

    recent.iter().sum::<f64>() / period as f64
}

/// Calculate ATR straight from bars
pub fn atr_from_bars(bars: &[Bar], period: usize) -> f64 {
    average_true_range(
        &Bar::highs(bars),
        &Bar::lows(bars),
        &Bar::closes(bars),
        period,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_bars(prices: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                timestamp: Utc::now() + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_calculate_atr() {
        // Low volatility market
        let bars = create_test_bars(&[(100.0, 101.0, 99.0, 100.0); 15]);
        let atr = atr_from_bars(&bars, 14);

        // ATR equals the high-low range
        assert!((atr - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_atr_with_gaps() {
        // Gap up: previous close dominates the range
        let bars = create_test_bars(&[
            (100.0, 101.0, 99.0, 100.0),
            (110.0, 112.0, 109.0, 111.0),
            (111.0, 112.0, 110.0, 111.0),
        ]);

        // TRs: max(3, 12, 9) = 12, max(2, 1, 1) = 2
        assert_eq!(atr_from_bars(&bars, 2), 7.0);
        // Only the last TR
        assert_eq!(atr_from_bars(&bars, 1), 2.0);
    }

    #[test]
    fn test_atr_high_volatility() {
        let bars = create_test_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 110.0, 98.0, 105.0),
            (105.0, 108.0, 92.0, 95.0),
            (95.0, 103.0, 88.0, 100.0),
            (100.0, 115.0, 97.0, 110.0),
            (110.0, 112.0, 95.0, 98.0),
            (98.0, 108.0, 90.0, 105.0),
            (105.0, 120.0, 100.0, 115.0),
            (115.0, 118.0, 105.0, 110.0),
            (110.0, 125.0, 108.0, 120.0),
            (120.0, 130.0, 115.0, 125.0),
            (125.0, 128.0, 110.0, 115.0),
            (115.0, 122.0, 105.0, 118.0),
            (118.0, 130.0, 115.0, 125.0),
            (125.0, 135.0, 120.0, 130.0),
        ]);

        // ATR should be higher for volatile market
        assert!(atr_from_bars(&bars, 14) > 10.0);
    }

    #[test]
    fn test_insufficient_data() {
        let bars = create_test_bars(&[(100.0, 101.0, 99.0, 100.0), (100.0, 101.0, 99.0, 100.0)]);
        assert_eq!(atr_from_bars(&bars, 14), 0.0);
    }

    #[test]
    fn test_mismatched_slices() {
        assert_eq!(average_true_range(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1), 0.0);
    }

    #[test]
    fn test_true_range_series_length() {
        let highs = vec![2.0; 5];
        let lows = vec![1.0; 5];
        let closes = vec![1.5; 5];
        assert_eq!(true_range_series(&highs, &lows, &closes), vec![1.0; 4]);
    }
}
