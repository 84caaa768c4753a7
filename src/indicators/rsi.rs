/// Neutral reading returned when there is not enough history
pub const NEUTRAL_RSI: f64 = 50.0;

/// Calculate Relative Strength Index (RSI)
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
/// Uses simple averages of the trailing `period` changes. Returns
/// [`NEUTRAL_RSI`] with fewer than `period + 1` closes. A flat window reads 0,
/// a window without losses reads 100.
pub fn relative_strength_index(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let changes = &closes[closes.len() - period - 1..];
    let (mut gains, mut losses) = (0.0, 0.0);

    for pair in changes.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 0.0 };
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));

    rsi.clamp(0.0, 100.0)
}
