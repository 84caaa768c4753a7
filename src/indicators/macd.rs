use super::moving_average::exponential_moving_average;

/// MACD line, signal line and histogram, aligned and of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate Moving Average Convergence Divergence
///
/// MACD line is fast EMA minus slow EMA, aligned on the slow series. The signal
/// line is an EMA of the MACD line. All three series are trimmed to the signal
/// line's length so index `i` refers to the same bar in each.
///
/// Needs at least `slow + signal` closes, which yields two signal values.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow + signal {
        return None;
    }

    let fast_ema = exponential_moving_average(closes, fast);
    let slow_ema = exponential_moving_average(closes, slow);

    // fast series is longer; drop its head so both end on the last close
    let offset = fast_ema.len() - slow_ema.len();
    let macd_line: Vec<f64> = fast_ema[offset..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = exponential_moving_average(&macd_line, signal);
    if signal_line.len() < 2 {
        return None;
    }

    let macd_tail = macd_line[macd_line.len() - signal_line.len()..].to_vec();
    let histogram = macd_tail
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Some(Macd {
        macd: macd_tail,
        signal: signal_line,
        histogram,
    })
}
