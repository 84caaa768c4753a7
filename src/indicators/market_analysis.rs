//! Volume and price-change helpers shared by strategies and position review

/// Mean of the last `period` values, or of all values when there are fewer
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }

    let start = values.len().saturating_sub(period);
    let window = &values[start..];
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Check if the latest volume is above `threshold` times the average of the
/// preceding `lookback` volumes
pub fn is_volume_spike(volumes: &[f64], lookback: usize, threshold: f64) -> bool {
    if lookback == 0 || volumes.len() < lookback + 1 {
        return false;
    }

    let current_volume = volumes[volumes.len() - 1];
    let previous = &volumes[volumes.len() - lookback - 1..volumes.len() - 1];
    let avg_volume = previous.iter().sum::<f64>() / lookback as f64;

    current_volume > threshold * avg_volume
}

/// Percent change of the last close against the close `lookback` bars back.
///
/// Falls back to the first close when history is shorter than `lookback`.
pub fn price_change_pct(closes: &[f64], lookback: usize) -> Option<f64> {
    let current = *closes.last()?;
    let base = if closes.len() >= lookback && lookback > 0 {
        closes[closes.len() - lookback]
    } else {
        closes[0]
    };

    if base == 0.0 {
        return None;
    }

    Some((current - base) / base * 100.0)
}
