use serde::Serialize;

/// Bollinger Bands at the latest bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Where `price` sits between the bands: 0 at lower, 1 at upper.
    ///
    /// Collapsed bands read as the midpoint.
    pub fn position(&self, price: f64) -> f64 {
        let width = self.upper - self.lower;
        if width <= 0.0 {
            return 0.5;
        }
        (price - self.lower) / width
    }
}

/// Calculate Bollinger Bands over the trailing `period` closes
///
/// Middle band is the SMA, band width is `std_dev_mult` population standard
/// deviations.
pub fn bollinger_bands(closes: &[f64], period: usize, std_dev_mult: f64) -> Option<BollingerBands> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    Some(BollingerBands {
        upper: middle + std_dev_mult * std_dev,
        middle,
        lower: middle - std_dev_mult * std_dev,
    })
}
