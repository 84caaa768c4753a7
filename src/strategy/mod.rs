// Trading strategy module
pub mod bollinger_breakout;
pub mod ema_breakout;
pub mod grid;
pub mod ma_cross;
pub mod macd_cross;
pub mod momentum_breakout;
pub mod rsi_threshold;
pub mod volatility_breakout;

pub use bollinger_breakout::{BollingerBreakoutConfig, BollingerBreakoutStrategy};
pub use ema_breakout::{EmaBreakoutConfig, EmaBreakoutStrategy};
pub use grid::{default_leverage_for, GridConfig, GridLevel, GridMode, GridOrder, GridStrategy};
pub use ma_cross::{MaCrossConfig, MaCrossStrategy};
pub use macd_cross::{MacdCrossConfig, MacdCrossStrategy};
pub use momentum_breakout::{MomentumBreakoutConfig, MomentumBreakoutStrategy};
pub use rsi_threshold::{RsiThresholdConfig, RsiThresholdStrategy};
pub use volatility_breakout::{VolatilityBreakoutConfig, VolatilityBreakoutStrategy};

use crate::models::{Bar, Direction, Signal};
use serde::Deserialize;

/// Base trait for all bar-driven trading strategies
///
/// Strategies never fail: with too little history they return `Signal::Hold`.
pub trait Strategy: Send + Sync {
    /// Generate a trading signal from the bars, oldest first
    fn generate_signal(&self, bars: &[Bar]) -> Signal;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum bars required before the strategy can emit anything but hold
    fn min_candles_required(&self) -> usize;
}

/// Selectable strategy, for config files and command lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MaCross,
    Rsi,
    EmaBreakout,
    Bollinger,
    Momentum,
    Macd,
    Volatility,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::MaCross,
        StrategyKind::Rsi,
        StrategyKind::EmaBreakout,
        StrategyKind::Bollinger,
        StrategyKind::Momentum,
        StrategyKind::Macd,
        StrategyKind::Volatility,
    ];

    /// Build the strategy with its default parameters
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::MaCross => Box::new(MaCrossStrategy::default()),
            StrategyKind::Rsi => Box::new(RsiThresholdStrategy::default()),
            StrategyKind::EmaBreakout => Box::new(EmaBreakoutStrategy::default()),
            StrategyKind::Bollinger => Box::new(BollingerBreakoutStrategy::default()),
            StrategyKind::Momentum => Box::new(MomentumBreakoutStrategy::default()),
            StrategyKind::Macd => Box::new(MacdCrossStrategy::default()),
            StrategyKind::Volatility => Box::new(VolatilityBreakoutStrategy::default()),
        }
    }
}

/// Detect a cross of `fast` over `slow` between two consecutive points
///
/// Up-cross: fast was at or below slow and is now strictly above.
/// Down-cross: fast was at or above slow and is now strictly below.
pub fn detect_cross(prev_fast: f64, prev_slow: f64, curr_fast: f64, curr_slow: f64) -> Option<Direction> {
    if prev_fast <= prev_slow && curr_fast > curr_slow {
        Some(Direction::Long)
    } else if prev_fast >= prev_slow && curr_fast < curr_slow {
        Some(Direction::Short)
    } else {
        None
    }
}

/// Cross signal at every point of two aligned series (the first is always hold)
pub fn cross_signals(fast: &[f64], slow: &[f64]) -> Vec<Signal> {
    let len = fast.len().min(slow.len());
    let mut signals = Vec::with_capacity(len);

    for i in 0..len {
        let signal = if i == 0 {
            Signal::Hold
        } else {
            detect_cross(fast[i - 1], slow[i - 1], fast[i], slow[i])
                .map_or(Signal::Hold, Signal::Enter)
        };
        signals.push(signal);
    }

    signals
}

/// Signal from the last two points of two series that end on the same bar
pub(crate) fn latest_cross(fast: &[f64], slow: &[f64]) -> Signal {
    if fast.len() < 2 || slow.len() < 2 {
        return Signal::Hold;
    }

    let (f, s) = (&fast[fast.len() - 2..], &slow[slow.len() - 2..]);
    detect_cross(f[0], s[0], f[1], s[1]).map_or(Signal::Hold, Signal::Enter)
}
