//! Multi-timeframe review of an open position
//!
//! Scores trend evidence from 1h and 4h bars:
//! - MA alignment on 1h: price > MA5 > MA20 > MA50 → +2, price > MA5 > MA20 → +1 (mirrored for bears)
//! - RSI overbought/oversold on 1h and 4h → ∓1 each
//! - Position inside the 1h Bollinger bands: top fifth → -1, bottom fifth → +1
//! - MA5 vs MA20 agreeing on both timeframes → ±1
//!
//! Positive scores are bullish. The recommendation reads the score relative
//! to the position's side, so a bullish market is bad news for a short.

use crate::indicators::{
    bollinger_bands, price_change_pct, relative_strength_index, simple_moving_average,
    BollingerBands,
};
use crate::models::{Bar, Direction};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    StrongHold, // score >= 3
    Hold,
    Cautious,
    ReduceOrProtect,
    Close, // score <= -3
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score >= 3 {
            Recommendation::StrongHold
        } else if score >= 1 {
            Recommendation::Hold
        } else if score <= -3 {
            Recommendation::Close
        } else if score <= -1 {
            Recommendation::ReduceOrProtect
        } else {
            Recommendation::Cautious
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Recommendation::StrongHold => "several indicators confirm the trend in your favour",
            Recommendation::Hold => "overall trend leans your way",
            Recommendation::Cautious => "no clear direction, watch closely",
            Recommendation::ReduceOrProtect => "some signals against the position, risk rising",
            Recommendation::Close => "several indicators point against the position",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::StrongHold => "🟢 Strong hold",
            Recommendation::Hold => "🟢 Hold",
            Recommendation::Cautious => "🟡 Hold with caution",
            Recommendation::ReduceOrProtect => "🟡 Reduce or set a stop",
            Recommendation::Close => "🔴 Close the position",
        };
        f.write_str(label)
    }
}

/// One scored observation
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSignal {
    pub name: &'static str,
    pub description: &'static str,
    pub score: i32,
}

impl TrendSignal {
    fn new(name: &'static str, description: &'static str, score: i32) -> Self {
        Self {
            name,
            description,
            score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PositionReview {
    pub direction: Direction,
    pub entry_price: f64,
    pub current_price: f64,
    pub pnl_pct: f64,
    pub change_24h_pct: f64,
    pub change_7d_pct: f64,
    pub ma5_1h: f64,
    pub ma20_1h: f64,
    pub ma50_1h: f64,
    pub ma5_4h: f64,
    pub ma20_4h: f64,
    pub rsi_1h: f64,
    pub rsi_4h: f64,
    pub bands_1h: BollingerBands,
    pub signals: Vec<TrendSignal>,
    /// Bullish-positive sum of all signal scores
    pub trend_score: i32,
    pub recommendation: Recommendation,
    pub suggested_stop: f64,
    pub suggested_take_profit: f64,
}

pub struct PositionAnalyzer {
    rsi_period: usize,
    rsi_overbought: f64,
    rsi_oversold: f64,
    bb_period: usize,
    bb_std_dev: f64,
}

impl Default for PositionAnalyzer {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            bb_period: 20,
            bb_std_dev: 2.0,
        }
    }
}

const MIN_BARS_1H: usize = 50;
const MIN_BARS_4H: usize = 20;
const LOOKBACK_24H: usize = 24; // 1h bars
const LOOKBACK_7D: usize = 42; // 4h bars

impl PositionAnalyzer {
    /// Review a position against hourly and four-hourly bars
    ///
    /// The current price is the last 1h close. Returns None with fewer than
    /// 50 hourly or 20 four-hourly bars, or a non-positive entry price.
    pub fn review(
        &self,
        bars_1h: &[Bar],
        bars_4h: &[Bar],
        entry_price: f64,
        direction: Direction,
    ) -> Option<PositionReview> {
        if bars_1h.len() < MIN_BARS_1H || bars_4h.len() < MIN_BARS_4H || entry_price <= 0.0 {
            return None;
        }

        let closes_1h = Bar::closes(bars_1h);
        let closes_4h = Bar::closes(bars_4h);
        let current_price = *closes_1h.last()?;

        let ma5_1h = last_sma(&closes_1h, 5)?;
        let ma20_1h = last_sma(&closes_1h, 20)?;
        let ma50_1h = last_sma(&closes_1h, 50)?;
        let ma5_4h = last_sma(&closes_4h, 5)?;
        let ma20_4h = last_sma(&closes_4h, 20)?;

        let rsi_1h = review_rsi(&closes_1h, self.rsi_period);
        let rsi_4h = review_rsi(&closes_4h, self.rsi_period);
        let bands_1h = bollinger_bands(&closes_1h, self.bb_period, self.bb_std_dev)?;

        let mut signals = Vec::new();

        signals.push(if current_price > ma5_1h && ma5_1h > ma20_1h && ma20_1h > ma50_1h {
            TrendSignal::new("✅ Bullish MA alignment", "strongly bullish", 2)
        } else if current_price > ma5_1h && ma5_1h > ma20_1h {
            TrendSignal::new("✅ Short-term uptrend", "bullish", 1)
        } else if current_price < ma5_1h && ma5_1h < ma20_1h && ma20_1h < ma50_1h {
            TrendSignal::new("⚠️ Bearish MA alignment", "strongly bearish", -2)
        } else if current_price < ma5_1h && ma5_1h < ma20_1h {
            TrendSignal::new("⚠️ Short-term downtrend", "bearish", -1)
        } else {
            TrendSignal::new("➖ Ranging", "no clear direction", 0)
        });

        if rsi_1h > self.rsi_overbought {
            signals.push(TrendSignal::new("⚠️ RSI overbought (1h)", "pullback likely", -1));
        } else if rsi_1h < self.rsi_oversold {
            signals.push(TrendSignal::new("✅ RSI oversold (1h)", "bounce likely", 1));
        }

        if rsi_4h > self.rsi_overbought {
            signals.push(TrendSignal::new("⚠️ RSI overbought (4h)", "medium-term pressure", -1));
        } else if rsi_4h < self.rsi_oversold {
            signals.push(TrendSignal::new("✅ RSI oversold (4h)", "medium-term support", 1));
        }

        let band_position = bands_1h.position(current_price);
        if band_position > 0.8 {
            signals.push(TrendSignal::new("⚠️ Near upper Bollinger band", "overbought zone", -1));
        } else if band_position < 0.2 {
            signals.push(TrendSignal::new("✅ Near lower Bollinger band", "oversold zone", 1));
        }

        if ma5_1h > ma20_1h && ma5_4h > ma20_4h {
            signals.push(TrendSignal::new("✅ Golden cross", "bullish on both timeframes", 1));
        } else if ma5_1h < ma20_1h && ma5_4h < ma20_4h {
            signals.push(TrendSignal::new("⚠️ Death cross", "bearish on both timeframes", -1));
        }

        let trend_score: i32 = signals.iter().map(|s| s.score).sum();
        let position_score = match direction {
            Direction::Long => trend_score,
            Direction::Short => -trend_score,
        };

        let raw_pnl = (current_price - entry_price) / entry_price * 100.0;
        let pnl_pct = match direction {
            Direction::Long => raw_pnl,
            Direction::Short => -raw_pnl,
        };
        let (suggested_stop, suggested_take_profit) =
            suggest_thresholds(direction, entry_price, current_price, pnl_pct > 0.0);

        tracing::debug!(trend_score, position_score, pnl_pct, "Position reviewed");

        Some(PositionReview {
            direction,
            entry_price,
            current_price,
            pnl_pct,
            change_24h_pct: price_change_pct(&closes_1h, LOOKBACK_24H).unwrap_or_default(),
            change_7d_pct: price_change_pct(&closes_4h, LOOKBACK_7D).unwrap_or_default(),
            ma5_1h,
            ma20_1h,
            ma50_1h,
            ma5_4h,
            ma20_4h,
            rsi_1h,
            rsi_4h,
            bands_1h,
            signals,
            trend_score,
            recommendation: Recommendation::from_score(position_score),
            suggested_stop,
            suggested_take_profit,
        })
    }
}

fn last_sma(closes: &[f64], period: usize) -> Option<f64> {
    simple_moving_average(closes, period).last().copied()
}

/// In profit: stop 2% behind entry, target 5% beyond the current price.
/// Otherwise: stop 5% behind entry, target 2% beyond entry.
/// RSI where any window without losses reads 100, flat windows included
fn review_rsi(closes: &[f64], period: usize) -> f64 {
    let rsi = relative_strength_index(closes, period);
    if rsi != 0.0 || period == 0 || closes.len() < period + 1 {
        return rsi;
    }

    let window = &closes[closes.len() - period - 1..];
    if window.windows(2).all(|pair| pair[1] == pair[0]) {
        100.0
    } else {
        rsi
    }
}

fn suggest_thresholds(direction: Direction, entry: f64, current: f64, in_profit: bool) -> (f64, f64) {
    match (direction, in_profit) {
        (Direction::Long, true) => (entry * 0.98, current * 1.05),
        (Direction::Long, false) => (entry * 0.95, entry * 1.02),
        (Direction::Short, true) => (entry * 1.02, current * 0.95),
        (Direction::Short, false) => (entry * 1.05, entry * 0.98),
    }
}
