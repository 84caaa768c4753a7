use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OHLCV candlestick for one interval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn closes(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.volume).collect()
    }
}

/// Side of a position or an entry signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

/// Market a signal is presented for.
///
/// Strategies only speak `Direction`; the market picks the words.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Spot,
    Futures,
}

impl Market {
    pub fn label(self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Market::Spot, Direction::Long) => "buy",
            (Market::Spot, Direction::Short) => "sell",
            (Market::Futures, Direction::Long) => "long",
            (Market::Futures, Direction::Short) => "short",
        }
    }
}

/// Trading signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    Enter(Direction),
    Hold,
}

impl Signal {
    pub fn is_hold(self) -> bool {
        matches!(self, Signal::Hold)
    }

    pub fn label(self, market: Market) -> &'static str {
        match self {
            Signal::Enter(direction) => market.label(direction),
            Signal::Hold => "hold",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Market::Futures))
    }
}

/// Snapshot of an open futures position as reported by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub contract: String,
    pub size: f64, // positive = long, negative = short
    pub entry_price: f64,
    pub mark_price: f64,
    pub leverage: f64,
    pub unrealised_pnl: f64,
    pub mode: String,
}

impl Position {
    pub fn direction(&self) -> Direction {
        if self.size >= 0.0 {
            Direction::Long
        } else {
            Direction::Short
        }
    }

    /// Percent move from entry in the position's favour
    pub fn pnl_pct(&self, price: f64) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }

        let change = (price - self.entry_price) / self.entry_price * 100.0;
        match self.direction() {
            Direction::Long => change,
            Direction::Short => -change,
        }
    }

    /// Leveraged return on margin at the mark price
    pub fn roi_pct(&self) -> f64 {
        self.pnl_pct(self.mark_price) * self.leverage
    }
}

/// Outcome of an order submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResult {
    pub id: String,
    pub contract: String,
    pub size: f64,
    pub status: String,
    pub fill_price: Option<f64>,
}

/// Spot wallet balance for one currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotBalance {
    pub currency: String,
    pub available: f64,
    pub locked: f64,
}

impl SpotBalance {
    pub fn empty(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            available: 0.0,
            locked: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.available + self.locked
    }
}

/// Spot limit order; `Long` buys the base currency, `Short` sells it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotOrder {
    pub id: String,
    pub pair: String,
    pub side: Direction,
    pub amount: f64,
    pub price: f64,
    pub status: String,
}
