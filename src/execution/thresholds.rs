use crate::models::Direction;
use serde::Deserialize;

/// Fallback distance when ATR thresholds cannot be computed
pub const FALLBACK_PCT: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

/// How exit prices are chosen for a monitor run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ThresholdConfig {
    /// Absolute prices; a missing side is never triggered
    Fixed {
        #[serde(default)]
        stop_loss: Option<f64>,
        #[serde(default)]
        take_profit: Option<f64>,
    },
    /// Stop `multiplier` ATRs from entry, target `take_profit_pct` (0.10 = 10%) beyond entry
    Atr {
        multiplier: f64,
        take_profit_pct: f64,
        #[serde(default = "default_atr_period")]
        period: usize,
        #[serde(default = "default_atr_interval")]
        interval: String,
    },
}

fn default_atr_period() -> usize {
    14
}

fn default_atr_interval() -> String {
    "1h".to_string()
}

impl ThresholdConfig {
    pub fn fixed(stop_loss: Option<f64>, take_profit: Option<f64>) -> Self {
        ThresholdConfig::Fixed {
            stop_loss,
            take_profit,
        }
    }

    pub fn atr(multiplier: f64, take_profit_pct: f64) -> Self {
        ThresholdConfig::Atr {
            multiplier,
            take_profit_pct,
            period: default_atr_period(),
            interval: default_atr_interval(),
        }
    }

    /// True when at least one side can ever trigger
    pub fn is_armed(&self) -> bool {
        match self {
            ThresholdConfig::Fixed {
                stop_loss,
                take_profit,
            } => stop_loss.is_some_and(|p| p > 0.0) || take_profit.is_some_and(|p| p > 0.0),
            ThresholdConfig::Atr {
                multiplier,
                take_profit_pct,
                period,
                ..
            } => *period > 0 && (*multiplier > 0.0 || *take_profit_pct > 0.0),
        }
    }
}

/// Concrete exit prices for one check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl Thresholds {
    /// Non-positive prices disable their side
    pub fn fixed(stop_loss: Option<f64>, take_profit: Option<f64>) -> Self {
        Self {
            stop_loss: stop_loss.filter(|p| *p > 0.0),
            take_profit: take_profit.filter(|p| *p > 0.0),
        }
    }

    pub fn from_atr(direction: Direction, entry: f64, atr: f64, multiplier: f64, take_profit_pct: f64) -> Self {
        let distance = atr * multiplier;
        match direction {
            Direction::Long => Self::fixed(Some(entry - distance), Some(entry * (1.0 + take_profit_pct))),
            Direction::Short => Self::fixed(Some(entry + distance), Some(entry * (1.0 - take_profit_pct))),
        }
    }

    /// Symmetric 5% stop and target around entry
    pub fn fallback(direction: Direction, entry: f64) -> Self {
        match direction {
            Direction::Long => Self::fixed(Some(entry * (1.0 - FALLBACK_PCT)), Some(entry * (1.0 + FALLBACK_PCT))),
            Direction::Short => Self::fixed(Some(entry * (1.0 + FALLBACK_PCT)), Some(entry * (1.0 - FALLBACK_PCT))),
        }
    }

    /// Stop is checked before take-profit
    pub fn evaluate(&self, direction: Direction, price: f64) -> Option<ExitReason> {
        let (stop_hit, target_hit) = match direction {
            Direction::Long => (
                self.stop_loss.is_some_and(|stop| price <= stop),
                self.take_profit.is_some_and(|tp| price >= tp),
            ),
            Direction::Short => (
                self.stop_loss.is_some_and(|stop| price >= stop),
                self.take_profit.is_some_and(|tp| price <= tp),
            ),
        };

        if stop_hit {
            Some(ExitReason::StopLoss)
        } else if target_hit {
            Some(ExitReason::TakeProfit)
        } else {
            None
        }
    }
}
