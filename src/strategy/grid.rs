use crate::models::{Direction, Market};
use anyhow::{bail, Result};
use serde::Deserialize;

/// How a grid level is judged to be hit by the current price
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "pct")]
pub enum GridMode {
    /// Price within this fraction of the level (0.01 = 1%)
    Tolerance(f64),
    /// Price at or through the level
    Crossing,
}

impl GridMode {
    pub fn tolerance_for(market: Market) -> Self {
        match market {
            Market::Spot => GridMode::Tolerance(0.01),
            Market::Futures => GridMode::Tolerance(0.005),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub lower_price: f64,
    pub upper_price: f64,
    pub grid_count: usize,
    pub size: f64,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    pub mode: GridMode,
}

/// Futures grids default to 10x; spot has no leverage
pub fn default_leverage_for(market: Market) -> f64 {
    match market {
        Market::Spot => 1.0,
        Market::Futures => 10.0,
    }
}

fn default_leverage() -> f64 {
    default_leverage_for(Market::Futures)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLevel {
    pub price: f64,
    pub buy_triggered: bool,
    pub sell_triggered: bool,
}

/// Order the grid wants placed; the caller decides whether to submit it
#[derive(Debug, Clone, PartialEq)]
pub struct GridOrder {
    pub side: Direction,
    pub price: f64,
    pub size: f64,
    pub leverage: f64,
}

/// Fixed price ladder that fires each side of each level once
#[derive(Debug, Clone)]
pub struct GridStrategy {
    config: GridConfig,
    levels: Vec<GridLevel>,
}

impl GridStrategy {
    pub fn new(config: GridConfig) -> Result<Self> {
        if config.lower_price <= 0.0 {
            bail!("grid lower price must be positive, got {}", config.lower_price);
        }
        if config.upper_price <= config.lower_price {
            bail!(
                "grid upper price {} must be above lower price {}",
                config.upper_price,
                config.lower_price
            );
        }
        if config.grid_count == 0 {
            bail!("grid count must be at least 1");
        }

        let step = (config.upper_price - config.lower_price) / config.grid_count as f64;
        let levels = (0..=config.grid_count)
            .map(|i| GridLevel {
                price: config.lower_price + step * i as f64,
                buy_triggered: false,
                sell_triggered: false,
            })
            .collect();

        tracing::info!(
            lower = config.lower_price,
            upper = config.upper_price,
            count = config.grid_count,
            step,
            "Grid ladder initialized"
        );

        Ok(Self { config, levels })
    }

    pub fn levels(&self) -> &[GridLevel] {
        &self.levels
    }

    /// Orders triggered by `price`; each level side fires at most once
    pub fn get_orders(&mut self, price: f64) -> Vec<GridOrder> {
        let mut orders = Vec::new();
        if price <= 0.0 {
            return orders;
        }

        let lower = self.config.lower_price;
        for level in &mut self.levels {
            let (buy_hit, sell_hit) = match self.config.mode {
                GridMode::Tolerance(pct) => {
                    let near = (level.price - price).abs() / level.price < pct;
                    // the bottom rung has nothing below it to sell into
                    (near, near && level.price > lower)
                }
                GridMode::Crossing => (price <= level.price, price >= level.price),
            };

            if buy_hit && !level.buy_triggered {
                level.buy_triggered = true;
                orders.push(GridOrder {
                    side: Direction::Long,
                    price: level.price,
                    size: self.config.size,
                    leverage: self.config.leverage,
                });
            }
            if sell_hit && !level.sell_triggered {
                level.sell_triggered = true;
                orders.push(GridOrder {
                    side: Direction::Short,
                    price: level.price,
                    size: self.config.size,
                    leverage: self.config.leverage,
                });
            }
        }

        if !orders.is_empty() {
            tracing::debug!(price, count = orders.len(), "Grid levels triggered");
        }

        orders
    }
}
