// Position monitoring, exit execution and spot threshold trading
pub mod monitor;
pub mod spot_trader;
pub mod thresholds;

pub use monitor::{CycleOutcome, MonitorConfig, MonitorOutcome, MonitorState, PositionMonitor};
pub use spot_trader::{SpotThresholdTrader, SpotTraderConfig, TradeOutcome, TradeTally};
pub use thresholds::{ExitReason, ThresholdConfig, Thresholds, FALLBACK_PCT};
