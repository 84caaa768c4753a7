//! Layered configuration: `config/settings.*` (optional), an explicit file,
//! then `GATEBOT__SECTION__KEY` environment variables. Command-line flags are
//! applied on top through `MonitorOverrides`.

use crate::api::{Credentials, GatewaySettings};
use crate::execution::{MonitorConfig, SpotTraderConfig, ThresholdConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SETTINGS_FILE: &str = "config/settings";
const ENV_PREFIX: &str = "GATEBOT";
const DEFAULT_ATR_TAKE_PROFIT_PCT: f64 = 0.05;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("GATE_API_KEY and GATE_API_SECRET must be set")]
    MissingCredentials,

    #[error("No contract to monitor; set monitor.contract or pass --contract")]
    MissingContract,

    #[error("No stop-loss or take-profit configured")]
    MissingThresholds,

    #[error("Check interval must be at least one second")]
    InvalidInterval,

    #[error("Take-profit percentage {0} only applies to ATR thresholds; pass --atr-multiplier or set mode = \"atr\"")]
    TakeProfitPctWithoutAtr(f64),

    #[error("Currency pair {0:?} must look like BASE_QUOTE")]
    InvalidPair(String),

    #[error("Spot trading needs both spot.buy_below and spot.sell_above")]
    MissingSpotTargets,

    #[error("Buy target {buy_below} must be positive and below sell target {sell_above}")]
    InvalidSpotTargets { buy_below: f64, sell_above: f64 },

    #[error("Trade amount must be positive, got {0}")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: GatewaySettings,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub spot: SpotSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,
}

fn default_check_interval_secs() -> u64 {
    60
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            contract: None,
            check_interval_secs: default_check_interval_secs(),
            thresholds: None,
        }
    }
}

/// Command-line values that win over file and environment settings
#[derive(Debug, Clone, Default)]
pub struct MonitorOverrides {
    pub contract: Option<String>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub atr_multiplier: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub interval_secs: Option<u64>,
}

impl MonitorSettings {
    /// An ATR multiplier switches to ATR mode; fixed prices replace only the sides given
    ///
    /// A take-profit percentage that would end up on fixed thresholds is rejected.
    pub fn apply(&mut self, overrides: MonitorOverrides) -> Result<(), ConfigError> {
        if let Some(pct) = overrides.take_profit_pct {
            let fixed_override = overrides.stop_loss.is_some() || overrides.take_profit.is_some();
            let atr_mode = overrides.atr_multiplier.is_some()
                || (!fixed_override && matches!(self.thresholds, Some(ThresholdConfig::Atr { .. })));
            if !atr_mode {
                return Err(ConfigError::TakeProfitPctWithoutAtr(pct));
            }
        }

        if let Some(contract) = overrides.contract {
            self.contract = Some(contract);
        }
        if let Some(secs) = overrides.interval_secs {
            self.check_interval_secs = secs;
        }

        if let Some(multiplier) = overrides.atr_multiplier {
            let (period, interval, file_pct) = match self.thresholds.take() {
                Some(ThresholdConfig::Atr {
                    period,
                    interval,
                    take_profit_pct,
                    ..
                }) => (period, interval, Some(take_profit_pct)),
                _ => (14, "1h".to_string(), None),
            };
            self.thresholds = Some(ThresholdConfig::Atr {
                multiplier,
                take_profit_pct: overrides
                    .take_profit_pct
                    .or(file_pct)
                    .unwrap_or(DEFAULT_ATR_TAKE_PROFIT_PCT),
                period,
                interval,
            });
        } else if overrides.stop_loss.is_some() || overrides.take_profit.is_some() {
            let (file_stop, file_target) = match &self.thresholds {
                Some(ThresholdConfig::Fixed {
                    stop_loss,
                    take_profit,
                }) => (*stop_loss, *take_profit),
                _ => (None, None),
            };
            self.thresholds = Some(ThresholdConfig::fixed(
                overrides.stop_loss.or(file_stop),
                overrides.take_profit.or(file_target),
            ));
        } else if let (Some(pct), Some(ThresholdConfig::Atr { take_profit_pct, .. })) =
            (overrides.take_profit_pct, self.thresholds.as_mut())
        {
            *take_profit_pct = pct;
        }

        Ok(())
    }

    pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let contract = self
            .contract
            .as_ref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(ConfigError::MissingContract)?;

        let thresholds = self
            .thresholds
            .clone()
            .filter(ThresholdConfig::is_armed)
            .ok_or(ConfigError::MissingThresholds)?;

        if self.check_interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(MonitorConfig {
            contract: contract.trim().to_string(),
            thresholds,
            check_interval: Duration::from_secs(self.check_interval_secs),
        })
    }
}

/// Spot threshold trader settings
#[derive(Debug, Clone, Deserialize)]
pub struct SpotSettings {
    #[serde(default = "default_spot_pair")]
    pub pair: String,
    #[serde(default)]
    pub buy_below: Option<f64>,
    #[serde(default)]
    pub sell_above: Option<f64>,
    #[serde(default = "default_spot_amount")]
    pub buy_amount: f64,
    #[serde(default = "default_spot_amount")]
    pub sell_amount: f64,
    #[serde(default = "default_spot_interval_secs")]
    pub check_interval_secs: u64,
}

fn default_spot_pair() -> String {
    "BTC_USDT".to_string()
}

fn default_spot_amount() -> f64 {
    0.001
}

fn default_spot_interval_secs() -> u64 {
    10
}

impl Default for SpotSettings {
    fn default() -> Self {
        Self {
            pair: default_spot_pair(),
            buy_below: None,
            sell_above: None,
            buy_amount: default_spot_amount(),
            sell_amount: default_spot_amount(),
            check_interval_secs: default_spot_interval_secs(),
        }
    }
}

/// Command-line values for the spot trader
#[derive(Debug, Clone, Default)]
pub struct SpotOverrides {
    pub pair: Option<String>,
    pub buy_below: Option<f64>,
    pub sell_above: Option<f64>,
    /// Sets both the buy and the sell amount
    pub amount: Option<f64>,
    pub interval_secs: Option<u64>,
}

impl SpotSettings {
    pub fn apply(&mut self, overrides: SpotOverrides) {
        if let Some(pair) = overrides.pair {
            self.pair = pair;
        }
        if let Some(price) = overrides.buy_below {
            self.buy_below = Some(price);
        }
        if let Some(price) = overrides.sell_above {
            self.sell_above = Some(price);
        }
        if let Some(amount) = overrides.amount {
            self.buy_amount = amount;
            self.sell_amount = amount;
        }
        if let Some(secs) = overrides.interval_secs {
            self.check_interval_secs = secs;
        }
    }

    pub fn trader_config(&self) -> Result<SpotTraderConfig, ConfigError> {
        let pair = self.pair.trim().to_uppercase();
        let (base, quote) = match pair.split_once('_') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() && !quote.contains('_') => {
                (base.to_string(), quote.to_string())
            }
            _ => return Err(ConfigError::InvalidPair(self.pair.clone())),
        };

        let (Some(buy_below), Some(sell_above)) = (self.buy_below, self.sell_above) else {
            return Err(ConfigError::MissingSpotTargets);
        };
        if !(buy_below > 0.0 && buy_below < sell_above) {
            return Err(ConfigError::InvalidSpotTargets { buy_below, sell_above });
        }

        for amount in [self.buy_amount, self.sell_amount] {
            if !(amount > 0.0) {
                return Err(ConfigError::InvalidAmount(amount));
            }
        }
        if self.check_interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(SpotTraderConfig {
            pair,
            base,
            quote,
            buy_below,
            sell_above,
            buy_amount: self.buy_amount,
            sell_amount: self.sell_amount,
            check_interval: Duration::from_secs(self.check_interval_secs),
        })
    }
}

impl AppConfig {
    /// Load settings; a missing `config/settings` file is fine, a missing explicit file is not
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_SETTINGS_FILE).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// API credentials from the environment (after `.env` has been loaded)
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    Credentials::from_env().ok_or(ConfigError::MissingCredentials)
}
