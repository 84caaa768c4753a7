use clap::Parser;
use gatebot::api::{GateClient, GatewayError};
use gatebot::config::{credentials_from_env, AppConfig, ConfigError, SpotOverrides};
use gatebot::execution::{SpotThresholdTrader, SpotTraderConfig};
use gatebot::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Buy a spot pair below one price and sell it above another
#[derive(Parser, Debug)]
#[command(name = "spot_trader", version)]
struct Cli {
    /// Settings file (TOML/JSON/YAML), layered over config/settings.*
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Currency pair, e.g. BTC_USDT
    #[arg(long)]
    pair: Option<String>,

    /// Buy when the price drops below this
    #[arg(long)]
    buy_below: Option<f64>,

    /// Sell when the price rises above this
    #[arg(long)]
    sell_above: Option<f64>,

    /// Base currency amount per order, for both buys and sells
    #[arg(long)]
    amount: Option<f64>,

    /// Seconds between checks
    #[arg(long)]
    interval_secs: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> SpotOverrides {
        SpotOverrides {
            pair: self.pair.clone(),
            buy_below: self.buy_below,
            sell_above: self.sell_above,
            amount: self.amount,
            interval_secs: self.interval_secs,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn build(cli: &Cli) -> std::result::Result<(GateClient, SpotTraderConfig), SetupError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.spot.apply(cli.overrides());
    let trader_config = config.spot.trader_config()?;

    let credentials = credentials_from_env()?;
    let client = GateClient::new(config.exchange, Some(credentials))?;

    Ok((client, trader_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatebot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let (client, trader_config) = match build(&cli) {
        Ok(setup) => setup,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 gatebot spot trader starting");
    tracing::info!("  Pair: {}", trader_config.pair);
    tracing::info!("  Buy below: {} ({} {})", trader_config.buy_below, trader_config.buy_amount, trader_config.base);
    tracing::info!("  Sell above: {} ({} {})", trader_config.sell_above, trader_config.sell_amount, trader_config.base);
    tracing::info!("  Check interval: {}s", trader_config.check_interval.as_secs());

    let trader = SpotThresholdTrader::new(client, trader_config);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let tally = trader.run(shutdown).await;

    tracing::info!("👋 Spot trader stopped after {} buys and {} sells", tally.buys, tally.sells);
    Ok(())
}
