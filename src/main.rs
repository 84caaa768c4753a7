use clap::Parser;
use gatebot::api::{GateClient, GatewayError};
use gatebot::config::{credentials_from_env, AppConfig, ConfigError, MonitorOverrides};
use gatebot::execution::{MonitorConfig, MonitorOutcome, PositionMonitor};
use gatebot::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Watch a Gate.io futures position and close it at a stop-loss or take-profit
#[derive(Parser, Debug)]
#[command(name = "gatebot", version)]
struct Cli {
    /// Settings file (TOML/JSON/YAML), layered over config/settings.*
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Futures contract, e.g. BTC_USDT
    #[arg(long)]
    contract: Option<String>,

    /// Fixed stop-loss price
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Fixed take-profit price
    #[arg(long)]
    take_profit: Option<f64>,

    /// Stop distance in ATRs (switches to ATR mode)
    #[arg(long, conflicts_with_all = ["stop_loss", "take_profit"])]
    atr_multiplier: Option<f64>,

    /// Take-profit distance in ATR mode, as a fraction of entry (0.1 = 10%)
    #[arg(long)]
    take_profit_pct: Option<f64>,

    /// Seconds between checks
    #[arg(long)]
    interval_secs: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> MonitorOverrides {
        MonitorOverrides {
            contract: self.contract.clone(),
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            atr_multiplier: self.atr_multiplier,
            take_profit_pct: self.take_profit_pct,
            interval_secs: self.interval_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let (client, monitor_config) = match build(&cli) {
        Ok(setup) => setup,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 gatebot position monitor starting");
    tracing::info!("  Contract: {}", monitor_config.contract);
    tracing::info!("  Thresholds: {:?}", monitor_config.thresholds);
    tracing::info!("  Check interval: {}s", monitor_config.check_interval.as_secs());

    let monitor = PositionMonitor::new(client, monitor_config);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match monitor.run(shutdown).await {
        MonitorOutcome::Closed { reason, order } => {
            tracing::info!("✅ Closed on {:?}: order {} ({})", reason, order.id, order.status);
        }
        MonitorOutcome::NoPosition => {
            tracing::info!("No open position left to monitor");
        }
        MonitorOutcome::Interrupted => {
            tracing::info!("\n⚠️  Interrupted, position left open");
        }
    }

    tracing::info!("👋 gatebot stopped");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn build(cli: &Cli) -> std::result::Result<(GateClient, MonitorConfig), SetupError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.monitor.apply(cli.overrides())?;
    let monitor_config = config.monitor.monitor_config()?;

    let credentials = credentials_from_env()?;
    let client = GateClient::new(config.exchange, Some(credentials))?;

    Ok((client, monitor_config))
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatebot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
