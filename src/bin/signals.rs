//! Scan spot or futures candles and print what each strategy says right now.
//!
//! Never places orders; `spot_trader` is the binary that trades. With the grid
//! flags it also shows which grid orders the latest close would trigger.

use clap::Parser;
use gatebot::api::{Credentials, GateClient, GatewayError};
use gatebot::config::AppConfig;
use gatebot::strategy::{default_leverage_for, GridConfig, GridMode, GridStrategy, Strategy, StrategyKind};
use gatebot::{Bar, Market, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signals", about = "Print strategy signals for a Gate.io market")]
struct Cli {
    /// Settings file for exchange options
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Market::Futures)]
    market: Market,

    /// Contract (futures) or currency pair (spot), e.g. BTC_USDT
    #[arg(short, long, default_value = "BTC_USDT")]
    symbol: String,

    /// Candle interval: 10s, 1m, 5m, 15m, 30m, 1h, 4h, 8h, 1d, 7d
    #[arg(short, long, default_value = "5m")]
    interval: String,

    /// Number of candles to fetch
    #[arg(short, long, default_value_t = 200)]
    limit: usize,

    /// Only run this strategy (default: all)
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Re-scan every N seconds until Ctrl+C
    #[arg(short, long)]
    watch: Option<u64>,

    /// Grid lower bound; enables the grid preview together with --grid-upper
    #[arg(long, requires = "grid_upper")]
    grid_lower: Option<f64>,

    #[arg(long, requires = "grid_lower")]
    grid_upper: Option<f64>,

    #[arg(long, default_value_t = 10)]
    grid_count: usize,

    /// Order size per grid level
    #[arg(long, default_value_t = 1.0)]
    grid_size: f64,

    /// Leverage per grid order (default: 10 futures, 1 spot)
    #[arg(long)]
    grid_leverage: Option<f64>,

    /// Trigger when price reaches a level instead of coming within tolerance
    #[arg(long)]
    grid_crossing: bool,
}

impl Cli {
    fn grid(&self) -> anyhow::Result<Option<GridStrategy>> {
        let (Some(lower_price), Some(upper_price)) = (self.grid_lower, self.grid_upper) else {
            return Ok(None);
        };

        let mode = if self.grid_crossing {
            GridMode::Crossing
        } else {
            GridMode::tolerance_for(self.market)
        };

        let grid = GridStrategy::new(GridConfig {
            lower_price,
            upper_price,
            grid_count: self.grid_count,
            size: self.grid_size,
            leverage: self.grid_leverage.unwrap_or_else(|| default_leverage_for(self.market)),
            mode,
        })?;
        Ok(Some(grid))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatebot=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // market data endpoints are public
    let client = GateClient::new(config.exchange, Credentials::from_env())?;

    let strategies: Vec<Box<dyn Strategy>> = match cli.strategy {
        Some(kind) => vec![kind.build()],
        None => StrategyKind::ALL.iter().map(|kind| kind.build()).collect(),
    };
    let mut grid = cli.grid()?;

    let Some(watch_secs) = cli.watch else {
        scan(&client, &cli, &strategies, grid.as_mut()).await?;
        return Ok(());
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(watch_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\n👋 Stopped");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = scan(&client, &cli, &strategies, grid.as_mut()).await {
                    tracing::warn!(error = %e, "Scan failed, retrying next tick");
                    println!("❌ {}", e);
                }
            }
        }
    }

    Ok(())
}

async fn fetch_bars(client: &GateClient, cli: &Cli) -> std::result::Result<Vec<Bar>, GatewayError> {
    match cli.market {
        Market::Spot => client.get_spot_candles(&cli.symbol, &cli.interval, cli.limit).await,
        Market::Futures => client.get_futures_candles(&cli.symbol, &cli.interval, cli.limit).await,
    }
}

async fn scan(
    client: &GateClient,
    cli: &Cli,
    strategies: &[Box<dyn Strategy>],
    grid: Option<&mut GridStrategy>,
) -> std::result::Result<(), GatewayError> {
    let bars = fetch_bars(client, cli).await?;
    let Some(last) = bars.last() else {
        println!("⚠️  No candles returned for {}", cli.symbol);
        return Ok(());
    };

    println!("\n{}", "=".repeat(72));
    println!(
        "📊 {} {:?} {}  |  {} bars  |  last close {:.6} @ {}",
        cli.symbol,
        cli.market,
        cli.interval,
        bars.len(),
        last.close,
        last.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!("{}", "=".repeat(72));

    for strategy in strategies {
        let signal = strategy.generate_signal(&bars);
        let note = if bars.len() < strategy.min_candles_required() {
            format!("  (needs {} bars)", strategy.min_candles_required())
        } else {
            String::new()
        };
        let marker = if signal.is_hold() { "➖" } else { "🎯" };
        println!(
            "  {} {:<28} {}{}",
            marker,
            strategy.name(),
            signal.label(cli.market),
            note
        );
    }

    if let Some(grid) = grid {
        let orders = grid.get_orders(last.close);
        if orders.is_empty() {
            println!("\n  Grid: no levels triggered at {:.6}", last.close);
        } else {
            println!("\n  Grid orders (preview only, not submitted):");
            for order in orders {
                println!(
                    "    {:<5} {} @ {:.6}  x{}",
                    cli.market.label(order.side),
                    order.size,
                    order.price,
                    order.leverage
                );
            }
        }
    }

    Ok(())
}
