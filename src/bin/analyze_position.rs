//! Multi-timeframe review of an open Gate.io futures position.
//!
//! Without `--contract` every open position is reviewed. `--entry` and
//! `--size` skip the position lookup, so no API keys are needed.

use clap::Parser;
use gatebot::analysis::{PositionAnalyzer, PositionReview};
use gatebot::api::{Credentials, ExchangeGateway, GateClient};
use gatebot::config::{credentials_from_env, AppConfig};
use gatebot::{Direction, Position, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "analyze_position", about = "Trend review and exit suggestions for a futures position")]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Contract to review, e.g. ASTER_USDT
    #[arg(long)]
    contract: Option<String>,

    /// Entry price to assume instead of the exchange position
    #[arg(long, requires_all = ["size", "contract"])]
    entry: Option<f64>,

    /// Signed size to assume (negative = short)
    #[arg(long, requires = "entry", allow_negative_numbers = true)]
    size: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatebot=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if let (Some(contract), Some(entry), Some(size)) = (&cli.contract, cli.entry, cli.size) {
        let client = GateClient::new(config.exchange, Credentials::from_env())?;
        let position = Position {
            contract: contract.clone(),
            size,
            entry_price: entry,
            mark_price: 0.0,
            leverage: 1.0,
            unrealised_pnl: 0.0,
            mode: "manual".to_string(),
        };
        return review_all(&client, vec![position]).await;
    }

    let client = GateClient::new(config.exchange, Some(credentials_from_env()?))?;
    let positions: Vec<Position> = match &cli.contract {
        Some(contract) => client.get_position(contract).await?.into_iter().collect(),
        None => client.list_positions().await?,
    };

    if positions.is_empty() {
        println!("No open futures positions found");
        return Ok(());
    }

    review_all(&client, positions).await
}

async fn review_all(client: &GateClient, positions: Vec<Position>) -> Result<()> {
    let analyzer = PositionAnalyzer::default();

    for position in positions {
        let bars_1h = client.get_futures_candles(&position.contract, "1h", 200).await?;
        let bars_4h = client.get_futures_candles(&position.contract, "4h", 100).await?;

        match analyzer.review(&bars_1h, &bars_4h, position.entry_price, position.direction()) {
            Some(review) => print_report(&position, &review),
            None => println!(
                "⚠️  Not enough history to review {} ({} 1h / {} 4h bars)",
                position.contract,
                bars_1h.len(),
                bars_4h.len()
            ),
        }
    }

    Ok(())
}

fn print_report(position: &Position, review: &PositionReview) {
    let rule = "=".repeat(80);
    let side = match review.direction {
        Direction::Long => "long",
        Direction::Short => "short",
    };

    println!("\n{}", rule);
    println!("📊 {} position review [{}]", position.contract, side);
    println!("{}\n", rule);

    println!("Position");
    println!("  Current price:  ${:.6}", review.current_price);
    println!("  Entry price:    ${:.6}", review.entry_price);
    println!("  Size:           {}", position.size);
    if position.leverage > 1.0 {
        println!("  Leverage:       {}x  (ROI {:+.2}%)", position.leverage, position.roi_pct());
    }
    println!("  P&L:            {:+.2}%", review.pnl_pct);
    println!("  24h change:     {:+.2}%", review.change_24h_pct);
    println!("  7d change:      {:+.2}%", review.change_7d_pct);

    println!("\nMoving averages (1h)");
    println!("  MA5:  ${:.6}  ({:+.2}% vs price)", review.ma5_1h, pct_from(review.current_price, review.ma5_1h));
    println!("  MA20: ${:.6}  ({:+.2}% vs price)", review.ma20_1h, pct_from(review.current_price, review.ma20_1h));
    println!("  MA50: ${:.6}", review.ma50_1h);

    println!("\nMoving averages (4h)");
    println!("  MA5:  ${:.6}", review.ma5_4h);
    println!("  MA20: ${:.6}", review.ma20_4h);

    println!("\nRSI");
    println!("  1h: {:.2}", review.rsi_1h);
    println!("  4h: {:.2}", review.rsi_4h);

    let bands = &review.bands_1h;
    println!("\nBollinger bands (1h)");
    println!("  Upper:  ${:.6}", bands.upper);
    println!("  Middle: ${:.6}", bands.middle);
    println!("  Lower:  ${:.6}", bands.lower);
    println!("  Price position: {:.1}%", bands.position(review.current_price) * 100.0);

    println!("\n📈 Trend signals");
    for signal in &review.signals {
        println!("  {:<32} -> {}", signal.name, signal.description);
    }

    println!("\n💡 Recommendation");
    println!("  Trend score: {:+}", review.trend_score);
    println!("  {}", review.recommendation);
    println!("  Reason: {}", review.recommendation.reason());

    println!("\nRisk management");
    println!("  Suggested stop-loss:   ${:.6}", review.suggested_stop);
    println!("  Suggested take-profit: ${:.6}", review.suggested_take_profit);
    println!(
        "  gatebot --contract {} --stop-loss {:.6} --take-profit {:.6}",
        position.contract, review.suggested_stop, review.suggested_take_profit
    );
    println!("{}\n", rule);
}

fn pct_from(price: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        (price - reference) / reference * 100.0
    }
}
