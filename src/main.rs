//! Flash-loan round-trip scanner (BSC)
//!
//! Main entry point. Every scan interval, for each loan size and pair:
//! liquidity gate → quote both directions (router ↔ direct pool)
//! → fee/gas guard → execution cooldown → flash swap via private relay.
//!
//! Author: AI-Generated
//! Created: 2026-10-19
//!
//! Architecture:
//! - Reads go to the public RPC (`RPC_URL`)
//! - The signed flash-swap transaction goes to the private relay only
//! - Dry run by default; `--live` or `LIVE_MODE=true` submits transactions
//! - SIGINT/SIGTERM stop the loop after the running cycle

use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use anyhow::{Context, Result};
use clap::Parser;
use flashloop_bot::arbitrage::{
    DirectPoolQuoter, ExecutionGate, FeeGuard, FlashExecutor, ProviderFeeSource, RelaySubmitter,
    RouteEvaluator, RouterQuoter, Scanner,
};
use flashloop_bot::config::load_config_from_file;
use flashloop_bot::pool::{LiquidityGate, V2ReserveReader};
use flashloop_bot::trade_log::FileTradeLog;
use flashloop_bot::types::{format_amount, format_gwei};
use futures::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Flash-loan round-trip arbitrage scanner
#[derive(Parser)]
#[command(name = "flashloop-bot")]
struct Args {
    /// Environment file to load
    #[arg(long, env = "ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Run a single scan cycle and exit
    #[arg(long)]
    once: bool,

    /// Submit transactions (overrides LIVE_MODE)
    #[arg(long)]
    live: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = load_config_from_file(&args.env_file)?;
    let live = args.live || config.live;

    let signer: PrivateKeySigner = config
        .private_key
        .parse()
        .context("PRIVATE_KEY is not a valid private key")?;
    let wallet_address = signer.address();

    info!("===========================================");
    info!("   Flash-loan Round-trip Scanner");
    info!("===========================================");
    info!("Pairs: {}", config.pairs.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "));
    info!(
        "Loan sizes: {}",
        config.loan_sizes.iter().map(|l| format_amount(*l)).collect::<Vec<_>>().join(", ")
    );
    info!(
        "Min profit: {} | Gas limit: {} | Max gas: {} gwei | Fallback gas: {} gwei",
        format_amount(config.min_profit),
        config.gas_limit,
        format_gwei(config.max_gas_price),
        format_gwei(config.default_gas_price)
    );
    info!(
        "Cooldown: {}s | Scan interval: {}ms | Concurrency: {}",
        config.cooldown.as_secs(),
        config.scan_interval.as_millis(),
        config.scan_concurrency
    );
    info!("Flash receiver: {:?}", config.flash_receiver);
    info!("Relay: {}", config.relay_host());
    info!("Wallet: {:?}", wallet_address);

    // Reads: public RPC
    let rpc_url: Url = config.rpc_url.parse().context("RPC_URL is not a valid URL")?;
    let provider = Arc::new(ProviderBuilder::new().connect_http(rpc_url));

    // Writes: signed, private relay only
    let relay_url: Url = config.relay_url.parse().context("Relay URL is not a valid URL")?;
    let relay = Arc::new(ProviderBuilder::new().wallet(signer).connect_http(relay_url));

    let trade_log = Arc::new(FileTradeLog::new(&config.trade_log_path));
    info!("Trade log: {}", trade_log.path().display());
    let mut executor = FlashExecutor::new(
        Arc::new(RelaySubmitter::new(relay, config.flash_receiver)),
        trade_log,
        config.primary_router,
        config.gas_limit,
    );
    executor.set_dry_run(!live);
    info!("Mode: {}", if executor.is_dry_run() { "DRY RUN" } else { "LIVE" });

    let gate = Arc::new(ExecutionGate::new(config.cooldown));
    let scanner = Scanner::new(
        config.pairs.clone(),
        config.loan_sizes.clone(),
        config.scan_concurrency,
        LiquidityGate::new(Arc::new(V2ReserveReader::new(provider.clone(), config.primary_factory))),
        RouteEvaluator::new(
            Arc::new(RouterQuoter::new(provider.clone(), config.primary_router)),
            Arc::new(DirectPoolQuoter::new(provider.clone())),
        ),
        FeeGuard::new(Arc::new(ProviderFeeSource::new(provider)), config.gas_policy()),
        gate,
        executor,
    );

    if args.once {
        let report = scanner.run_cycle().await;
        info!("Single cycle: {}", report);
        return Ok(());
    }

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();
    let shutdown = async move {
        if let Some(sig) = signals.next().await {
            warn!("Received signal {} - finishing current cycle", sig);
        }
    };

    info!("Scanning every {}ms (Ctrl+C to stop)", config.scan_interval.as_millis());
    scanner.run(config.scan_interval, shutdown).await;

    handle.close();
    info!("Scanner stopped");
    Ok(())
}
