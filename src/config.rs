//! Configuration management
//! Load settings from a .env file (plus an optional TOML pairs file)
//!
//! Author: AI-Generated
//! Created: 2026-10-19
//! Modified: 2026-10-21 - BSC_RPC accepted as fallback for RPC_URL

use crate::arbitrage::GasPolicy;
use crate::types::{ArbPair, AMOUNT_DECIMALS};
use alloy::primitives::utils::{parse_units, ParseUnits};
use alloy::primitives::{address, Address, U256};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// PancakeSwap V2 router (BSC)
pub const PANCAKE_ROUTER: Address = address!("10ED43C718714eb63d5aA57B78B54704E256024E");
/// PancakeSwap V2 factory (BSC)
pub const PANCAKE_FACTORY: Address = address!("BCfCcbde45cE874adCB698cC183deBcF17952812");

const BLOXROUTE_ENDPOINT: &str = "https://bsc.api.blxrbdn.com";

const USDT: Address = address!("55d398326f99059fF775485246999027B3197955");
const BUSD: Address = address!("e9e7cea3dedca5984780bafc599bd69add087d56");
const VAI: Address = address!("4BD17003473389A42DAF6a0a729f6Fdb328BbBd7");
const HAY: Address = address!("0782B6d8c4551b9760e74c0545A9bCD90bdc41E5");
const TUSD: Address = address!("14016e85a25aeb13065688cafb43044c2ef86784");
const USDD: Address = address!("d17479997F34dd9156Deef8F95A52D81D265be9c");

/// Runtime configuration, immutable after startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub rpc_url: String,
    /// Private relay endpoint (may carry an auth header in its query)
    pub relay_url: String,
    pub private_key: String,
    pub flash_receiver: Address,

    pub primary_router: Address,
    pub primary_factory: Address,
    pub pairs: Vec<ArbPair>,
    /// 18-decimal loan sizes, scanned in this order
    pub loan_sizes: Vec<U256>,

    /// Profit floor on top of 2x gas cost (18 decimals)
    pub min_profit: U256,
    pub gas_limit: u64,
    /// Wei
    pub max_gas_price: u128,
    /// Wei, used when the gas price query fails
    pub default_gas_price: u128,

    pub cooldown: Duration,
    pub scan_interval: Duration,
    pub scan_concurrency: usize,

    pub trade_log_path: PathBuf,
    pub live: bool,
}

#[derive(Debug, Deserialize)]
struct PairsFile {
    #[serde(rename = "pair")]
    pairs: Vec<ArbPair>,
}

/// Stablecoin pairs scanned when no PAIRS_FILE is given
pub fn default_pairs() -> Vec<ArbPair> {
    vec![
        ArbPair::new("VAI/USDT", USDT, VAI, address!("9e0B3fF9b65E962fCb632c96AcaCf0F44C7266a5")),
        ArbPair::new("HAY/BUSD", BUSD, HAY, address!("D1ba9BAC957322D6e8c07a160a3A8dA11A0d2867")),
        ArbPair::new("TUSD/USDT", USDT, TUSD, address!("D4E2EC4D5C285D910208272dDA48a80b1dC36D7F")),
        ArbPair::new("USDD/BUSD", BUSD, USDD, address!("2289dB32464da04a821aF16D4351F7e02e32cAd3")),
    ]
}

/// Load `.env`-style file into the process environment, then read config.
/// A missing file is not an error: variables may already be exported.
pub fn load_config_from_file<P: AsRef<Path>>(env_file: P) -> Result<BotConfig> {
    let env_file = env_file.as_ref();
    match dotenv::from_filename(env_file) {
        Ok(_) => info!("Loaded environment from {}", env_file.display()),
        Err(e) => warn!("No env file at {} ({}), using process environment", env_file.display(), e),
    }

    BotConfig::from_lookup(|key| std::env::var(key).ok())
}

impl BotConfig {
    /// Build from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).with_context(|| format!("{} not set", key));

        let relay_url = match (get("RELAY_URL"), get("BLOXROUTE_KEY")) {
            (Some(url), _) => url,
            (None, Some(key)) => format!("{}?authHeader={}", BLOXROUTE_ENDPOINT, key),
            (None, None) => bail!("RELAY_URL or BLOXROUTE_KEY must be set"),
        };

        let pairs = match get("PAIRS_FILE") {
            Some(path) => load_pairs_file(&path)?,
            None => default_pairs(),
        };

        let config = Self {
            rpc_url: get("RPC_URL")
                .or_else(|| get("BSC_RPC"))
                .context("RPC_URL (or BSC_RPC) not set")?,
            relay_url,
            private_key: require("PRIVATE_KEY")?,
            flash_receiver: parse_address("FLASH_RECEIVER", &require("FLASH_RECEIVER")?)?,

            primary_router: get("PRIMARY_ROUTER")
                .map(|v| parse_address("PRIMARY_ROUTER", &v))
                .transpose()?
                .unwrap_or(PANCAKE_ROUTER),
            primary_factory: get("PRIMARY_FACTORY")
                .map(|v| parse_address("PRIMARY_FACTORY", &v))
                .transpose()?
                .unwrap_or(PANCAKE_FACTORY),
            pairs,
            loan_sizes: parse_loan_sizes(&get("LOAN_SIZES").unwrap_or_else(|| "10000,50000,100000".into()))?,

            min_profit: parse_token_amount(&get("MIN_PROFIT").unwrap_or_else(|| "25".into()))
                .context("MIN_PROFIT")?,
            gas_limit: parse_or("GAS_LIMIT", get("GAS_LIMIT"), 600_000u64)?,
            max_gas_price: parse_gwei(&get("MAX_GAS_PRICE_GWEI").unwrap_or_else(|| "15".into()))
                .context("MAX_GAS_PRICE_GWEI")?,
            default_gas_price: parse_gwei(&get("DEFAULT_GAS_PRICE_GWEI").unwrap_or_else(|| "5".into()))
                .context("DEFAULT_GAS_PRICE_GWEI")?,

            cooldown: Duration::from_secs(parse_or("COOLDOWN_SECS", get("COOLDOWN_SECS"), 30u64)?),
            scan_interval: Duration::from_millis(parse_or(
                "SCAN_INTERVAL_MS",
                get("SCAN_INTERVAL_MS"),
                20_000u64,
            )?),
            scan_concurrency: parse_or("SCAN_CONCURRENCY", get("SCAN_CONCURRENCY"), 1usize)?,

            trade_log_path: PathBuf::from(get("TRADE_LOG_PATH").unwrap_or_else(|| "profit-log.txt".into())),
            live: get("LIVE_MODE").map(|v| parse_flag(&v)).transpose()?.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scanner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pairs.is_empty() {
            bail!("No pairs configured");
        }
        if self.loan_sizes.is_empty() {
            bail!("No loan sizes configured");
        }
        if self.loan_sizes.iter().any(|l| l.is_zero()) {
            bail!("Loan sizes must be greater than zero");
        }
        if self.gas_limit == 0 {
            bail!("GAS_LIMIT must be greater than zero");
        }
        if self.cooldown.is_zero() {
            bail!("COOLDOWN_SECS must be greater than zero");
        }
        if self.scan_interval.is_zero() {
            bail!("SCAN_INTERVAL_MS must be greater than zero");
        }
        if self.scan_concurrency == 0 {
            bail!("SCAN_CONCURRENCY must be at least 1");
        }
        if self.default_gas_price > self.max_gas_price {
            warn!(
                "DEFAULT_GAS_PRICE_GWEI is above MAX_GAS_PRICE_GWEI: trading is blocked whenever the gas price query fails"
            );
        }
        Ok(())
    }

    pub fn gas_policy(&self) -> GasPolicy {
        GasPolicy {
            gas_limit: self.gas_limit,
            max_gas_price: self.max_gas_price,
            default_gas_price: self.default_gas_price,
            min_profit: self.min_profit,
        }
    }

    /// Relay URL without its query string (safe to log)
    pub fn relay_host(&self) -> &str {
        self.relay_url.split('?').next().unwrap_or_default()
    }
}

/// Read `[[pair]]` entries from a TOML file
pub fn load_pairs_file(path: &str) -> Result<Vec<ArbPair>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pairs file: {}", path))?;
    let file: PairsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse pairs file: {}", path))?;
    Ok(file.pairs)
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    Address::from_str(value).with_context(|| format!("{} is not a valid address: {}", key, value))
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v
            .parse()
            .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, v, e)),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("LIVE_MODE has invalid value {:?}", other),
    }
}

/// Decimal token amount ("25", "0.5") to 18-decimal fixed point
pub fn parse_token_amount(value: &str) -> Result<U256> {
    match parse_units(value, AMOUNT_DECIMALS)
        .map_err(|e| anyhow!("invalid amount {:?}: {}", value, e))?
    {
        ParseUnits::U256(v) => Ok(v),
        ParseUnits::I256(_) => bail!("amount must not be negative: {:?}", value),
    }
}

/// Decimal gwei ("15", "3.5") to wei
pub fn parse_gwei(value: &str) -> Result<u128> {
    match parse_units(value, 9u8).map_err(|e| anyhow!("invalid gwei value {:?}: {}", value, e))? {
        ParseUnits::U256(v) => u128::try_from(v).map_err(|_| anyhow!("gas price out of range: {}", value)),
        ParseUnits::I256(_) => bail!("gas price must not be negative: {:?}", value),
    }
}

/// Comma-separated whole/decimal token amounts
pub fn parse_loan_sizes(value: &str) -> Result<Vec<U256>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_token_amount(s).with_context(|| format!("LOAN_SIZES entry {:?}", s)))
        .collect()
}
