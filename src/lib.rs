//! Flash-loan Round-trip Scanner Library
//!
//! Scans stablecoin pairs across an AMM router and a direct pool, and fires
//! a flash swap through the receiver contract when a round trip clears
//! twice its gas cost plus a profit floor.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

pub mod arbitrage;
pub mod config;
pub mod contracts;
pub mod error;
pub mod pool;
pub mod trade_log;
pub mod types;

// Re-export commonly used types
pub use config::{load_config_from_file, BotConfig};
pub use error::{SkipReason, SubmitError};
pub use trade_log::{FileTradeLog, TradeLog};
pub use types::{ArbPair, Direction, ExecutionOutcome, ProfitEstimate, Quote, Route, Venue};
