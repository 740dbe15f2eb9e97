//! Scanner outcome types
//!
//! Guard rejections and submission failures are expected, locally absorbed
//! outcomes. Only configuration errors (anyhow, in `config`) stop the process.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use alloy::primitives::U256;
use thiserror::Error;

/// Why a candidate route was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("not enough liquidity: depth {depth} < required {required}")]
    InsufficientLiquidity { depth: U256, required: U256 },

    #[error("no round-trip gain")]
    NoOpportunity,

    #[error("gas too high: {gas_price} wei > ceiling {ceiling} wei")]
    GasPriceTooHigh { gas_price: u128, ceiling: u128 },

    #[error("profit {profit} does not cover required {required} (2x gas + floor)")]
    BelowThreshold { profit: U256, required: U256 },

    #[error("execution cooldown active ({remaining_ms}ms left)")]
    Cooldown { remaining_ms: u64 },
}

/// Flash-swap submission failure (reported, never retried)
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}
