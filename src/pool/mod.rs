//! Pool reserve reads for the scanner's liquidity pre-filter.

pub mod liquidity;

pub use liquidity::{LiquidityGate, ReserveSource, V2ReserveReader};
