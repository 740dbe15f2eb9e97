//! Arbitrage Module
//!
//! Round-trip evaluation, fee/gas guarding, execution cooldown and
//! flash-swap submission for the two-venue stablecoin loop.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

pub mod cooldown;
pub mod evaluator;
pub mod executor;
pub mod gas_guard;
pub mod quoter;
pub mod scanner;

#[cfg(test)]
pub mod test_helpers;

pub use cooldown::ExecutionGate;
pub use evaluator::{RoundTrip, RouteEvaluator};
pub use executor::{encode_route, FlashExecutor, RelaySubmitter, TxSubmitter};
pub use gas_guard::{FeeGuard, FeeSource, GasPolicy, ProviderFeeSource};
pub use quoter::{DirectPoolQuoter, QuoteSource, RouterQuoter};
pub use scanner::{CycleReport, RouteOutcome, ScanTask, Scanner};
