//! Liquidity Gate
//!
//! Cheap pre-filter run before any quote is requested: the primary AMM pair
//! for the two tokens must hold combined reserves of at least 2× the loan.
//! This is a coarse depth heuristic, not a slippage bound.
//!
//! Only the primary AMM venue is inspected. A route can pass this gate and
//! still meet a shallow direct pool on the second venue.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use crate::contracts::{IUniswapV2Factory, IUniswapV2Pair};
use crate::error::SkipReason;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Reads pooled reserve depth between two tokens
#[async_trait]
pub trait ReserveSource: Send + Sync {
    /// reserve0 + reserve1 of the pair, zero when no pair exists
    async fn reserve_depth(&self, token_a: Address, token_b: Address) -> Result<U256>;
}

/// V2 factory + pair reserve reader (PancakeSwap V2 on BSC)
pub struct V2ReserveReader<P> {
    provider: Arc<P>,
    factory: Address,
}

impl<P: Provider + 'static> V2ReserveReader<P> {
    pub fn new(provider: Arc<P>, factory: Address) -> Self {
        Self { provider, factory }
    }
}

#[async_trait]
impl<P: Provider + 'static> ReserveSource for V2ReserveReader<P> {
    async fn reserve_depth(&self, token_a: Address, token_b: Address) -> Result<U256> {
        let factory = IUniswapV2Factory::new(self.factory, self.provider.clone());
        let pair_address = factory
            .getPair(token_a, token_b)
            .call()
            .await
            .context("Failed to get V2 pair address")?;

        if pair_address == Address::ZERO {
            return Ok(U256::ZERO);
        }

        let pair = IUniswapV2Pair::new(pair_address, self.provider.clone());
        let reserves = pair
            .getReserves()
            .call()
            .await
            .context("Failed to get V2 reserves")?;

        Ok(U256::from(reserves.reserve0) + U256::from(reserves.reserve1))
    }
}

/// Depth-vs-loan pre-filter
pub struct LiquidityGate {
    reserves: Arc<dyn ReserveSource>,
}

/// Depth multiple required over the loan size
const DEPTH_MULTIPLE: u64 = 2;

impl LiquidityGate {
    pub fn new(reserves: Arc<dyn ReserveSource>) -> Self {
        Self { reserves }
    }

    /// Pure gate rule: pass iff depth >= 2 × loan
    pub fn passes(depth: U256, loan_size: U256) -> Result<(), SkipReason> {
        let required = loan_size.saturating_mul(U256::from(DEPTH_MULTIPLE));
        if depth < required {
            return Err(SkipReason::InsufficientLiquidity { depth, required });
        }
        Ok(())
    }

    /// Read depth for the pair and apply the rule. Lookup errors count as zero depth.
    pub async fn check(
        &self,
        token_a: Address,
        token_b: Address,
        loan_size: U256,
    ) -> Result<U256, SkipReason> {
        let depth = match self.reserves.reserve_depth(token_a, token_b).await {
            Ok(depth) => depth,
            Err(e) => {
                debug!("Reserve lookup failed for {:?}/{:?}: {:#}", token_a, token_b, e);
                U256::ZERO
            }
        };
        Self::passes(depth, loan_size)?;
        Ok(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::test_helpers::MockReserves;
    use crate::types::tokens;

    #[test]
    fn test_scenario_depth_three_times_loan_passes() {
        assert!(LiquidityGate::passes(tokens(30_000), tokens(10_000)).is_ok());
    }

    #[test]
    fn test_boundary_exactly_twice_loan_passes() {
        assert!(LiquidityGate::passes(tokens(20_000), tokens(10_000)).is_ok());
        let err = LiquidityGate::passes(tokens(20_000) - U256::from(1), tokens(10_000)).unwrap_err();
        assert!(matches!(err, SkipReason::InsufficientLiquidity { .. }));
    }

    #[test]
    fn test_zero_depth_always_fails() {
        for loan in [1u64, 10_000, 100_000] {
            assert!(LiquidityGate::passes(U256::ZERO, tokens(loan)).is_err());
        }
    }

    #[test]
    fn test_gate_law_over_grid() {
        let loans = [1u64, 7, 10_000, 50_000];
        let depths = [0u64, 1, 13, 14, 15, 20_000, 99_999, 100_000, 100_001];
        for loan in loans {
            for depth in depths {
                let passed = LiquidityGate::passes(U256::from(depth), U256::from(loan)).is_ok();
                assert_eq!(passed, depth >= 2 * loan, "depth={} loan={}", depth, loan);
            }
        }
    }

    #[tokio::test]
    async fn test_lookup_error_counts_as_no_liquidity() {
        let gate = LiquidityGate::new(Arc::new(MockReserves::failing()));
        let result = gate
            .check(Address::repeat_byte(1), Address::repeat_byte(2), tokens(1))
            .await;
        assert_eq!(
            result,
            Err(SkipReason::InsufficientLiquidity {
                depth: U256::ZERO,
                required: tokens(2)
            })
        );
    }

    #[tokio::test]
    async fn test_check_returns_depth_on_pass() {
        let gate = LiquidityGate::new(Arc::new(MockReserves::fixed(tokens(30_000))));
        let depth = gate
            .check(Address::repeat_byte(1), Address::repeat_byte(2), tokens(10_000))
            .await;
        assert_eq!(depth, Ok(tokens(30_000)));
    }
}
