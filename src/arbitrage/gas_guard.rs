//! Fee/Gas Guard
//!
//! Two checks on a profitable-looking round trip, in order:
//! 1. Hard gas-price ceiling (circuit breaker, independent of profit)
//! 2. profit > 2 × (gasPrice × gasLimit) + minProfit
//!
//! The 2× factor covers gas drift between estimation and inclusion.
//! Gas cost (native wei) and profit (18-decimal stable units) are compared
//! directly, as both are 1e18-scaled.
//!
//! Rejections are console-only and never touch the execution cooldown.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use crate::error::SkipReason;
use crate::types::{FeeSnapshot, ProfitEstimate};
use alloy::primitives::U256;
use alloy::providers::Provider;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Current network gas price
#[async_trait]
pub trait FeeSource: Send + Sync {
    async fn gas_price(&self) -> Result<u128>;
}

/// Gas price from an alloy provider (`eth_gasPrice`)
pub struct ProviderFeeSource<P> {
    provider: Arc<P>,
}

impl<P: Provider + 'static> ProviderFeeSource<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + 'static> FeeSource for ProviderFeeSource<P> {
    async fn gas_price(&self) -> Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }
}

/// Guard thresholds (all wei / 18-decimal units)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub gas_limit: u64,
    pub max_gas_price: u128,
    pub default_gas_price: u128,
    pub min_profit: U256,
}

impl GasPolicy {
    /// gasPrice × gasLimit
    pub fn execution_cost(&self, gas_price: u128) -> U256 {
        U256::from(gas_price).saturating_mul(U256::from(self.gas_limit))
    }

    /// 2 × execution cost + profit floor
    pub fn required_profit(&self, gas_price: u128) -> U256 {
        self.execution_cost(gas_price)
            .saturating_mul(U256::from(2))
            .saturating_add(self.min_profit)
    }

    /// Pure decision for a given gas price
    pub fn check(&self, profit: U256, gas_price: u128) -> Result<(), SkipReason> {
        if gas_price > self.max_gas_price {
            return Err(SkipReason::GasPriceTooHigh {
                gas_price,
                ceiling: self.max_gas_price,
            });
        }

        let required = self.required_profit(gas_price);
        if profit <= required {
            return Err(SkipReason::BelowThreshold { profit, required });
        }
        Ok(())
    }
}

/// Fetches fees per evaluation and applies the `GasPolicy`
pub struct FeeGuard {
    fees: Arc<dyn FeeSource>,
    policy: GasPolicy,
}

impl FeeGuard {
    pub fn new(fees: Arc<dyn FeeSource>, policy: GasPolicy) -> Self {
        Self { fees, policy }
    }

    /// Current gas price, or the conservative default when unavailable. Not cached.
    pub async fn snapshot(&self) -> FeeSnapshot {
        match self.fees.gas_price().await {
            Ok(gas_price) if gas_price > 0 => FeeSnapshot {
                gas_price,
                fallback: false,
            },
            Ok(_) => {
                debug!("Fee source returned zero gas price, using default");
                self.fallback_snapshot()
            }
            Err(e) => {
                warn!("Gas price fetch failed ({:#}), using default", e);
                self.fallback_snapshot()
            }
        }
    }

    fn fallback_snapshot(&self) -> FeeSnapshot {
        FeeSnapshot {
            gas_price: self.policy.default_gas_price,
            fallback: true,
        }
    }

    /// Fetch a fresh snapshot and decide. The snapshot is returned for logging.
    pub async fn evaluate(
        &self,
        estimate: &ProfitEstimate,
    ) -> (FeeSnapshot, Result<(), SkipReason>) {
        let fees = self.snapshot().await;
        let decision = self.policy.check(estimate.profit, fees.gas_price);
        (fees, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::test_helpers::MockFees;
    use crate::types::{tokens, GWEI};

    fn policy() -> GasPolicy {
        GasPolicy {
            gas_limit: 600_000,
            max_gas_price: 15 * GWEI,
            default_gas_price: 5 * GWEI,
            min_profit: tokens(25),
        }
    }

    #[test]
    fn test_required_profit_at_five_gwei() {
        // 5 gwei × 600k = 0.003; 2× + 25 = 25.006
        let required = policy().required_profit(5 * GWEI);
        assert_eq!(required, tokens(25) + U256::from(6_000_000_000_000_000u64));
    }

    #[test]
    fn test_profit_below_floor_rejected() {
        let result = policy().check(tokens(25), 5 * GWEI);
        assert!(matches!(result, Err(SkipReason::BelowThreshold { .. })));
    }

    #[test]
    fn test_profit_above_required_accepted() {
        assert!(policy().check(tokens(30), 5 * GWEI).is_ok());
        assert!(policy().check(tokens(26), 15 * GWEI).is_ok());
    }

    #[test]
    fn test_profit_equal_to_required_rejected() {
        let p = policy();
        let required = p.required_profit(5 * GWEI);
        assert!(p.check(required, 5 * GWEI).is_err());
        assert!(p.check(required + U256::from(1), 5 * GWEI).is_ok());
    }

    #[test]
    fn test_gas_ceiling_rejects_any_profit() {
        let p = policy();
        for profit in [tokens(1), tokens(30), tokens(1_000_000), U256::MAX] {
            let result = p.check(profit, 20 * GWEI);
            assert_eq!(
                result,
                Err(SkipReason::GasPriceTooHigh {
                    gas_price: 20 * GWEI,
                    ceiling: 15 * GWEI
                })
            );
        }
        // Exactly at the ceiling is allowed
        assert!(p.check(tokens(30), 15 * GWEI).is_ok());
    }

    #[test]
    fn test_profitability_law_over_grid() {
        let p = policy();
        let gas_prices = [1u128, GWEI, 5 * GWEI, 15 * GWEI];
        let profits = [tokens(1), tokens(25), tokens(26), tokens(100)];
        for gas in gas_prices {
            for profit in profits {
                let expected = profit > U256::from(2 * gas * 600_000) + tokens(25);
                assert_eq!(p.check(profit, gas).is_ok(), expected, "gas={} profit={}", gas, profit);
            }
        }
    }

    #[tokio::test]
    async fn test_fee_failure_uses_default() {
        let guard = FeeGuard::new(Arc::new(MockFees::failing()), policy());
        let snap = guard.snapshot().await;
        assert_eq!(snap.gas_price, 5 * GWEI);
        assert!(snap.fallback);
    }

    #[tokio::test]
    async fn test_evaluate_fetches_fresh_snapshot() {
        let fees = Arc::new(MockFees::fixed(20 * GWEI));
        let guard = FeeGuard::new(fees.clone(), policy());
        let est = ProfitEstimate::new(tokens(10_000), tokens(1), tokens(11_000)).unwrap();

        let (snap, decision) = guard.evaluate(&est).await;
        assert_eq!(snap.gas_price, 20 * GWEI);
        assert!(!snap.fallback);
        assert!(matches!(decision, Err(SkipReason::GasPriceTooHigh { .. })));

        let _ = guard.evaluate(&est).await;
        assert_eq!(fees.calls(), 2);
    }
}
