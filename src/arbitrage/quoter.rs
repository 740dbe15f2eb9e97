//! Venue Quote Sources
//!
//! Two venues quote every leg of a round trip:
//! - `RouterQuoter`: AMM router `getAmountsOut` over a token path (last hop output)
//! - `DirectPoolQuoter`: single-pool `querySellQuoteToken(amountIn)`
//!
//! Both swallow every failure (revert, transport, empty response) into
//! `Quote::Unavailable`. A dead or paused pool must never halt the scan.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use crate::contracts::{IDodoPool, IUniswapV2Router02};
use crate::types::{Quote, SwapLeg, Venue};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Price quote from one liquidity venue
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn venue(&self) -> Venue;

    /// Output amount for selling `amount_in` along `leg`. Never errors.
    async fn quote(&self, leg: &SwapLeg, amount_in: U256) -> Quote;
}

/// AMM router quote (PancakeSwap V2 `getAmountsOut`)
pub struct RouterQuoter<P> {
    provider: Arc<P>,
    router: Address,
}

impl<P: Provider + 'static> RouterQuoter<P> {
    pub fn new(provider: Arc<P>, router: Address) -> Self {
        Self { provider, router }
    }
}

#[async_trait]
impl<P: Provider + 'static> QuoteSource for RouterQuoter<P> {
    fn venue(&self) -> Venue {
        Venue::Router
    }

    async fn quote(&self, leg: &SwapLeg, amount_in: U256) -> Quote {
        if amount_in.is_zero() || leg.path.len() < 2 {
            return Quote::Unavailable;
        }

        let router = IUniswapV2Router02::new(self.router, self.provider.clone());
        match router.getAmountsOut(amount_in, leg.path.clone()).call().await {
            Ok(amounts) => match amounts.last() {
                Some(out) => Quote::from_amount(*out),
                None => {
                    debug!("Router returned empty amounts for path {:?}", leg.path);
                    Quote::Unavailable
                }
            },
            Err(e) => {
                debug!("Router quote failed for path {:?}: {}", leg.path, e);
                Quote::Unavailable
            }
        }
    }
}

/// Direct single-pool quote (DODO `querySellQuoteToken`)
pub struct DirectPoolQuoter<P> {
    provider: Arc<P>,
}

impl<P: Provider + 'static> DirectPoolQuoter<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + 'static> QuoteSource for DirectPoolQuoter<P> {
    fn venue(&self) -> Venue {
        Venue::DirectPool
    }

    async fn quote(&self, leg: &SwapLeg, amount_in: U256) -> Quote {
        if amount_in.is_zero() || leg.pool == Address::ZERO {
            return Quote::Unavailable;
        }

        let pool = IDodoPool::new(leg.pool, self.provider.clone());
        match pool.querySellQuoteToken(amount_in).call().await {
            Ok(received) => Quote::from_amount(received),
            Err(e) => {
                debug!("Direct pool quote failed at {:?}: {}", leg.pool, e);
                Quote::Unavailable
            }
        }
    }
}
