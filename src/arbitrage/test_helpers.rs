//! In-memory doubles for the scanner's external collaborators.

use super::executor::TxSubmitter;
use super::gas_guard::FeeSource;
use super::quoter::QuoteSource;
use crate::error::SubmitError;
use crate::pool::ReserveSource;
use crate::trade_log::TradeLog;
use crate::types::{ArbPair, Quote, SwapLeg, Venue};
use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn test_pair() -> ArbPair {
    ArbPair::new(
        "VAI/USDT",
        address!("55d398326f99059fF775485246999027B3197955"),
        address!("4BD17003473389A42DAF6a0a729f6Fdb328BbBd7"),
        address!("9e0B3fF9b65E962fCb632c96AcaCf0F44C7266a5"),
    )
}

pub fn second_pair() -> ArbPair {
    ArbPair::new(
        "HAY/BUSD",
        address!("e9e7cea3dedca5984780bafc599bd69add087d56"),
        address!("0782B6d8c4551b9760e74c0545A9bCD90bdc41E5"),
        address!("D1ba9BAC957322D6e8c07a160a3A8dA11A0d2867"),
    )
}

/// Scripted quotes: (input amount) → output. Unknown inputs are unavailable.
pub struct MockQuoter {
    venue: Venue,
    table: HashMap<U256, U256>,
    seen: Mutex<Vec<(SwapLeg, U256)>>,
}

impl MockQuoter {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            table: HashMap::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, amount_in: U256, amount_out: U256) -> Self {
        self.table.insert(amount_in, amount_out);
        self
    }

    pub fn inputs(&self) -> Vec<U256> {
        self.seen.lock().unwrap().iter().map(|(_, a)| *a).collect()
    }

    pub fn legs(&self) -> Vec<SwapLeg> {
        self.seen.lock().unwrap().iter().map(|(l, _)| l.clone()).collect()
    }
}

#[async_trait]
impl QuoteSource for MockQuoter {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn quote(&self, leg: &SwapLeg, amount_in: U256) -> Quote {
        self.seen.lock().unwrap().push((leg.clone(), amount_in));
        self.table
            .get(&amount_in)
            .map(|out| Quote::from_amount(*out))
            .unwrap_or(Quote::Unavailable)
    }
}

/// Fixed reserve depth, or a failing lookup
pub struct MockReserves {
    depth: Option<U256>,
}

impl MockReserves {
    pub fn fixed(depth: U256) -> Self {
        Self { depth: Some(depth) }
    }

    pub fn failing() -> Self {
        Self { depth: None }
    }
}

#[async_trait]
impl ReserveSource for MockReserves {
    async fn reserve_depth(&self, _token_a: Address, _token_b: Address) -> Result<U256> {
        self.depth.ok_or_else(|| anyhow!("pair lookup reverted"))
    }
}

/// Fixed gas price, or a failing fee source. Counts fetches.
pub struct MockFees {
    gas_price: Option<u128>,
    calls: AtomicUsize,
}

impl MockFees {
    pub fn fixed(gas_price: u128) -> Self {
        Self {
            gas_price: Some(gas_price),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            gas_price: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeeSource for MockFees {
    async fn gas_price(&self) -> Result<u128> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gas_price.ok_or_else(|| anyhow!("eth_gasPrice unavailable"))
    }
}

/// Recorded flash-swap request
#[derive(Debug, Clone)]
pub struct SubmitCall {
    pub token: Address,
    pub amount: U256,
    pub data: Bytes,
    pub gas_limit: u64,
}

/// Records submissions; succeeds with a fixed hash or fails with a reason
pub struct MockSubmitter {
    failure: Option<String>,
    calls: Mutex<Vec<SubmitCall>>,
}

impl MockSubmitter {
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SubmitCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TxSubmitter for MockSubmitter {
    async fn flash_swap(
        &self,
        token_borrow: Address,
        amount: U256,
        data: Bytes,
        gas_limit: u64,
    ) -> Result<TxHash, SubmitError> {
        self.calls.lock().unwrap().push(SubmitCall {
            token: token_borrow,
            amount,
            data,
            gas_limit,
        });
        match &self.failure {
            Some(reason) => Err(SubmitError::Rejected(reason.clone())),
            None => Ok(TxHash::repeat_byte(0xAB)),
        }
    }
}

/// Collects trade log messages (without timestamps)
#[derive(Default)]
pub struct MemoryTradeLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryTradeLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl TradeLog for MemoryTradeLog {
    fn record(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
