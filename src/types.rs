// Core data structures for the flash-loan scanner

use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use std::fmt;

/// Token decimals assumed for every loan/profit amount (18-decimal fixed point)
pub const AMOUNT_DECIMALS: u8 = 18;

/// One gwei in wei
pub const GWEI: u128 = 1_000_000_000;

/// Token pair scanned across both venues.
///
/// `token_a` is the token borrowed on the forward direction, `token_b` the
/// one borrowed on the reverse direction. `direct_pool` is the single-pool
/// venue quoting this pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArbPair {
    pub name: String,
    pub token_a: Address,
    pub token_b: Address,
    pub direct_pool: Address,
}

impl ArbPair {
    pub fn new(name: &str, token_a: Address, token_b: Address, direct_pool: Address) -> Self {
        Self {
            name: name.to_string(),
            token_a,
            token_b,
            direct_pool,
        }
    }
}

/// Venues the scanner quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// AMM router (PancakeSwap V2 on BSC)
    Router,
    /// Single-pool market maker (DODO)
    DirectPool,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Venue::Router => write!(f, "Pancake"),
            Venue::DirectPool => write!(f, "DODO"),
        }
    }
}

/// Trade direction: which venue is hit first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Borrow token_a, router first, direct pool second
    Forward,
    /// Borrow token_b, direct pool first, router second
    Reverse,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    /// (first leg venue, second leg venue)
    pub fn venues(&self) -> (Venue, Venue) {
        match self {
            Direction::Forward => (Venue::Router, Venue::DirectPool),
            Direction::Reverse => (Venue::DirectPool, Venue::Router),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (first, second) = self.venues();
        write!(f, "{}→{}", first, second)
    }
}

/// Output of a venue quote.
///
/// A venue answering exactly zero is `Unavailable`: zero is never a real price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Value(U256),
    Unavailable,
}

impl Quote {
    /// Wrap a raw on-chain amount, mapping zero to `Unavailable`
    pub fn from_amount(amount: U256) -> Self {
        if amount.is_zero() {
            Quote::Unavailable
        } else {
            Quote::Value(amount)
        }
    }

    pub fn value(&self) -> Option<U256> {
        match self {
            Quote::Value(v) => Some(*v),
            Quote::Unavailable => None,
        }
    }

    /// Amount to feed into the next leg (zero when unavailable)
    pub fn amount_or_zero(&self) -> U256 {
        self.value().unwrap_or(U256::ZERO)
    }
}

/// One swap request sent to a venue.
///
/// The router reads `path`, the direct-pool venue reads `pool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapLeg {
    pub path: Vec<Address>,
    pub pool: Address,
}

impl SwapLeg {
    pub fn new(token_in: Address, token_out: Address, pool: Address) -> Self {
        Self {
            path: vec![token_in, token_out],
            pool,
        }
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// A (pair, loan size, direction) triple, built and dropped within one scan
#[derive(Debug, Clone)]
pub struct Route<'a> {
    pub pair: &'a ArbPair,
    pub loan_size: U256,
    pub direction: Direction,
}

impl<'a> Route<'a> {
    pub fn new(pair: &'a ArbPair, loan_size: U256, direction: Direction) -> Self {
        Self {
            pair,
            loan_size,
            direction,
        }
    }

    /// Token borrowed from the flash-loan provider and repaid at the end
    pub fn token_in(&self) -> Address {
        match self.direction {
            Direction::Forward => self.pair.token_a,
            Direction::Reverse => self.pair.token_b,
        }
    }

    /// The other side of the pair
    pub fn token_out(&self) -> Address {
        match self.direction {
            Direction::Forward => self.pair.token_b,
            Direction::Reverse => self.pair.token_a,
        }
    }

    /// Leg handed to both venues. The router always sells token_in for
    /// token_out (first leg forward, second leg reverse); the direct pool
    /// is quoted by address only.
    pub fn leg(&self) -> SwapLeg {
        SwapLeg::new(self.token_in(), self.token_out(), self.pair.direct_pool)
    }
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}",
            self.direction,
            self.pair.name,
            format_amount(self.loan_size)
        )
    }
}

/// Profit of a round trip whose final output exceeds the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitEstimate {
    pub loan_size: U256,
    pub intermediate: U256,
    pub final_output: U256,
    pub profit: U256,
}

impl ProfitEstimate {
    /// Returns None unless `final_output > loan_size`
    pub fn new(loan_size: U256, intermediate: U256, final_output: U256) -> Option<Self> {
        if final_output <= loan_size {
            return None;
        }
        Some(Self {
            loan_size,
            intermediate,
            final_output,
            profit: final_output - loan_size,
        })
    }
}

/// Gas price observed for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSnapshot {
    pub gas_price: u128,
    /// True when the fee source failed and the configured default was used
    pub fallback: bool,
}

impl FeeSnapshot {
    pub fn gwei(&self) -> String {
        format_gwei(self.gas_price)
    }
}

/// Outcome of one execution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Transaction handed to the relay
    Submitted { tx_hash: String },
    /// Dry run: decision made, nothing sent
    Simulated,
    /// Submission failed (no retry)
    Failed { reason: String },
}

/// 18-decimal amount as a human-readable string ("10030.0")
pub fn format_amount(amount: U256) -> String {
    format_units(amount, AMOUNT_DECIMALS)
        .map(|s| trim_fraction(&s))
        .unwrap_or_else(|_| amount.to_string())
}

/// Wei gas price as gwei ("5.0")
pub fn format_gwei(wei: u128) -> String {
    format_units(U256::from(wei), 9u8)
        .map(|s| trim_fraction(&s))
        .unwrap_or_else(|_| wei.to_string())
}

/// Drop trailing fractional zeros, keeping at least one digit after the point
fn trim_fraction(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Whole-token count to 18-decimal fixed point
pub fn tokens(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(AMOUNT_DECIMALS))
}
