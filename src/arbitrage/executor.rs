//! Flash-Swap Executor
//!
//! Encodes a chosen route into the receiver's calldata and submits one
//! `flashSwap(tokenBorrow, amount, data)` transaction via the private relay.
//!
//! Calldata (ABI parameter encoding, decode order fixed by the receiver):
//!   address[] forward path   [token_in, token_out]
//!   address[] return path    [token_out, token_in]
//!   address[] reserved       []
//!   address[] routers        [primary router]
//!
//! Fire-and-forget: no receipt wait, no retry. The trade log gets the
//! opportunity line, then either the tx hash or the failure reason. Dry-run mode (the default)
//! logs the decision and sends nothing.
//!
//! Author: AI-Generated
//! Created: 2026-10-19
//! Modified: 2026-10-21 - Record submission failure reason in the trade log

use crate::contracts::IFlashReceiver;
use crate::error::SubmitError;
use crate::trade_log::TradeLog;
use crate::types::{format_amount, ExecutionOutcome, FeeSnapshot, ProfitEstimate, Route};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::sol_types::SolValue;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Signs and submits the flash-swap transaction
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn flash_swap(
        &self,
        token_borrow: Address,
        amount: U256,
        data: Bytes,
        gas_limit: u64,
    ) -> Result<TxHash, SubmitError>;
}

/// Submits through an alloy provider carrying the signing wallet
pub struct RelaySubmitter<P> {
    provider: Arc<P>,
    receiver: Address,
}

impl<P: Provider + 'static> RelaySubmitter<P> {
    pub fn new(provider: Arc<P>, receiver: Address) -> Self {
        Self { provider, receiver }
    }
}

#[async_trait]
impl<P: Provider + 'static> TxSubmitter for RelaySubmitter<P> {
    async fn flash_swap(
        &self,
        token_borrow: Address,
        amount: U256,
        data: Bytes,
        gas_limit: u64,
    ) -> Result<TxHash, SubmitError> {
        let receiver = IFlashReceiver::new(self.receiver, self.provider.clone());
        let pending = receiver
            .flashSwap(token_borrow, amount, data)
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| match e {
                alloy::contract::Error::TransportError(t) => SubmitError::Transport(t.to_string()),
                other => SubmitError::Rejected(other.to_string()),
            })?;

        Ok(*pending.tx_hash())
    }
}

/// Encode the four `address[]` lists the receiver decodes
pub fn encode_route(token_in: Address, token_out: Address, router: Address) -> Bytes {
    let forward = vec![token_in, token_out];
    let back = vec![token_out, token_in];
    let reserved: Vec<Address> = Vec::new();
    let routers = vec![router];
    Bytes::from((forward, back, reserved, routers).abi_encode_params())
}

/// Turns accepted routes into flash-swap submissions
pub struct FlashExecutor {
    submitter: Arc<dyn TxSubmitter>,
    trade_log: Arc<dyn TradeLog>,
    router: Address,
    gas_limit: u64,
    /// Dry run mode - decide and log without sending
    dry_run: bool,
}

impl FlashExecutor {
    pub fn new(
        submitter: Arc<dyn TxSubmitter>,
        trade_log: Arc<dyn TradeLog>,
        router: Address,
        gas_limit: u64,
    ) -> Self {
        Self {
            submitter,
            trade_log,
            router,
            gas_limit,
            dry_run: true, // Default to dry run for safety
        }
    }

    /// Enable or disable dry run mode
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
        if dry_run {
            info!("Executor: DRY RUN mode (no transactions sent)");
        } else {
            warn!("Executor: LIVE mode - flash swaps will be submitted");
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Trade log line for an accepted opportunity
    pub fn opportunity_line(
        route: &Route<'_>,
        estimate: &ProfitEstimate,
        fees: &FeeSnapshot,
        dry_run: bool,
    ) -> String {
        format!(
            "✅ {}{} {} | Loan: {} | Profit: {} | GasPrice: {} gwei",
            if dry_run { "DRY RUN " } else { "" },
            route.direction,
            route.pair.name,
            format_amount(route.loan_size),
            format_amount(estimate.profit),
            fees.gwei(),
        )
    }

    /// Record and submit. The caller has already claimed the execution cooldown.
    pub async fn execute(
        &self,
        route: &Route<'_>,
        estimate: &ProfitEstimate,
        fees: &FeeSnapshot,
    ) -> ExecutionOutcome {
        self.trade_log
            .record(&Self::opportunity_line(route, estimate, fees, self.dry_run));

        if self.dry_run {
            return ExecutionOutcome::Simulated;
        }

        let data = encode_route(route.token_in(), route.token_out(), self.router);
        match self
            .submitter
            .flash_swap(route.token_in(), route.loan_size, data, self.gas_limit)
            .await
        {
            Ok(tx_hash) => {
                info!("🚀 Sent tx: {:?}", tx_hash);
                self.trade_log.record(&format!("Tx Hash: {:?}", tx_hash));
                ExecutionOutcome::Submitted {
                    tx_hash: format!("{:?}", tx_hash),
                }
            }
            Err(e) => {
                error!("❌ Tx failed: {} ({})", e, route);
                self.trade_log.record(&format!("❌ Tx failed: {}", e));
                ExecutionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::test_helpers::{test_pair, MemoryTradeLog, MockSubmitter};
    use crate::types::{tokens, Direction, GWEI};

    fn fees() -> FeeSnapshot {
        FeeSnapshot {
            gas_price: 5 * GWEI,
            fallback: false,
        }
    }

    fn executor(submitter: Arc<MockSubmitter>, log: Arc<MemoryTradeLog>, dry_run: bool) -> FlashExecutor {
        let mut ex = FlashExecutor::new(submitter, log, Address::repeat_byte(0xAA), 600_000);
        ex.set_dry_run(dry_run);
        ex
    }

    #[test]
    fn test_encode_route_decode_order() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let router = Address::repeat_byte(3);

        let data = encode_route(a, b, router);
        let (forward, back, reserved, routers) =
            <(Vec<Address>, Vec<Address>, Vec<Address>, Vec<Address>)>::abi_decode_params(&data)
                .unwrap();

        assert_eq!(forward, vec![a, b]);
        assert_eq!(back, vec![b, a]);
        assert!(reserved.is_empty());
        assert_eq!(routers, vec![router]);
    }

    #[test]
    fn test_encoding_is_parameter_list_not_wrapped_tuple() {
        let data = encode_route(Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3));
        // Four head words (offsets) precede the first array: 4 × 32 = 0x80
        assert_eq!(U256::from_be_slice(&data[..32]), U256::from(0x80));
    }

    #[tokio::test]
    async fn test_live_submission_records_hash() {
        let pair = test_pair();
        let submitter = Arc::new(MockSubmitter::succeeding());
        let log = Arc::new(MemoryTradeLog::default());
        let ex = executor(submitter.clone(), log.clone(), false);

        let route = Route::new(&pair, tokens(10_000), Direction::Reverse);
        let est = ProfitEstimate::new(tokens(10_000), tokens(1), tokens(10_040)).unwrap();
        let outcome = ex.execute(&route, &est, &fees()).await;

        assert!(matches!(outcome, ExecutionOutcome::Submitted { .. }));
        let calls = submitter.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token, pair.token_b);
        assert_eq!(calls[0].amount, tokens(10_000));
        assert_eq!(calls[0].gas_limit, 600_000);
        assert_eq!(calls[0].data, encode_route(pair.token_b, pair.token_a, Address::repeat_byte(0xAA)));

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "✅ DODO→Pancake VAI/USDT | Loan: 10000.0 | Profit: 40.0 | GasPrice: 5.0 gwei"
        );
        assert!(lines[1].starts_with("Tx Hash: 0x"));
    }

    #[tokio::test]
    async fn test_failed_submission_not_retried() {
        let pair = test_pair();
        let submitter = Arc::new(MockSubmitter::failing("insufficient funds"));
        let log = Arc::new(MemoryTradeLog::default());
        let ex = executor(submitter.clone(), log.clone(), false);

        let route = Route::new(&pair, tokens(10_000), Direction::Forward);
        let est = ProfitEstimate::new(tokens(10_000), tokens(1), tokens(10_040)).unwrap();
        let outcome = ex.execute(&route, &est, &fees()).await;

        match outcome {
            ExecutionOutcome::Failed { reason } => assert!(reason.contains("insufficient funds")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(submitter.calls().len(), 1);
        // Opportunity line, then the failure reason instead of a tx hash
        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("❌ Tx failed:"));
        assert!(lines[1].contains("insufficient funds"));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let pair = test_pair();
        let submitter = Arc::new(MockSubmitter::succeeding());
        let log = Arc::new(MemoryTradeLog::default());
        let ex = executor(submitter.clone(), log.clone(), true);

        let route = Route::new(&pair, tokens(50_000), Direction::Forward);
        let est = ProfitEstimate::new(tokens(50_000), tokens(1), tokens(50_100)).unwrap();
        let outcome = ex.execute(&route, &est, &fees()).await;

        assert_eq!(outcome, ExecutionOutcome::Simulated);
        assert!(submitter.calls().is_empty());
        assert!(log.lines()[0].starts_with("✅ DRY RUN Pancake→DODO"));
    }
}
