//! Scan Orchestrator
//!
//! Every scan interval, walks the scan plan (loan sizes × pairs, loan-major)
//! and for each entry runs:
//!   Liquidity Gate → Route Evaluator (Forward, Reverse) → Fee/Gas Guard
//!   → Execution Cooldown → Flash-Swap Executor
//!
//! Plan entries are evaluated with bounded concurrency (`concurrency = 1`
//! is strictly sequential). The `ExecutionGate` is the only shared mutable
//! state and the only serialization point between entries.
//!
//! Every guard rejection and submission failure is absorbed here; nothing
//! below this module can stop the loop.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use super::cooldown::ExecutionGate;
use super::evaluator::RouteEvaluator;
use super::executor::FlashExecutor;
use super::gas_guard::FeeGuard;
use crate::error::SkipReason;
use crate::pool::LiquidityGate;
use crate::types::{format_amount, format_gwei, ArbPair, Direction, ExecutionOutcome, Route};
use alloy::primitives::U256;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// One scan plan entry: a pair at a loan size (both directions evaluated)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTask {
    pub pair_index: usize,
    pub loan_size: U256,
}

/// Result of one route through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Skipped(SkipReason),
    Executed(ExecutionOutcome),
}

/// Per-cycle counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub candidates: usize,
    pub liquidity_skips: usize,
    pub routes_evaluated: usize,
    pub opportunities: usize,
    pub gas_ceiling_rejections: usize,
    pub threshold_rejections: usize,
    pub cooldown_rejections: usize,
    pub submitted: usize,
    pub simulated: usize,
    pub failed: usize,
}

impl CycleReport {
    fn record_route(&mut self, outcome: &RouteOutcome) {
        self.routes_evaluated += 1;
        match outcome {
            RouteOutcome::Skipped(SkipReason::NoOpportunity) => {}
            RouteOutcome::Skipped(SkipReason::InsufficientLiquidity { .. }) => {
                self.liquidity_skips += 1
            }
            RouteOutcome::Skipped(SkipReason::GasPriceTooHigh { .. }) => {
                self.opportunities += 1;
                self.gas_ceiling_rejections += 1;
            }
            RouteOutcome::Skipped(SkipReason::BelowThreshold { .. }) => {
                self.opportunities += 1;
                self.threshold_rejections += 1;
            }
            RouteOutcome::Skipped(SkipReason::Cooldown { .. }) => {
                self.opportunities += 1;
                self.cooldown_rejections += 1;
            }
            RouteOutcome::Executed(exec) => {
                self.opportunities += 1;
                match exec {
                    ExecutionOutcome::Submitted { .. } => self.submitted += 1,
                    ExecutionOutcome::Simulated => self.simulated += 1,
                    ExecutionOutcome::Failed { .. } => self.failed += 1,
                }
            }
        }
    }

    fn merge(mut self, other: CycleReport) -> Self {
        self.candidates += other.candidates;
        self.liquidity_skips += other.liquidity_skips;
        self.routes_evaluated += other.routes_evaluated;
        self.opportunities += other.opportunities;
        self.gas_ceiling_rejections += other.gas_ceiling_rejections;
        self.threshold_rejections += other.threshold_rejections;
        self.cooldown_rejections += other.cooldown_rejections;
        self.submitted += other.submitted;
        self.simulated += other.simulated;
        self.failed += other.failed;
        self
    }

    /// Executions attempted (live or dry run)
    pub fn executions(&self) -> usize {
        self.submitted + self.simulated + self.failed
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} candidates | {} illiquid | {} routes | {} opps | rejected: {} gas, {} threshold, {} cooldown | exec: {} sent, {} dry, {} failed",
            self.candidates,
            self.liquidity_skips,
            self.routes_evaluated,
            self.opportunities,
            self.gas_ceiling_rejections,
            self.threshold_rejections,
            self.cooldown_rejections,
            self.submitted,
            self.simulated,
            self.failed
        )
    }
}

/// Round-trip scanner
pub struct Scanner {
    pairs: Vec<ArbPair>,
    loan_sizes: Vec<U256>,
    concurrency: usize,
    liquidity: LiquidityGate,
    evaluator: RouteEvaluator,
    fee_guard: FeeGuard,
    gate: Arc<ExecutionGate>,
    executor: FlashExecutor,
}

impl Scanner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pairs: Vec<ArbPair>,
        loan_sizes: Vec<U256>,
        concurrency: usize,
        liquidity: LiquidityGate,
        evaluator: RouteEvaluator,
        fee_guard: FeeGuard,
        gate: Arc<ExecutionGate>,
        executor: FlashExecutor,
    ) -> Self {
        Self {
            pairs,
            loan_sizes,
            concurrency: concurrency.max(1),
            liquidity,
            evaluator,
            fee_guard,
            gate,
            executor,
        }
    }

    /// Loan sizes × pairs, loan-major
    pub fn scan_plan(&self) -> Vec<ScanTask> {
        self.loan_sizes
            .iter()
            .flat_map(|loan| {
                (0..self.pairs.len()).map(move |pair_index| ScanTask {
                    pair_index,
                    loan_size: *loan,
                })
            })
            .collect()
    }

    /// Run one full pass over the scan plan
    pub async fn run_cycle(&self) -> CycleReport {
        let plan = self.scan_plan();
        stream::iter(plan)
            .map(|task| self.check_candidate(task))
            .buffer_unordered(self.concurrency)
            .fold(CycleReport::default(), |acc, report| async move {
                acc.merge(report)
            })
            .await
    }

    /// Liquidity gate, then both directions for one pair at one loan size
    async fn check_candidate(&self, task: ScanTask) -> CycleReport {
        let mut report = CycleReport {
            candidates: 1,
            ..Default::default()
        };
        let Some(pair) = self.pairs.get(task.pair_index) else {
            return report;
        };

        if let Err(reason) = self
            .liquidity
            .check(pair.token_a, pair.token_b, task.loan_size)
            .await
        {
            info!("❌ [{}] Skipped - not enough liquidity", pair.name);
            debug!("[{}] {}", pair.name, reason);
            report.liquidity_skips += 1;
            return report;
        }

        for direction in Direction::ALL {
            let route = Route::new(pair, task.loan_size, direction);
            let outcome = self.process_route(&route).await;
            report.record_route(&outcome);
        }

        report
    }

    /// Evaluate one route and, if every guard passes, execute it
    pub async fn process_route(&self, route: &Route<'_>) -> RouteOutcome {
        let Some(estimate) = self.evaluator.evaluate(route).await else {
            return RouteOutcome::Skipped(SkipReason::NoOpportunity);
        };

        let (fees, decision) = self.fee_guard.evaluate(&estimate).await;
        if let Err(reason) = decision {
            match &reason {
                SkipReason::GasPriceTooHigh { gas_price, .. } => {
                    info!("⏸ [{}] Gas too high: {} gwei", route.pair.name, format_gwei(*gas_price))
                }
                _ => debug!(
                    "[{}] profit {} below required ({})",
                    route, format_amount(estimate.profit), reason
                ),
            }
            return RouteOutcome::Skipped(reason);
        }

        if let Err(reason) = self.gate.try_claim() {
            info!("⏸ Skipping trade due to cooldown ({})", route);
            return RouteOutcome::Skipped(reason);
        }

        RouteOutcome::Executed(self.executor.execute(route, &estimate, &fees).await)
    }

    /// Scan every `interval` until `shutdown` resolves. Cycles never overlap;
    /// a shutdown request lets the running cycle finish.
    pub async fn run<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut cycle: u64 = 0;
        let mut total_executions: usize = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested after {} cycles", cycle);
                    break;
                }
                _ = ticker.tick() => {
                    cycle += 1;
                    let started = Instant::now();
                    let report = self.run_cycle().await;
                    total_executions += report.executions();

                    let elapsed = started.elapsed();
                    info!("Cycle {} ({}ms): {} | {} executions total", cycle, elapsed.as_millis(), report, total_executions);
                    if elapsed > interval {
                        warn!("Cycle {} took {}ms, longer than scan interval {}ms", cycle, elapsed.as_millis(), interval.as_millis());
                    }
                }
            }
        }
    }
}
