//! Contract interfaces used by the scanner
//!
//! Each interface is annotated with `#[sol(rpc)]` to generate
//! contract instance types that can make RPC calls via any alloy Provider.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use alloy::sol;

// ── Uniswap V2 style AMM (PancakeSwap V2) ────────────────────────────

sol! {
    #[sol(rpc)]
    interface IUniswapV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }
}

sol! {
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
    }
}

// ── DODO single pool ─────────────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface IDodoPool {
        function querySellQuoteToken(uint256 payAmount) external view returns (uint256 receiveAmount);
    }
}

// ── Flash-loan receiver (custom contract) ────────────────────────────

sol! {
    #[sol(rpc)]
    interface IFlashReceiver {
        function flashSwap(address tokenBorrow, uint256 amount, bytes data) external;
    }
}
