// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Swap detection
//!
//! A transaction is a swap when its calldata selector is a known router swap
//! method or when it calls a known DEX contract. The legs are then read off
//! the decoded transfers.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};

use crate::config::constants::known_dex;
use crate::types::network::Network;
use crate::types::raw::RawTransaction;
use crate::types::transaction::{SwapInfo, SwapLeg, TokenTransfer};

sol! {
    /// Uniswap V2 style router
    interface IUniswapV2Router02 {
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapTokensForExactTokens(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapTokensForExactETH(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        function swapETHForExactTokens(uint256 amountOut, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapExactTokensForTokensSupportingFeeOnTransferTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external;
        function swapExactETHForTokensSupportingFeeOnTransferTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable;
        function swapExactTokensForETHSupportingFeeOnTransferTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external;
    }

    /// Uniswap V3 style router
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        struct ExactOutputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactOutputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountOut;
            uint256 amountInMaximum;
        }

        function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function exactOutputSingle(ExactOutputSingleParams calldata params) external payable returns (uint256 amountIn);
        function exactOutput(ExactOutputParams calldata params) external payable returns (uint256 amountIn);
    }
}

use ISwapRouter::{exactInputCall, exactInputSingleCall, exactOutputCall, exactOutputSingleCall};
use IUniswapV2Router02::{
    swapETHForExactTokensCall, swapExactETHForTokensCall,
    swapExactETHForTokensSupportingFeeOnTransferTokensCall, swapExactTokensForETHCall,
    swapExactTokensForETHSupportingFeeOnTransferTokensCall, swapExactTokensForTokensCall,
    swapExactTokensForTokensSupportingFeeOnTransferTokensCall, swapTokensForExactETHCall,
    swapTokensForExactTokensCall,
};

/// Known swap methods: `(selector, method name)`
pub const SWAP_METHODS: &[([u8; 4], &str)] = &[
    (swapExactTokensForTokensCall::SELECTOR, "swapExactTokensForTokens"),
    (swapTokensForExactTokensCall::SELECTOR, "swapTokensForExactTokens"),
    (swapExactETHForTokensCall::SELECTOR, "swapExactETHForTokens"),
    (swapTokensForExactETHCall::SELECTOR, "swapTokensForExactETH"),
    (swapExactTokensForETHCall::SELECTOR, "swapExactTokensForETH"),
    (swapETHForExactTokensCall::SELECTOR, "swapETHForExactTokens"),
    (
        swapExactTokensForTokensSupportingFeeOnTransferTokensCall::SELECTOR,
        "swapExactTokensForTokensSupportingFeeOnTransferTokens",
    ),
    (
        swapExactETHForTokensSupportingFeeOnTransferTokensCall::SELECTOR,
        "swapExactETHForTokensSupportingFeeOnTransferTokens",
    ),
    (
        swapExactTokensForETHSupportingFeeOnTransferTokensCall::SELECTOR,
        "swapExactTokensForETHSupportingFeeOnTransferTokens",
    ),
    (exactInputSingleCall::SELECTOR, "exactInputSingle"),
    (exactInputCall::SELECTOR, "exactInput"),
    (exactOutputSingleCall::SELECTOR, "exactOutputSingle"),
    (exactOutputCall::SELECTOR, "exactOutput"),
];

/// Name of the swap method a calldata selector belongs to
pub fn swap_method(input: &[u8]) -> Option<&'static str> {
    let selector: [u8; 4] = input.get(..4)?.try_into().ok()?;
    SWAP_METHODS
        .iter()
        .find(|(known, _)| *known == selector)
        .map(|(_, name)| *name)
}

/// Detect a swap and extract its legs
///
/// Returns `None` unless the selector or the destination is recognized.
pub fn detect_swap(
    network: Network,
    tx: &RawTransaction,
    transfers: &[TokenTransfer],
) -> Option<SwapInfo> {
    let method = swap_method(&tx.input);
    let dex = tx.to.and_then(|to| known_dex(network, to));
    if method.is_none() && dex.is_none() {
        return None;
    }

    // Input flows into the contract; for the sender it is what leaves the account
    let (input, output) = match tx.to {
        Some(contract) if touches(transfers, contract) => (
            first_into(transfers, contract),
            first_out_of(transfers, contract),
        ),
        _ => (first_out_of(transfers, tx.from), first_into(transfers, tx.from)),
    };

    Some(SwapInfo {
        detected: true,
        method: method.map(str::to_string),
        contract_name: dex.map(|d| d.name.to_string()),
        input: input.map(SwapLeg::from),
        output: output.map(SwapLeg::from),
    })
}

fn touches(transfers: &[TokenTransfer], party: Address) -> bool {
    transfers.iter().any(|t| t.from == party || t.to == party)
}

fn first_into(transfers: &[TokenTransfer], party: Address) -> Option<&TokenTransfer> {
    transfers.iter().find(|t| t.to == party)
}

fn first_out_of(transfers: &[TokenTransfer], party: Address) -> Option<&TokenTransfer> {
    transfers.iter().find(|t| t.from == party)
}
