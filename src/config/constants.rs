// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known addresses and constants
//!
//! This module centralizes default endpoints, cache lifetimes and the static
//! token and DEX tables consulted by the normalizer.

use std::time::Duration;

use alloy_primitives::{address, Address};

use crate::types::network::Network;

/// Public EVM JSON-RPC endpoint of mainnet
pub const MAINNET_RPC_URL: &str = "https://zetachain-evm.blockpi.network/v1/rpc/public";
/// Public EVM JSON-RPC endpoint of testnet
pub const TESTNET_RPC_URL: &str = "https://zetachain-athens-evm.blockpi.network/v1/rpc/public";
/// REST base of the cross-chain registry on mainnet
pub const MAINNET_REGISTRY_URL: &str = "https://zetachain.blockpi.network/lcd/v1/public";
/// REST base of the cross-chain registry on testnet
pub const TESTNET_REGISTRY_URL: &str = "https://zetachain-athens.blockpi.network/lcd/v1/public";

/// Lifetime of a cached search result
pub const SEARCH_RESULT_TTL: Duration = Duration::from_secs(30);
/// Lifetime of cached on-chain token metadata
pub const TOKEN_METADATA_TTL: Duration = Duration::from_secs(5 * 60);
/// Lifetime of a cached health check
pub const HEALTH_TTL: Duration = Duration::from_secs(10);

/// Deadline for a single external call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;
pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 50;
/// Blocks scanned backwards from the head for an address search
pub const DEFAULT_ADDRESS_SCAN_BLOCKS: u64 = 100;
/// Transactions returned by an address search
pub const DEFAULT_ADDRESS_RESULT_LIMIT: usize = 25;

/// A token whose metadata never needs an on-chain lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownToken {
    pub address: Address,
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
}

/// A DEX router whose calls are treated as swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownDex {
    pub address: Address,
    pub name: &'static str,
}

/// Wrapped ZETA, deployed at the same address on both networks
pub const WZETA: Address = address!("5f0b1a82749cb4e2278ec87f8bf6b618dc71a8bf");

/// Uniswap V2 router, deployed at the same address on both networks
pub const UNISWAP_V2_ROUTER: Address = address!("2ca7d64a7efe2d62a725e2b35cf7230d6677ffee");

const MAINNET_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: WZETA,
        symbol: "WZETA",
        name: "Wrapped ZETA",
        decimals: 18,
    },
    KnownToken {
        address: address!("d97b1de3619ed2c6beb3860147e30ca8a7dc9891"),
        symbol: "ETH.ETH",
        name: "ZetaChain ZRC20 ETH on ETH",
        decimals: 18,
    },
    KnownToken {
        address: address!("0cbe0df132a6c6b4a2974fa1b7fb953cf0cc798a"),
        symbol: "USDC.ETH",
        name: "ZetaChain ZRC20 USDC on ETH",
        decimals: 6,
    },
    KnownToken {
        address: address!("7c8dda80bbbe1254a7aacf3219ebe1481c6e01d7"),
        symbol: "USDT.ETH",
        name: "ZetaChain ZRC20 USDT on ETH",
        decimals: 6,
    },
    KnownToken {
        address: address!("13a0c5930c028511dc02665e7285134b6d11a5f4"),
        symbol: "BTC.BTC",
        name: "ZetaChain ZRC20 BTC on BTC",
        decimals: 8,
    },
    KnownToken {
        address: address!("48f80608b672dc30dc7e3dbbd0343c5f02c738eb"),
        symbol: "BNB.BSC",
        name: "ZetaChain ZRC20 BNB on BSC",
        decimals: 18,
    },
];

const TESTNET_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: WZETA,
        symbol: "WZETA",
        name: "Wrapped ZETA",
        decimals: 18,
    },
    KnownToken {
        address: address!("05ba149a7bd6dc1f937fa9046a9e05c05f3b18b0"),
        symbol: "ETH.ETHSEP",
        name: "ZetaChain ZRC20 Sepolia ETH",
        decimals: 18,
    },
    KnownToken {
        address: address!("cc683a782f4b30c138787cb5576a86af66fdc31d"),
        symbol: "USDC.SEPOLIA",
        name: "ZetaChain ZRC20 USDC on Sepolia",
        decimals: 6,
    },
    KnownToken {
        address: address!("dbff6471a79e5374d771922f2194eccc42210b9f"),
        symbol: "BTC.BTC",
        name: "ZetaChain ZRC20 BTC on BTC testnet",
        decimals: 8,
    },
    KnownToken {
        address: address!("d97b1de3619ed2c6beb3860147e30ca8a7dc9891"),
        symbol: "BNB.BSC",
        name: "ZetaChain ZRC20 BNB on BSC testnet",
        decimals: 18,
    },
];

const DEX_CONTRACTS: &[KnownDex] = &[KnownDex {
    address: UNISWAP_V2_ROUTER,
    name: "Uniswap V2 Router",
}];

/// Static token table of a network
pub fn known_tokens(network: Network) -> &'static [KnownToken] {
    match network {
        Network::Mainnet => MAINNET_TOKENS,
        Network::Testnet => TESTNET_TOKENS,
    }
}

pub fn known_token(network: Network, address: Address) -> Option<&'static KnownToken> {
    known_tokens(network).iter().find(|t| t.address == address)
}

/// DEX contracts of a network
pub fn known_dex_contracts(_network: Network) -> &'static [KnownDex] {
    DEX_CONTRACTS
}

pub fn known_dex(network: Network, address: Address) -> Option<&'static KnownDex> {
    known_dex_contracts(network)
        .iter()
        .find(|d| d.address == address)
}

/// Substrings recognized by the metadata heuristic: `(needle, symbol, name, decimals)`.
///
/// Ordered so that wrapped variants match before their base asset.
pub const HEURISTIC_TOKENS: &[(&str, &str, &str, u8)] = &[
    ("usdc", "USDC", "USD Coin", 6),
    ("usdt", "USDT", "Tether USD", 6),
    ("weth", "WETH", "Wrapped Ether", 18),
    ("wbtc", "WBTC", "Wrapped Bitcoin", 8),
    ("zeta", "ZETA", "ZetaChain", 18),
    ("btc", "BTC", "Bitcoin", 8),
    ("eth", "ETH", "Ether", 18),
    ("bnb", "BNB", "BNB", 18),
];
