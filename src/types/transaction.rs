// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical transaction record
//!
//! Every source payload, whether a chain-native transaction with its receipt or
//! a cross-chain registry record, ends up as a [`Transaction`]. Source specific
//! vocabulary never leaks past the normalizer: statuses are always one of the
//! three [`TransactionStatus`] values and amounts are raw `U256` values paired
//! with a decimal-adjusted string.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::network::Network;
use super::tokens::TokenDecimals;

/// Unified transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a transaction record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// A transaction executed on the selected network itself
    ChainNative,
    /// A transfer tracked by the cross-chain registry
    CrossChain,
}

/// How a token's symbol, name and decimals were determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenProvenance {
    /// Static table of well-known tokens
    KnownRegistry,
    /// Live `symbol()` / `name()` / `decimals()` calls against the contract
    OnChain,
    /// Substring matching on the address or a partially resolved name
    Heuristic,
    /// Nothing matched: 18 decimals and a symbol derived from the address
    Placeholder,
}

/// Resolved metadata for a token contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: TokenDecimals,
    pub provenance: TokenProvenance,
}

/// A decoded ERC-20 transfer emitted by a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub raw_amount: U256,
    /// Decimal-adjusted amount, e.g. `"1.5"`
    pub amount: String,
    pub symbol: String,
    pub name: String,
    pub decimals: TokenDecimals,
    pub provenance: TokenProvenance,
    pub log_index: Option<u64>,
}

/// One side of a detected swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    pub token: Address,
    pub symbol: String,
    pub raw_amount: U256,
    pub amount: String,
}

impl From<&TokenTransfer> for SwapLeg {
    fn from(transfer: &TokenTransfer) -> Self {
        Self {
            token: transfer.token,
            symbol: transfer.symbol.clone(),
            raw_amount: transfer.raw_amount,
            amount: transfer.amount.clone(),
        }
    }
}

/// Swap derived from calldata and transfer logs
///
/// Only exists as part of its parent [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub detected: bool,
    /// Router method matched by selector, e.g. `swapExactTokensForTokens`
    pub method: Option<String>,
    /// Name of the known DEX contract the transaction called
    pub contract_name: Option<String>,
    pub input: Option<SwapLeg>,
    pub output: Option<SwapLeg>,
}

/// Cross-chain specifics of a registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainDetail {
    pub source_chain_id: Option<u64>,
    pub destination_chain_id: Option<u64>,
    pub bridge_contract: Option<String>,
    pub inbound_hash: Option<String>,
    pub outbound_hash: Option<String>,
    /// Status as the registry reports it, before unification
    pub registry_status: String,
    pub status_message: Option<String>,
}

/// The canonical transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// 0x-prefixed lowercase identifier
    pub hash: String,
    pub block_number: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Sender; may be a non-EVM address for cross-chain records
    pub from: String,
    pub to: Option<String>,
    pub value: U256,
    pub gas_used: Option<U256>,
    pub gas_price: Option<U256>,
    pub status: TransactionStatus,
    pub network: Network,
    pub kind: TransactionKind,
    pub nonce: Option<u64>,
    /// First four calldata bytes as 0x-prefixed hex
    pub method_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_transfers: Vec<TokenTransfer>,
    pub swap: Option<SwapInfo>,
    pub cross_chain: Option<CrossChainDetail>,
}

impl Transaction {
    /// Stable key for caching and history: identifier plus network
    pub fn key(&self) -> (String, Network) {
        (self.hash.clone(), self.network)
    }

    pub fn is_cross_chain(&self) -> bool {
        matches!(self.kind, TransactionKind::CrossChain)
    }
}
