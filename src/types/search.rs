// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Search results and the small report types returned to consumers

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::network::Network;
use super::transaction::Transaction;
use crate::input::InputKind;

/// Discriminant of a [`SearchResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    /// A chain-native transaction found on the selected network
    Transaction,
    /// A record found in the cross-chain registry
    CrossChainTransaction,
    /// Recent transactions touching an address (possibly none)
    AddressTransactions,
}

/// Facts about how a result was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    /// Query as the caller typed it
    pub query: String,
    pub detected_kind: InputKind,
    pub result_count: usize,
    pub elapsed_ms: u64,
    pub network: Network,
    /// Native balance, only for address searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<U256>,
}

/// Outcome of a successful search
///
/// Handed out by value; a later search never mutates a result that was
/// already returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub transactions: Vec<Transaction>,
    pub metadata: SearchMetadata,
}

impl SearchResult {
    pub fn first(&self) -> Option<&Transaction> {
        self.transactions.first()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Per-call search options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Serve a fresh cached result without touching the network
    pub use_cache: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

impl SearchOptions {
    /// Options that always go to the sources
    pub fn bypass_cache() -> Self {
        Self { use_cache: false }
    }
}

/// Reachability of a network's chain source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub network: Network,
    pub reachable: bool,
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_type_tags() {
        let json = serde_json::to_string(&ResultType::CrossChainTransaction).unwrap();
        assert_eq!(json, "\"CROSS_CHAIN_TRANSACTION\"");
        let json = serde_json::to_string(&ResultType::AddressTransactions).unwrap();
        assert_eq!(json, "\"ADDRESS_TRANSACTIONS\"");
    }

    #[test]
    fn test_search_options_default_uses_cache() {
        assert!(SearchOptions::default().use_cache);
        assert!(!SearchOptions::bypass_cache().use_cache);
    }
}
