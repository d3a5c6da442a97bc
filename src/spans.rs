// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for crossscan operations.
//!
//! Telemetry is kept apart from business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here and the
//! operation attaches it to its future.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(param_value))
//!     .await
//! }
//! ```

use alloy_primitives::{Address, BlockNumber, TxHash};
use tracing::{Level, Span};

use crate::input::InputKind;
use crate::types::network::Network;

/// Create span for a search.
///
/// This is the main public API entry point.
///
/// Parent: None (root span for this operation)
/// Children: primary_lookup, fallback_lookup, address_lookup spans
#[inline]
pub(crate) fn search(network: Network, query: &str, kind: InputKind) -> Span {
    tracing::span!(
        Level::INFO,
        "crossscan.search",
        network = %network,
        query = query,
        kind = %kind,
    )
}

/// Create span for the chain-native lookup of a transaction id.
///
/// Parent: search span
/// Children: rpc_lookup spans for transaction and receipt
#[inline]
pub(crate) fn primary_lookup(network: Network, hash: TxHash) -> Span {
    tracing::debug_span!("crossscan.primary_lookup", network = %network, tx_hash = %hash)
}

/// Create span for the registry lookup after the chain-native source came up empty.
///
/// Parent: search span
/// Children: registry_lookup span
#[inline]
pub(crate) fn fallback_lookup(network: Network, hash: TxHash) -> Span {
    tracing::debug_span!("crossscan.fallback_lookup", network = %network, tx_hash = %hash)
}

/// Create span for the lookup of an address's recent transactions.
///
/// Parent: search span
/// Children: scan_address span
#[inline]
pub(crate) fn address_lookup(network: Network, address: Address) -> Span {
    tracing::debug_span!("crossscan.address_lookup", network = %network, address = %address)
}

/// Create span for a health probe.
#[inline]
pub(crate) fn health_check(network: Network) -> Span {
    tracing::debug_span!("crossscan.health_check", network = %network)
}

/// Create span for a single-transaction RPC lookup.
///
/// Parent: primary_lookup span
/// Children: rpc_call spans from the transport layer
#[inline]
pub(crate) fn rpc_lookup(network: Network, operation: &str, hash: TxHash) -> Span {
    tracing::debug_span!(
        "crossscan.rpc_lookup",
        network = %network,
        operation = operation,
        tx_hash = %hash,
    )
}

/// Create span for fetching a block timestamp.
#[inline]
pub(crate) fn get_block_timestamp(network: Network, block_number: BlockNumber) -> Span {
    tracing::debug_span!(
        "crossscan.get_block_timestamp",
        network = %network,
        block_number = block_number,
    )
}

/// Create span for the `symbol`, `name` and `decimals` calls against a token.
///
/// Parent: resolve_token span
#[inline]
pub(crate) fn token_metadata(network: Network, token: Address) -> Span {
    tracing::trace_span!("crossscan.token_metadata", network = %network, token = %token)
}

/// Create span for resolving a token's metadata, retries included.
///
/// Parent: normalize_chain_native span
/// Children: token_metadata spans (one per attempt)
#[inline]
pub(crate) fn resolve_token(network: Network, token: Address) -> Span {
    tracing::debug_span!("crossscan.resolve_token", network = %network, token = %token)
}

/// Create span for scanning recent blocks for an address.
///
/// Parent: address_lookup span
#[inline]
pub(crate) fn scan_address(network: Network, address: Address, blocks: u64) -> Span {
    tracing::debug_span!(
        "crossscan.scan_address",
        network = %network,
        address = %address,
        blocks = blocks,
    )
}

/// Create span for a cross-chain registry lookup.
///
/// Parent: fallback_lookup span
#[inline]
pub(crate) fn registry_lookup(network: Network, hash: &str) -> Span {
    tracing::debug_span!("crossscan.registry_lookup", network = %network, hash = hash)
}

/// Create span for normalizing a chain-native transaction.
///
/// Parent: search span
/// Children: resolve_token spans (one per distinct token)
#[inline]
pub(crate) fn normalize_chain_native(network: Network, hash: TxHash) -> Span {
    tracing::debug_span!(
        "crossscan.normalize_chain_native",
        network = %network,
        tx_hash = %hash,
    )
}
