// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion of source payloads into canonical [`Transaction`] records
//!
//! Chain-native payloads go through [`TransactionNormalizer::normalize_chain_native`]:
//! status from the receipt, ERC-20 transfers decoded from the receipt logs,
//! token metadata resolved per distinct token, and swap detection over the
//! calldata and the transfers. Registry records go through
//! [`TransactionNormalizer::normalize_cross_chain`].
//!
//! Partial failures are absorbed. A malformed log, an unreachable token
//! contract or an unparsable outbound leg degrade single fields; only a
//! record that cannot be identified is rejected.

mod cross_chain;
mod status;
mod swap;
mod tokens;
mod transfers;

use std::sync::Arc;

use alloy_primitives::{hex, U256};
use chrono::{DateTime, Utc};
use tracing::{debug, Instrument};

pub use cross_chain::normalize_cross_chain;
pub use status::{chain_native_status, registry_status};
pub use swap::{detect_swap, swap_method, SWAP_METHODS};
pub use tokens::TokenResolver;
pub use transfers::{decode_transfers, distinct_tokens, DecodedTransfer};

use crate::errors::NormalizeError;
use crate::spans;
use crate::types::network::Network;
use crate::types::raw::{RawCrossChainRecord, RawReceipt, RawTransaction};
use crate::types::transaction::{Transaction, TransactionKind, TokenTransfer};

/// Normalizes payloads of one network
#[derive(Debug, Clone)]
pub struct TransactionNormalizer {
    network: Network,
    tokens: Arc<TokenResolver>,
}

impl TransactionNormalizer {
    pub fn new(network: Network, tokens: Arc<TokenResolver>) -> Self {
        Self { network, tokens }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn tokens(&self) -> &TokenResolver {
        &self.tokens
    }

    /// Normalize a chain-native transaction and its receipt, if mined
    pub async fn normalize_chain_native(
        &self,
        raw_tx: &RawTransaction,
        receipt: Option<&RawReceipt>,
    ) -> Result<Transaction, NormalizeError> {
        let span = spans::normalize_chain_native(self.network, raw_tx.hash);
        async move {
            let token_transfers = match receipt {
                Some(receipt) => self.token_transfers(receipt).await,
                None => Vec::new(),
            };
            let swap = detect_swap(self.network, raw_tx, &token_transfers);
            if swap.is_some() {
                debug!(transfers = token_transfers.len(), "Swap detected");
            }

            let gas_price = receipt
                .and_then(|r| r.effective_gas_price)
                .or(raw_tx.gas_price)
                .map(U256::from);

            Ok(Transaction {
                hash: hex::encode_prefixed(raw_tx.hash),
                block_number: raw_tx
                    .block_number
                    .or_else(|| receipt.and_then(|r| r.block_number)),
                timestamp: raw_tx.block_timestamp.and_then(timestamp),
                from: hex::encode_prefixed(raw_tx.from),
                to: raw_tx.to.map(hex::encode_prefixed),
                value: raw_tx.value,
                gas_used: receipt.map(|r| U256::from(r.gas_used)),
                gas_price,
                status: chain_native_status(receipt),
                network: self.network,
                kind: TransactionKind::ChainNative,
                nonce: Some(raw_tx.nonce),
                method_selector: raw_tx.input.get(..4).map(hex::encode_prefixed),
                token_transfers,
                swap,
                cross_chain: None,
            })
        }
        .instrument(span)
        .await
    }

    /// Normalize a cross-chain registry record
    pub fn normalize_cross_chain(
        &self,
        record: &RawCrossChainRecord,
    ) -> Result<Transaction, NormalizeError> {
        normalize_cross_chain(self.network, record)
    }

    async fn token_transfers(&self, receipt: &RawReceipt) -> Vec<TokenTransfer> {
        let decoded = decode_transfers(&receipt.logs);
        if decoded.is_empty() {
            return Vec::new();
        }

        let metadata = self.tokens.resolve_many(&distinct_tokens(&decoded)).await;
        decoded
            .iter()
            .filter_map(|transfer| {
                metadata
                    .get(&transfer.token)
                    .map(|meta| transfer.with_metadata(meta))
            })
            .collect()
    }
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(i64::try_from(secs).ok()?, 0)
}
