// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ChainSource`] over an alloy JSON-RPC provider

use std::time::Duration;

use alloy_consensus::TxReceipt;
use alloy_erc20_full::LazyToken;
use alloy_json_rpc::RpcError;
use alloy_network::{Ethereum, TransactionResponse};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::ClientBuilder;
use alloy_rpc_types::{BlockNumberOrTag, Transaction, TransactionReceipt, TransactionTrait};
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, Instrument};

use super::ChainSource;
use crate::errors::SourceError;
use crate::spans;
use crate::transport::{with_timeout, RpcTraceLayer};
use crate::types::network::Network;
use crate::types::raw::{OnChainTokenMetadata, RawLog, RawReceipt, RawTransaction};

/// Blocks fetched concurrently during an address scan
const SCAN_CONCURRENCY: usize = 10;

/// Chain-native source backed by an alloy [`RootProvider`]
///
/// Every request goes through an [`RpcTraceLayer`] and is raced against the
/// configured deadline.
#[derive(Debug, Clone)]
pub struct RpcChainSource {
    network: Network,
    provider: RootProvider<Ethereum>,
    timeout: Duration,
    trace: Option<RpcTraceLayer>,
}

impl RpcChainSource {
    /// Connect to a JSON-RPC endpoint over HTTP
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidRequest`] if the URL cannot be parsed.
    pub fn connect(network: Network, rpc_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let url: url::Url = rpc_url.parse().map_err(|e| {
            SourceError::invalid_request("connect", format!("invalid RPC URL {rpc_url:?}: {e}"))
        })?;

        let trace = RpcTraceLayer::new(network);
        let client = ClientBuilder::default().layer(trace.clone()).http(url);
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_client(client);

        Ok(Self {
            network,
            provider,
            timeout,
            trace: Some(trace),
        })
    }

    /// Wrap an existing provider
    pub fn from_provider(network: Network, provider: RootProvider<Ethereum>, timeout: Duration) -> Self {
        Self {
            network,
            provider,
            timeout,
            trace: None,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// JSON-RPC requests sent so far, when built with [`RpcChainSource::connect`]
    pub fn rpc_calls(&self) -> Option<u64> {
        self.trace.as_ref().map(RpcTraceLayer::call_count)
    }

    async fn block_transactions(
        &self,
        number: u64,
    ) -> Result<(Option<u64>, Vec<Transaction>), SourceError> {
        let operation = "eth_getBlockByNumber";
        let block = with_timeout(operation, self.timeout, async {
            self.provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .full()
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .await?;

        Ok(match block {
            Some(block) => {
                let timestamp = block.header.timestamp;
                let txs = block
                    .transactions
                    .as_transactions()
                    .map(<[Transaction]>::to_vec)
                    .unwrap_or_default();
                (Some(timestamp), txs)
            }
            None => (None, Vec::new()),
        })
    }
}

#[async_trait]
impl ChainSource for RpcChainSource {
    async fn get_transaction(&self, hash: B256) -> Result<Option<RawTransaction>, SourceError> {
        let operation = "eth_getTransactionByHash";
        let tx = with_timeout(operation, self.timeout, async {
            self.provider
                .get_transaction_by_hash(hash)
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .instrument(spans::rpc_lookup(self.network, operation, hash))
        .await?;

        Ok(tx.as_ref().map(|tx| raw_transaction(tx, None)))
    }

    async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<RawReceipt>, SourceError> {
        let operation = "eth_getTransactionReceipt";
        let receipt = with_timeout(operation, self.timeout, async {
            self.provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .instrument(spans::rpc_lookup(self.network, operation, hash))
        .await?;

        Ok(receipt.as_ref().map(raw_receipt))
    }

    async fn get_current_block_number(&self) -> Result<u64, SourceError> {
        let operation = "eth_blockNumber";
        with_timeout(operation, self.timeout, async {
            self.provider
                .get_block_number()
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .await
    }

    async fn get_balance(&self, address: Address) -> Result<U256, SourceError> {
        let operation = "eth_getBalance";
        with_timeout(operation, self.timeout, async {
            self.provider
                .get_balance(address)
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .await
    }

    async fn get_block_timestamp(&self, number: u64) -> Result<Option<u64>, SourceError> {
        let operation = "eth_getBlockByNumber";
        let block = with_timeout(operation, self.timeout, async {
            self.provider
                .get_block_by_number(BlockNumberOrTag::Number(number))
                .await
                .map_err(|e| map_transport_error(operation, e))
        })
        .instrument(spans::get_block_timestamp(self.network, number))
        .await?;

        Ok(block.map(|block| block.header.timestamp))
    }

    async fn get_token_metadata(
        &self,
        token: Address,
    ) -> Result<OnChainTokenMetadata, SourceError> {
        let operation = "erc20_metadata";
        let contract = LazyToken::<_, Ethereum>::new(token, self.provider.clone());

        let (symbol, name, decimals) = with_timeout(operation, self.timeout, async {
            Ok(tokio::join!(contract.symbol(), contract.name(), contract.decimals()))
        })
        .instrument(spans::token_metadata(self.network, token))
        .await?;

        let metadata = OnChainTokenMetadata {
            symbol: symbol.ok().map(|s| s.to_owned()),
            name: name.ok().map(|s| s.to_owned()),
            decimals: decimals.ok().map(|d| d.to_owned()),
        };

        if metadata.is_empty() {
            return Err(SourceError::invalid_request(
                operation,
                format!("{token} answered none of symbol(), name(), decimals()"),
            ));
        }
        debug!(%token, ?metadata, "Fetched token metadata");
        Ok(metadata)
    }

    async fn get_address_transactions(
        &self,
        address: Address,
        blocks: u64,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, SourceError> {
        let span = spans::scan_address(self.network, address, blocks);
        async {
            let head = self.get_current_block_number().await?;
            let lowest = head.saturating_sub(blocks.saturating_sub(1));
            let numbers: Vec<u64> = (lowest..=head).rev().collect();

            let mut found = Vec::new();
            for chunk in numbers.chunks(SCAN_CONCURRENCY) {
                let fetched = join_all(chunk.iter().map(|&n| self.block_transactions(n))).await;
                for block in fetched {
                    let (timestamp, txs) = block?;
                    found.extend(
                        txs.iter()
                            .filter(|tx| {
                                TransactionResponse::from(*tx) == address
                                    || TransactionTrait::to(*tx) == Some(address)
                            })
                            .map(|tx| raw_transaction(tx, timestamp)),
                    );
                }
                if found.len() >= limit {
                    break;
                }
            }

            found.truncate(limit);
            debug!(%address, head, found = found.len(), "Scanned recent blocks");
            Ok(found)
        }
        .instrument(span)
        .await
    }
}

fn raw_transaction(tx: &Transaction, block_timestamp: Option<u64>) -> RawTransaction {
    RawTransaction {
        hash: TransactionResponse::tx_hash(tx),
        block_number: tx.block_number,
        block_timestamp,
        from: TransactionResponse::from(tx),
        to: TransactionTrait::to(tx),
        value: TransactionTrait::value(tx),
        gas_limit: TransactionTrait::gas_limit(tx),
        gas_price: TransactionTrait::gas_price(tx).or(tx.effective_gas_price),
        nonce: TransactionTrait::nonce(tx),
        input: TransactionTrait::input(tx).clone(),
    }
}

fn raw_receipt(receipt: &TransactionReceipt) -> RawReceipt {
    RawReceipt {
        status: receipt.inner.status_or_post_state().as_eip658(),
        gas_used: receipt.gas_used,
        effective_gas_price: Some(receipt.effective_gas_price),
        block_number: receipt.block_number,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| RawLog {
                inner: log.inner.clone(),
                log_index: log.log_index,
            })
            .collect(),
    }
}

/// Classify an alloy transport failure
///
/// - HTTP statuses follow [`SourceError::from_status`]
/// - JSON-RPC error responses the node marks as retryable become rate limits
/// - Other error responses and request serialization failures are final
/// - Undecodable responses and connection failures are transient
fn map_transport_error(operation: &str, error: TransportError) -> SourceError {
    match &error {
        RpcError::Transport(TransportErrorKind::HttpError(http)) => {
            SourceError::from_status(operation, http.status)
        }
        RpcError::ErrorResp(payload) if payload.is_retry_err() => SourceError::RateLimited {
            operation: operation.to_string(),
        },
        RpcError::ErrorResp(payload) => {
            SourceError::invalid_request(operation, format!("{} ({})", payload.message, payload.code))
        }
        RpcError::SerError(e) => SourceError::invalid_request(operation, e.to_string()),
        RpcError::DeserError { err, .. } => SourceError::decode(operation, err),
        _ => SourceError::transport(operation, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_invalid_url() {
        let err = RpcChainSource::connect(Network::Mainnet, "::nope::", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidRequest { .. }));
    }

    #[test]
    fn test_connect_counts_calls_from_zero() {
        let source =
            RpcChainSource::connect(Network::Testnet, "http://127.0.0.1:8545", Duration::from_secs(1))
                .unwrap();
        assert_eq!(source.rpc_calls(), Some(0));
        assert_eq!(source.network(), Network::Testnet);
    }

    #[test]
    fn test_http_status_mapping() {
        let error = TransportErrorKind::http_error(429, "slow down".to_string());
        assert!(matches!(
            map_transport_error("eth_call", error),
            SourceError::RateLimited { .. }
        ));

        let error = TransportErrorKind::http_error(503, String::new());
        let mapped = map_transport_error("eth_call", error);
        assert!(!mapped.is_non_retryable());
    }

    #[test]
    fn test_null_response_is_transient() {
        let mapped = map_transport_error("eth_call", RpcError::NullResp);
        assert!(matches!(mapped, SourceError::Transport { .. }));
        assert!(!mapped.is_non_retryable());
    }
}
