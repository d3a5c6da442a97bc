// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Data sources consulted by a search
//!
//! A search talks to two sources per network:
//!
//! - a [`ChainSource`], the EVM JSON-RPC endpoint of the network
//!   ([`RpcChainSource`])
//! - a [`CrossChainSource`], the REST index of cross-chain transfers
//!   ([`RegistryClient`])
//!
//! Both report "this identifier does not exist" as `Ok(None)`. A
//! [`SourceError`] always means the question could not be answered.

mod registry;
mod rpc;

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;

pub use registry::RegistryClient;
pub use rpc::RpcChainSource;

use crate::config::ResolverConfig;
use crate::errors::SourceError;
use crate::types::network::Network;
use crate::types::raw::{OnChainTokenMetadata, RawCrossChainRecord, RawReceipt, RawTransaction};

/// The chain-native source of one network
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn get_transaction(&self, hash: B256) -> Result<Option<RawTransaction>, SourceError>;

    async fn get_transaction_receipt(&self, hash: B256)
        -> Result<Option<RawReceipt>, SourceError>;

    async fn get_current_block_number(&self) -> Result<u64, SourceError>;

    async fn get_balance(&self, address: Address) -> Result<U256, SourceError>;

    /// Block timestamp in seconds, `None` if the block is unknown
    async fn get_block_timestamp(&self, number: u64) -> Result<Option<u64>, SourceError>;

    /// Answers of `symbol()`, `name()` and `decimals()`.
    ///
    /// Individual calls may fail; an error is returned only when none answered.
    async fn get_token_metadata(&self, token: Address)
        -> Result<OnChainTokenMetadata, SourceError>;

    /// Transactions sent from or to `address` within the last `blocks`
    /// blocks, newest first, at most `limit` of them
    async fn get_address_transactions(
        &self,
        address: Address,
        blocks: u64,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, SourceError>;
}

/// The cross-chain transfer registry of one network
#[async_trait]
pub trait CrossChainSource: Send + Sync {
    /// Look a transfer up by its registry index or by its inbound hash
    async fn get_by_hash(&self, hash: &str) -> Result<Option<RawCrossChainRecord>, SourceError>;
}

/// The pair of sources a search runs against
#[derive(Clone)]
pub struct NetworkSources {
    pub chain: Arc<dyn ChainSource>,
    pub cross_chain: Arc<dyn CrossChainSource>,
}

impl std::fmt::Debug for NetworkSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkSources").finish_non_exhaustive()
    }
}

/// Builds the sources of a network on demand
pub trait SourceFactory: Send + Sync {
    fn create(&self, network: Network, config: &ResolverConfig)
        -> Result<NetworkSources, SourceError>;
}

/// Connects to the configured JSON-RPC and registry endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpSourceFactory;

impl SourceFactory for HttpSourceFactory {
    fn create(
        &self,
        network: Network,
        config: &ResolverConfig,
    ) -> Result<NetworkSources, SourceError> {
        let endpoints = config.endpoints(network);
        let chain = RpcChainSource::connect(network, &endpoints.rpc_url, config.request_timeout)?;
        let cross_chain =
            RegistryClient::new(network, &endpoints.registry_url, config.request_timeout)?;
        Ok(NetworkSources {
            chain: Arc::new(chain),
            cross_chain: Arc::new(cross_chain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_factory_rejects_bad_urls() {
        let config = crate::config::ResolverConfigBuilder::new()
            .rpc_url(Network::Mainnet, "not a url")
            .build();
        let err = HttpSourceFactory.create(Network::Mainnet, &config).unwrap_err();
        assert!(matches!(err, SourceError::InvalidRequest { .. }));
    }
}
