// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for crossscan operations
//!
//! Controls endpoints, per-call deadlines, retry policies, cache lifetimes
//! and the bounds of address searches. Loading configuration from files or
//! the environment is left to the caller.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use crossscan::ResolverConfig;
//!
//! // Public endpoints, 10s request deadline, 30s search cache
//! let config = ResolverConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use crossscan::{Network, ResolverConfigBuilder};
//! use std::time::Duration;
//!
//! let config = ResolverConfigBuilder::new()
//!     .rpc_url(Network::Testnet, "http://localhost:8545")
//!     .request_timeout(Duration::from_secs(5))
//!     .address_scan(50, 10)
//!     .build();
//! assert_eq!(config.endpoints(Network::Testnet).rpc_url, "http://localhost:8545");
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::transport::RetryPolicy;
use crate::types::network::Network;

pub mod constants;

use constants::{
    DEFAULT_ADDRESS_RESULT_LIMIT, DEFAULT_ADDRESS_SCAN_BLOCKS, DEFAULT_CACHE_MAX_ENTRIES,
    DEFAULT_HISTORY_MAX_ENTRIES, DEFAULT_REQUEST_TIMEOUT, HEALTH_TTL, MAINNET_REGISTRY_URL,
    MAINNET_RPC_URL, SEARCH_RESULT_TTL, TESTNET_REGISTRY_URL, TESTNET_RPC_URL, TOKEN_METADATA_TTL,
};

/// Where to reach the two sources of one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEndpoints {
    /// EVM JSON-RPC endpoint
    pub rpc_url: String,
    /// Base URL of the cross-chain registry REST API
    pub registry_url: String,
}

impl NetworkEndpoints {
    pub fn new(rpc_url: impl Into<String>, registry_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            registry_url: registry_url.into(),
        }
    }

    /// Public endpoints of a network
    pub fn defaults(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::new(MAINNET_RPC_URL, MAINNET_REGISTRY_URL),
            Network::Testnet => Self::new(TESTNET_RPC_URL, TESTNET_REGISTRY_URL),
        }
    }
}

/// Configuration for the resolver
///
/// Use [`ResolverConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Network selected when a registry is created
    /// Default: mainnet
    pub default_network: Network,

    /// Endpoint overrides; networks without one use [`NetworkEndpoints::defaults`]
    pub endpoint_overrides: HashMap<Network, NetworkEndpoints>,

    /// Deadline for every external call
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Retry policy for transaction, receipt, block and balance lookups
    pub chain_retry: RetryPolicy,

    /// Retry policy for the cross-chain registry
    pub cross_chain_retry: RetryPolicy,

    /// Retry policy for token metadata calls
    pub token_metadata_retry: RetryPolicy,

    /// Default: 30 seconds
    pub search_ttl: Duration,

    /// Default: 5 minutes
    pub token_metadata_ttl: Duration,

    /// Default: 10 seconds
    pub health_ttl: Duration,

    /// Upper bound of each result cache
    pub cache_max_entries: usize,

    /// Entries kept by the in-memory history store
    pub history_max_entries: usize,

    /// Blocks scanned backwards from the head for an address search
    pub address_scan_blocks: u64,

    /// Maximum transactions returned by an address search
    pub address_result_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_network: Network::default(),
            endpoint_overrides: HashMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            chain_retry: RetryPolicy::chain_native(),
            cross_chain_retry: RetryPolicy::cross_chain(),
            token_metadata_retry: RetryPolicy::token_metadata(),
            search_ttl: SEARCH_RESULT_TTL,
            token_metadata_ttl: TOKEN_METADATA_TTL,
            health_ttl: HEALTH_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            history_max_entries: DEFAULT_HISTORY_MAX_ENTRIES,
            address_scan_blocks: DEFAULT_ADDRESS_SCAN_BLOCKS,
            address_result_limit: DEFAULT_ADDRESS_RESULT_LIMIT,
        }
    }
}

impl ResolverConfig {
    /// Config that never retries, for tests and latency-sensitive callers
    pub fn without_retries() -> Self {
        Self {
            chain_retry: RetryPolicy::none(),
            cross_chain_retry: RetryPolicy::none(),
            token_metadata_retry: RetryPolicy::none(),
            ..Self::default()
        }
    }

    /// Get effective endpoints for a network
    ///
    /// Returns the override if set, otherwise the public defaults.
    pub fn endpoints(&self, network: Network) -> NetworkEndpoints {
        self.endpoint_overrides
            .get(&network)
            .cloned()
            .unwrap_or_else(|| NetworkEndpoints::defaults(network))
    }

    pub fn set_endpoints(&mut self, network: Network, endpoints: NetworkEndpoints) {
        self.endpoint_overrides.insert(network, endpoints);
    }
}

/// Builder for [`ResolverConfig`]
///
/// # Example
///
/// ```rust
/// use crossscan::{Network, ResolverConfigBuilder, RetryPolicy};
/// use std::time::Duration;
///
/// let config = ResolverConfigBuilder::new()
///     .default_network(Network::Testnet)
///     .chain_retry(RetryPolicy::none())
///     .search_ttl(Duration::from_secs(5))
///     .build();
/// assert_eq!(config.default_network, Network::Testnet);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Create a new builder with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_network(mut self, network: Network) -> Self {
        self.config.default_network = network;
        self
    }

    /// Replace both endpoints of a network
    pub fn endpoints(mut self, network: Network, endpoints: NetworkEndpoints) -> Self {
        self.config.set_endpoints(network, endpoints);
        self
    }

    /// Convenience: set the JSON-RPC endpoint of a network
    pub fn rpc_url(mut self, network: Network, url: impl Into<String>) -> Self {
        let mut endpoints = self.config.endpoints(network);
        endpoints.rpc_url = url.into();
        self.config.set_endpoints(network, endpoints);
        self
    }

    /// Convenience: set the registry base URL of a network
    pub fn registry_url(mut self, network: Network, url: impl Into<String>) -> Self {
        let mut endpoints = self.config.endpoints(network);
        endpoints.registry_url = url.into();
        self.config.set_endpoints(network, endpoints);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn chain_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.chain_retry = policy;
        self
    }

    pub fn cross_chain_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.cross_chain_retry = policy;
        self
    }

    pub fn token_metadata_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.token_metadata_retry = policy;
        self
    }

    /// Use one policy for every call site
    pub fn retry_all(self, policy: RetryPolicy) -> Self {
        self.chain_retry(policy.clone())
            .cross_chain_retry(policy.clone())
            .token_metadata_retry(policy)
    }

    pub fn search_ttl(mut self, ttl: Duration) -> Self {
        self.config.search_ttl = ttl;
        self
    }

    pub fn token_metadata_ttl(mut self, ttl: Duration) -> Self {
        self.config.token_metadata_ttl = ttl;
        self
    }

    pub fn health_ttl(mut self, ttl: Duration) -> Self {
        self.config.health_ttl = ttl;
        self
    }

    pub fn cache_max_entries(mut self, max: usize) -> Self {
        self.config.cache_max_entries = max;
        self
    }

    pub fn history_max_entries(mut self, max: usize) -> Self {
        self.config.history_max_entries = max;
        self
    }

    /// Bound address searches to `blocks` recent blocks and `limit` results
    pub fn address_scan(mut self, blocks: u64, limit: usize) -> Self {
        self.config.address_scan_blocks = blocks;
        self.config.address_result_limit = limit;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.default_network, Network::Mainnet);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.search_ttl, Duration::from_secs(30));
        assert_eq!(config.token_metadata_ttl, Duration::from_secs(300));
        assert_eq!(config.health_ttl, Duration::from_secs(10));
        assert_eq!(config.chain_retry, RetryPolicy::chain_native());
        assert_eq!(
            config.endpoints(Network::Testnet),
            NetworkEndpoints::defaults(Network::Testnet)
        );
    }

    #[test]
    fn test_endpoint_overrides_are_per_network() {
        let config = ResolverConfigBuilder::new()
            .registry_url(Network::Mainnet, "http://registry.local")
            .build();

        let mainnet = config.endpoints(Network::Mainnet);
        assert_eq!(mainnet.registry_url, "http://registry.local");
        assert_eq!(mainnet.rpc_url, constants::MAINNET_RPC_URL);
        assert_eq!(
            config.endpoints(Network::Testnet).registry_url,
            constants::TESTNET_REGISTRY_URL
        );
    }

    #[test]
    fn test_builder_chains_settings() {
        let config = ResolverConfigBuilder::new()
            .retry_all(RetryPolicy::none())
            .cache_max_entries(10)
            .history_max_entries(5)
            .address_scan(20, 3)
            .build();

        assert_eq!(config.cross_chain_retry.max_retries, 0);
        assert_eq!(config.token_metadata_retry.max_retries, 0);
        assert_eq!(config.cache_max_entries, 10);
        assert_eq!(config.history_max_entries, 5);
        assert_eq!(config.address_scan_blocks, 20);
        assert_eq!(config.address_result_limit, 3);
    }

    #[test]
    fn test_without_retries() {
        let config = ResolverConfig::without_retries();
        assert_eq!(config.chain_retry.max_retries, 0);
        assert_eq!(config.search_ttl, SEARCH_RESULT_TTL);
    }
}
