// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token metadata resolution
//!
//! Metadata for a token contract is resolved in three steps, stopping at the
//! first that yields a complete answer:
//!
//! 1. the static table of well-known tokens of the network
//! 2. live `symbol()`, `name()` and `decimals()` calls, retried under the
//!    token-metadata policy and cached for the token TTL
//! 3. substring heuristics over the address and whatever the contract did
//!    answer
//!
//! If all three fail the token gets 18 decimals and a symbol derived from its
//! address. Resolution never fails.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{hex, Address};
use futures::future::join_all;
use tracing::{debug, Instrument};

use crate::cache::{CacheKey, CacheOperation, ResultCache};
use crate::config::constants::{known_token, HEURISTIC_TOKENS};
use crate::source::ChainSource;
use crate::spans;
use crate::transport::{RetryExecutor, RetryPolicy};
use crate::types::network::Network;
use crate::types::raw::OnChainTokenMetadata;
use crate::types::tokens::TokenDecimals;
use crate::types::transaction::{TokenMetadata, TokenProvenance};

/// Resolves token metadata for one network
pub struct TokenResolver {
    network: Network,
    chain: Arc<dyn ChainSource>,
    executor: RetryExecutor,
    cache: ResultCache<TokenMetadata>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResolver")
            .field("network", &self.network)
            .field("policy", self.executor.policy())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenResolver {
    pub fn new(
        network: Network,
        chain: Arc<dyn ChainSource>,
        policy: RetryPolicy,
        cache: ResultCache<TokenMetadata>,
        ttl: Duration,
    ) -> Self {
        Self {
            network,
            chain,
            executor: RetryExecutor::new(policy),
            cache,
            ttl,
        }
    }

    pub fn cache(&self) -> &ResultCache<TokenMetadata> {
        &self.cache
    }

    /// Resolve one token
    pub async fn resolve(&self, token: Address) -> TokenMetadata {
        if let Some(known) = known_token(self.network, token) {
            return TokenMetadata {
                address: token,
                symbol: known.symbol.to_string(),
                name: known.name.to_string(),
                decimals: TokenDecimals::new(known.decimals),
                provenance: TokenProvenance::KnownRegistry,
            };
        }

        let key = CacheKey::new(CacheOperation::TokenMetadata, self.network, token.as_slice());
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let partial = self.fetch_on_chain(token).await;
        if let Some(metadata) = complete_on_chain(token, &partial) {
            self.cache.insert(key, metadata.clone(), self.ttl).await;
            return metadata;
        }

        fallback_metadata(token, &partial)
    }

    /// Resolve several tokens concurrently
    pub async fn resolve_many(&self, tokens: &[Address]) -> HashMap<Address, TokenMetadata> {
        let resolved = join_all(tokens.iter().map(|&token| self.resolve(token))).await;
        tokens.iter().copied().zip(resolved).collect()
    }

    async fn fetch_on_chain(&self, token: Address) -> OnChainTokenMetadata {
        let result = self
            .executor
            .execute("token metadata", || self.chain.get_token_metadata(token))
            .instrument(spans::resolve_token(self.network, token))
            .await;

        match result {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(%token, error = %e, "On-chain token metadata unavailable");
                OnChainTokenMetadata::default()
            }
        }
    }
}

fn complete_on_chain(token: Address, partial: &OnChainTokenMetadata) -> Option<TokenMetadata> {
    let symbol = partial.symbol.as_ref().filter(|s| !s.trim().is_empty())?;
    let decimals = TokenDecimals::new(partial.decimals?);
    if !decimals.is_supported() {
        return None;
    }
    Some(TokenMetadata {
        address: token,
        symbol: symbol.clone(),
        name: partial.name.clone().unwrap_or_else(|| symbol.clone()),
        decimals,
        provenance: TokenProvenance::OnChain,
    })
}

/// Steps three and four: heuristics, then the placeholder
fn fallback_metadata(token: Address, partial: &OnChainTokenMetadata) -> TokenMetadata {
    let address_hex = hex::encode(token);
    let haystack = [
        Some(address_hex.as_str()),
        partial.name.as_deref(),
        partial.symbol.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::to_lowercase)
    .collect::<Vec<_>>()
    .join(" ");

    let partial_decimals = partial
        .decimals
        .map(TokenDecimals::new)
        .filter(TokenDecimals::is_supported);

    if let Some(&(needle, symbol, name, decimals)) = HEURISTIC_TOKENS
        .iter()
        .find(|(needle, ..)| haystack.contains(needle))
    {
        debug!(%token, needle, "Token metadata from heuristics");
        return TokenMetadata {
            address: token,
            symbol: partial.symbol.clone().unwrap_or_else(|| symbol.to_string()),
            name: partial.name.clone().unwrap_or_else(|| name.to_string()),
            decimals: partial_decimals.unwrap_or(TokenDecimals::new(decimals)),
            provenance: TokenProvenance::Heuristic,
        };
    }

    let provenance = if partial.is_empty() {
        TokenProvenance::Placeholder
    } else {
        TokenProvenance::OnChain
    };
    TokenMetadata {
        address: token,
        symbol: partial
            .symbol
            .clone()
            .unwrap_or_else(|| placeholder_symbol(&address_hex)),
        name: partial
            .name
            .clone()
            .unwrap_or_else(|| "Unknown Token".to_string()),
        decimals: partial_decimals.unwrap_or_default(),
        provenance,
    }
}

/// `0x1234...abcd`
fn placeholder_symbol(address_hex: &str) -> String {
    let head = address_hex.get(..4).unwrap_or(address_hex);
    let tail = address_hex.get(address_hex.len().saturating_sub(4)..).unwrap_or("");
    format!("0x{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address::repeat_byte(0x12)
    }

    #[test]
    fn test_complete_on_chain() {
        let partial = OnChainTokenMetadata {
            symbol: Some("FOO".into()),
            name: None,
            decimals: Some(9),
        };
        let metadata = complete_on_chain(token(), &partial).unwrap();
        assert_eq!(metadata.symbol, "FOO");
        assert_eq!(metadata.name, "FOO");
        assert_eq!(metadata.decimals.as_u8(), 9);
        assert_eq!(metadata.provenance, TokenProvenance::OnChain);

        let no_decimals = OnChainTokenMetadata {
            decimals: None,
            ..partial
        };
        assert!(complete_on_chain(token(), &no_decimals).is_none());
    }

    #[test]
    fn test_heuristic_uses_partial_name() {
        let partial = OnChainTokenMetadata {
            symbol: None,
            name: Some("Bridged USDC (ZetaChain)".into()),
            decimals: None,
        };
        let metadata = fallback_metadata(token(), &partial);
        assert_eq!(metadata.provenance, TokenProvenance::Heuristic);
        assert_eq!(metadata.symbol, "USDC");
        assert_eq!(metadata.decimals.as_u8(), 6);
        assert_eq!(metadata.name, "Bridged USDC (ZetaChain)");
    }

    #[test]
    fn test_wrapped_variant_wins() {
        let partial = OnChainTokenMetadata {
            symbol: None,
            name: Some("Wrapped BTC".into()),
            decimals: None,
        };
        // "wrapped btc" contains "btc" but not "wbtc"
        assert_eq!(fallback_metadata(token(), &partial).symbol, "BTC");

        let partial = OnChainTokenMetadata {
            symbol: Some("WBTC".into()),
            name: None,
            decimals: None,
        };
        let metadata = fallback_metadata(token(), &partial);
        assert_eq!(metadata.symbol, "WBTC");
        assert_eq!(metadata.decimals.as_u8(), 8);
    }

    #[test]
    fn test_placeholder() {
        let metadata = fallback_metadata(token(), &OnChainTokenMetadata::default());
        assert_eq!(metadata.provenance, TokenProvenance::Placeholder);
        assert_eq!(metadata.decimals, TokenDecimals::default());
        assert_eq!(metadata.symbol, "0x1212...1212");
    }
}
