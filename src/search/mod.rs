// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Search orchestration
//!
//! [`SearchOrchestrator`] is the entry point of the crate. For one network it
//! classifies the query, consults the result cache, runs the chain-native
//! lookup, falls back to the cross-chain registry exactly once, normalizes
//! the winner and records the search in the history.
//!
//! A search walks through the phases of [`SearchPhase`]:
//!
//! ```text
//! Validating -> CacheCheck -> FetchingPrimary -> [FetchingFallback] -> Normalizing -> Done
//!                                                                                  \-> Failed
//! ```
//!
//! Use [`OrchestratorRegistry`] to hold one orchestrator per network and to
//! switch between them.

mod registry;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use alloy_primitives::{Address, B256, U256};
use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};

pub use registry::OrchestratorRegistry;

use crate::cache::{CacheKey, CacheOperation, CacheStats, Clock, ResultCache, SystemClock};
use crate::config::ResolverConfig;
use crate::errors::{SearchError, SearchErrorContext, SourceError};
use crate::history::{HistoryEntry, HistoryFilter, HistoryStore, MemoryHistoryStore};
use crate::input::{classify, validate_search_input, InputKind, InputValidation};
use crate::normalize::{TokenResolver, TransactionNormalizer};
use crate::source::NetworkSources;
use crate::spans;
use crate::transport::{with_timeout, RetryExecutor};
use crate::types::network::Network;
use crate::types::raw::{RawReceipt, RawTransaction};
use crate::types::search::{HealthStatus, ResultType, SearchMetadata, SearchOptions, SearchResult};
use crate::types::transaction::Transaction;

/// Step of a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    Validating,
    CacheCheck,
    FetchingPrimary,
    FetchingFallback,
    Normalizing,
    Done,
    Failed,
}

impl SearchPhase {
    /// Name used as the `operation` of an error raised in this phase
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchPhase::Validating => "input validation",
            SearchPhase::CacheCheck => "cache check",
            SearchPhase::FetchingPrimary => "chain lookup",
            SearchPhase::FetchingFallback => "cross-chain lookup",
            SearchPhase::Normalizing => "normalization",
            SearchPhase::Done => "done",
            SearchPhase::Failed => "failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, SearchPhase::Done | SearchPhase::Failed)
    }
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one search through its phases
#[derive(Debug)]
struct SearchSaga {
    query: String,
    network: Network,
    phase: SearchPhase,
    fallback_attempted: bool,
}

impl SearchSaga {
    fn new(query: &str, network: Network) -> Self {
        Self {
            query: query.to_string(),
            network,
            phase: SearchPhase::Validating,
            fallback_attempted: false,
        }
    }

    fn advance(&mut self, next: SearchPhase) {
        if self.phase == next {
            return;
        }
        debug!(from = %self.phase, to = %next, "Search phase");
        self.phase = next;
    }

    /// Enter the fallback phase; `false` if the fallback already ran
    fn begin_fallback(&mut self) -> bool {
        if self.fallback_attempted {
            return false;
        }
        self.fallback_attempted = true;
        self.advance(SearchPhase::FetchingFallback);
        true
    }

    fn context(&self) -> SearchErrorContext {
        SearchErrorContext::new(&self.query, self.network, self.phase.as_str())
    }

    /// Error context of the current phase, then mark the search failed
    fn fail(&mut self) -> SearchErrorContext {
        let context = self.context();
        self.advance(SearchPhase::Failed);
        context
    }
}

/// What a lookup produced, before it is wrapped into a [`SearchResult`]
struct Found {
    result_type: ResultType,
    transactions: Vec<Transaction>,
    balance: Option<U256>,
}

/// Search façade for one network
///
/// Owns the result caches of its network. Sources are shared, the history
/// store may be shared between networks.
pub struct SearchOrchestrator {
    network: Network,
    config: ResolverConfig,
    sources: NetworkSources,
    normalizer: TransactionNormalizer,
    chain_executor: RetryExecutor,
    cross_chain_executor: RetryExecutor,
    search_cache: ResultCache<SearchResult>,
    health_cache: ResultCache<HealthStatus>,
    history: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("network", &self.network)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    /// Orchestrator with its own in-memory history
    pub fn new(network: Network, sources: NetworkSources, config: &ResolverConfig) -> Self {
        let history = Arc::new(MemoryHistoryStore::new(config.history_max_entries));
        Self::with_history(network, sources, config, history)
    }

    pub fn with_history(
        network: Network,
        sources: NetworkSources,
        config: &ResolverConfig,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self::with_clock(network, sources, config, history, Arc::new(SystemClock))
    }

    /// Fully wired orchestrator; every cache reads time from `clock`
    pub fn with_clock(
        network: Network,
        sources: NetworkSources,
        config: &ResolverConfig,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenResolver::new(
            network,
            Arc::clone(&sources.chain),
            config.token_metadata_retry.clone(),
            ResultCache::with_clock(config.cache_max_entries, Arc::clone(&clock)),
            config.token_metadata_ttl,
        );

        Self {
            network,
            config: config.clone(),
            normalizer: TransactionNormalizer::new(network, Arc::new(tokens)),
            chain_executor: RetryExecutor::new(config.chain_retry.clone()),
            cross_chain_executor: RetryExecutor::new(config.cross_chain_retry.clone()),
            search_cache: ResultCache::with_clock(config.cache_max_entries, Arc::clone(&clock)),
            health_cache: ResultCache::with_clock(config.cache_max_entries, clock),
            history,
            sources,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Classify a query without searching
    pub fn validate_search_input(&self, query: &str) -> InputValidation {
        validate_search_input(query)
    }

    /// Search for a transaction id or an address
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let mut saga = SearchSaga::new(query, self.network);

        let classification = classify(query);
        let identifier = match classification.normalized {
            Some(normalized) if classification.valid => normalized,
            _ => {
                let message = classification
                    .error
                    .unwrap_or_else(|| "Search query is empty".to_string());
                return Err(SearchError::invalid_input(message, saga.fail()));
            }
        };
        let kind = classification.kind;

        let span = spans::search(self.network, &identifier, kind);
        self.run(&mut saga, &identifier, kind, options, started)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        saga: &mut SearchSaga,
        identifier: &str,
        kind: InputKind,
        options: SearchOptions,
        started: Instant,
    ) -> Result<SearchResult, SearchError> {
        saga.advance(SearchPhase::CacheCheck);
        let key = CacheKey::new(
            CacheOperation::Search,
            self.network,
            format!("{}:{identifier}", kind.as_str()),
        );
        if options.use_cache {
            if let Some(cached) = self.search_cache.get(&key).await {
                debug!(%key, "Search served from cache");
                saga.advance(SearchPhase::Done);
                return Ok(cached);
            }
        }

        let found = match kind {
            InputKind::TransactionId => self.search_transaction(saga, identifier).await,
            InputKind::Address => self.search_address(saga, identifier).await,
            InputKind::Invalid => Err(SearchError::invalid_input(
                "Search query is not a transaction id or an address",
                saga.context(),
            )),
        };

        let found = match found {
            Ok(found) => found,
            Err(e) => {
                saga.advance(SearchPhase::Failed);
                warn!(error = %e, error_type = %e.error_type(), "Search failed");
                return Err(e);
            }
        };

        let result = SearchResult {
            result_type: found.result_type,
            metadata: SearchMetadata {
                query: saga.query.clone(),
                detected_kind: kind,
                result_count: found.transactions.len(),
                elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                network: self.network,
                balance: found.balance,
            },
            transactions: found.transactions,
        };

        self.search_cache
            .insert(key, result.clone(), self.config.search_ttl)
            .await;
        self.history
            .add_search(HistoryEntry::new(
                identifier,
                kind,
                self.network,
                result.metadata.result_count,
                true,
            ))
            .await;

        saga.advance(SearchPhase::Done);
        info!(
            result_type = ?result.result_type,
            results = result.metadata.result_count,
            elapsed_ms = result.metadata.elapsed_ms,
            "Search completed"
        );
        Ok(result)
    }

    async fn search_transaction(
        &self,
        saga: &mut SearchSaga,
        identifier: &str,
    ) -> Result<Found, SearchError> {
        let hash: B256 = identifier
            .parse()
            .map_err(|e| SearchError::invalid_input(format!("{e}"), saga.context()))?;

        saga.advance(SearchPhase::FetchingPrimary);
        let primary = self
            .chain_executor
            .execute(SearchPhase::FetchingPrimary.as_str(), || {
                self.fetch_chain_native(hash)
            })
            .instrument(spans::primary_lookup(self.network, hash))
            .await;

        match primary {
            Ok(Some((tx, receipt))) => {
                saga.advance(SearchPhase::Normalizing);
                let transaction = self.normalize_chain_native(tx, receipt).await?;
                Ok(Found {
                    result_type: ResultType::Transaction,
                    transactions: vec![transaction],
                    balance: None,
                })
            }
            Ok(None) => self.search_cross_chain(saga, identifier, hash).await,
            Err(failure) if failure.inner().is_not_found() => {
                self.search_cross_chain(saga, identifier, hash).await
            }
            Err(failure) => {
                warn!(
                    %hash,
                    exhausted = failure.is_exhausted(),
                    error = %failure.inner(),
                    "Chain-native lookup failed"
                );
                Err(SearchError::from_source(failure.into_inner(), saga.fail()))
            }
        }
    }

    /// Transaction and receipt, fetched concurrently
    async fn fetch_chain_native(
        &self,
        hash: B256,
    ) -> Result<Option<(RawTransaction, Option<RawReceipt>)>, SourceError> {
        let deadline = self.config.request_timeout;
        let chain = &self.sources.chain;
        let (tx, receipt) = tokio::join!(
            with_timeout("get transaction", deadline, chain.get_transaction(hash)),
            with_timeout("get receipt", deadline, chain.get_transaction_receipt(hash)),
        );
        let Some(tx) = tx? else {
            return Ok(None);
        };
        Ok(Some((tx, receipt?)))
    }

    async fn normalize_chain_native(
        &self,
        mut tx: RawTransaction,
        receipt: Option<RawReceipt>,
    ) -> Result<Transaction, SearchError> {
        if tx.block_timestamp.is_none() {
            tx.block_timestamp = self.block_timestamp(&tx).await;
        }
        self.normalizer
            .normalize_chain_native(&tx, receipt.as_ref())
            .await
            .map_err(|e| {
                let context = SearchErrorContext::new(
                    tx.hash.to_string(),
                    self.network,
                    SearchPhase::Normalizing.as_str(),
                );
                SearchError::unknown("Chain-native payload could not be normalized", context, e)
            })
    }

    /// Best effort; a failure only leaves the timestamp empty
    async fn block_timestamp(&self, tx: &RawTransaction) -> Option<u64> {
        let number = tx.block_number?;
        let lookup = with_timeout(
            "get block timestamp",
            self.config.request_timeout,
            self.sources.chain.get_block_timestamp(number),
        );
        match lookup.await {
            Ok(timestamp) => timestamp,
            Err(e) => {
                debug!(block_number = number, error = %e, "Block timestamp unavailable");
                None
            }
        }
    }

    async fn search_cross_chain(
        &self,
        saga: &mut SearchSaga,
        identifier: &str,
        hash: B256,
    ) -> Result<Found, SearchError> {
        if !saga.begin_fallback() {
            return Err(SearchError::not_found(identifier, saga.fail()));
        }

        let deadline = self.config.request_timeout;
        let cross_chain = &self.sources.cross_chain;
        let fallback = self
            .cross_chain_executor
            .execute(SearchPhase::FetchingFallback.as_str(), || {
                with_timeout("registry lookup", deadline, cross_chain.get_by_hash(identifier))
            })
            .instrument(spans::fallback_lookup(self.network, hash))
            .await;

        let record = match fallback {
            Ok(Some(record)) => record,
            Ok(None) => return Err(SearchError::not_found(identifier, saga.fail())),
            Err(failure) => {
                warn!(error = %failure, "Cross-chain fallback failed");
                return Err(SearchError::not_found(identifier, saga.fail()));
            }
        };

        saga.advance(SearchPhase::Normalizing);
        let transaction = self.normalizer.normalize_cross_chain(&record).map_err(|e| {
            SearchError::unknown("Cross-chain record could not be normalized", saga.context(), e)
        })?;

        Ok(Found {
            result_type: ResultType::CrossChainTransaction,
            transactions: vec![transaction],
            balance: None,
        })
    }

    async fn search_address(
        &self,
        saga: &mut SearchSaga,
        identifier: &str,
    ) -> Result<Found, SearchError> {
        let address: Address = identifier
            .parse()
            .map_err(|e| SearchError::invalid_input(format!("{e}"), saga.context()))?;

        saga.advance(SearchPhase::FetchingPrimary);
        let deadline = self.config.request_timeout;
        let chain = &self.sources.chain;
        let blocks = self.config.address_scan_blocks;
        let limit = self.config.address_result_limit;

        let (transactions, balance) = async {
            tokio::join!(
                self.chain_executor
                    .execute(SearchPhase::FetchingPrimary.as_str(), || {
                        with_timeout(
                            "get address transactions",
                            deadline,
                            chain.get_address_transactions(address, blocks, limit),
                        )
                    }),
                self.chain_executor.execute("get balance", || {
                    with_timeout("get balance", deadline, chain.get_balance(address))
                }),
            )
        }
        .instrument(spans::address_lookup(self.network, address))
        .await;

        let transactions = transactions
            .map_err(|failure| SearchError::from_source(failure.into_inner(), saga.fail()))?;
        let balance = match balance {
            Ok(balance) => Some(balance),
            Err(e) => {
                debug!(%address, error = %e, "Balance unavailable");
                None
            }
        };

        saga.advance(SearchPhase::Normalizing);
        let normalized = join_all(transactions.into_iter().map(|tx| async move {
            let receipt = self.best_effort_receipt(tx.hash).await;
            self.normalize_chain_native(tx, receipt).await
        }))
        .await;

        let transactions = normalized
            .into_iter()
            .filter_map(|result| match result {
                Ok(tx) => Some(tx),
                Err(e) => {
                    debug!(error = %e, "Skipping transaction of address search");
                    None
                }
            })
            .collect();

        Ok(Found {
            result_type: ResultType::AddressTransactions,
            transactions,
            balance,
        })
    }

    async fn best_effort_receipt(&self, hash: B256) -> Option<RawReceipt> {
        let lookup = with_timeout(
            "get receipt",
            self.config.request_timeout,
            self.sources.chain.get_transaction_receipt(hash),
        );
        match lookup.await {
            Ok(receipt) => receipt,
            Err(e) => {
                debug!(tx_hash = %hash, error = %e, "Receipt unavailable");
                None
            }
        }
    }

    /// Reachability of the chain source, cached for the health TTL
    pub async fn get_health_status(&self) -> HealthStatus {
        let key = CacheKey::new(CacheOperation::Health, self.network, b"health");
        let status = self
            .health_cache
            .get_or_compute(
                key,
                || async { Ok::<_, Infallible>(self.probe().await) },
                self.config.health_ttl,
            )
            .await;
        match status {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }

    async fn probe(&self) -> HealthStatus {
        let probe = with_timeout(
            "get block number",
            self.config.request_timeout,
            self.sources.chain.get_current_block_number(),
        )
        .instrument(spans::health_check(self.network))
        .await;

        match probe {
            Ok(block_number) => HealthStatus {
                network: self.network,
                reachable: true,
                block_number: Some(block_number),
                error: None,
            },
            Err(e) => {
                warn!(network = %self.network, error = %e, "Chain source unreachable");
                HealthStatus {
                    network: self.network,
                    reachable: false,
                    block_number: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Search history, newest first
    pub async fn get_search_history(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        self.history.get_history(filter).await
    }

    /// Past searches matching a partially typed query
    pub async fn get_suggestions(&self, partial: &str, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        self.history.get_suggestions(partial, filter).await
    }

    /// Drop every cached search, health probe and token metadata entry.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.search_cache.clear(None).await
            + self.health_cache.clear(None).await
            + self.normalizer.tokens().cache().clear(None).await;
        debug!(network = %self.network, removed, "Caches cleared");
        removed
    }

    /// Statistics of the search result cache
    pub async fn cache_stats(&self) -> CacheStats {
        self.search_cache.stats().await
    }
}
