// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # crossscan
//!
//! Transaction resolution for an EVM network that also runs a cross-chain
//! transfer registry.
//!
//! A query is classified as a transaction id or an address. Transaction ids
//! are looked up on the network's JSON-RPC endpoint first and, when the
//! chain does not know them, in the cross-chain registry. Whatever source
//! answers, the payload is normalized into one canonical [`Transaction`]
//! with a unified status, decoded ERC-20 transfers, resolved token metadata
//! and detected swaps.
//!
//! ## Searching
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crossscan::{HttpSourceFactory, OrchestratorRegistry, ResolverConfig, SearchOptions};
//!
//! let registry = OrchestratorRegistry::new(ResolverConfig::default(), Arc::new(HttpSourceFactory));
//! let orchestrator = registry.active().await?;
//! let result = orchestrator.search("0x…", SearchOptions::default()).await?;
//! for tx in &result.transactions {
//!     println!("{} {} {}", tx.hash, tx.status, tx.value);
//! }
//! ```
//!
//! ## Errors
//!
//! Every failure of a search is a [`SearchError`] whose [`ErrorType`] is one
//! of `INVALID_INPUT`, `NOT_FOUND`, `NETWORK_ERROR`, `TIMEOUT`,
//! `RATE_LIMITED` or `UNKNOWN`. Transient failures are retried under the
//! [`RetryPolicy`] of the call site before they surface.

pub mod cache;
pub mod config;
pub mod errors;
pub mod events;
pub mod history;
pub mod input;
pub mod normalize;
pub mod search;
pub mod source;
pub mod transport;
pub mod types;

mod spans;

pub use cache::{CacheKey, CacheOperation, CacheStats, Clock, ManualClock, ResultCache, SystemClock};
pub use config::{NetworkEndpoints, ResolverConfig, ResolverConfigBuilder};
pub use errors::{
    ErrorReport, ErrorType, NormalizeError, SearchError, SearchErrorContext, SourceError,
};
pub use history::{HistoryEntry, HistoryFilter, HistoryStore, MemoryHistoryStore};
pub use input::{classify, validate_search_input, Classification, InputKind, InputValidation};
pub use normalize::{TokenResolver, TransactionNormalizer};
pub use search::{OrchestratorRegistry, SearchOrchestrator, SearchPhase};
pub use source::{
    ChainSource, CrossChainSource, HttpSourceFactory, NetworkSources, RegistryClient,
    RpcChainSource, SourceFactory,
};
pub use transport::{RetryExecutor, RetryFailure, RetryPolicy, RetryPolicyBuilder, Retryable};
pub use types::network::{Network, UnknownNetwork};
pub use types::raw::{
    InboundParams, OnChainTokenMetadata, OutboundParams, RawCrossChainRecord, RawLog, RawReceipt,
    RawTransaction, RegistryStatus, RegistryStatusInfo,
};
pub use types::search::{HealthStatus, ResultType, SearchMetadata, SearchOptions, SearchResult};
pub use types::tokens::TokenDecimals;
pub use types::transaction::{
    CrossChainDetail, SwapInfo, SwapLeg, TokenMetadata, TokenProvenance, TokenTransfer,
    Transaction, TransactionKind, TransactionStatus,
};
