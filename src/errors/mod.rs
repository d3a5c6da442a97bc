// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the crossscan library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for the layers below the search façade
//!   ([`SourceError`] from source clients, [`NormalizeError`] from the
//!   normalizer)
//! - **Unified error type** ([`SearchError`]) returned by every public search
//!   operation, tagged with a stable [`ErrorType`]
//!
//! # Propagation
//!
//! | Type | Retried | Surfaced as |
//! |---|---|---|
//! | `INVALID_INPUT` | never | immediately, with the validation message |
//! | `NOT_FOUND` | never | immediately, suggesting the other network |
//! | `NETWORK_ERROR`, `TIMEOUT`, `RATE_LIMITED` | up to the retry policy | after exhaustion |
//! | `UNKNOWN` | no | immediately |
//!
//! # Example
//!
//! ```rust,ignore
//! use crossscan::{ErrorType, SearchError, SearchOptions};
//!
//! match orchestrator.search(query, SearchOptions::default()).await {
//!     Ok(result) => println!("{} transaction(s)", result.transactions.len()),
//!     Err(e) if e.error_type() == ErrorType::NotFound => eprintln!("{e}"),
//!     Err(e) => eprintln!("[{}] {e}", e.error_type()),
//! }
//! ```

mod normalize;
mod source;

pub use normalize::NormalizeError;
pub use source::SourceError;

use serde::{Deserialize, Serialize};

use crate::types::network::Network;

/// Stable tag of every error surfaced by a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    InvalidInput,
    NotFound,
    NetworkError,
    Timeout,
    RateLimited,
    Unknown,
}

impl ErrorType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorType::InvalidInput => "INVALID_INPUT",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::NetworkError => "NETWORK_ERROR",
            ErrorType::Timeout => "TIMEOUT",
            ErrorType::RateLimited => "RATE_LIMITED",
            ErrorType::Unknown => "UNKNOWN",
        }
    }

    /// Whether the retry executor may have retried this class of failure
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorType::NetworkError | ErrorType::Timeout | ErrorType::RateLimited
        )
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic context attached to a [`SearchError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchErrorContext {
    /// Query as the caller typed it
    pub query: String,
    pub network: Network,
    /// Pipeline step that failed, e.g. `"chain lookup"`
    pub operation: String,
}

impl SearchErrorContext {
    pub fn new(query: impl Into<String>, network: Network, operation: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            network,
            operation: operation.into(),
        }
    }
}

/// Unified error type for search operations.
///
/// Every variant carries a human-readable message and the
/// [`SearchErrorContext`] of the failing call. Use [`SearchError::error_type`]
/// for the stable tag.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query is neither a transaction identifier nor an address
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        context: SearchErrorContext,
    },

    /// No source knows the identifier on this network
    #[error("{message}")]
    NotFound {
        message: String,
        context: SearchErrorContext,
    },

    /// Connection or server failure that outlived the retry policy
    #[error("Network error during {}: {message}", .context.operation)]
    Network {
        message: String,
        context: SearchErrorContext,
        #[source]
        source: Option<SourceError>,
    },

    /// A source did not answer in time, even after retries
    #[error("Request timed out during {}: {message}", .context.operation)]
    Timeout {
        message: String,
        context: SearchErrorContext,
        #[source]
        source: Option<SourceError>,
    },

    /// A source kept rate limiting us, even after retries
    #[error("Rate limited during {}: {message}", .context.operation)]
    RateLimited {
        message: String,
        context: SearchErrorContext,
        #[source]
        source: Option<SourceError>,
    },

    /// Anything that does not fit the categories above
    #[error("Unexpected error during {}: {message}", .context.operation)]
    Unknown {
        message: String,
        context: SearchErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SearchError {
    /// Create an `InvalidInput` error
    pub fn invalid_input(message: impl Into<String>, context: SearchErrorContext) -> Self {
        SearchError::InvalidInput {
            message: message.into(),
            context,
        }
    }

    /// Create a `NotFound` error whose message lists what the user can do next
    pub fn not_found(identifier: &str, context: SearchErrorContext) -> Self {
        let network = context.network;
        let message = format!(
            "Transaction {identifier} was not found on {network} as a regular or cross-chain \
             transaction. Next steps: switch to the {other} network (the same identifier format \
             is valid on both networks); if it was submitted recently, wait for it to be indexed; \
             or retry later if a source was temporarily unavailable.",
            other = network.other(),
        );
        SearchError::NotFound { message, context }
    }

    /// Create an `Unknown` error from any error type
    pub fn unknown(
        message: impl Into<String>,
        context: SearchErrorContext,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SearchError::Unknown {
            message: message.into(),
            context,
            source: Some(Box::new(source)),
        }
    }

    /// Map a source failure into the taxonomy
    pub fn from_source(source: SourceError, context: SearchErrorContext) -> Self {
        let message = source.to_string();
        match source.error_type() {
            ErrorType::InvalidInput => SearchError::InvalidInput { message, context },
            ErrorType::NotFound => SearchError::NotFound { message, context },
            ErrorType::NetworkError => SearchError::Network {
                message,
                context,
                source: Some(source),
            },
            ErrorType::Timeout => SearchError::Timeout {
                message,
                context,
                source: Some(source),
            },
            ErrorType::RateLimited => SearchError::RateLimited {
                message,
                context,
                source: Some(source),
            },
            ErrorType::Unknown => SearchError::Unknown {
                message,
                context,
                source: Some(Box::new(source)),
            },
        }
    }

    /// The stable tag of this error
    pub fn error_type(&self) -> ErrorType {
        match self {
            SearchError::InvalidInput { .. } => ErrorType::InvalidInput,
            SearchError::NotFound { .. } => ErrorType::NotFound,
            SearchError::Network { .. } => ErrorType::NetworkError,
            SearchError::Timeout { .. } => ErrorType::Timeout,
            SearchError::RateLimited { .. } => ErrorType::RateLimited,
            SearchError::Unknown { .. } => ErrorType::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SearchError::InvalidInput { message, .. }
            | SearchError::NotFound { message, .. }
            | SearchError::Network { message, .. }
            | SearchError::Timeout { message, .. }
            | SearchError::RateLimited { message, .. }
            | SearchError::Unknown { message, .. } => message,
        }
    }

    pub fn context(&self) -> &SearchErrorContext {
        match self {
            SearchError::InvalidInput { context, .. }
            | SearchError::NotFound { context, .. }
            | SearchError::Network { context, .. }
            | SearchError::Timeout { context, .. }
            | SearchError::RateLimited { context, .. }
            | SearchError::Unknown { context, .. } => context,
        }
    }

    /// Serializable summary for display layers
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            error_type: self.error_type(),
            message: self.to_string(),
            context: self.context().clone(),
        }
    }
}

/// Serializable view of a [`SearchError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub message: String,
    pub context: SearchErrorContext,
}
