// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport utilities shared by every source client.
//!
//! - [`RetryExecutor`] retries transient failures with exponential backoff
//! - [`with_timeout`] races a call against a deadline
//! - [`RpcTraceLayer`] traces each JSON-RPC request of an alloy client
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crossscan::transport::{with_timeout, RetryExecutor, RetryPolicy};
//! use std::time::Duration;
//!
//! let executor = RetryExecutor::new(RetryPolicy::cross_chain());
//! let record = executor
//!     .execute("cctx lookup", || {
//!         with_timeout("cctx lookup", Duration::from_secs(10), registry.get_by_hash(hash))
//!     })
//!     .await?;
//! ```

mod retry;
mod trace;

use std::{future::Future, time::Duration};

pub use retry::{
    calculate_backoff, RetryExecutor, RetryFailure, RetryPolicy, RetryPolicyBuilder, Retryable,
};
pub use trace::{RpcTraceLayer, RpcTraceService};

use crate::errors::SourceError;

/// Race `fut` against `deadline`.
///
/// An elapsed deadline becomes [`SourceError::Timeout`], which the retry
/// executor treats as transient.
pub async fn with_timeout<T, F>(operation: &str, deadline: Duration, fut: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!(operation, deadline_ms = deadline.as_millis() as u64, "Deadline elapsed");
            Err(SourceError::timeout(operation, deadline))
        }
    }
}
