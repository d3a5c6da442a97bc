// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by the source clients.
//!
//! A source reports "this identifier does not exist" by returning `Ok(None)`.
//! [`SourceError::NotFound`] is reserved for the cases where the transport
//! itself answers not-found (e.g. an HTTP 404 on a path that should exist).

use std::time::Duration;

use super::ErrorType;

/// Errors that can occur while talking to a chain or registry source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source answered that the requested resource does not exist
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// The source rejected the request itself (4xx-equivalent)
    #[error("Invalid request during {operation}: {details}")]
    InvalidRequest {
        operation: String,
        details: String,
    },

    /// The source answered with an unexpected HTTP status
    #[error("HTTP {status} during {operation}")]
    Http {
        operation: String,
        status: u16,
    },

    /// The source asked us to slow down
    #[error("Rate limited during {operation}")]
    RateLimited {
        operation: String,
    },

    /// The call did not complete within its deadline
    #[error("{operation} timed out after {}ms", .elapsed.as_millis())]
    Timeout {
        operation: String,
        elapsed: Duration,
    },

    /// The response arrived but could not be decoded
    #[error("Failed to decode response for {operation}: {details}")]
    Decode {
        operation: String,
        details: String,
    },

    /// Connection-level failure
    #[error("Transport failure during {operation}")]
    Transport {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SourceError {
    /// Helper to create a `NotFound` error
    pub fn not_found(resource: impl Into<String>) -> Self {
        SourceError::NotFound {
            resource: resource.into(),
        }
    }

    /// Helper to create an `InvalidRequest` error
    pub fn invalid_request(operation: impl Into<String>, details: impl Into<String>) -> Self {
        SourceError::InvalidRequest {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Helper to create a `Timeout` error
    pub fn timeout(operation: impl Into<String>, elapsed: Duration) -> Self {
        SourceError::Timeout {
            operation: operation.into(),
            elapsed,
        }
    }

    /// Helper to create a `Decode` error
    pub fn decode(operation: impl Into<String>, details: impl std::fmt::Display) -> Self {
        SourceError::Decode {
            operation: operation.into(),
            details: details.to_string(),
        }
    }

    /// Helper to create a `Transport` error from any error type
    pub fn transport(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SourceError::Transport {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(operation: impl Into<String>, status: u16) -> Self {
        let operation = operation.into();
        match status {
            404 => SourceError::NotFound {
                resource: operation,
            },
            429 => SourceError::RateLimited { operation },
            400..=499 => SourceError::InvalidRequest {
                details: format!("HTTP {status}"),
                operation,
            },
            _ => SourceError::Http { operation, status },
        }
    }

    /// Whether retrying the same call can never succeed
    ///
    /// Not-found answers, rejected requests and any 4xx status other than 429
    /// are final. Everything else (timeouts, rate limits, 5xx, transport and
    /// decode failures) may be transient.
    pub fn is_non_retryable(&self) -> bool {
        match self {
            SourceError::NotFound { .. } | SourceError::InvalidRequest { .. } => true,
            SourceError::Http { status, .. } => (400..500).contains(status) && *status != 429,
            SourceError::RateLimited { .. }
            | SourceError::Timeout { .. }
            | SourceError::Decode { .. }
            | SourceError::Transport { .. } => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    /// Position of this failure in the public error taxonomy
    pub fn error_type(&self) -> ErrorType {
        match self {
            SourceError::NotFound { .. } => ErrorType::NotFound,
            SourceError::InvalidRequest { .. } => ErrorType::InvalidInput,
            SourceError::Http { .. } | SourceError::Transport { .. } => ErrorType::NetworkError,
            SourceError::RateLimited { .. } => ErrorType::RateLimited,
            SourceError::Timeout { .. } => ErrorType::Timeout,
            SourceError::Decode { .. } => ErrorType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(SourceError::from_status("get", 404).is_not_found());
        assert!(matches!(
            SourceError::from_status("get", 429),
            SourceError::RateLimited { .. }
        ));
        assert!(matches!(
            SourceError::from_status("get", 400),
            SourceError::InvalidRequest { .. }
        ));
        assert!(matches!(
            SourceError::from_status("get", 503),
            SourceError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn test_retryability() {
        assert!(SourceError::not_found("tx").is_non_retryable());
        assert!(SourceError::invalid_request("get", "bad hash").is_non_retryable());
        assert!(SourceError::Http {
            operation: "get".into(),
            status: 418
        }
        .is_non_retryable());
        assert!(!SourceError::from_status("get", 429).is_non_retryable());
        assert!(!SourceError::from_status("get", 502).is_non_retryable());
        assert!(!SourceError::timeout("get", Duration::from_secs(1)).is_non_retryable());
        assert!(!SourceError::decode("get", "eof").is_non_retryable());
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SourceError::timeout("get", Duration::from_millis(5)).error_type(),
            ErrorType::Timeout
        );
        assert_eq!(
            SourceError::from_status("get", 500).error_type(),
            ErrorType::NetworkError
        );
        assert_eq!(
            SourceError::from_status("get", 429).error_type(),
            ErrorType::RateLimited
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = SourceError::timeout("eth_getTransactionByHash", Duration::from_millis(1500));
        assert_eq!(
            err.to_string(),
            "eth_getTransactionByHash timed out after 1500ms"
        );
    }
}
