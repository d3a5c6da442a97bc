// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Query classification
//!
//! A raw query is either a 32-byte transaction identifier, a 20-byte account
//! address, or invalid. Classification is pure and never touches the network.
//!
//! ```rust
//! use crossscan::input::{classify, InputKind};
//!
//! let c = classify("  0xABCDEF0123456789abcdef0123456789ABCDEF01  ");
//! assert_eq!(c.kind, InputKind::Address);
//! assert_eq!(
//!     c.normalized.as_deref(),
//!     Some("0xabcdef0123456789abcdef0123456789abcdef01")
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Hex length of a transaction identifier, without prefix
pub const TRANSACTION_ID_HEX_LEN: usize = 64;

/// Hex length of an address, without prefix
pub const ADDRESS_HEX_LEN: usize = 40;

/// Longest accepted query, prefix included
const MAX_QUERY_LEN: usize = TRANSACTION_ID_HEX_LEN + 2;

/// What a query was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    TransactionId,
    Address,
    Invalid,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            InputKind::TransactionId => "transactionId",
            InputKind::Address => "address",
            InputKind::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full classification of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub valid: bool,
    pub kind: InputKind,
    /// `0x`-prefixed lowercase form, present only when valid
    pub normalized: Option<String>,
    /// Diagnostic for invalid non-empty input
    pub error: Option<String>,
}

impl Classification {
    fn accepted(kind: InputKind, body: &str) -> Self {
        Self {
            valid: true,
            kind,
            normalized: Some(format!("0x{}", body.to_ascii_lowercase())),
            error: None,
        }
    }

    fn rejected(error: Option<String>) -> Self {
        Self {
            valid: false,
            kind: InputKind::Invalid,
            normalized: None,
            error,
        }
    }
}

/// Consumer-facing projection of [`Classification`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValidation {
    pub is_valid: bool,
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Classification> for InputValidation {
    fn from(c: Classification) -> Self {
        Self {
            is_valid: c.valid,
            kind: c.kind,
            error: c.error,
        }
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Classify and canonicalize a raw query
pub fn classify(raw: &str) -> Classification {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Classification::rejected(None);
    }

    let body = strip_hex_prefix(trimmed);
    if is_hex(body) {
        match body.len() {
            TRANSACTION_ID_HEX_LEN => {
                return Classification::accepted(InputKind::TransactionId, body)
            }
            ADDRESS_HEX_LEN => return Classification::accepted(InputKind::Address, body),
            _ => {}
        }
    }

    let len = trimmed.chars().count();
    let error = if len < ADDRESS_HEX_LEN {
        "Input is too short to be a transaction hash or an address".to_string()
    } else if len > MAX_QUERY_LEN {
        "Input is too long to be a transaction hash or an address".to_string()
    } else if !is_hex(body) {
        "Input contains invalid characters; only hexadecimal digits are allowed".to_string()
    } else {
        format!(
            "Expected a transaction hash ({TRANSACTION_ID_HEX_LEN} hex characters) or an \
             address ({ADDRESS_HEX_LEN} hex characters), optionally prefixed with 0x"
        )
    };
    Classification::rejected(Some(error))
}

/// Validate a query for display purposes
pub fn validate_search_input(query: &str) -> InputValidation {
    classify(query).into()
}
