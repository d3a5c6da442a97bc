// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for payload normalization.

/// Errors that abort normalization of a payload.
///
/// Missing or malformed *derived* data (a bad log, an unreachable token
/// contract, an unparsable outbound leg) never produces one of these; it only
/// degrades the corresponding field of the record.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A field without which the record cannot be identified is absent
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },
}

impl NormalizeError {
    pub fn missing_field(field: &'static str) -> Self {
        NormalizeError::MissingField { field }
    }
}
