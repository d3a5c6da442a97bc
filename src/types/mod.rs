// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across the resolution pipeline.
//!
//! - [`network`]: the two networks a query can target
//! - [`transaction`]: the canonical transaction record and its derived parts
//! - [`search`]: search results, metadata and health reports
//! - [`raw`]: source payloads before normalization
//! - [`tokens`]: token decimal handling

pub mod network;
pub mod raw;
pub mod search;
pub mod tokens;
pub mod transaction;

// Note: Public types are re-exported from lib.rs, not here
