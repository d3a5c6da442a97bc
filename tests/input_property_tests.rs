// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for query classification
//!
//! These tests use proptest to validate the classifier over arbitrary
//! hex strings, prefixes, casing and garbage input.

use crossscan::{classify, validate_search_input, InputKind};
use proptest::prelude::*;

// Helper to generate hex strings of an exact length in mixed case
fn arb_hex(len: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[0-9a-fA-F]{{{len}}}")).unwrap()
}

// Helper to generate an optional 0x / 0X prefix
fn arb_prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("0x"), Just("0X")]
}

proptest! {
    /// Property: 64 hex characters are a transaction id, with or without prefix
    #[test]
    fn prop_64_hex_is_transaction_id(body in arb_hex(64), prefix in arb_prefix()) {
        let query = format!("{prefix}{body}");
        let validation = validate_search_input(&query);
        prop_assert!(validation.is_valid);
        prop_assert_eq!(validation.kind, InputKind::TransactionId);
        prop_assert!(validation.error.is_none());
    }

    /// Property: 40 hex characters are an address
    #[test]
    fn prop_40_hex_is_address(body in arb_hex(40), prefix in arb_prefix()) {
        let validation = validate_search_input(&format!("{prefix}{body}"));
        prop_assert!(validation.is_valid);
        prop_assert_eq!(validation.kind, InputKind::Address);
    }

    /// Property: normalization is 0x plus the lowercase body
    #[test]
    fn prop_normalized_is_lowercase_prefixed(body in arb_hex(64), prefix in arb_prefix()) {
        let classification = classify(&format!("  {prefix}{body}\n"));
        prop_assert_eq!(classification.normalized, Some(format!("0x{}", body.to_lowercase())));
    }

    /// Property: non-empty strings shorter than 40 characters are rejected with a message
    #[test]
    fn prop_short_input_is_invalid(query in "[!-~]{1,39}") {
        let validation = validate_search_input(&query);
        prop_assert!(!validation.is_valid);
        prop_assert_eq!(validation.kind, InputKind::Invalid);
        prop_assert!(validation.error.is_some_and(|e| !e.is_empty()));
    }

    /// Property: strings longer than 66 characters are rejected with a message
    #[test]
    fn prop_long_input_is_invalid(query in "[!-~]{67,120}") {
        let validation = validate_search_input(&query);
        prop_assert!(!validation.is_valid);
        prop_assert!(validation.error.is_some_and(|e| !e.is_empty()));
    }

    /// Property: a single non-hex character anywhere invalidates a transaction id
    #[test]
    fn prop_non_hex_character_is_invalid(
        body in arb_hex(64),
        position in 0usize..64,
        bad in "[g-zG-Z_!@#]",
    ) {
        let mut chars: Vec<char> = body.chars().collect();
        chars[position] = bad.chars().next().unwrap();
        let query: String = chars.into_iter().collect();

        let validation = validate_search_input(&query);
        prop_assert!(!validation.is_valid);
        prop_assert!(validation.error.is_some_and(|e| !e.is_empty()));
    }

    /// Property: classification is pure
    #[test]
    fn prop_classification_is_deterministic(query in ".{0,80}") {
        prop_assert_eq!(classify(&query), classify(&query));
    }
}

#[test]
fn test_empty_input_has_no_error_message() {
    let validation = validate_search_input("   ");
    assert!(!validation.is_valid);
    assert_eq!(validation.kind, InputKind::Invalid);
    assert!(validation.error.is_none());
}

#[test]
fn test_address_example() {
    let query = format!("0x{}", "ab".repeat(20));
    let validation = validate_search_input(&query);
    assert!(validation.is_valid);
    assert_eq!(validation.kind, InputKind::Address);
}
