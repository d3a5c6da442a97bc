// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token decimal precision type

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// ERC-20 token decimal precision
///
/// Represents the number of decimal places for a token. Most ERC-20 tokens
/// use 18 decimals (like ETH), but some use different values:
/// - USDC / USDT: 6 decimals
/// - BTC-backed tokens: 8 decimals
/// - Standard: 18 decimals
///
/// # Examples
///
/// ```
/// use crossscan::TokenDecimals;
///
/// let eth_decimals = TokenDecimals::STANDARD;
/// assert_eq!(eth_decimals.as_u8(), 18);
///
/// let usdc_decimals = TokenDecimals::USDC;
/// assert_eq!(usdc_decimals.as_u8(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// Largest precision U256 can still scale without overflowing 10^n
    pub const MAX_SUPPORTED: u8 = 77;

    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// USDC / USDT decimals (6)
    pub const USDC: Self = Self(6);

    /// BTC-backed token decimals (8)
    pub const BTC: Self = Self(8);

    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Check if decimals are in the range U256 scaling can represent
    pub const fn is_supported(&self) -> bool {
        self.0 <= Self::MAX_SUPPORTED
    }

    /// Format a raw on-chain amount as a decimal string
    ///
    /// Uses integer arithmetic only, so no precision is lost for large
    /// amounts. Trailing zeros of the fractional part are removed and a whole
    /// number is printed without a decimal point.
    ///
    /// ```
    /// use alloy_primitives::U256;
    /// use crossscan::TokenDecimals;
    ///
    /// assert_eq!(TokenDecimals::USDC.format_amount(U256::from(1_500_000u64)), "1.5");
    /// assert_eq!(TokenDecimals::STANDARD.format_amount(U256::ZERO), "0");
    /// ```
    pub fn format_amount(&self, raw_amount: U256) -> String {
        if self.0 == 0 || !self.is_supported() {
            return raw_amount.to_string();
        }

        let divisor = U256::from(10u64).pow(U256::from(self.0));
        let whole = raw_amount / divisor;
        let fractional = raw_amount % divisor;

        let fractional_str = format!("{:0width$}", fractional, width = self.0 as usize);
        let trimmed = fractional_str.trim_end_matches('0');

        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{trimmed}")
        }
    }
}

impl Default for TokenDecimals {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}
