// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical ERC-20 Transfer event definition
//!
//! # Event Signature
//!
//! - **Transfer**: `Transfer(address,address,uint256)`
//!
//! # Example: Decoding a receipt log
//!
//! ```rust,ignore
//! use crossscan::events::Transfer;
//! use alloy_sol_types::SolEvent;
//!
//! if log.topics().first() == Some(&Transfer::SIGNATURE_HASH) {
//!     let event = Transfer::decode_log(&log.inner)?;
//!     println!("{} -> {}: {}", event.from, event.to, event.value);
//! }
//! ```

use std::fmt::Debug;

use alloy_sol_types::sol;

sol! {
    /// ERC-20 Transfer event
    ///
    /// Emitted when tokens move between addresses, including mints
    /// (`from = 0x0`) and burns (`to = 0x0`).
    ///
    /// # Fields
    ///
    /// - `from`: Address tokens are transferred from (indexed)
    /// - `to`: Address tokens are transferred to (indexed)
    /// - `value`: Amount of tokens transferred (raw, not adjusted for decimals)
    event Transfer(address indexed from, address indexed to, uint256 value);
}

impl Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transfer(from: {}, to: {}, value: {})",
            self.from, self.to, self.value
        )
    }
}
