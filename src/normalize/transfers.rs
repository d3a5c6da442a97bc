// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 transfer extraction from receipt logs

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;
use tracing::debug;

use crate::events::Transfer;
use crate::types::raw::RawLog;
use crate::types::transaction::{TokenMetadata, TokenTransfer};

/// A decoded `Transfer` log, before token metadata is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub log_index: Option<u64>,
}

impl DecodedTransfer {
    /// Attach resolved metadata and format the amount
    pub fn with_metadata(&self, metadata: &TokenMetadata) -> TokenTransfer {
        TokenTransfer {
            token: self.token,
            from: self.from,
            to: self.to,
            raw_amount: self.value,
            amount: metadata.decimals.format_amount(self.value),
            symbol: metadata.symbol.clone(),
            name: metadata.name.clone(),
            decimals: metadata.decimals,
            provenance: metadata.provenance,
            log_index: self.log_index,
        }
    }
}

/// Decode every well-formed ERC-20 `Transfer` log, in log order.
///
/// Logs with another topic0 are ignored. Logs with the transfer signature
/// that fail to decode (e.g. ERC-721 transfers with an indexed token id) are
/// skipped.
pub fn decode_transfers(logs: &[RawLog]) -> Vec<DecodedTransfer> {
    logs.iter()
        .filter(|log| log.topics().first() == Some(&Transfer::SIGNATURE_HASH))
        .filter_map(|log| match Transfer::decode_log(&log.inner) {
            Ok(event) => Some(DecodedTransfer {
                token: log.address(),
                from: event.from,
                to: event.to,
                value: event.value,
                log_index: log.log_index,
            }),
            Err(e) => {
                debug!(
                    token = %log.address(),
                    log_index = ?log.log_index,
                    error = %e,
                    "Skipping malformed Transfer log"
                );
                None
            }
        })
        .collect()
}

/// Distinct token contracts, in first-seen order
pub fn distinct_tokens(transfers: &[DecodedTransfer]) -> Vec<Address> {
    let mut tokens: Vec<Address> = Vec::new();
    for transfer in transfers {
        if !tokens.contains(&transfer.token) {
            tokens.push(transfer.token);
        }
    }
    tokens
}

#[cfg(test)]
pub(crate) mod test_support {
    use alloy_primitives::{Address, Bytes, B256, U256};
    use alloy_sol_types::SolEvent;

    use crate::events::Transfer;
    use crate::types::raw::RawLog;

    /// A well-formed Transfer log
    pub fn transfer_log(token: Address, from: Address, to: Address, value: u64, index: u64) -> RawLog {
        RawLog::new(
            token,
            vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
            Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec()),
            Some(index),
        )
    }

    pub fn other_log(address: Address) -> RawLog {
        RawLog::new(address, vec![B256::repeat_byte(0x42)], Bytes::new(), Some(99))
    }
}
