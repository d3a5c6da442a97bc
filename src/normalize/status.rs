// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Status unification
//!
//! | Registry status | Code | Unified |
//! |---|---|---|
//! | `PendingInbound`, `PendingOutbound`, `PendingRevert` | 1, 2 | pending |
//! | `OutboundMined` | 3 | success |
//! | `Aborted`, `Reverted` | 4, 5 | failed |
//! | anything else | | pending |

use crate::types::raw::{RawReceipt, RegistryStatus};
use crate::types::transaction::TransactionStatus;

/// Status of a chain-native transaction
///
/// No receipt yet, or a receipt without a status flag, is pending.
pub fn chain_native_status(receipt: Option<&RawReceipt>) -> TransactionStatus {
    match receipt.and_then(|r| r.status) {
        Some(true) => TransactionStatus::Success,
        Some(false) => TransactionStatus::Failed,
        None => TransactionStatus::Pending,
    }
}

/// Status of a registry record; never fails, unknown values are pending
pub fn registry_status(status: Option<&RegistryStatus>) -> TransactionStatus {
    match status {
        Some(RegistryStatus::Code(code)) => status_from_code(*code),
        Some(RegistryStatus::Name(name)) => status_from_name(name),
        Some(RegistryStatus::Other(_)) | None => TransactionStatus::Pending,
    }
}

fn status_from_code(code: u64) -> TransactionStatus {
    match code {
        3 => TransactionStatus::Success,
        4 | 5 => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

fn status_from_name(name: &str) -> TransactionStatus {
    let trimmed = name.trim();
    if let Ok(code) = trimmed.parse::<u64>() {
        return status_from_code(code);
    }

    let folded: String = trimmed
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    match folded.as_str() {
        "outboundmined" => TransactionStatus::Success,
        "aborted" | "reverted" => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Option<RegistryStatus> {
        Some(RegistryStatus::Name(s.to_string()))
    }

    #[test]
    fn test_registry_names() {
        let cases = [
            ("OutboundMined", TransactionStatus::Success),
            ("outbound_mined", TransactionStatus::Success),
            ("OUTBOUND-MINED", TransactionStatus::Success),
            ("PendingInbound", TransactionStatus::Pending),
            ("PendingOutbound", TransactionStatus::Pending),
            ("PendingRevert", TransactionStatus::Pending),
            ("Aborted", TransactionStatus::Failed),
            ("Reverted", TransactionStatus::Failed),
            ("SomethingNew", TransactionStatus::Pending),
            ("", TransactionStatus::Pending),
        ];
        for (raw, expected) in cases {
            assert_eq!(registry_status(name(raw).as_ref()), expected, "{raw}");
        }
    }

    #[test]
    fn test_registry_codes() {
        let expected = [
            (0, TransactionStatus::Pending),
            (1, TransactionStatus::Pending),
            (2, TransactionStatus::Pending),
            (3, TransactionStatus::Success),
            (4, TransactionStatus::Failed),
            (5, TransactionStatus::Failed),
            (99, TransactionStatus::Pending),
        ];
        for (code, status) in expected {
            assert_eq!(registry_status(Some(&RegistryStatus::Code(code))), status);
        }
        assert_eq!(registry_status(name("3").as_ref()), TransactionStatus::Success);
        assert_eq!(registry_status(None), TransactionStatus::Pending);
    }

    #[test]
    fn test_unexpected_status_shapes_are_pending() {
        use crate::types::raw::RawCrossChainRecord;
        use serde_json::json;

        for raw in [json!(3.0), json!(true), json!(-1), json!({ "code": 3 })] {
            let record: RawCrossChainRecord = serde_json::from_value(json!({
                "index": "0x01",
                "cctx_status": { "status": raw.clone() }
            }))
            .unwrap();
            let status = record.cctx_status.and_then(|info| info.status);
            assert_eq!(status, Some(RegistryStatus::Other(raw.clone())), "{raw}");
            assert_eq!(
                registry_status(status.as_ref()),
                TransactionStatus::Pending,
                "{raw}"
            );
        }
    }

    #[test]
    fn test_chain_native_status() {
        let receipt = |status| RawReceipt {
            status,
            gas_used: 21_000,
            effective_gas_price: None,
            block_number: Some(1),
            logs: Vec::new(),
        };
        assert_eq!(chain_native_status(None), TransactionStatus::Pending);
        assert_eq!(
            chain_native_status(Some(&receipt(Some(true)))),
            TransactionStatus::Success
        );
        assert_eq!(
            chain_native_status(Some(&receipt(Some(false)))),
            TransactionStatus::Failed
        );
        assert_eq!(
            chain_native_status(Some(&receipt(None))),
            TransactionStatus::Pending
        );
    }
}
