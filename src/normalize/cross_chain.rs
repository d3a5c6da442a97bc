// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-chain registry record normalization

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::status::registry_status;
use crate::errors::NormalizeError;
use crate::types::network::Network;
use crate::types::raw::{OutboundParams, RawCrossChainRecord};
use crate::types::transaction::{CrossChainDetail, Transaction, TransactionKind};

/// Normalize a registry record into a [`Transaction`]
///
/// Only a missing `index` is an error. Everything else degrades to `None`
/// and malformed outbound legs are skipped.
pub fn normalize_cross_chain(
    network: Network,
    record: &RawCrossChainRecord,
) -> Result<Transaction, NormalizeError> {
    let index = record
        .index
        .as_deref()
        .map(str::trim)
        .filter(|index| !index.is_empty())
        .ok_or_else(|| NormalizeError::missing_field("index"))?;

    let outbound = outbound_legs(&record.outbound_params);
    let first_leg = outbound.first();
    let inbound = record.inbound_params.as_ref();
    let status_info = record.cctx_status.as_ref();
    let raw_status = status_info.and_then(|s| s.status.as_ref());

    let from = inbound
        .and_then(|i| i.sender.clone())
        .or_else(|| record.creator.clone())
        .unwrap_or_default();

    let value = inbound
        .and_then(|i| i.amount)
        .or_else(|| first_leg.and_then(|leg| leg.amount))
        .unwrap_or(U256::ZERO);

    let timestamp = status_info
        .and_then(|s| s.created_timestamp.or(s.last_update_timestamp))
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    let detail = CrossChainDetail {
        source_chain_id: inbound.and_then(|i| i.sender_chain_id),
        destination_chain_id: first_leg.and_then(|leg| leg.receiver_chain_id),
        bridge_contract: inbound.and_then(|i| i.asset.clone()).filter(|a| !a.is_empty()),
        inbound_hash: inbound.and_then(|i| i.observed_hash.clone()),
        outbound_hash: first_leg
            .and_then(|leg| leg.hash.clone())
            .filter(|hash| !hash.is_empty()),
        registry_status: raw_status.map_or_else(|| "unknown".to_string(), ToString::to_string),
        status_message: status_info.and_then(|s| {
            s.status_message
                .clone()
                .filter(|m| !m.is_empty())
                .or_else(|| s.error_message.clone().filter(|m| !m.is_empty()))
        }),
    };

    Ok(Transaction {
        hash: index.to_lowercase(),
        block_number: inbound.and_then(|i| i.finalized_zeta_height),
        timestamp,
        from,
        to: first_leg.and_then(|leg| leg.receiver.clone()),
        value,
        gas_used: first_leg.and_then(|leg| leg.gas_used),
        gas_price: first_leg.and_then(|leg| leg.effective_gas_price.or(leg.gas_price)),
        status: registry_status(raw_status),
        network,
        kind: TransactionKind::CrossChain,
        nonce: None,
        method_selector: None,
        token_transfers: Vec::new(),
        swap: None,
        cross_chain: Some(detail),
    })
}

fn outbound_legs(values: &[serde_json::Value]) -> Vec<OutboundParams> {
    values
        .iter()
        .enumerate()
        .filter_map(
            |(position, value)| match serde_json::from_value(value.clone()) {
                Ok(leg) => Some(leg),
                Err(e) => {
                    debug!(position, error = %e, "Skipping malformed outbound leg");
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::TransactionStatus;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RawCrossChainRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record() {
        let record = parse(json!({
            "index": "0xABCDEF",
            "creator": "zeta1creator",
            "cctx_status": {
                "status": "OutboundMined",
                "status_message": "",
                "created_timestamp": "1700000000",
                "lastUpdate_timestamp": "1700000100"
            },
            "inbound_params": {
                "sender": "0x1111111111111111111111111111111111111111",
                "sender_chain_id": "1",
                "asset": "0x2222222222222222222222222222222222222222",
                "amount": "5000",
                "observed_hash": "0xinbound",
                "finalized_zeta_height": 4200
            },
            "outbound_params": [{
                "receiver": "0x3333333333333333333333333333333333333333",
                "receiver_chainId": "7000",
                "amount": "4990",
                "hash": "0xoutbound",
                "gas_used": "21000",
                "effective_gas_price": "100"
            }]
        }));

        let tx = normalize_cross_chain(Network::Mainnet, &record).unwrap();
        assert_eq!(tx.hash, "0xabcdef");
        assert_eq!(tx.kind, TransactionKind::CrossChain);
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.from, "0x1111111111111111111111111111111111111111");
        assert_eq!(
            tx.to.as_deref(),
            Some("0x3333333333333333333333333333333333333333")
        );
        assert_eq!(tx.value, U256::from(5000u64));
        assert_eq!(tx.block_number, Some(4200));
        assert_eq!(tx.gas_used, Some(U256::from(21_000u64)));
        assert_eq!(tx.gas_price, Some(U256::from(100u64)));
        assert_eq!(tx.timestamp.unwrap().timestamp(), 1_700_000_000);

        let detail = tx.cross_chain.unwrap();
        assert_eq!(detail.source_chain_id, Some(1));
        assert_eq!(detail.destination_chain_id, Some(7000));
        assert_eq!(detail.registry_status, "OutboundMined");
        assert_eq!(detail.status_message, None);
        assert_eq!(detail.outbound_hash.as_deref(), Some("0xoutbound"));
    }

    #[test]
    fn test_missing_index_is_an_error() {
        let err = normalize_cross_chain(Network::Mainnet, &parse(json!({ "index": " " })))
            .unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField { field: "index" }));

        assert!(normalize_cross_chain(Network::Mainnet, &RawCrossChainRecord::default()).is_err());
    }

    #[test]
    fn test_malformed_leg_is_skipped() {
        let record = parse(json!({
            "index": "0x01",
            "creator": "zeta1creator",
            "cctx_status": { "status": 4, "error_message": "reverted on destination" },
            "outbound_params": [
                "not an object",
                { "receiver": "0xdead", "receiver_chainId": 56, "amount": 7 }
            ]
        }));

        let tx = normalize_cross_chain(Network::Testnet, &record).unwrap();
        assert_eq!(tx.status, TransactionStatus::Failed);
        assert_eq!(tx.from, "zeta1creator");
        assert_eq!(tx.to.as_deref(), Some("0xdead"));
        assert_eq!(tx.value, U256::from(7u64));
        let detail = tx.cross_chain.unwrap();
        assert_eq!(detail.destination_chain_id, Some(56));
        assert_eq!(detail.registry_status, "4");
        assert_eq!(detail.status_message.as_deref(), Some("reverted on destination"));
    }

    #[test]
    fn test_unknown_status_is_pending() {
        let record = parse(json!({ "index": "0x02", "cctx_status": { "status": "Mystery" } }));
        let tx = normalize_cross_chain(Network::Mainnet, &record).unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);

        let record = parse(json!({ "index": "0x03" }));
        let tx = normalize_cross_chain(Network::Mainnet, &record).unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.cross_chain.unwrap().registry_status, "unknown");
    }
}
