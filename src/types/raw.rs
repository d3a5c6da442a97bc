// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Source payloads before normalization
//!
//! Chain-native payloads are produced by a [`ChainSource`](crate::ChainSource)
//! and are already typed. Registry payloads are deserialized from JSON and are
//! deliberately lenient: numbers may arrive as strings or integers, fields may
//! be missing, and each outbound leg is kept as raw JSON so that one malformed
//! leg cannot fail the whole record.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, LogData, B256, U256};
use serde::{Deserialize, Deserializer, Serialize};

/// A transaction as returned by the chain-native source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub hash: B256,
    /// `None` while the transaction is still in the mempool
    pub block_number: Option<u64>,
    /// Seconds since the epoch, filled in when the block header was fetched
    pub block_timestamp: Option<u64>,
    pub from: Address,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub nonce: u64,
    pub input: Bytes,
}

/// A receipt as returned by the chain-native source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReceipt {
    /// EIP-658 status flag; `None` when the receipt carries no status
    pub status: Option<bool>,
    pub gas_used: u64,
    pub effective_gas_price: Option<u128>,
    pub block_number: Option<u64>,
    pub logs: Vec<RawLog>,
}

/// A single receipt log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub inner: alloy_primitives::Log,
    pub log_index: Option<u64>,
}

impl RawLog {
    /// Build a log without validating the topic count
    pub fn new(address: Address, topics: Vec<B256>, data: Bytes, log_index: Option<u64>) -> Self {
        Self {
            inner: alloy_primitives::Log {
                address,
                data: LogData::new_unchecked(topics, data),
            },
            log_index,
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub fn topics(&self) -> &[B256] {
        self.inner.data.topics()
    }
}

/// Whatever a token contract answered to `symbol()`, `name()` and `decimals()`
///
/// Each call can fail independently; a fully empty value is reported by the
/// source as an error instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnChainTokenMetadata {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
}

impl OnChainTokenMetadata {
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.name.is_none() && self.decimals.is_none()
    }
}

/// A cross-chain registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCrossChainRecord {
    /// Registry identifier of the transfer
    #[serde(default, deserialize_with = "lenient_string")]
    pub index: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub creator: Option<String>,
    #[serde(default)]
    pub cctx_status: Option<RegistryStatusInfo>,
    #[serde(default)]
    pub inbound_params: Option<InboundParams>,
    /// Outbound legs, parsed one by one during normalization
    #[serde(default)]
    pub outbound_params: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub protocol_contract_version: Option<String>,
}

/// Status block of a registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStatusInfo {
    #[serde(default)]
    pub status: Option<RegistryStatus>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_message: Option<String>,
    #[serde(
        default,
        rename = "lastUpdate_timestamp",
        deserialize_with = "lenient_u64"
    )]
    pub last_update_timestamp: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub created_timestamp: Option<u64>,
}

/// Registry status as either its numeric code or its name
///
/// Any other JSON shape is kept as [`RegistryStatus::Other`] so the record
/// still parses; it normalizes to pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryStatus {
    Code(u64),
    Name(String),
    Other(serde_json::Value),
}

impl std::fmt::Display for RegistryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryStatus::Code(code) => write!(f, "{code}"),
            RegistryStatus::Name(name) => f.write_str(name),
            RegistryStatus::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Inbound (source chain) side of a registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub sender_chain_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tx_origin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coin_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset: Option<String>,
    #[serde(default, deserialize_with = "lenient_u256")]
    pub amount: Option<U256>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub observed_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub observed_external_height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub finalized_zeta_height: Option<u64>,
}

/// Outbound (destination chain) leg of a registry record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub receiver: Option<String>,
    #[serde(
        default,
        rename = "receiver_chainId",
        alias = "receiver_chain_id",
        deserialize_with = "lenient_u64"
    )]
    pub receiver_chain_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u256")]
    pub amount: Option<U256>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_u256")]
    pub gas_used: Option<U256>,
    #[serde(default, deserialize_with = "lenient_u256")]
    pub gas_price: Option<U256>,
    #[serde(default, deserialize_with = "lenient_u256")]
    pub effective_gas_price: Option<U256>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub observed_external_height: Option<u64>,
}

/// A JSON value that is either a number or a string holding one
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
        Some(NumberOrString::Other(_)) | None => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(U256::from(n)),
        Some(NumberOrString::String(s)) if !s.trim().is_empty() => U256::from_str(s.trim()).ok(),
        _ => None,
    })
}
