// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The two parallel networks a query can be resolved against

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A network the resolver can be pointed at.
///
/// Both networks accept the same identifier formats, so a hash that is not
/// found on one of them may well exist on the other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// All networks, in a stable order
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    /// EVM chain id of the network
    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => 7000,
            Network::Testnet => 7001,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// The network a user should try when a lookup misses on this one
    pub const fn other(self) -> Network {
        match self {
            Network::Mainnet => Network::Testnet,
            Network::Testnet => Network::Mainnet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known network
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown network: {0} (expected \"mainnet\" or \"testnet\")")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" | "athens" => Ok(Network::Testnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        assert_eq!(Network::Mainnet.chain_id(), 7000);
        assert_eq!(Network::Testnet.chain_id(), 7001);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" Testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("athens".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_other_network() {
        assert_eq!(Network::Mainnet.other(), Network::Testnet);
        assert_eq!(Network::Testnet.other(), Network::Mainnet);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Network::Testnet).unwrap();
        assert_eq!(json, "\"testnet\"");
    }
}
