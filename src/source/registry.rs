// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`CrossChainSource`] over the registry REST API
//!
//! Lookups try the registry index first and then the inbound-hash index:
//!
//! ```text
//! GET {base}/zeta-chain/crosschain/cctx/{hash}
//! GET {base}/zeta-chain/crosschain/inboundHashToCctxData/{hash}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, Instrument};

use super::CrossChainSource;
use crate::errors::SourceError;
use crate::spans;
use crate::types::network::Network;
use crate::types::raw::RawCrossChainRecord;

const CCTX_PATH: &str = "zeta-chain/crosschain/cctx";
const INBOUND_HASH_PATH: &str = "zeta-chain/crosschain/inboundHashToCctxData";

#[derive(Debug, Deserialize)]
struct CctxResponse {
    #[serde(rename = "CrossChainTx", default)]
    cross_chain_tx: Option<RawCrossChainRecord>,
}

#[derive(Debug, Deserialize)]
struct InboundHashResponse {
    #[serde(rename = "CrossChainTxs", default)]
    cross_chain_txs: Vec<RawCrossChainRecord>,
}

/// HTTP client for the cross-chain registry of one network
#[derive(Debug, Clone)]
pub struct RegistryClient {
    network: Network,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RegistryClient {
    /// Creates a client for the registry at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidRequest`] if the URL cannot be parsed and
    /// [`SourceError::Transport`] if the HTTP client cannot be created.
    pub fn new(network: Network, base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        url::Url::parse(base_url).map_err(|e| {
            SourceError::invalid_request(
                "connect",
                format!("invalid registry URL {base_url:?}: {e}"),
            )
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::transport("create registry client", e))?;

        Ok(Self {
            network,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, hash: &str) -> String {
        format!("{}/{path}/{hash}", self.base_url)
    }

    /// GET a JSON document; a 404 becomes `Ok(None)`
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
    ) -> Result<Option<T>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(operation, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(operation, url, "Registry answered not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::from_status(operation, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(operation, e))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| SourceError::decode(operation, e))
    }

    async fn get_cctx(&self, hash: &str) -> Result<Option<RawCrossChainRecord>, SourceError> {
        let url = self.url(CCTX_PATH, hash);
        let response: Option<CctxResponse> = self.get_json("cctx lookup", &url).await?;
        Ok(response.and_then(|r| r.cross_chain_tx))
    }

    async fn get_by_inbound_hash(
        &self,
        hash: &str,
    ) -> Result<Option<RawCrossChainRecord>, SourceError> {
        let url = self.url(INBOUND_HASH_PATH, hash);
        let response: Option<InboundHashResponse> =
            self.get_json("inbound hash lookup", &url).await?;
        Ok(response.and_then(|r| r.cross_chain_txs.into_iter().next()))
    }

    fn map_reqwest_error(&self, operation: &str, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::timeout(operation, self.timeout)
        } else if let Some(status) = error.status() {
            SourceError::from_status(operation, status.as_u16())
        } else if error.is_decode() {
            SourceError::decode(operation, error)
        } else {
            SourceError::transport(operation, error)
        }
    }
}

#[async_trait]
impl CrossChainSource for RegistryClient {
    async fn get_by_hash(&self, hash: &str) -> Result<Option<RawCrossChainRecord>, SourceError> {
        async {
            if let Some(record) = self.get_cctx(hash).await? {
                return Ok(Some(record));
            }
            self.get_by_inbound_hash(hash).await
        }
        .instrument(spans::registry_lookup(self.network, hash))
        .await
    }
}
