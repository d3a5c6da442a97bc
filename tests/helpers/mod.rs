// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for crossscan integration tests
//!
//! Provides mock sources so that searches can run without a JSON-RPC
//! endpoint or a registry. Every mock counts the calls it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use crossscan::events::Transfer;
use crossscan::{
    ChainSource, CrossChainSource, Network, NetworkSources, OnChainTokenMetadata,
    RawCrossChainRecord, RawLog, RawReceipt, RawTransaction, ResolverConfig, SourceError,
    SourceFactory,
};

type ErrorFn = Box<dyn Fn() -> SourceError + Send + Sync>;

/// Mock ChainSource backed by in-memory maps
///
/// Unknown hashes answer `Ok(None)`. Use [`MockChainSource::failing_with`]
/// to make transaction lookups fail instead.
///
/// # Example
///
/// ```rust,ignore
/// let chain = MockChainSource::new()
///     .with_transaction(tx, Some(receipt))
///     .with_token(token, "ABC", 6);
/// ```
#[derive(Default)]
pub struct MockChainSource {
    transactions: HashMap<B256, RawTransaction>,
    receipts: HashMap<B256, RawReceipt>,
    tokens: HashMap<Address, OnChainTokenMetadata>,
    address_transactions: Vec<RawTransaction>,
    balance: U256,
    block_number: u64,
    delay: Option<Duration>,
    lookup_error: Option<ErrorFn>,
    pub transaction_calls: AtomicUsize,
    pub receipt_calls: AtomicUsize,
    pub block_number_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
    pub address_calls: AtomicUsize,
}

impl MockChainSource {
    pub fn new() -> Self {
        Self {
            block_number: 1_000,
            ..Self::default()
        }
    }

    pub fn with_transaction(mut self, tx: RawTransaction, receipt: Option<RawReceipt>) -> Self {
        if let Some(receipt) = receipt {
            self.receipts.insert(tx.hash, receipt);
        }
        self.transactions.insert(tx.hash, tx);
        self
    }

    pub fn with_token(mut self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.tokens.insert(
            token,
            OnChainTokenMetadata {
                symbol: Some(symbol.to_string()),
                name: Some(format!("{symbol} Token")),
                decimals: Some(decimals),
            },
        );
        self
    }

    pub fn with_address_transactions(mut self, txs: Vec<RawTransaction>, balance: U256) -> Self {
        self.address_transactions = txs;
        self.balance = balance;
        self
    }

    /// Every call sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Transaction, receipt and block number lookups fail with `error()`
    pub fn failing_with<F>(mut self, error: F) -> Self
    where
        F: Fn() -> SourceError + Send + Sync + 'static,
    {
        self.lookup_error = Some(Box::new(error));
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Calls that touched the chain for a transaction lookup
    pub fn lookup_calls(&self) -> usize {
        Self::calls(&self.transaction_calls) + Self::calls(&self.receipt_calls)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check(&self) -> Result<(), SourceError> {
        match &self.lookup_error {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainSource for MockChainSource {
    async fn get_transaction(&self, hash: B256) -> Result<Option<RawTransaction>, SourceError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check()?;
        Ok(self.transactions.get(&hash).cloned())
    }

    async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<RawReceipt>, SourceError> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check()?;
        Ok(self.receipts.get(&hash).cloned())
    }

    async fn get_current_block_number(&self) -> Result<u64, SourceError> {
        self.block_number_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check()?;
        Ok(self.block_number)
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, SourceError> {
        Ok(self.balance)
    }

    async fn get_block_timestamp(&self, number: u64) -> Result<Option<u64>, SourceError> {
        Ok(Some(1_700_000_000 + number))
    }

    async fn get_token_metadata(&self, token: Address) -> Result<OnChainTokenMetadata, SourceError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(&token)
            .cloned()
            .ok_or_else(|| SourceError::decode("token metadata", "execution reverted"))
    }

    async fn get_address_transactions(
        &self,
        address: Address,
        _blocks: u64,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, SourceError> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .address_transactions
            .iter()
            .filter(|tx| tx.from == address || tx.to == Some(address))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Mock CrossChainSource keyed by lowercase hash
#[derive(Default)]
pub struct MockCrossChainSource {
    records: HashMap<String, RawCrossChainRecord>,
    error: Option<ErrorFn>,
    pub calls: AtomicUsize,
}

impl MockCrossChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, hash: &str, record: RawCrossChainRecord) -> Self {
        self.records.insert(hash.to_lowercase(), record);
        self
    }

    pub fn failing_with<F>(mut self, error: F) -> Self
    where
        F: Fn() -> SourceError + Send + Sync + 'static,
    {
        self.error = Some(Box::new(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrossChainSource for MockCrossChainSource {
    async fn get_by_hash(&self, hash: &str) -> Result<Option<RawCrossChainRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.error {
            return Err(error());
        }
        Ok(self.records.get(&hash.to_lowercase()).cloned())
    }
}

/// Wrap mocks into the sources of a network, keeping handles for assertions
pub fn sources(
    chain: MockChainSource,
    cross_chain: MockCrossChainSource,
) -> (NetworkSources, Arc<MockChainSource>, Arc<MockCrossChainSource>) {
    let chain = Arc::new(chain);
    let cross_chain = Arc::new(cross_chain);
    let sources = NetworkSources {
        chain: chain.clone(),
        cross_chain: cross_chain.clone(),
    };
    (sources, chain, cross_chain)
}

/// SourceFactory handing out one pair of mocks per network
#[derive(Default)]
pub struct MockSourceFactory {
    sources: Mutex<HashMap<Network, NetworkSources>>,
    pub creates: AtomicUsize,
}

impl MockSourceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(self, network: Network, sources: NetworkSources) -> Self {
        self.sources.lock().unwrap().insert(network, sources);
        self
    }
}

impl SourceFactory for MockSourceFactory {
    fn create(&self, network: Network, _config: &ResolverConfig) -> Result<NetworkSources, SourceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.sources
            .lock()
            .unwrap()
            .get(&network)
            .cloned()
            .ok_or_else(|| SourceError::invalid_request("connect", format!("no sources for {network}")))
    }
}

/// Config without retries or backoff sleeps
pub fn fast_config() -> ResolverConfig {
    ResolverConfig::without_retries()
}

/// A mined transaction with a hash made of `byte`
pub fn raw_transaction(byte: u8, from: Address, to: Address, input: Vec<u8>) -> RawTransaction {
    RawTransaction {
        hash: B256::repeat_byte(byte),
        block_number: Some(500),
        block_timestamp: None,
        from,
        to: Some(to),
        value: U256::ZERO,
        gas_limit: 250_000,
        gas_price: Some(1_000_000_000),
        nonce: 7,
        input: Bytes::from(input),
    }
}

pub fn receipt(status: bool, logs: Vec<RawLog>) -> RawReceipt {
    RawReceipt {
        status: Some(status),
        gas_used: 120_000,
        effective_gas_price: Some(900_000_000),
        block_number: Some(500),
        logs,
    }
}

/// A well-formed ERC-20 Transfer log
pub fn transfer_log(token: Address, from: Address, to: Address, value: U256, index: u64) -> RawLog {
    RawLog::new(
        token,
        vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
        Bytes::from(value.to_be_bytes::<32>().to_vec()),
        Some(index),
    )
}

/// `"0x" + hex(byte) * 32`
pub fn tx_id(byte: u8) -> String {
    format!("0x{}", format!("{byte:02x}").repeat(32))
}

/// Route crate logs to the test output; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
