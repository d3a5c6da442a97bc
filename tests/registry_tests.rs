// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for per-network orchestrators and network switching

use std::sync::atomic::Ordering;
use std::sync::Arc;

use alloy_primitives::Address;
use crossscan::{ErrorType, HistoryFilter, Network, OrchestratorRegistry, ResolverConfigBuilder, RetryPolicy, SearchOptions};

mod helpers;
use helpers::*;

fn factory_with_mainnet_tx(byte: u8) -> (MockSourceFactory, Arc<MockChainSource>) {
    let tx = raw_transaction(byte, Address::repeat_byte(0xaa), Address::repeat_byte(0xbb), vec![]);
    let (mainnet, chain, _) = sources(
        MockChainSource::new().with_transaction(tx, Some(receipt(true, vec![]))),
        MockCrossChainSource::new(),
    );
    let (testnet, _, _) = sources(MockChainSource::new(), MockCrossChainSource::new());
    let factory = MockSourceFactory::new()
        .with_sources(Network::Mainnet, mainnet)
        .with_sources(Network::Testnet, testnet);
    (factory, chain)
}

fn registry(factory: MockSourceFactory) -> (OrchestratorRegistry, Arc<MockSourceFactory>) {
    init_tracing();
    let factory = Arc::new(factory);
    let config = ResolverConfigBuilder::new()
        .retry_all(RetryPolicy::none())
        .build();
    (OrchestratorRegistry::new(config, factory.clone()), factory)
}

#[tokio::test]
async fn test_instances_are_built_lazily_and_reused() {
    let (factory, _) = factory_with_mainnet_tx(0x11);
    let (registry, factory) = registry(factory);
    assert_eq!(factory.creates.load(Ordering::SeqCst), 0);

    let first = registry.get_instance(Network::Mainnet).await.unwrap();
    let second = registry.active().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.creates.load(Ordering::SeqCst), 1);

    let testnet = registry.get_instance(Network::Testnet).await.unwrap();
    assert_eq!(testnet.network(), Network::Testnet);
    assert_eq!(factory.creates.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_switch_network_clears_caches_first() {
    let (factory, chain) = factory_with_mainnet_tx(0x11);
    let (registry, _) = registry(factory);

    let mainnet = registry.active().await.unwrap();
    mainnet.search(&tx_id(0x11), SearchOptions::default()).await.unwrap();
    let calls = chain.lookup_calls();

    assert!(registry.switch_network(Network::Testnet).await >= 1);
    assert_eq!(registry.active_network().await, Network::Testnet);

    // same identifier on the new network does not see the mainnet result
    let err = registry
        .active()
        .await
        .unwrap()
        .search(&tx_id(0x11), SearchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::NotFound);
    assert!(err.message().contains("mainnet"));

    // and switching back hits the source again
    registry.switch_network(Network::Mainnet).await;
    mainnet.search(&tx_id(0x11), SearchOptions::default()).await.unwrap();
    assert!(chain.lookup_calls() > calls);
}

#[tokio::test]
async fn test_history_is_shared_across_networks() {
    let (factory, _) = factory_with_mainnet_tx(0x11);
    let (registry, _) = registry(factory);

    registry
        .get_instance(Network::Mainnet)
        .await
        .unwrap()
        .search(&tx_id(0x11), SearchOptions::default())
        .await
        .unwrap();

    let testnet = registry.get_instance(Network::Testnet).await.unwrap();
    let all = testnet.get_search_history(&HistoryFilter::default()).await;
    assert_eq!(all.len(), 1);
    let testnet_only = testnet
        .get_search_history(&HistoryFilter::default().network(Network::Testnet))
        .await;
    assert!(testnet_only.is_empty());
}

#[tokio::test]
async fn test_factory_failure_is_reported() {
    let (registry, _) = registry(MockSourceFactory::new());
    let err = registry.active().await.unwrap_err();
    assert_eq!(err.error_type(), ErrorType::InvalidInput);
    assert_eq!(err.context().network, Network::Mainnet);
}
