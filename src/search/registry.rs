// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! One orchestrator per network, and the currently selected network

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::SearchOrchestrator;
use crate::config::ResolverConfig;
use crate::errors::{SearchError, SearchErrorContext};
use crate::history::{HistoryStore, MemoryHistoryStore};
use crate::source::SourceFactory;
use crate::types::network::Network;

/// Lazily built orchestrators keyed by network
///
/// All orchestrators share one history store. Switching networks clears the
/// caches of every orchestrator before the new network becomes active, so no
/// result of one network can be served on the other.
pub struct OrchestratorRegistry {
    config: ResolverConfig,
    factory: Arc<dyn SourceFactory>,
    history: Arc<dyn HistoryStore>,
    instances: Mutex<HashMap<Network, Arc<SearchOrchestrator>>>,
    active: Mutex<Network>,
}

impl std::fmt::Debug for OrchestratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OrchestratorRegistry {
    pub fn new(config: ResolverConfig, factory: Arc<dyn SourceFactory>) -> Self {
        let history = Arc::new(MemoryHistoryStore::new(config.history_max_entries));
        Self::with_history(config, factory, history)
    }

    pub fn with_history(
        config: ResolverConfig,
        factory: Arc<dyn SourceFactory>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            active: Mutex::new(config.default_network),
            config,
            factory,
            history,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// The orchestrator of `network`, built on first use
    pub async fn get_instance(&self, network: Network) -> Result<Arc<SearchOrchestrator>, SearchError> {
        let mut instances = self.instances.lock().await;
        if let Some(existing) = instances.get(&network) {
            return Ok(Arc::clone(existing));
        }

        let sources = self.factory.create(network, &self.config).map_err(|e| {
            SearchError::from_source(e, SearchErrorContext::new("", network, "connect sources"))
        })?;
        let orchestrator = Arc::new(SearchOrchestrator::with_history(
            network,
            sources,
            &self.config,
            Arc::clone(&self.history),
        ));
        instances.insert(network, Arc::clone(&orchestrator));
        info!(%network, "Created search orchestrator");
        Ok(orchestrator)
    }

    pub async fn active_network(&self) -> Network {
        *self.active.lock().await
    }

    /// The orchestrator of the active network
    pub async fn active(&self) -> Result<Arc<SearchOrchestrator>, SearchError> {
        let network = self.active_network().await;
        self.get_instance(network).await
    }

    /// Make `network` active after clearing the caches of every orchestrator
    pub async fn switch_network(&self, network: Network) -> usize {
        let mut active = self.active.lock().await;
        let instances: Vec<_> = self.instances.lock().await.values().cloned().collect();

        let mut removed = 0;
        for instance in instances {
            removed += instance.clear_cache().await;
        }

        let previous = std::mem::replace(&mut *active, network);
        info!(from = %previous, to = %network, removed, "Switched network");
        removed
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }
}
