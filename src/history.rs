// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Search history
//!
//! The orchestrator records every successful search through a
//! [`HistoryStore`]. How entries are persisted is up to the store;
//! [`MemoryHistoryStore`] keeps a bounded, deduplicated list in memory.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::input::InputKind;
use crate::types::network::Network;

/// Default number of suggestions returned when the filter sets no limit
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// One recorded search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub kind: InputKind,
    pub network: Network,
    pub result_count: usize,
    pub successful: bool,
    pub searched_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry stamped with the current time
    pub fn new(
        query: impl Into<String>,
        kind: InputKind,
        network: Network,
        result_count: usize,
        successful: bool,
    ) -> Self {
        Self {
            query: query.into(),
            kind,
            network,
            result_count,
            successful,
            searched_at: Utc::now(),
        }
    }
}

/// Narrows history and suggestion queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub network: Option<Network>,
    pub kind: Option<InputKind>,
    pub successful_only: bool,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn successful_only(mut self) -> Self {
        self.successful_only = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, entry: &HistoryEntry) -> bool {
        self.network.is_none_or(|n| n == entry.network)
            && self.kind.is_none_or(|k| k == entry.kind)
            && (!self.successful_only || entry.successful)
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn add_search(&self, entry: HistoryEntry);

    /// Matching entries, newest first
    async fn get_history(&self, filter: &HistoryFilter) -> Vec<HistoryEntry>;

    /// Matching entries whose query contains `partial`, prefix matches first
    async fn get_suggestions(&self, partial: &str, filter: &HistoryFilter) -> Vec<HistoryEntry>;
}

/// Bounded in-memory history
///
/// Re-searching a `(query, network)` pair moves its entry to the front
/// instead of adding a duplicate. Once full, the oldest entry is dropped.
#[derive(Debug)]
pub struct MemoryHistoryStore {
    max_entries: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn add_search(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().await;
        entries.retain(|e| !(e.network == entry.network && e.query.eq_ignore_ascii_case(&entry.query)));
        entries.push_front(entry);
        entries.truncate(self.max_entries);
    }

    async fn get_history(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .filter(|e| filter.matches(e))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    async fn get_suggestions(&self, partial: &str, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        let needle = partial.trim().to_lowercase();
        let entries = self.entries.lock().await;

        let (mut prefixed, contained): (Vec<_>, Vec<_>) = entries
            .iter()
            .filter(|e| filter.matches(e))
            .filter(|e| e.query.to_lowercase().contains(&needle))
            .partition(|e| e.query.to_lowercase().starts_with(&needle));

        prefixed.extend(contained);
        prefixed
            .into_iter()
            .take(filter.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT))
            .cloned()
            .collect()
    }
}
