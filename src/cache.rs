// Copyright (c) 2025 Fintrack Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{MonthData, Target, Transaction};
use crate::monthkey::MonthKey;
use crate::summary::summarize;

/// In-memory store of every month visited this session.
///
/// Months are fetched at most once per session: a hit is served with no
/// network call and entries are only ever overwritten by a subsequent
/// mutation to the same key. Staleness across sessions is accepted; the
/// mutation coordinator is the sole writer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthCache {
    entries: HashMap<MonthKey, MonthData>,
}

impl MonthCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MonthKey) -> Option<&MonthData> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: MonthKey, data: MonthData) {
        self.entries.insert(key, data);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a transaction to a month's entry, recomputing its summary.
    /// A month that was never visited has no entry and is left alone: seeding
    /// one here would turn the first navigation into a cache hit and hide the
    /// server's pre-existing transactions for the rest of the session. The
    /// miss-fetch picks the new transaction up from the backend instead.
    pub fn apply_insert(&mut self, key: MonthKey, txn: Transaction) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.transactions.push(txn);
            entry.summary = summarize(&entry.transactions);
        }
    }

    /// Remove a transaction from a month's entry, recomputing its summary.
    pub fn apply_remove(&mut self, key: MonthKey, txn_id: &str) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.transactions.retain(|t| t.id != txn_id);
            entry.summary = summarize(&entry.transactions);
        }
    }

    /// Locate a transaction by id across every cached month.
    pub fn find_transaction(&self, txn_id: &str) -> Option<(MonthKey, &Transaction)> {
        self.entries.iter().find_map(|(key, data)| {
            data.transactions
                .iter()
                .find(|t| t.id == txn_id)
                .map(|t| (*key, t))
        })
    }

    /// Replace the target slice of a month's entry. Targets are not
    /// month-partitioned the way transactions are, so the coordinator points
    /// this at the currently displayed month.
    pub fn set_targets(&mut self, key: MonthKey, targets: &[Target]) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.targets = targets.to_vec();
        }
    }
}
