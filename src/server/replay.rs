// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Replay protection for answered challenges

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Storage for nonces that have already been accepted
///
/// Implementations must make `check_and_insert` atomic: two concurrent calls
/// with the same key may not both return `true`.
#[async_trait]
pub trait ReplayStore: Send + Sync {
    /// Record `key` for `ttl`; returns `false` if it was already present
    async fn check_and_insert(&self, key: &str, ttl: Duration) -> bool;

    /// Number of live entries
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Bounded in-memory replay store
pub struct InMemoryReplayStore {
    entries: Mutex<HashMap<String, Instant>>,
    max_entries: usize,
}

/// Replay store statistics
#[derive(Debug, Clone)]
pub struct ReplayStats {
    /// Total entries held
    pub total: usize,
    /// Entries past their expiry (not yet purged)
    pub expired: usize,
    /// Maximum capacity
    pub max: usize,
}

impl InMemoryReplayStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    pub fn stats(&self) -> ReplayStats {
        let Ok(entries) = self.entries.lock() else {
            return ReplayStats {
                total: 0,
                expired: 0,
                max: self.max_entries,
            };
        };
        let now = Instant::now();
        ReplayStats {
            total: entries.len(),
            expired: entries.values().filter(|e| **e <= now).count(),
            max: self.max_entries,
        }
    }

    fn insert_locked(&self, entries: &mut HashMap<String, Instant>, key: &str, ttl: Duration) -> bool {
        let now = Instant::now();
        if let Some(expires_at) = entries.get(key) {
            if *expires_at > now {
                return false;
            }
        }

        if entries.len() >= self.max_entries {
            entries.retain(|_, expires_at| *expires_at > now);
        }
        // Still full: evict the entry closest to expiry
        if entries.len() >= self.max_entries {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, expires_at)| **expires_at)
                .map(|(k, _)| k.clone())
            {
                debug!("Replay store full, evicting {}", oldest);
                entries.remove(&oldest);
            }
        }

        entries.insert(key.to_string(), now + ttl);
        true
    }
}

#[async_trait]
impl ReplayStore for InMemoryReplayStore {
    async fn check_and_insert(&self, key: &str, ttl: Duration) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => self.insert_locked(&mut entries, key, ttl),
            // A poisoned lock must not turn into an accepted replay
            Err(_) => false,
        }
    }

    async fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}
