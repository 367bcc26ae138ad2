// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Optional wallet admission check run after signature verification
//!
//! A token gate decides whether an authenticated wallet may use the
//! service, e.g. by checking token or NFT holdings. The crate ships a
//! static allow list; on-chain checks implement [`TokenGate`] themselves.

use async_trait::async_trait;
use std::collections::HashSet;

/// Trait for implementing wallet admission policies
#[async_trait]
pub trait TokenGate: Send + Sync {
    /// Return `Ok(true)` if `address` may access the service
    async fn allows(&self, address: &str) -> anyhow::Result<bool>;

    /// Gate name for logging
    fn name(&self) -> &'static str {
        "token_gate"
    }
}

/// Static set of permitted wallet addresses
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    addresses: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, address: impl Into<String>) {
        self.addresses.insert(address.into());
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[async_trait]
impl TokenGate for AllowList {
    async fn allows(&self, address: &str) -> anyhow::Result<bool> {
        Ok(self.addresses.contains(address))
    }

    fn name(&self) -> &'static str {
        "allow_list"
    }
}
