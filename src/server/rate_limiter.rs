// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate limiting for challenge issuance

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::error::AuthError;

const DEFAULT_PER_MINUTE: u32 = 600;

/// Rate limiter for issued challenges
#[derive(Clone)]
pub struct ChallengeRateLimiter {
    limiter: Arc<GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl ChallengeRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_minute` - Maximum challenges issued per minute (0 falls back to 600)
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute)
            .or(NonZeroU32::new(DEFAULT_PER_MINUTE))
            .unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(GovRateLimiter::direct(Quota::per_minute(rpm)));

        Self {
            limiter,
            requests_per_minute: rpm.get(),
        }
    }

    /// Returns Ok(()) if a challenge may be issued, or AuthError::RateLimited if not
    pub fn check(&self) -> Result<(), AuthError> {
        self.limiter
            .check()
            .map_err(|_| AuthError::RateLimited {
                retry_after_secs: self.retry_after_secs(),
            })
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Seconds until one more token is replenished (at least 1)
    fn retry_after_secs(&self) -> u64 {
        (60 / u64::from(self.requests_per_minute)).max(1)
    }
}
