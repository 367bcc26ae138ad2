// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for a protected OpenKitx403 service

use std::env;

use crate::protocol::challenge::MAX_WINDOW_SECONDS;

/// Server-side verification settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Expected challenge audience (origin of the service)
    pub audience: String,
    /// Server identifier placed in challenges
    pub issuer: String,
    /// Realm advertised in `WWW-Authenticate`
    pub realm: String,
    /// Challenge lifetime in seconds
    pub ttl_seconds: u64,
    /// Tolerated clock difference between client and server
    pub clock_skew_seconds: u64,
    /// Require the signed method/path to match the actual request
    pub bind_method_path: bool,
    /// Bind challenges to the requesting user agent
    pub ua_binding: bool,
    /// Bind challenges to the requesting origin
    pub origin_binding: bool,
    /// Maximum remembered nonces
    pub replay_max_entries: usize,
    /// Challenge issuance limit (requests per minute)
    pub challenges_per_minute: u32,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl ServerConfig {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            audience: env::var("OPENKITX403_AUDIENCE").unwrap_or(defaults.audience),
            issuer: env::var("OPENKITX403_ISSUER").unwrap_or(defaults.issuer),
            realm: env::var("OPENKITX403_REALM").unwrap_or(defaults.realm),
            ttl_seconds: env_parse("OPENKITX403_TTL_SECONDS", defaults.ttl_seconds),
            clock_skew_seconds: env_parse(
                "OPENKITX403_CLOCK_SKEW_SECONDS",
                defaults.clock_skew_seconds,
            ),
            bind_method_path: env_flag("OPENKITX403_BIND_METHOD_PATH", defaults.bind_method_path),
            ua_binding: env_flag("OPENKITX403_UA_BINDING", defaults.ua_binding),
            origin_binding: env_flag("OPENKITX403_ORIGIN_BINDING", defaults.origin_binding),
            replay_max_entries: env_parse(
                "OPENKITX403_REPLAY_MAX_ENTRIES",
                defaults.replay_max_entries,
            ),
            challenges_per_minute: env_parse(
                "OPENKITX403_CHALLENGES_PER_MINUTE",
                defaults.challenges_per_minute,
            ),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.audience.trim().is_empty() {
            return Err("Audience must not be empty".to_string());
        }
        if self.issuer.trim().is_empty() {
            return Err("Issuer must not be empty".to_string());
        }
        if self.ttl_seconds == 0 || self.ttl_seconds > MAX_WINDOW_SECONDS {
            return Err(format!(
                "Challenge TTL must be between 1 and {} seconds",
                MAX_WINDOW_SECONDS
            ));
        }
        if self.clock_skew_seconds > MAX_WINDOW_SECONDS {
            return Err("Clock skew is too large".to_string());
        }
        if self.replay_max_entries == 0 {
            return Err("Replay store capacity must be greater than 0".to_string());
        }
        if self.challenges_per_minute == 0 {
            return Err("Challenge rate limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            audience: "http://localhost:3000".to_string(),
            issuer: "openkitx403-server".to_string(),
            realm: "openkitx403".to_string(),
            ttl_seconds: 60,
            clock_skew_seconds: 120,
            bind_method_path: true,
            ua_binding: false,
            origin_binding: false,
            replay_max_entries: 10_000,
            challenges_per_minute: 600,
        }
    }
}
