// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment overrides for client and server configuration
//!
//! Kept as a single test: the process environment is shared, and the client
//! and server read the same clock skew variable.

use openkitx403::client::ClientConfig;
use openkitx403::server::ServerConfig;
use std::env;

const SERVER_VARS: [&str; 10] = [
    "OPENKITX403_AUDIENCE",
    "OPENKITX403_ISSUER",
    "OPENKITX403_REALM",
    "OPENKITX403_TTL_SECONDS",
    "OPENKITX403_CLOCK_SKEW_SECONDS",
    "OPENKITX403_BIND_METHOD_PATH",
    "OPENKITX403_UA_BINDING",
    "OPENKITX403_ORIGIN_BINDING",
    "OPENKITX403_REPLAY_MAX_ENTRIES",
    "OPENKITX403_CHALLENGES_PER_MINUTE",
];

const CLIENT_VARS: [&str; 2] = ["OPENKITX403_CLIENT_TIMEOUT_SECS", "OPENKITX403_USER_AGENT"];

fn clear_env() {
    for key in SERVER_VARS.iter().chain(CLIENT_VARS.iter()) {
        env::remove_var(key);
    }
}

#[test]
fn test_config_from_env() {
    clear_env();

    // Nothing set: defaults
    let server = ServerConfig::from_env();
    let defaults = ServerConfig::default();
    assert_eq!(server.audience, defaults.audience);
    assert_eq!(server.ttl_seconds, defaults.ttl_seconds);
    assert_eq!(server.challenges_per_minute, defaults.challenges_per_minute);
    let client = ClientConfig::from_env();
    assert_eq!(client.timeout_secs, 30);
    assert!(client.user_agent.starts_with("openkitx403-rs/"));

    // Every server override takes effect
    env::set_var("OPENKITX403_AUDIENCE", "https://api.example.com");
    env::set_var("OPENKITX403_ISSUER", "api-1");
    env::set_var("OPENKITX403_REALM", "vault");
    env::set_var("OPENKITX403_TTL_SECONDS", " 30 ");
    env::set_var("OPENKITX403_CLOCK_SKEW_SECONDS", "15");
    env::set_var("OPENKITX403_BIND_METHOD_PATH", "false");
    env::set_var("OPENKITX403_UA_BINDING", "1");
    env::set_var("OPENKITX403_ORIGIN_BINDING", "yes");
    env::set_var("OPENKITX403_REPLAY_MAX_ENTRIES", "42");
    env::set_var("OPENKITX403_CHALLENGES_PER_MINUTE", "7");

    let server = ServerConfig::from_env();
    assert_eq!(server.audience, "https://api.example.com");
    assert_eq!(server.issuer, "api-1");
    assert_eq!(server.realm, "vault");
    assert_eq!(server.ttl_seconds, 30);
    assert_eq!(server.clock_skew_seconds, 15);
    assert!(!server.bind_method_path);
    assert!(server.ua_binding);
    assert!(server.origin_binding);
    assert_eq!(server.replay_max_entries, 42);
    assert_eq!(server.challenges_per_minute, 7);
    assert!(server.validate().is_ok());

    // Client overrides, sharing the clock skew variable
    env::set_var("OPENKITX403_CLIENT_TIMEOUT_SECS", "5");
    env::set_var("OPENKITX403_USER_AGENT", "wallet-app/2.0");
    let client = ClientConfig::from_env();
    assert_eq!(client.timeout_secs, 5);
    assert_eq!(client.user_agent, "wallet-app/2.0");
    assert_eq!(client.clock_skew_seconds, 15);

    // Unparsable numbers fall back to defaults
    env::set_var("OPENKITX403_TTL_SECONDS", "sixty");
    env::set_var("OPENKITX403_CLOCK_SKEW_SECONDS", "-1");
    env::set_var("OPENKITX403_REPLAY_MAX_ENTRIES", "lots");
    env::set_var("OPENKITX403_CHALLENGES_PER_MINUTE", "");
    env::set_var("OPENKITX403_CLIENT_TIMEOUT_SECS", "soon");
    env::set_var("OPENKITX403_USER_AGENT", "   ");

    let server = ServerConfig::from_env();
    assert_eq!(server.ttl_seconds, defaults.ttl_seconds);
    assert_eq!(server.clock_skew_seconds, defaults.clock_skew_seconds);
    assert_eq!(server.replay_max_entries, defaults.replay_max_entries);
    assert_eq!(server.challenges_per_minute, defaults.challenges_per_minute);
    let client = ClientConfig::from_env();
    assert_eq!(client.timeout_secs, 30);
    assert_eq!(client.clock_skew_seconds, 120);
    assert!(client.user_agent.starts_with("openkitx403-rs/"));

    clear_env();
}
