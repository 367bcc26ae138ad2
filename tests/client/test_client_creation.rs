// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client construction from a wallet keypair

use openkitx403::client::{ClientConfig, OpenKit403Client};
use openkitx403::crypto::{decode_base58, Keypair};

#[test]
fn test_client_creation() {
    let keypair = Keypair::generate();
    let client = OpenKit403Client::new(keypair);
    assert!(!client.address().is_empty());
}

#[test]
fn test_client_address_is_wallet_pubkey() {
    let keypair = Keypair::generate();
    let pubkey = keypair.pubkey();
    let client = OpenKit403Client::new(keypair);

    let decoded = decode_base58(client.address()).unwrap();
    assert_eq!(decoded, pubkey.to_vec());
}

#[test]
fn test_client_from_keypair_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");

    let original = Keypair::generate();
    original.write_to_file(&path).unwrap();

    // solana-keygen format: JSON array of 64 numbers
    let raw: Vec<u8> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw.len(), 64);

    let client = OpenKit403Client::new(Keypair::read_from_file(&path).unwrap());
    assert_eq!(client.address(), original.address());
}

#[test]
fn test_client_with_custom_config() {
    let config = ClientConfig {
        timeout_secs: 5,
        user_agent: "wallet-test/1.0".to_string(),
        clock_skew_seconds: 10,
    };
    let client = OpenKit403Client::with_config(Keypair::generate(), config);

    assert_eq!(client.config().timeout_secs, 5);
    assert_eq!(client.config().user_agent, "wallet-test/1.0");
    assert!(!client.address().is_empty());
}

#[test]
fn test_clients_for_distinct_keypairs_have_distinct_addresses() {
    let a = OpenKit403Client::new(Keypair::generate());
    let b = OpenKit403Client::new(Keypair::generate());
    assert_ne!(a.address(), b.address());
}
