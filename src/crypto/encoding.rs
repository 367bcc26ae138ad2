// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire encodings
//!
//! Addresses and signatures travel as base58 (Solana convention), challenges
//! and nonces as unpadded base64url.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use super::error::CryptoError;

pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn decode_base58(value: &str) -> Result<Vec<u8>, CryptoError> {
    Ok(bs58::decode(value.trim()).into_vec()?)
}

pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url; trailing `=` padding is tolerated.
pub fn decode_base64url(value: &str) -> Result<Vec<u8>, CryptoError> {
    Ok(URL_SAFE_NO_PAD.decode(value.trim().trim_end_matches('='))?)
}
