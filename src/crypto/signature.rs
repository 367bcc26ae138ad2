// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ed25519 Signature Verification
//!
//! Verifies that a base58 signature over a challenge message was produced by
//! the wallet whose base58 address is claimed in the `Authorization` header.

use ed25519_dalek::{Signature, VerifyingKey};

use super::encoding::decode_base58;
use super::error::CryptoError;

/// Decode a base58 wallet address into an ed25519 verifying key
///
/// # Errors
///
/// - Address is not valid base58
/// - Address does not decode to exactly 32 bytes
/// - Bytes are not a valid curve point
pub fn decode_address(address: &str) -> Result<VerifyingKey, CryptoError> {
    let invalid = |reason: String| CryptoError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let bytes = decode_base58(address).map_err(|e| invalid(e.to_string()))?;
    let key_bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| invalid(format!("expected 32 bytes, got {}", bytes.len())))?;

    VerifyingKey::from_bytes(&key_bytes).map_err(|e| invalid(e.to_string()))
}

/// Verify a base58 ed25519 signature over `message` for `address`
///
/// Uses strict verification, which rejects small-order keys and
/// non-canonical signatures.
pub fn verify_signature(
    address: &str,
    message: &[u8],
    signature_b58: &str,
) -> Result<(), CryptoError> {
    let verifying_key = decode_address(address)?;

    let sig_bytes = decode_base58(signature_b58)?;
    if sig_bytes.len() != Signature::BYTE_SIZE {
        return Err(CryptoError::InvalidSignature {
            operation: "verify".to_string(),
            reason: format!(
                "expected {} bytes, got {}",
                Signature::BYTE_SIZE,
                sig_bytes.len()
            ),
        });
    }
    let signature =
        Signature::from_slice(&sig_bytes).map_err(|e| CryptoError::InvalidSignature {
            operation: "verify".to_string(),
            reason: e.to_string(),
        })?;

    verifying_key
        .verify_strict(message, &signature)
        .map_err(|_| CryptoError::InvalidSignature {
            operation: "verify".to_string(),
            reason: "signature does not match message".to_string(),
        })
}
