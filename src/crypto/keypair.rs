// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Solana Wallet Keypair
//!
//! ed25519 keypair in the formats Solana tooling uses:
//!
//! - **64-byte secret**: 32-byte seed followed by the 32-byte public key
//! - **base58 string**: the 64-byte secret, as exported by browser wallets
//! - **JSON file**: the 64-byte secret as an array of numbers (`solana-keygen` format)
//!
//! The wallet address is the base58 encoding of the 32-byte public key.
//!
//! ## Security Considerations
//!
//! - Secret bytes are NEVER logged; `Debug` prints the address only
//! - Keypair files are written with owner-only permissions on Unix

use ed25519_dalek::{Signer, SigningKey};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::encoding::{decode_base58, encode_base58};
use super::error::CryptoError;

/// Length of a Solana secret key (seed + public key)
pub const SECRET_KEY_LENGTH: usize = 64;

/// Length of an ed25519 seed
pub const SEED_LENGTH: usize = 32;

/// Wallet keypair used to sign authentication challenges
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random number generator
    pub fn generate() -> Self {
        let mut seed = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut seed);
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Build a keypair from raw secret bytes
    ///
    /// Accepts either a 64-byte Solana secret (seed + public key) or a
    /// 32-byte seed. For 64-byte input the public half must match the key
    /// derived from the seed.
    ///
    /// # Errors
    ///
    /// - Input length is neither 32 nor 64 bytes
    /// - Public half of a 64-byte secret does not match
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            SECRET_KEY_LENGTH => {
                let mut secret = [0u8; SECRET_KEY_LENGTH];
                secret.copy_from_slice(bytes);
                let signing_key =
                    SigningKey::from_keypair_bytes(&secret).map_err(|e| CryptoError::InvalidKey {
                        key_type: "solana_secret".to_string(),
                        reason: format!("public key does not match secret: {}", e),
                    })?;
                Ok(Self { signing_key })
            }
            SEED_LENGTH => {
                let mut seed = [0u8; SEED_LENGTH];
                seed.copy_from_slice(bytes);
                Ok(Self {
                    signing_key: SigningKey::from_bytes(&seed),
                })
            }
            other => Err(CryptoError::InvalidKey {
                key_type: "solana_secret".to_string(),
                reason: format!(
                    "expected {} or {} bytes, got {}",
                    SECRET_KEY_LENGTH, SEED_LENGTH, other
                ),
            }),
        }
    }

    /// Parse a base58-encoded 64-byte secret (browser wallet export format)
    pub fn from_base58_string(value: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base58(value)?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(CryptoError::InvalidKey {
                key_type: "base58_secret".to_string(),
                reason: format!(
                    "expected {} bytes, got {}",
                    SECRET_KEY_LENGTH,
                    bytes.len()
                ),
            });
        }
        Self::from_bytes(&bytes)
    }

    /// Read a `solana-keygen` JSON keypair file
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let bytes: Vec<u8> =
            serde_json::from_str(contents.trim()).map_err(|e| CryptoError::InvalidKey {
                key_type: "keypair_file".to_string(),
                reason: format!("{}: expected a JSON array of bytes ({})", path.display(), e),
            })?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(CryptoError::InvalidKey {
                key_type: "keypair_file".to_string(),
                reason: format!(
                    "{}: expected {} bytes, got {}",
                    path.display(),
                    SECRET_KEY_LENGTH,
                    bytes.len()
                ),
            });
        }
        let keypair = Self::from_bytes(&bytes)?;
        debug!("Loaded keypair {} from {}", keypair.address(), path.display());
        Ok(keypair)
    }

    /// Write the keypair as a `solana-keygen` JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), CryptoError> {
        let path = path.as_ref();
        let json = serde_json::to_string(&self.to_bytes().to_vec())
            .map_err(|e| CryptoError::Other(e.to_string()))?;
        fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        info!("Wrote keypair {} to {}", self.address(), path.display());
        Ok(())
    }

    /// 64-byte Solana secret (seed + public key)
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    pub fn to_base58_string(&self) -> String {
        encode_base58(&self.to_bytes())
    }

    /// Raw 32-byte public key
    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Wallet address: base58 of the public key
    pub fn address(&self) -> String {
        encode_base58(&self.pubkey())
    }

    /// Sign a message, returning the 64-byte ed25519 signature
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
