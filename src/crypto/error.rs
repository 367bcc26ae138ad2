// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error types for keypair handling, encodings and ed25519 signatures.
//!
//! ## Error Variants
//!
//! - **InvalidKey**: Keypair material has the wrong size or is internally inconsistent
//! - **InvalidAddress**: A base58 wallet address does not decode to an ed25519 public key
//! - **InvalidSignature**: Signature is malformed or does not verify
//! - **InvalidEncoding**: base58/base64url decoding failed
//! - **Io**: Reading or writing a keypair file failed
//! - **Other**: Generic error for library errors or unexpected failures
//!
//! ## Usage Example
//!
//! ```rust
//! use openkitx403::crypto::CryptoError;
//!
//! fn load_secret(bytes: &[u8]) -> Result<(), CryptoError> {
//!     Err(CryptoError::InvalidKey {
//!         key_type: "solana_secret".to_string(),
//!         reason: format!("expected 64 bytes, got {}", bytes.len()),
//!     })
//! }
//! ```

use std::fmt;

/// Error type for all cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid keypair material
    ///
    /// This error occurs when:
    /// - Secret has wrong length
    /// - Public half of a 64-byte secret does not match the derived key
    /// - Key file content is not a JSON byte array
    InvalidKey {
        /// Type of key that failed (e.g., "solana_secret", "seed")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// Wallet address is not a valid ed25519 public key
    InvalidAddress {
        /// The offending address
        address: String,
        /// Specific failure reason
        reason: String,
    },

    /// ed25519 signature verification failed
    ///
    /// This error occurs when:
    /// - Signature is not 64 bytes
    /// - Signature does not match the message and public key
    InvalidSignature {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// base58 or base64url decoding failed
    InvalidEncoding {
        /// Encoding name ("base58", "base64url")
        encoding: String,
        /// Specific failure reason
        reason: String,
    },

    /// Keypair file could not be read or written
    Io(String),

    /// Generic error for library errors or unexpected failures
    Other(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKey { key_type, reason } => {
                write!(f, "Invalid key ({}): {}", key_type, reason)
            }
            CryptoError::InvalidAddress { address, reason } => {
                write!(f, "Invalid address '{}': {}", address, reason)
            }
            CryptoError::InvalidSignature { operation, reason } => {
                write!(f, "Invalid signature during {}: {}", operation, reason)
            }
            CryptoError::InvalidEncoding { encoding, reason } => {
                write!(f, "Invalid {} encoding: {}", encoding, reason)
            }
            CryptoError::Io(msg) => write!(f, "Keypair file error: {}", msg),
            CryptoError::Other(msg) => write!(f, "Crypto error: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<anyhow::Error> for CryptoError {
    fn from(err: anyhow::Error) -> Self {
        CryptoError::Other(err.to_string())
    }
}

impl From<bs58::decode::Error> for CryptoError {
    fn from(err: bs58::decode::Error) -> Self {
        CryptoError::InvalidEncoding {
            encoding: "base58".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::InvalidEncoding {
            encoding: "base64url".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::Io(err.to_string())
    }
}
