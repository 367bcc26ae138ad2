// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet Cryptography Module
//!
//! Cryptographic primitives used by both sides of the OpenKitx403 handshake:
//!
//! - **Keypair**: Solana ed25519 keypair, import/export in Solana formats
//! - **Signature**: ed25519 verification against a base58 wallet address
//! - **Encoding**: base58 for addresses and signatures, base64url for challenges
//!
//! ## Security Considerations
//!
//! - Secret keys stay in memory and are never logged
//! - Verification is strict (no small-order keys, canonical signatures only)

pub mod encoding;
pub mod error;
pub mod keypair;
pub mod signature;

pub use encoding::{decode_base58, decode_base64url, encode_base58, encode_base64url};
pub use error::CryptoError;
pub use keypair::Keypair;
pub use signature::{decode_address, verify_signature};
