// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenKitx403 wire protocol
//!
//! ## Protocol Flow
//!
//! 1. Client requests a protected resource without credentials
//! 2. Server answers `403` with `WWW-Authenticate: OpenKitx403 realm=.., version="1", challenge=..`
//! 3. Client decodes the challenge and signs the canonical message with its wallet
//! 4. Client retries with `Authorization: OpenKitx403 addr=.., sig=.., challenge=.., ts=.., nonce=.., bind=..`
//! 5. Server verifies signature, freshness, binding and replay, then serves the request

pub mod challenge;
pub mod error;
pub mod headers;
pub mod message;

/// Authentication scheme name used in both headers
pub const SCHEME: &str = "OpenKitx403";

/// Protocol version carried in challenges
pub const PROTOCOL_VERSION: u8 = 1;

/// Signature algorithm identifier
pub const ALGORITHM: &str = "ed25519-solana";

pub use challenge::{Challenge, ChallengeParams};
pub use error::ProtocolError;
pub use headers::{format_bind, parse_bind, AuthorizationHeader, WwwAuthenticate};
pub use message::signing_message;
