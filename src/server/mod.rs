// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server side of the OpenKitx403 handshake
//!
//! Key features:
//! - Challenge issuance bound to audience, server, method and path
//! - Signature, freshness and binding verification
//! - Replay protection with a pluggable nonce store
//! - Optional token gate for wallet admission
//! - Rate-limited challenge issuance
//! - axum middleware and `VerifiedWallet` extractor

pub mod config;
pub mod error;
pub mod middleware;
pub mod rate_limiter;
pub mod replay;
pub mod token_gate;
pub mod verifier;

pub use config::ServerConfig;
pub use error::{AuthError, AuthErrorResponse, AuthResult};
pub use middleware::{require_wallet_auth, AuthRejection};
pub use rate_limiter::ChallengeRateLimiter;
pub use replay::{InMemoryReplayStore, ReplayStore};
pub use token_gate::{AllowList, TokenGate};
pub use verifier::{IssuedChallenge, OpenKit403Server, RequestContext, VerifiedWallet};
