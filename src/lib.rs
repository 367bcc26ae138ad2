// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod client;
pub mod crypto;
pub mod protocol;
pub mod server;
pub mod version;

// Re-export main types
pub use client::{AuthRequest, ClientConfig, ClientError, OpenKit403Client};
pub use crypto::{CryptoError, Keypair};
pub use protocol::{AuthorizationHeader, Challenge, ProtocolError, WwwAuthenticate};
pub use server::{
    require_wallet_auth, AuthError, OpenKit403Server, RequestContext, ServerConfig,
    VerifiedWallet,
};
