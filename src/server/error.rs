// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Verification failures

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Malformed authorization header: {0}")]
    MalformedHeader(String),

    #[error("Invalid challenge: {0}")]
    InvalidChallenge(String),

    #[error("Challenge audience mismatch: expected {expected}, got {found}")]
    AudienceMismatch { expected: String, found: String },

    #[error("Challenge has expired")]
    ChallengeExpired,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Nonce does not match challenge")]
    NonceMismatch,

    #[error("Request binding mismatch: {0}")]
    BindingMismatch(String),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Challenge has already been used")]
    ReplayDetected,

    #[error("Wallet is not permitted by the token gate")]
    TokenGateDenied,

    #[error("Token gate check failed: {0}")]
    TokenGateError(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication
pub type AuthResult<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Stable machine-readable code for response bodies
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedHeader(_) => "malformed_header",
            AuthError::InvalidChallenge(_) => "invalid_challenge",
            AuthError::AudienceMismatch { .. } => "audience_mismatch",
            AuthError::ChallengeExpired => "challenge_expired",
            AuthError::InvalidTimestamp(_) => "invalid_timestamp",
            AuthError::NonceMismatch => "nonce_mismatch",
            AuthError::BindingMismatch(_) => "binding_mismatch",
            AuthError::InvalidAddress(_) => "invalid_address",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::ReplayDetected => "replay_detected",
            AuthError::TokenGateDenied => "token_gate_denied",
            AuthError::TokenGateError(_) => "token_gate_error",
            AuthError::RateLimited { .. } => "rate_limited",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::RateLimited { .. } => 429,
            AuthError::TokenGateError(_) | AuthError::Internal(_) => 500,
            _ => 403,
        }
    }

    pub fn to_response(&self) -> AuthErrorResponse {
        AuthErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// JSON body returned with a rejected request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub message: String,
}
