// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client-side error types

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::protocol::ProtocolError;

/// Errors that can occur while authenticating a request
#[derive(Debug, Error)]
pub enum ClientError {
    /// Challenge or header could not be parsed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Keypair or encoding failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL is not absolute or cannot be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given
        url: String,
        /// Parser message
        reason: String,
    },

    /// HTTP method name is not valid
    #[error("Invalid HTTP method: {method}")]
    InvalidMethod {
        /// The method as given
        method: String,
    },

    /// Extra request header name or value is not valid
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// Header name
        name: String,
    },

    /// Challenge was issued for a different method or path
    #[error("Challenge bound to {expected}, request is {actual}")]
    BindingMismatch {
        /// Binding carried by the challenge
        expected: String,
        /// Binding of the request being signed
        actual: String,
    },

    /// Challenge expired before it could be answered
    #[error("Challenge expired at {expired_at}")]
    ChallengeExpired {
        /// Expiry timestamp from the challenge
        expired_at: String,
    },
}
