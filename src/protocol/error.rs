// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Protocol-level errors (header and challenge parsing)

use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors raised while parsing or building protocol artifacts
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// Header does not use the OpenKitx403 scheme
    #[error("Unsupported authentication scheme: {found}")]
    UnsupportedScheme {
        /// Scheme found in the header (empty if none)
        found: String,
    },

    /// Required header parameter is absent
    #[error("Missing header parameter: {name}")]
    MissingParameter {
        /// Parameter name
        name: String,
    },

    /// Challenge payload could not be decoded or has unexpected content
    #[error("Invalid challenge: {reason}")]
    InvalidChallenge {
        /// Reason the challenge was rejected
        reason: String,
    },

    /// Timestamp is not RFC3339
    #[error("Invalid timestamp in '{field}': {value}")]
    InvalidTimestamp {
        /// Field holding the timestamp
        field: String,
        /// Raw value
        value: String,
    },

    /// Bind parameter is not `METHOD:path`
    #[error("Invalid bind parameter: {value}")]
    InvalidBind {
        /// Raw value
        value: String,
    },

    /// Encoding failure from the crypto layer
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
