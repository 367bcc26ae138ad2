// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical message a wallet signs to answer a challenge

use super::challenge::Challenge;
use super::error::ProtocolError;
use super::SCHEME;

/// Build the exact bytes the wallet signs for `challenge`
///
/// ```text
/// OpenKitx403 Challenge
///
/// domain: <aud>
/// server: <serverId>
/// nonce: <nonce>
/// ts: <ts>
/// method: <method>
/// path: <path>
///
/// payload: <canonical challenge JSON>
/// ```
pub fn signing_message(challenge: &Challenge) -> Result<String, ProtocolError> {
    let payload = challenge.canonical_json()?;
    let lines = [
        format!("{} Challenge", SCHEME),
        String::new(),
        format!("domain: {}", challenge.aud),
        format!("server: {}", challenge.server_id),
        format!("nonce: {}", challenge.nonce),
        format!("ts: {}", challenge.ts),
        format!("method: {}", challenge.method),
        format!("path: {}", challenge.path),
        String::new(),
        format!("payload: {}", payload),
    ];
    Ok(lines.join("\n"))
}
