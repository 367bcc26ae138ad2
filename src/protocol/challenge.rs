// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authentication challenge issued by a protected server
//!
//! A challenge is a small JSON document carried base64url-encoded inside the
//! `WWW-Authenticate` header. It binds the signature the client produces to
//! one audience, one server, one HTTP method/path and a short time window.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::ProtocolError;
use super::{ALGORITHM, PROTOCOL_VERSION};
use crate::crypto::{decode_base64url, encode_base64url};

/// Number of random bytes in a challenge nonce
pub const NONCE_BYTES: usize = 16;

/// Upper bound applied to TTL and skew windows
pub const MAX_WINDOW_SECONDS: u64 = 86_400;

/// Extension key holding the base64url SHA-256 of the bound user agent
pub const EXT_UA_HASH: &str = "uaHash";

/// Extension key holding the bound request origin
pub const EXT_ORIGIN: &str = "origin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Protocol version (always 1)
    pub v: u8,
    /// Signature algorithm (always `ed25519-solana`)
    pub alg: String,
    /// Random base64url nonce
    pub nonce: String,
    /// Issue time, RFC3339 UTC
    pub ts: String,
    /// Audience (origin of the protected service)
    pub aud: String,
    /// HTTP method the challenge is bound to
    pub method: String,
    /// Request path the challenge is bound to
    pub path: String,
    pub ua_bind: bool,
    pub origin_bind: bool,
    pub server_id: String,
    /// Expiry time, RFC3339 UTC
    pub exp: String,
    #[serde(default)]
    pub ext: BTreeMap<String, Value>,
}

/// Inputs for issuing a challenge
#[derive(Debug, Clone)]
pub struct ChallengeParams {
    pub aud: String,
    pub server_id: String,
    pub method: String,
    pub path: String,
    pub ttl_seconds: u64,
    pub ua_bind: bool,
    pub origin_bind: bool,
    pub ext: BTreeMap<String, Value>,
}

/// Format a timestamp the way challenges carry it (millisecond precision, `Z`)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ProtocolError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ProtocolError::InvalidTimestamp {
            field: field.to_string(),
            value: value.to_string(),
        })
}

pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    encode_base64url(&bytes)
}

impl Challenge {
    /// Issue a new challenge valid from `now` for `ttl_seconds`
    pub fn issue(params: ChallengeParams, now: DateTime<Utc>) -> Self {
        let ttl = Duration::seconds(params.ttl_seconds.min(MAX_WINDOW_SECONDS) as i64);
        Self {
            v: PROTOCOL_VERSION,
            alg: ALGORITHM.to_string(),
            nonce: generate_nonce(),
            ts: format_timestamp(now),
            aud: params.aud,
            method: params.method.to_ascii_uppercase(),
            path: params.path,
            ua_bind: params.ua_bind,
            origin_bind: params.origin_bind,
            server_id: params.server_id,
            exp: format_timestamp(now + ttl),
            ext: params.ext,
        }
    }

    /// Encode as base64url of the canonical JSON
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(encode_base64url(self.canonical_json()?.as_bytes()))
    }

    /// Decode a base64url challenge and check version and algorithm
    pub fn decode(encoded: &str) -> Result<Self, ProtocolError> {
        let bytes = decode_base64url(encoded)?;
        let challenge: Challenge =
            serde_json::from_slice(&bytes).map_err(|e| ProtocolError::InvalidChallenge {
                reason: format!("malformed JSON: {}", e),
            })?;

        if challenge.v != PROTOCOL_VERSION {
            return Err(ProtocolError::InvalidChallenge {
                reason: format!("unsupported version {}", challenge.v),
            });
        }
        if challenge.alg != ALGORITHM {
            return Err(ProtocolError::InvalidChallenge {
                reason: format!("unsupported algorithm {}", challenge.alg),
            });
        }
        Ok(challenge)
    }

    /// JSON with keys sorted at every depth and no insignificant whitespace
    pub fn canonical_json(&self) -> Result<String, ProtocolError> {
        let value = serde_json::to_value(self).map_err(|e| ProtocolError::InvalidChallenge {
            reason: e.to_string(),
        })?;
        Ok(canonicalize(&value))
    }

    pub fn issued_at(&self) -> Result<DateTime<Utc>, ProtocolError> {
        parse_timestamp("ts", &self.ts)
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, ProtocolError> {
        parse_timestamp("exp", &self.exp)
    }

    /// True once `now` is past expiry plus the allowed skew
    pub fn is_expired(&self, now: DateTime<Utc>, skew_seconds: u64) -> Result<bool, ProtocolError> {
        let skew = Duration::seconds(skew_seconds.min(MAX_WINDOW_SECONDS) as i64);
        Ok(now > self.expires_at()? + skew)
    }

    /// String extension value, if present
    pub fn ext_str(&self, key: &str) -> Option<&str> {
        self.ext.get(key).and_then(Value::as_str)
    }
}

fn canonicalize(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let fields: Vec<String> = sorted
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), canonicalize(v)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonicalize).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

/// Build an `ext` map from string pairs
pub fn ext_from_pairs<'a>(
    pairs: impl IntoIterator<Item = (&'a str, String)>,
) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v)))
        .collect()
}
