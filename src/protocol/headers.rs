// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! `WWW-Authenticate` and `Authorization` header codecs
//!
//! Both headers use the `OpenKitx403` scheme followed by comma-separated
//! `key="value"` parameters. Parsing matches the scheme case-insensitively
//! and ignores parameters it does not know.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::error::ProtocolError;
use super::{PROTOCOL_VERSION, SCHEME};

fn param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z][A-Za-z0-9_-]*)\s*=\s*"([^"]*)""#).expect("static regex is valid")
    })
}

/// Split a header value into its parameters after checking the scheme
pub fn parse_params(value: &str) -> Result<HashMap<String, String>, ProtocolError> {
    let value = value.trim();
    let (scheme, rest) = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) => (scheme, rest),
        None => (value, ""),
    };

    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(ProtocolError::UnsupportedScheme {
            found: scheme.to_string(),
        });
    }

    Ok(param_regex()
        .captures_iter(rest)
        .map(|c| (c[1].to_ascii_lowercase(), c[2].to_string()))
        .collect())
}

/// True if a header value announces the OpenKitx403 scheme
pub fn is_openkitx403(value: &str) -> bool {
    value
        .trim_start()
        .split(char::is_whitespace)
        .next()
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
}

fn take(params: &mut HashMap<String, String>, name: &str) -> Result<String, ProtocolError> {
    params
        .remove(&name.to_ascii_lowercase())
        .ok_or_else(|| ProtocolError::MissingParameter {
            name: name.to_string(),
        })
}

/// `<METHOD>:<path>` binding carried in the Authorization header
pub fn format_bind(method: &str, path: &str) -> String {
    format!("{}:{}", method.to_ascii_uppercase(), path)
}

/// Split a bind value into method and path
pub fn parse_bind(value: &str) -> Result<(String, String), ProtocolError> {
    match value.split_once(':') {
        Some((method, path)) if !method.is_empty() && path.starts_with('/') => {
            Ok((method.to_ascii_uppercase(), path.to_string()))
        }
        _ => Err(ProtocolError::InvalidBind {
            value: value.to_string(),
        }),
    }
}

/// Server challenge header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WwwAuthenticate {
    pub realm: String,
    pub version: String,
    /// base64url challenge
    pub challenge: String,
}

impl WwwAuthenticate {
    pub fn new(realm: impl Into<String>, challenge: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            version: PROTOCOL_VERSION.to_string(),
            challenge: challenge.into(),
        }
    }

    pub fn to_header_value(&self) -> String {
        format!(
            r#"{} realm="{}", version="{}", challenge="{}""#,
            SCHEME, self.realm, self.version, self.challenge
        )
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        let mut params = parse_params(value)?;
        let challenge = take(&mut params, "challenge")?;
        Ok(Self {
            realm: params.remove("realm").unwrap_or_default(),
            version: params
                .remove("version")
                .unwrap_or_else(|| PROTOCOL_VERSION.to_string()),
            challenge,
        })
    }
}

/// Client credentials header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// base58 wallet address
    pub addr: String,
    /// base58 ed25519 signature
    pub sig: String,
    /// base64url challenge being answered
    pub challenge: String,
    /// Client signing time, RFC3339
    pub ts: String,
    pub nonce: String,
    /// `<METHOD>:<path>`
    pub bind: String,
}

impl AuthorizationHeader {
    pub fn to_header_value(&self) -> String {
        format!(
            r#"{} addr="{}", sig="{}", challenge="{}", ts="{}", nonce="{}", bind="{}""#,
            SCHEME, self.addr, self.sig, self.challenge, self.ts, self.nonce, self.bind
        )
    }

    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        let mut params = parse_params(value)?;
        Ok(Self {
            addr: take(&mut params, "addr")?,
            sig: take(&mut params, "sig")?,
            challenge: take(&mut params, "challenge")?,
            ts: take(&mut params, "ts")?,
            nonce: take(&mut params, "nonce")?,
            bind: take(&mut params, "bind")?,
        })
    }
}
