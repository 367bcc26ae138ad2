// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-authenticating HTTP client

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::config::ClientConfig;
use super::error::ClientError;
use crate::crypto::{encode_base58, Keypair};
use crate::protocol::challenge::format_timestamp;
use crate::protocol::headers::is_openkitx403;
use crate::protocol::{
    format_bind, signing_message, AuthorizationHeader, Challenge, WwwAuthenticate,
};

/// A request to send through [`OpenKit403Client::authenticate`]
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl AuthRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new("POST", url).body(body)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP client that answers OpenKitx403 challenges with a wallet keypair
///
/// The client is cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OpenKit403Client {
    keypair: Keypair,
    address: String,
    config: ClientConfig,
    http: Client,
}

impl OpenKit403Client {
    /// Create a client for `keypair` with default configuration
    pub fn new(keypair: Keypair) -> Self {
        Self::with_config(keypair, ClientConfig::default())
    }

    pub fn with_config(keypair: Keypair, config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        let address = keypair.address();
        info!("OpenKitx403 client ready for wallet {}", address);

        Self {
            keypair,
            address,
            config,
            http,
        }
    }

    /// base58 wallet address of the client's keypair
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Answer a base64url challenge for a request to `method` `path`
    ///
    /// Returns the complete `Authorization` header value.
    ///
    /// # Errors
    ///
    /// - Challenge cannot be decoded or has an unsupported version/algorithm
    /// - Challenge is bound to a different method or path
    /// - Challenge has already expired
    pub fn sign_challenge(
        &self,
        challenge_b64: &str,
        method: &str,
        path: &str,
    ) -> Result<String, ClientError> {
        self.sign_challenge_at(challenge_b64, method, path, Utc::now())
    }

    pub(crate) fn sign_challenge_at(
        &self,
        challenge_b64: &str,
        method: &str,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ClientError> {
        let challenge = Challenge::decode(challenge_b64)?;

        let expected = format_bind(&challenge.method, &challenge.path);
        let actual = format_bind(method, path);
        if expected != actual {
            return Err(ClientError::BindingMismatch { expected, actual });
        }

        if challenge.is_expired(now, self.config.clock_skew_seconds)? {
            return Err(ClientError::ChallengeExpired {
                expired_at: challenge.exp.clone(),
            });
        }

        let message = signing_message(&challenge)?;
        let signature = self.keypair.sign(message.as_bytes());

        let header = AuthorizationHeader {
            addr: self.address.clone(),
            sig: encode_base58(&signature),
            challenge: challenge_b64.trim().to_string(),
            ts: format_timestamp(now),
            nonce: challenge.nonce,
            bind: expected,
        };
        Ok(header.to_header_value())
    }

    /// Send `request`, answering an OpenKitx403 challenge if one comes back
    ///
    /// The request is sent once without credentials. A `403` carrying an
    /// OpenKitx403 `WWW-Authenticate` header is answered and the request is
    /// retried exactly once; any other response is returned untouched.
    pub async fn authenticate(&self, request: AuthRequest) -> Result<Response, ClientError> {
        let url = Url::parse(&request.url).map_err(|e| ClientError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ClientError::InvalidMethod {
                method: request.method.clone(),
            })?;
        let headers = build_headers(&request.headers)?;

        let first = self
            .send(&method, &url, &headers, request.body.as_deref(), None)
            .await?;
        if first.status() != StatusCode::FORBIDDEN {
            return Ok(first);
        }

        let challenge_header = first
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| is_openkitx403(v))
            .map(str::to_string);

        let Some(challenge_header) = challenge_header else {
            debug!("403 from {} without an OpenKitx403 challenge", url);
            return Ok(first);
        };

        let www = WwwAuthenticate::parse(&challenge_header)?;
        let authorization = self.sign_challenge(&www.challenge, method.as_str(), url.path())?;
        debug!(
            "Answering OpenKitx403 challenge for {} {} (realm {})",
            method,
            url.path(),
            www.realm
        );

        let retry = self
            .send(
                &method,
                &url,
                &headers,
                request.body.as_deref(),
                Some(&authorization),
            )
            .await?;
        if retry.status() == StatusCode::FORBIDDEN {
            warn!("Server rejected wallet {} for {}", self.address, url);
        }
        Ok(retry)
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        Ok(builder.send().await?)
    }
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let invalid = || ClientError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}
