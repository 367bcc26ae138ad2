// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Challenge issuance and Authorization verification

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::ServerConfig;
use super::error::{AuthError, AuthResult};
use super::rate_limiter::ChallengeRateLimiter;
use super::replay::{InMemoryReplayStore, ReplayStore};
use super::token_gate::TokenGate;
use crate::crypto::{decode_address, encode_base64url, verify_signature};
use crate::protocol::challenge::{parse_timestamp, EXT_ORIGIN, EXT_UA_HASH, MAX_WINDOW_SECONDS};
use crate::protocol::{
    format_bind, parse_bind, signing_message, AuthorizationHeader, Challenge, ChallengeParams,
    WwwAuthenticate,
};

/// Request attributes challenges can be bound to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_agent: Option<String>,
    pub origin: Option<String>,
}

impl RequestContext {
    pub fn new(user_agent: Option<String>, origin: Option<String>) -> Self {
        Self { user_agent, origin }
    }
}

/// A wallet whose Authorization header passed verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedWallet {
    /// base58 wallet address
    pub address: String,
    /// The challenge the wallet answered
    pub challenge: Challenge,
}

/// Issued challenge with its header form
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    /// Full `WWW-Authenticate` header value
    pub header_value: String,
    /// base64url challenge
    pub encoded: String,
    pub challenge: Challenge,
}

/// base64url SHA-256 of a user agent string
pub fn user_agent_hash(user_agent: &str) -> String {
    encode_base64url(&Sha256::digest(user_agent.as_bytes()))
}

fn seconds(value: u64) -> ChronoDuration {
    ChronoDuration::seconds(value.min(MAX_WINDOW_SECONDS) as i64)
}

/// Protected-service side of the handshake
pub struct OpenKit403Server {
    config: ServerConfig,
    replay_store: Arc<dyn ReplayStore>,
    token_gate: Option<Arc<dyn TokenGate>>,
    rate_limiter: ChallengeRateLimiter,
}

impl OpenKit403Server {
    /// Create a server with an in-memory replay store
    pub fn new(config: ServerConfig) -> Self {
        let replay_store = Arc::new(InMemoryReplayStore::new(config.replay_max_entries));
        let rate_limiter = ChallengeRateLimiter::new(config.challenges_per_minute);
        info!(
            "OpenKitx403 server '{}' protecting audience {} (ttl {}s, skew {}s)",
            config.issuer, config.audience, config.ttl_seconds, config.clock_skew_seconds
        );
        Self {
            config,
            replay_store,
            token_gate: None,
            rate_limiter,
        }
    }

    pub fn with_replay_store(mut self, store: Arc<dyn ReplayStore>) -> Self {
        self.replay_store = store;
        self
    }

    pub fn with_token_gate(mut self, gate: Arc<dyn TokenGate>) -> Self {
        self.token_gate = Some(gate);
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &ChallengeRateLimiter {
        &self.rate_limiter
    }

    /// Issue a challenge for `method` `path`
    pub fn create_challenge(
        &self,
        method: &str,
        path: &str,
        ctx: &RequestContext,
    ) -> AuthResult<IssuedChallenge> {
        self.create_challenge_at(method, path, ctx, Utc::now())
    }

    pub fn create_challenge_at(
        &self,
        method: &str,
        path: &str,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedChallenge> {
        let mut ext: BTreeMap<String, Value> = BTreeMap::new();
        if self.config.ua_binding {
            if let Some(ua) = &ctx.user_agent {
                ext.insert(EXT_UA_HASH.to_string(), Value::String(user_agent_hash(ua)));
            }
        }
        if self.config.origin_binding {
            if let Some(origin) = &ctx.origin {
                ext.insert(EXT_ORIGIN.to_string(), Value::String(origin.clone()));
            }
        }

        let challenge = Challenge::issue(
            ChallengeParams {
                aud: self.config.audience.clone(),
                server_id: self.config.issuer.clone(),
                method: method.to_string(),
                path: path.to_string(),
                ttl_seconds: self.config.ttl_seconds,
                ua_bind: self.config.ua_binding,
                origin_bind: self.config.origin_binding,
                ext,
            },
            now,
        );
        let encoded = challenge
            .encode()
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let header_value = WwwAuthenticate::new(&self.config.realm, &encoded).to_header_value();

        debug!("Issued challenge {} for {}", challenge.nonce, format_bind(method, path));
        Ok(IssuedChallenge {
            header_value,
            encoded,
            challenge,
        })
    }

    /// Verify an `Authorization` header for a request to `method` `path`
    pub async fn verify_authorization(
        &self,
        header: &str,
        method: &str,
        path: &str,
        ctx: &RequestContext,
    ) -> AuthResult<VerifiedWallet> {
        self.verify_authorization_at(header, method, path, ctx, Utc::now())
            .await
    }

    pub async fn verify_authorization_at(
        &self,
        header: &str,
        method: &str,
        path: &str,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AuthResult<VerifiedWallet> {
        let auth = AuthorizationHeader::parse(header)
            .map_err(|e| AuthError::MalformedHeader(e.to_string()))?;

        let challenge = Challenge::decode(&auth.challenge)
            .map_err(|e| AuthError::InvalidChallenge(e.to_string()))?;

        if challenge.aud != self.config.audience {
            return Err(AuthError::AudienceMismatch {
                expected: self.config.audience.clone(),
                found: challenge.aud,
            });
        }
        if challenge.server_id != self.config.issuer {
            return Err(AuthError::AudienceMismatch {
                expected: self.config.issuer.clone(),
                found: challenge.server_id,
            });
        }

        self.check_freshness(&challenge, &auth, now)?;

        if auth.nonce != challenge.nonce {
            return Err(AuthError::NonceMismatch);
        }

        if self.config.bind_method_path {
            self.check_binding(&challenge, &auth, method, path)?;
        }
        self.check_context_binding(&challenge, ctx)?;

        decode_address(&auth.addr).map_err(|e| AuthError::InvalidAddress(e.to_string()))?;
        let message =
            signing_message(&challenge).map_err(|e| AuthError::InvalidChallenge(e.to_string()))?;
        verify_signature(&auth.addr, message.as_bytes(), &auth.sig)
            .map_err(|_| AuthError::InvalidSignature)?;

        let max_lifetime = (seconds(self.config.ttl_seconds)
            + seconds(self.config.clock_skew_seconds))
        .to_std()
        .unwrap_or(Duration::ZERO);
        let remaining = (challenge
            .expires_at()
            .map_err(|e| AuthError::InvalidTimestamp(e.to_string()))?
            + seconds(self.config.clock_skew_seconds)
            - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .min(max_lifetime)
            .max(Duration::from_secs(1));
        let replay_key = format!("{}:{}", auth.addr, challenge.nonce);
        if !self
            .replay_store
            .check_and_insert(&replay_key, remaining)
            .await
        {
            warn!("Replay detected for wallet {}", auth.addr);
            return Err(AuthError::ReplayDetected);
        }

        if let Some(gate) = &self.token_gate {
            let allowed = gate
                .allows(&auth.addr)
                .await
                .map_err(|e| AuthError::TokenGateError(e.to_string()))?;
            if !allowed {
                info!("Wallet {} denied by {}", auth.addr, gate.name());
                return Err(AuthError::TokenGateDenied);
            }
        }

        info!("Wallet {} authenticated for {} {}", auth.addr, method, path);
        Ok(VerifiedWallet {
            address: auth.addr,
            challenge,
        })
    }

    fn check_freshness(
        &self,
        challenge: &Challenge,
        auth: &AuthorizationHeader,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let skew = seconds(self.config.clock_skew_seconds);
        let invalid_ts = |e: crate::protocol::ProtocolError| AuthError::InvalidTimestamp(e.to_string());

        if challenge
            .is_expired(now, self.config.clock_skew_seconds)
            .map_err(invalid_ts)?
        {
            return Err(AuthError::ChallengeExpired);
        }
        let issued_at = challenge.issued_at().map_err(invalid_ts)?;
        if issued_at > now + skew {
            return Err(AuthError::InvalidTimestamp(
                "challenge issued in the future".to_string(),
            ));
        }

        // ts/exp can only narrow the configured lifetime
        let ttl = seconds(self.config.ttl_seconds);
        let expires_at = challenge.expires_at().map_err(invalid_ts)?;
        if expires_at - issued_at > ttl {
            warn!(
                "Challenge {} claims lifetime beyond {}s",
                challenge.nonce, self.config.ttl_seconds
            );
            return Err(AuthError::ChallengeExpired);
        }
        if now - issued_at > ttl + skew {
            return Err(AuthError::ChallengeExpired);
        }

        let signed_at = parse_timestamp("ts", &auth.ts).map_err(invalid_ts)?;
        if signed_at > now + skew || signed_at < now - skew {
            return Err(AuthError::InvalidTimestamp(format!(
                "signing time {} outside allowed skew",
                auth.ts
            )));
        }
        Ok(())
    }

    fn check_binding(
        &self,
        challenge: &Challenge,
        auth: &AuthorizationHeader,
        method: &str,
        path: &str,
    ) -> AuthResult<()> {
        let (bound_method, bound_path) =
            parse_bind(&auth.bind).map_err(|e| AuthError::MalformedHeader(e.to_string()))?;
        let request = format_bind(method, path);

        if format_bind(&bound_method, &bound_path) != request {
            return Err(AuthError::BindingMismatch(format!(
                "signed for {}, request is {}",
                auth.bind, request
            )));
        }
        if format_bind(&challenge.method, &challenge.path) != request {
            return Err(AuthError::BindingMismatch(format!(
                "challenge issued for {} {}, request is {}",
                challenge.method, challenge.path, request
            )));
        }
        Ok(())
    }

    /// UA/origin binding follows server configuration, not the challenge flags
    fn check_context_binding(&self, challenge: &Challenge, ctx: &RequestContext) -> AuthResult<()> {
        if self.config.ua_binding {
            let actual = ctx.user_agent.as_deref().map(user_agent_hash);
            let bound = challenge.ua_bind
                && matches!(
                    (challenge.ext_str(EXT_UA_HASH), actual.as_deref()),
                    (Some(expected), Some(actual)) if expected == actual
                );
            if !bound {
                return Err(AuthError::BindingMismatch("user agent changed".to_string()));
            }
        }
        if self.config.origin_binding {
            let bound = challenge.origin_bind
                && matches!(
                    (challenge.ext_str(EXT_ORIGIN), ctx.origin.as_deref()),
                    (Some(expected), Some(actual)) if expected == actual
                );
            if !bound {
                return Err(AuthError::BindingMismatch("origin changed".to_string()));
            }
        }
        Ok(())
    }
}
