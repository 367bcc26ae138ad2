// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! axum integration
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use openkitx403::server::{require_wallet_auth, OpenKit403Server, ServerConfig, VerifiedWallet};
//! use std::sync::Arc;
//!
//! async fn whoami(wallet: VerifiedWallet) -> String {
//!     wallet.address
//! }
//!
//! let server = Arc::new(OpenKit403Server::new(ServerConfig::default()));
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(middleware::from_fn_with_state(server, require_wallet_auth));
//! ```

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, warn};

use super::error::{AuthError, AuthErrorResponse};
use super::verifier::{OpenKit403Server, RequestContext, VerifiedWallet};
use crate::protocol::headers::is_openkitx403;

impl RequestContext {
    /// Collect binding attributes from request headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            user_agent: get(header::USER_AGENT),
            origin: get(header::ORIGIN),
        }
    }
}

/// Middleware that admits only requests carrying a valid wallet signature
///
/// On success the [`VerifiedWallet`] is stored in request extensions, where
/// handlers can take it as an extractor.
pub async fn require_wallet_auth(
    State(server): State<Arc<OpenKit403Server>>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_string();
    // nested routers strip their prefix from uri(); the client signed the full path
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let ctx = RequestContext::from_headers(request.headers());

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_openkitx403(v))
        .map(str::to_string);

    let Some(authorization) = authorization else {
        return challenge_response(&server, &method, &path, &ctx, None);
    };

    match server
        .verify_authorization(&authorization, &method, &path, &ctx)
        .await
    {
        Ok(wallet) => {
            request.extensions_mut().insert(wallet);
            next.run(request).await
        }
        Err(err) if err.status_code() == 403 => {
            warn!("Rejected {} {}: {}", method, path, err);
            challenge_response(&server, &method, &path, &ctx, Some(err))
        }
        Err(err) => {
            error!("Verification error for {} {}: {}", method, path, err);
            AuthRejection(err).into_response()
        }
    }
}

/// 403 with a fresh challenge, or 429 when issuance is throttled
fn challenge_response(
    server: &OpenKit403Server,
    method: &str,
    path: &str,
    ctx: &RequestContext,
    cause: Option<AuthError>,
) -> Response {
    if let Err(limited) = server.rate_limiter().check() {
        return AuthRejection(limited).into_response();
    }

    let issued = match server.create_challenge(method, path, ctx) {
        Ok(issued) => issued,
        Err(err) => return AuthRejection(err).into_response(),
    };
    let Ok(header_value) = HeaderValue::from_str(&issued.header_value) else {
        return AuthRejection(AuthError::Internal("unencodable challenge header".to_string()))
            .into_response();
    };

    let body = cause.map(|e| e.to_response()).unwrap_or_else(|| AuthErrorResponse {
        error: "wallet_auth_required".to_string(),
        message: "Sign the challenge in WWW-Authenticate with your wallet".to_string(),
    });

    let mut response = (StatusCode::FORBIDDEN, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, header_value);
    response
}

/// Error response wrapper
pub struct AuthRejection(pub AuthError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.0.to_response())).into_response();

        if let AuthError::RateLimited { retry_after_secs } = self.0 {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedWallet
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedWallet>()
            .cloned()
            .ok_or_else(|| {
                AuthRejection(AuthError::MalformedHeader(
                    "route is not behind require_wallet_auth".to_string(),
                ))
            })
    }
}
